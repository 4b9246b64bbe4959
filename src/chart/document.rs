use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Chart, Edge, NodeType};
use crate::error::Result;
use crate::geometry::Point;
use crate::settings::ChartSettings;

/// Persisted form of a chart. Node order is not stored; loading creates nodes
/// in name order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartDocument {
    pub settings: ChartSettings,
    pub nodes: BTreeMap<String, NodeEntry>,
    pub edges: Vec<EdgeEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeEntry {
    pub description: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<Point>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeEntry {
    pub name: String,
    pub description: String,
    pub from_node: String,
    pub to_node: String,
}

/// Outcome of loading a document whose parse succeeded.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoadReport {
    /// Edges dropped because an endpoint is missing, in document order.
    pub skipped_edges: Vec<EdgeEntry>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.skipped_edges.is_empty()
    }
}

impl ChartDocument {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Chart {
    pub fn to_document(&self) -> ChartDocument {
        let nodes = self
            .nodes
            .iter()
            .map(|node| {
                (
                    node.name().to_owned(),
                    NodeEntry {
                        description: node.description.clone(),
                        node_type: node.node_type,
                        pos: Some(node.pos),
                    },
                )
            })
            .collect();
        let edges = self
            .edges
            .iter()
            .map(|edge| EdgeEntry {
                name: edge.name.clone(),
                description: edge.description.clone(),
                from_node: edge.from.clone(),
                to_node: edge.to.clone(),
            })
            .collect();

        ChartDocument {
            settings: self.settings.clone(),
            nodes,
            edges,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        self.to_document().to_json()
    }

    /// Builds a chart from a parsed document. Edges naming a missing node are
    /// skipped and reported rather than failing the load.
    pub fn from_document(document: ChartDocument, canvas_size: Point) -> Result<(Self, LoadReport)> {
        let ChartDocument {
            settings,
            nodes,
            edges,
        } = document;
        let mut chart = Self::new(settings, canvas_size);
        let mut report = LoadReport::default();

        for (name, entry) in nodes {
            chart.add_node(name.as_str(), entry.node_type, entry.pos.unwrap_or_default())?;
            chart.set_description(&name, entry.description)?;
        }

        for entry in edges {
            if chart.node(&entry.from_node).is_none() || chart.node(&entry.to_node).is_none() {
                log::warn!(
                    "skipping edge `{}` from `{}` to `{}`: missing endpoint",
                    entry.name,
                    entry.from_node,
                    entry.to_node
                );
                report.skipped_edges.push(entry);
                continue;
            }

            let mut edge = Edge::new(entry.from_node, entry.to_node, entry.name);
            edge.description = entry.description;
            chart.push_edge(edge);
        }

        log::info!(
            "loaded chart `{}`: {} nodes, {} edges, {} skipped",
            chart.settings().name,
            chart.nodes().len(),
            chart.edges().len(),
            report.skipped_edges.len()
        );
        Ok((chart, report))
    }

    /// Parses and loads in one step. A parse failure leaves nothing built.
    pub fn from_json(json: &str, canvas_size: Point) -> Result<(Self, LoadReport)> {
        Self::from_document(ChartDocument::from_json(json)?, canvas_size)
    }
}

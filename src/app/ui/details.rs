use eframe::egui::{RichText, Ui};
use flow_chart::chart::NodeState;
use flow_chart::control::{ControlKey, ControlState, InputEvent};

use super::super::{DetailRequests, DetailTarget, ViewModel};

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Details");
        ui.add_space(6.0);

        // The chart leaves its viewing state on Escape, removal or clear.
        if !matches!(
            self.chart.control_state(),
            ControlState::ViewingNode { .. } | ControlState::ViewingEdge { .. }
        ) {
            self.details = None;
        }

        match self.details.clone() {
            Some(DetailTarget::Node(name)) => self.draw_node_details(ui, &name),
            Some(DetailTarget::Edge(index)) => self.draw_edge_details(ui, index),
            None => self.draw_selection(ui),
        }
    }

    fn draw_selection(&mut self, ui: &mut Ui) {
        let selection = self.chart.selection();
        if selection.is_empty() {
            ui.label("Click a node to select it, shift-click to add to the selection.");
            ui.label("Double-click a node or an edge label to open its details.");
            return;
        }

        ui.label(RichText::new(format!("{} selected", selection.len())).strong());
        for name in selection {
            ui.label(name.as_str());
        }
    }

    fn draw_node_details(&mut self, ui: &mut Ui, name: &str) {
        let Some(node) = self.chart.node(name) else {
            ui.label("This node no longer exists.");
            return;
        };

        let mut description = node.description.clone();
        let mut disabled = node.state() == NodeState::Disabled;
        ui.label(RichText::new(node.name()).strong());
        ui.label(format!("Type: {}", node.node_type.label()));
        ui.label(format!("Position: ({:.0}, {:.0})", node.pos.x, node.pos.y));
        let edges = self
            .chart
            .edges()
            .iter()
            .filter(|edge| edge.touches(name))
            .count();
        ui.label(format!("Edges: {edges}"));

        ui.separator();
        ui.label("Description");
        if ui.text_edit_multiline(&mut description).changed()
            && let Err(error) = self.chart.set_description(name, description)
        {
            self.set_status(error.to_string());
        }

        if ui.checkbox(&mut disabled, "Disabled").changed()
            && let Err(error) = self.chart.set_node_disabled(name, disabled)
        {
            self.set_status(error.to_string());
        }

        ui.horizontal(|ui| {
            if ui.button("Close").clicked() {
                self.close_details();
            }
            if ui.button("Remove node").clicked() {
                match self.chart.remove_node(name) {
                    Ok(_) => self.set_status(format!("removed node `{name}`")),
                    Err(error) => self.set_status(error.to_string()),
                }
            }
        });
    }

    fn draw_edge_details(&mut self, ui: &mut Ui, index: usize) {
        let Some(edge) = self.chart.edges().get(index) else {
            ui.label("This edge no longer exists.");
            return;
        };

        let title = if edge.name.is_empty() {
            "(unnamed edge)".to_owned()
        } else {
            edge.name.clone()
        };
        ui.label(RichText::new(title).strong());
        ui.label(format!("{} -> {}", edge.from, edge.to));

        let mut description = edge.description.clone();
        ui.separator();
        ui.label("Description");
        if ui.text_edit_multiline(&mut description).changed()
            && let Err(error) = self.chart.set_edge_description(index, description)
        {
            self.set_status(error.to_string());
        }

        if ui.button("Close").clicked() {
            self.close_details();
        }
    }

    fn close_details(&mut self) {
        let mut requests = DetailRequests::default();
        self.chart
            .handle_input(&InputEvent::Key(ControlKey::Escape), &mut requests);
        self.details = None;
    }
}

use eframe::egui::Color32;
use serde::{Deserialize, Serialize};

use crate::geometry::{Bounds, Point};
use crate::util::parse_color;

pub const NODE_WIDTH: f32 = 100.0;
pub const NODE_HEIGHT: f32 = 60.0;
pub const DETAIL_WIDTH: f32 = 500.0;
pub const DETAIL_HEIGHT: f32 = 200.0;

pub const DEFAULT_NODE_COLOR: &str = "#0000FF";
pub const DEFAULT_EDGE_COLOR: &str = "#FFFFFF";
pub const DEFAULT_DESCRIPTION: &str = "This object does not have a description.";

const DISABLED_COLOR: Color32 = Color32::from_rgb(0xA5, 0xA5, 0xA5);
const DRAGGING_COLOR: Color32 = Color32::from_rgb(0x00, 0x00, 0xA5);
const SELECTED_COLOR: Color32 = Color32::from_rgb(0xA5, 0xA5, 0xFF);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum NodeType {
    #[default]
    Data,
    Application,
    Other,
}

impl NodeType {
    pub const ALL: [Self; 3] = [Self::Data, Self::Application, Self::Other];

    pub fn label(self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Application => "application",
            Self::Other => "other",
        }
    }
}

impl From<NodeType> for u8 {
    fn from(node_type: NodeType) -> Self {
        match node_type {
            NodeType::Data => 0,
            NodeType::Application => 1,
            NodeType::Other => 2,
        }
    }
}

impl TryFrom<u8> for NodeType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Data),
            1 => Ok(Self::Application),
            2 => Ok(Self::Other),
            _ => Err(format!("invalid node type {value}, expected 0, 1 or 2")),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NodeState {
    #[default]
    Active,
    Disabled,
    Dragging,
    Selected,
    Viewing,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    name: String,
    pub node_type: NodeType,
    pub description: String,
    pub pos: Point,
    pub color: String,
    state: NodeState,
}

impl Node {
    pub fn new(name: impl Into<String>, node_type: NodeType, pos: Point) -> Self {
        Self {
            name: name.into(),
            node_type,
            description: DEFAULT_DESCRIPTION.to_owned(),
            pos,
            color: DEFAULT_NODE_COLOR.to_owned(),
            state: NodeState::Active,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: NodeState) {
        self.state = state;
    }

    /// World-space footprint; nodes being viewed grow to the detail size.
    pub fn size(&self) -> Point {
        match self.state {
            NodeState::Viewing => Point::new(DETAIL_WIDTH, DETAIL_HEIGHT),
            _ => Point::new(NODE_WIDTH, NODE_HEIGHT),
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_center_size(self.pos, self.size())
    }

    pub fn fill_color(&self) -> Color32 {
        match self.state {
            NodeState::Active | NodeState::Viewing => parse_color(&self.color),
            NodeState::Disabled => DISABLED_COLOR,
            NodeState::Dragging => DRAGGING_COLOR,
            NodeState::Selected => SELECTED_COLOR,
        }
    }

    /// Moves the node unless the user is holding it. Pointer drags pass
    /// `ignore_state` so the held node follows the pointer; physics does not.
    pub fn nudge(&mut self, delta: Point, ignore_state: bool) -> bool {
        if ignore_state || self.state != NodeState::Dragging {
            self.pos += delta;
            true
        } else {
            false
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub name: String,
    pub description: String,
    pub color: String,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            name: name.into(),
            description: String::new(),
            color: DEFAULT_EDGE_COLOR.to_owned(),
        }
    }

    pub fn touches(&self, node: &str) -> bool {
        self.from == node || self.to == node
    }

    pub fn stroke_color(&self) -> Color32 {
        parse_color(&self.color)
    }
}

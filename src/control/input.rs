use crate::chart::NodeState;
use crate::geometry::Point;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Self = Self { shift: false };
    pub const SHIFT: Self = Self { shift: true };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlKey {
    Escape,
    Delete,
}

/// Raw input in view (canvas) coordinates. `time` is seconds on any
/// monotonic clock and only feeds double-click detection.
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    PointerDown {
        pos: Point,
        modifiers: Modifiers,
    },
    PointerMove {
        pos: Point,
        primary_down: bool,
    },
    PointerUp {
        pos: Point,
        modifiers: Modifiers,
        time: f64,
    },
    PointerLeave,
    Wheel {
        direction: ZoomDirection,
    },
    Key(ControlKey),
}

impl InputEvent {
    pub fn pos(&self) -> Option<Point> {
        match self {
            Self::PointerDown { pos, .. }
            | Self::PointerMove { pos, .. }
            | Self::PointerUp { pos, .. } => Some(*pos),
            Self::PointerLeave | Self::Wheel { .. } | Self::Key(_) => None,
        }
    }
}

/// What lies under the pointer, resolved by the chart with the current view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Hit {
    Empty,
    Node(String),
    Edge(usize),
}

/// Mutations requested by the control layer, applied in order by the chart.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlEffect {
    SetNodeState { node: String, state: NodeState },
    /// World-space move that overrides the drag lock.
    MoveNode { node: String, delta: Point },
    MoveView(Point),
    Scale(f32),
    RemoveNode(String),
    NodeDetails(String),
    EdgeDetails(usize),
}

/// Snapshot of the view the control layer needs to convert and bound input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewContext {
    pub offset: Point,
    pub scale: f32,
    pub canvas_center: Point,
    pub min_scale: f32,
    pub max_scale: f32,
    pub zoom_factor: f32,
}

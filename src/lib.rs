pub mod chart;
pub mod control;
pub mod error;
pub mod geometry;
pub mod physics;
pub mod scheduler;
pub mod settings;
pub mod util;
pub mod view;

pub use chart::{Chart, ChartDocument, ChartObserver, Edge, LoadReport, Node, NodeState, NodeType};
pub use error::{ChartError, Result};
pub use geometry::{Bounds, Point};
pub use settings::{ChartSettings, EdgeType, PhysicsSettings, ViewSettings};

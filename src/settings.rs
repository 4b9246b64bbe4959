use serde::{Deserialize, Serialize};

use crate::geometry::Point;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSettings {
    pub name: String,
    pub physics_settings: PhysicsSettings,
    pub view_settings: ViewSettings,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            name: "untitled".to_owned(),
            physics_settings: PhysicsSettings::default(),
            view_settings: ViewSettings::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicsSettings {
    pub spring_enabled: bool,
    /// Carried through documents; the relaxation itself is frictionless.
    pub spring_friction: f32,
    pub spring_strength: f32,
    pub spring_length: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            spring_enabled: true,
            spring_friction: 0.9,
            spring_strength: 0.01,
            spring_length: 200.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeType {
    #[default]
    Direct,
    Polyline,
    #[serde(alias = "orthagonal")]
    Orthogonal,
}

impl EdgeType {
    pub const ALL: [Self; 3] = [Self::Direct, Self::Polyline, Self::Orthogonal];

    pub fn label(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Polyline => "polyline",
            Self::Orthogonal => "orthogonal",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSettings {
    pub edge_type: EdgeType,
    pub min_zoom_level: f32,
    pub max_zoom_level: f32,
    pub zoom_multiplier: f32,
    /// Initial view offset relative to the canvas centre.
    pub start_position: Point,
    pub start_zoom_level: f32,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            edge_type: EdgeType::Direct,
            min_zoom_level: 2.0,
            max_zoom_level: 2.0,
            zoom_multiplier: 2.0,
            start_position: Point::ZERO,
            start_zoom_level: 0.0,
        }
    }
}

impl ViewSettings {
    /// Largest permitted view scale.
    pub fn max_scale(&self) -> f32 {
        self.zoom_multiplier.powf(self.max_zoom_level)
    }

    /// Smallest permitted view scale.
    pub fn min_scale(&self) -> f32 {
        self.zoom_multiplier.powf(-self.min_zoom_level)
    }

    pub fn start_scale(&self) -> f32 {
        self.zoom_multiplier.powf(self.start_zoom_level)
    }
}

use crate::geometry::Point;
use crate::settings::PhysicsSettings;

/// Which side of the rest length a spring acts on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpringMode {
    Both,
    /// Only pushes apart nodes closer than the rest length.
    RepelOnly,
    /// Only pulls together nodes farther than the rest length.
    AttractOnly,
}

/// Force to apply to the node at `first`; the node at `second` receives the
/// negation. Each side absorbs half of the restoring force.
pub fn spring_force(
    first: Point,
    second: Point,
    settings: &PhysicsSettings,
    mode: SpringMode,
) -> Point {
    let mut delta = first - second;
    let mut distance = delta.length();
    if distance == 0.0 {
        delta = Point::new(1.0, 0.0);
        distance = 1.0;
    }

    let stretch = settings.spring_length - distance;
    let active = match mode {
        SpringMode::Both => true,
        SpringMode::RepelOnly => stretch > 0.0,
        SpringMode::AttractOnly => stretch < 0.0,
    };
    if !active {
        return Point::ZERO;
    }

    let force = stretch * settings.spring_strength;
    (delta / distance) * force / 2.0
}

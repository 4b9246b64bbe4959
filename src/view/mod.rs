mod render;

pub use render::{
    ARROWHEAD_LENGTH, ARROWHEAD_WIDTH, Surface, TextAnchor, draw, edge_anchor, edge_endpoints,
};

use crate::geometry::{Bounds, Point};
use crate::settings::ViewSettings;

/// Pan offset and zoom scale mapping world space onto the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    offset: Point,
    scale: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::new(Point::ZERO, 1.0)
    }
}

impl ViewTransform {
    pub fn new(offset: Point, scale: f32) -> Self {
        Self { offset, scale }
    }

    /// World origin at the canvas centre, displaced by the configured start
    /// position and scaled to the start zoom level.
    pub fn initial(canvas_size: Point, settings: &ViewSettings) -> Self {
        Self::new(
            canvas_size * 0.5 + settings.start_position,
            settings.start_scale(),
        )
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn world_to_view(&self, point: Point) -> Point {
        point * self.scale + self.offset
    }

    pub fn view_to_world(&self, point: Point) -> Point {
        (point - self.offset) / self.scale
    }

    pub fn bounds_to_view(&self, bounds: Bounds) -> Bounds {
        Bounds {
            min: self.world_to_view(bounds.min),
            max: self.world_to_view(bounds.max),
        }
    }

    pub fn move_view(&mut self, delta: Point) {
        self.offset += delta;
    }

    /// Multiplies the scale unconditionally; zoom limits belong to the caller.
    pub fn scale_by(&mut self, factor: f32) {
        self.scale *= factor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Point, b: Point) {
        let tolerance = 1e-3 * (1.0 + a.length().max(b.length()));
        assert!(a.distance(b) <= tolerance, "{a:?} != {b:?}");
    }

    #[test]
    fn round_trip_recovers_world_points() {
        let transforms = [
            ViewTransform::new(Point::new(400.0, 300.0), 1.0),
            ViewTransform::new(Point::new(-1250.5, 88.0), 4.0),
            ViewTransform::new(Point::new(12.0, -7.25), 0.25),
            ViewTransform::new(Point::new(640.0, 360.0), 0.125),
        ];
        let points = [
            Point::ZERO,
            Point::new(100.0, 0.0),
            Point::new(-3.5, 17.25),
            Point::new(12_000.0, -9_000.0),
        ];

        for transform in transforms {
            for point in points {
                assert_close(transform.view_to_world(transform.world_to_view(point)), point);
            }
        }
    }

    #[test]
    fn world_to_view_applies_scale_then_offset() {
        let transform = ViewTransform::new(Point::new(400.0, 300.0), 2.0);
        assert_eq!(
            transform.world_to_view(Point::new(10.0, -5.0)),
            Point::new(420.0, 290.0)
        );
    }

    #[test]
    fn initial_view_uses_start_settings() {
        let settings = ViewSettings {
            start_position: Point::new(15.0, -5.0),
            start_zoom_level: 1.0,
            ..ViewSettings::default()
        };

        let transform = ViewTransform::initial(Point::new(800.0, 600.0), &settings);

        assert_eq!(transform.offset(), Point::new(415.0, 295.0));
        assert_eq!(transform.scale(), 2.0);
    }

    #[test]
    fn move_and_scale_accumulate() {
        let mut transform = ViewTransform::default();
        transform.move_view(Point::new(3.0, 4.0));
        transform.move_view(Point::new(-1.0, 1.0));
        transform.scale_by(2.0);
        transform.scale_by(0.25);

        assert_eq!(transform.offset(), Point::new(2.0, 5.0));
        assert_eq!(transform.scale(), 0.5);
    }
}

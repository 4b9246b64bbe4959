use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Shape, Stroke, Vec2};
use flow_chart::geometry::{Bounds, Point};
use flow_chart::view::{Surface, TextAnchor};

const BACKGROUND: Color32 = Color32::from_rgb(19, 23, 29);

/// Draws chart frames into an egui painter clipped to the canvas rect.
pub(super) struct PainterSurface<'a> {
    painter: &'a Painter,
    rect: Rect,
}

impl<'a> PainterSurface<'a> {
    pub(super) fn new(painter: &'a Painter, rect: Rect) -> Self {
        Self { painter, rect }
    }

    fn to_screen(&self, point: Point) -> Pos2 {
        self.rect.min + Vec2::from(point)
    }
}

impl Surface for PainterSurface<'_> {
    fn size(&self) -> Point {
        self.rect.size().into()
    }

    fn clear(&mut self) {
        self.painter.rect_filled(self.rect, 0.0, BACKGROUND);
    }

    fn fill_rect(&mut self, rect: Bounds, color: Color32) {
        let rect = Rect::from_min_max(self.to_screen(rect.min), self.to_screen(rect.max));
        self.painter.rect_filled(rect, 0.0, color);
    }

    fn line(&mut self, from: Point, to: Point, color: Color32) {
        self.painter
            .line_segment([self.to_screen(from), self.to_screen(to)], Stroke::new(1.0, color));
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color32) {
        let points = points.iter().map(|point| self.to_screen(*point)).collect();
        self.painter
            .add(Shape::convex_polygon(points, color, Stroke::NONE));
    }

    fn text(&mut self, pos: Point, text: &str, size: f32, anchor: TextAnchor, color: Color32) {
        let align = match anchor {
            TextAnchor::LeftCenter => Align2::LEFT_CENTER,
            TextAnchor::Center => Align2::CENTER_CENTER,
        };
        self.painter
            .text(self.to_screen(pos), align, text, FontId::proportional(size), color);
    }
}

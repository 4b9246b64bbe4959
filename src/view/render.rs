use eframe::egui::Color32;

use super::ViewTransform;
use crate::chart::{Edge, Node, Objects};
use crate::geometry::{Bounds, Point};
use crate::settings::{EdgeType, ViewSettings};

pub const ARROWHEAD_LENGTH: f32 = 20.0;
pub const ARROWHEAD_WIDTH: f32 = 10.0;

const LABEL_SIZE: f32 = 12.0;
const LABEL_ZOOM_GROWTH: f32 = 14.0;
const LABEL_COLOR: Color32 = Color32::WHITE;
const OVERLAY_ORIGIN: Point = Point::new(10.0, 10.0);
const OVERLAY_LINE_HEIGHT: f32 = 20.0;
const OVERLAY_COLOR: Color32 = Color32::WHITE;

const HELP_LINES: [(&str, &str); 4] = [
    ("a", "add node"),
    ("c", "connect nodes"),
    ("del", "remove selected"),
    ("esc", "close details"),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAnchor {
    LeftCenter,
    Center,
}

/// Drawing primitives in view space, supplied by the host.
pub trait Surface {
    fn size(&self) -> Point;
    fn clear(&mut self);
    fn fill_rect(&mut self, rect: Bounds, color: Color32);
    fn line(&mut self, from: Point, to: Point, color: Color32);
    fn fill_polygon(&mut self, points: &[Point], color: Color32);
    fn text(&mut self, pos: Point, text: &str, size: f32, anchor: TextAnchor, color: Color32);
}

/// Clears the surface, then draws edges, nodes and the fixed overlay.
pub fn draw(
    surface: &mut dyn Surface,
    transform: &ViewTransform,
    settings: &ViewSettings,
    objects: Objects<'_>,
) {
    surface.clear();

    for edge in objects.edges {
        if let Some((from, to)) = objects.endpoints(edge) {
            draw_edge(surface, transform, settings.edge_type, edge, from, to);
        }
    }

    for node in objects.nodes {
        draw_node(surface, transform, settings, node);
    }

    draw_overlay(surface, transform);
}

fn draw_node(
    surface: &mut dyn Surface,
    transform: &ViewTransform,
    settings: &ViewSettings,
    node: &Node,
) {
    let rect = transform.bounds_to_view(node.bounds());
    surface.fill_rect(rect, node.fill_color());

    let scale = transform.scale();
    let center = rect.center();
    let zoomed_out = scale <= settings.min_scale() * 1.0001;
    let (label_pos, label_size) = if zoomed_out {
        (Point::new(center.x, rect.min.y - 8.0), LABEL_SIZE)
    } else if scale >= 1.0 {
        (center, LABEL_SIZE + LABEL_ZOOM_GROWTH * scale)
    } else {
        (center, LABEL_SIZE)
    };

    surface.text(
        label_pos,
        node.name(),
        label_size,
        TextAnchor::Center,
        LABEL_COLOR,
    );
}

fn draw_edge(
    surface: &mut dyn Surface,
    transform: &ViewTransform,
    edge_type: EdgeType,
    edge: &Edge,
    from: &Node,
    to: &Node,
) {
    // Polyline and orthogonal routing are not implemented and fall back to a
    // direct arrow.
    match edge_type {
        EdgeType::Direct | EdgeType::Polyline | EdgeType::Orthogonal => {
            draw_direct_edge(surface, transform, edge, from, to);
        }
    }
}

fn draw_direct_edge(
    surface: &mut dyn Surface,
    transform: &ViewTransform,
    edge: &Edge,
    from: &Node,
    to: &Node,
) {
    let (start, end) = edge_endpoints(from, to);
    let color = edge.stroke_color();
    draw_arrow(
        surface,
        transform.world_to_view(start),
        transform.world_to_view(end),
        transform.scale(),
        color,
    );

    if !edge.name.is_empty() {
        surface.text(
            edge_anchor(transform, from, to),
            &edge.name,
            LABEL_SIZE,
            TextAnchor::Center,
            color,
        );
    }
}

fn draw_arrow(surface: &mut dyn Surface, from: Point, to: Point, scale: f32, color: Color32) {
    let delta = to - from;
    let distance = delta.length();
    if distance <= f32::EPSILON {
        return;
    }

    let head_base = to - delta * (ARROWHEAD_LENGTH * scale / distance);
    surface.line(from, head_base, color);

    let normal = Point::new(-delta.y, delta.x) * (ARROWHEAD_WIDTH / 2.0 * scale / distance);
    surface.fill_polygon(&[to, head_base + normal, head_base - normal], color);
}

/// World-space endpoints of a direct edge: on the side of each node's box that
/// faces the other node, or the centre on an axis where the boxes overlap.
pub fn edge_endpoints(from: &Node, to: &Node) -> (Point, Point) {
    let from_half = from.size() * 0.5;
    let to_half = to.size() * 0.5;

    let side_x = if from.pos.x - from_half.x > to.pos.x + to_half.x {
        1.0
    } else if from.pos.x + from_half.x < to.pos.x - to_half.x {
        -1.0
    } else {
        0.0
    };
    let side_y = if from.pos.y - from_half.y > to.pos.y + to_half.y {
        1.0
    } else if from.pos.y + from_half.y < to.pos.y - to_half.y {
        -1.0
    } else {
        0.0
    };

    let start = Point::new(
        from.pos.x - from_half.x * side_x,
        from.pos.y - from_half.y * side_y,
    );
    let end = Point::new(to.pos.x + to_half.x * side_x, to.pos.y + to_half.y * side_y);
    (start, end)
}

/// View-space point where an edge label is drawn and where the edge is hit.
pub fn edge_anchor(transform: &ViewTransform, from: &Node, to: &Node) -> Point {
    transform.world_to_view((from.pos + to.pos) * 0.5)
}

fn draw_overlay(surface: &mut dyn Surface, transform: &ViewTransform) {
    let center = surface.size() * 0.5;
    let offset = transform.offset();
    let lines = [
        ("x", format!("{}", offset.x - center.x)),
        ("y", format!("{}", offset.y - center.y)),
        ("offsx", format!("{}", offset.x)),
        ("offsy", format!("{}", offset.y)),
        ("zoom", format!("{}x", transform.scale())),
    ]
    .into_iter()
    .chain(HELP_LINES.iter().map(|(key, text)| (*key, (*text).to_owned())));

    for (row, (name, text)) in lines.enumerate() {
        let pos = OVERLAY_ORIGIN + Point::new(0.0, row as f32 * OVERLAY_LINE_HEIGHT);
        surface.text(
            pos,
            &format!("{name}: {text}"),
            LABEL_SIZE,
            TextAnchor::LeftCenter,
            OVERLAY_COLOR,
        );
    }
}

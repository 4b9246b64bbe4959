mod input;

pub use input::{
    ControlEffect, ControlKey, Hit, InputEvent, Modifiers, ViewContext, ZoomDirection,
};

use crate::chart::NodeState;
use crate::geometry::Point;

/// Pointer travel in pixels before a press on a node becomes a drag.
pub const DRAG_THRESHOLD: f32 = 5.0;
/// Seconds between two clicks on the same target that open its details.
pub const DOUBLE_CLICK_WINDOW: f64 = 0.5;

const SCALE_TOLERANCE: f32 = 1e-4;

#[derive(Clone, Debug, Default, PartialEq)]
pub enum ControlState {
    #[default]
    Idle,
    DraggingCanvas {
        anchor: Point,
    },
    DraggingNode,
    ViewingNode {
        node: String,
    },
    ViewingEdge {
        edge: usize,
    },
}

#[derive(Clone, Debug, PartialEq)]
enum ClickTarget {
    Node(String),
    Edge(usize),
}

#[derive(Clone, Debug)]
struct Click {
    target: ClickTarget,
    time: f64,
}

#[derive(Clone, Debug)]
struct Press {
    anchor: Point,
    node: String,
}

/// Owns the selection and decides node visual states, so selection membership
/// and `Selected`/`Dragging` states always move together.
#[derive(Debug, Default)]
pub struct ControlHandler {
    state: ControlState,
    selection: Vec<String>,
    pointer: Option<Point>,
    press: Option<Press>,
    last_click: Option<Click>,
}

impl ControlHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ControlState {
        &self.state
    }

    /// Selected node names in selection order, without duplicates.
    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    pub fn is_selected(&self, node: &str) -> bool {
        self.selection.iter().any(|selected| selected == node)
    }

    pub fn handle(
        &mut self,
        event: &InputEvent,
        hit: &Hit,
        view: &ViewContext,
    ) -> Vec<ControlEffect> {
        let mut effects = Vec::new();

        match event {
            InputEvent::PointerDown { pos, .. } => self.pointer_down(*pos, hit),
            InputEvent::PointerMove { pos, primary_down } => {
                self.pointer_move(*pos, *primary_down, view, &mut effects);
            }
            InputEvent::PointerUp {
                pos,
                modifiers,
                time,
            } => self.pointer_up(*pos, modifiers.shift, *time, hit, &mut effects),
            InputEvent::PointerLeave => self.pointer_leave(&mut effects),
            InputEvent::Wheel { direction } => self.zoom(*direction, view, &mut effects),
            InputEvent::Key(key) => self.key(*key, &mut effects),
        }

        effects
    }

    /// Makes `node` the only selection, leaving any detail view first.
    pub fn select_only(&mut self, node: &str) -> Vec<ControlEffect> {
        let mut effects = Vec::new();
        self.leave_view(&mut effects);
        self.abort_drag(&mut effects);
        self.replace_selection(node, &mut effects);
        effects
    }

    pub fn clear_selection(&mut self) -> Vec<ControlEffect> {
        let mut effects = Vec::new();
        self.abort_drag(&mut effects);
        self.deselect_all(&mut effects);
        effects
    }

    /// Drops every reference to a node that no longer takes part in
    /// interaction. The caller owns the node's state afterwards.
    pub fn forget_node(&mut self, node: &str) {
        self.selection.retain(|selected| selected != node);
        if self.press.as_ref().is_some_and(|press| press.node == node) {
            self.press = None;
        }
        if matches!(&self.last_click, Some(Click { target: ClickTarget::Node(name), .. }) if name == node)
        {
            self.last_click = None;
        }
        if matches!(&self.state, ControlState::ViewingNode { node: viewed } if viewed == node) {
            self.transition(ControlState::Idle);
        }
        if self.selection.is_empty() && self.state == ControlState::DraggingNode {
            self.transition(ControlState::Idle);
        }
    }

    /// Edge indices shift when edges are removed; forget any held index.
    pub fn forget_edges(&mut self) {
        if matches!(self.last_click, Some(Click { target: ClickTarget::Edge(_), .. })) {
            self.last_click = None;
        }
        if matches!(self.state, ControlState::ViewingEdge { .. }) {
            self.transition(ControlState::Idle);
        }
    }

    pub fn reset(&mut self) {
        self.transition(ControlState::Idle);
        self.selection.clear();
        self.pointer = None;
        self.press = None;
        self.last_click = None;
    }

    fn transition(&mut self, next: ControlState) {
        if self.state != next {
            log::trace!("control: {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    fn pointer_down(&mut self, pos: Point, hit: &Hit) {
        self.pointer = Some(pos);
        if self.state != ControlState::Idle {
            return;
        }

        match hit {
            Hit::Node(node) => {
                self.press = Some(Press {
                    anchor: pos,
                    node: node.clone(),
                });
            }
            Hit::Empty | Hit::Edge(_) => {
                self.press = None;
                self.transition(ControlState::DraggingCanvas { anchor: pos });
            }
        }
    }

    fn pointer_move(
        &mut self,
        pos: Point,
        primary_down: bool,
        view: &ViewContext,
        effects: &mut Vec<ControlEffect>,
    ) {
        let last = self.pointer.replace(pos).unwrap_or(pos);
        let delta = pos - last;

        match self.state {
            ControlState::DraggingCanvas { .. } => {
                if delta != Point::ZERO {
                    effects.push(ControlEffect::MoveView(delta));
                }
            }
            ControlState::DraggingNode => {
                if delta != Point::ZERO {
                    self.move_selection(delta / view.scale, effects);
                }
            }
            ControlState::Idle => {
                if !primary_down {
                    self.press = None;
                    return;
                }
                let Some(press) = self.press.take() else {
                    return;
                };
                if pos.distance(press.anchor) <= DRAG_THRESHOLD {
                    self.press = Some(press);
                    return;
                }
                self.start_node_drag(&press.node, pos - press.anchor, view, effects);
            }
            ControlState::ViewingNode { .. } | ControlState::ViewingEdge { .. } => {}
        }
    }

    fn start_node_drag(
        &mut self,
        node: &str,
        travelled: Point,
        view: &ViewContext,
        effects: &mut Vec<ControlEffect>,
    ) {
        if !self.is_selected(node) {
            self.replace_selection(node, effects);
        }
        for selected in &self.selection {
            effects.push(ControlEffect::SetNodeState {
                node: selected.clone(),
                state: NodeState::Dragging,
            });
        }
        // Catch up with the travel swallowed by the threshold.
        self.move_selection(travelled / view.scale, effects);
        self.last_click = None;
        self.transition(ControlState::DraggingNode);
    }

    fn move_selection(&self, delta: Point, effects: &mut Vec<ControlEffect>) {
        for selected in &self.selection {
            effects.push(ControlEffect::MoveNode {
                node: selected.clone(),
                delta,
            });
        }
    }

    fn pointer_up(
        &mut self,
        pos: Point,
        shift: bool,
        time: f64,
        hit: &Hit,
        effects: &mut Vec<ControlEffect>,
    ) {
        self.pointer = Some(pos);
        self.press = None;

        match self.state.clone() {
            ControlState::DraggingCanvas { anchor } => {
                self.transition(ControlState::Idle);
                if pos != anchor {
                    self.last_click = None;
                    return;
                }
                if !shift {
                    self.deselect_all(effects);
                }
                match hit {
                    Hit::Edge(edge) => self.click_edge(*edge, time, effects),
                    _ => self.last_click = None,
                }
            }
            ControlState::DraggingNode => {
                self.settle_selection(effects);
                self.transition(ControlState::Idle);
            }
            ControlState::Idle => match hit {
                Hit::Node(node) => self.click_node(node, shift, time, effects),
                Hit::Empty | Hit::Edge(_) => {
                    self.last_click = None;
                    if !shift {
                        self.deselect_all(effects);
                    }
                }
            },
            ControlState::ViewingNode { .. } | ControlState::ViewingEdge { .. } => {}
        }
    }

    fn click_node(&mut self, node: &str, shift: bool, time: f64, effects: &mut Vec<ControlEffect>) {
        if shift {
            self.last_click = None;
            if let Some(index) = self.selection.iter().position(|selected| selected == node) {
                self.selection.remove(index);
                effects.push(ControlEffect::SetNodeState {
                    node: node.to_owned(),
                    state: NodeState::Active,
                });
            } else {
                self.selection.push(node.to_owned());
                effects.push(ControlEffect::SetNodeState {
                    node: node.to_owned(),
                    state: NodeState::Selected,
                });
            }
            return;
        }

        let target = ClickTarget::Node(node.to_owned());
        if self.is_double_click(&target, time) {
            self.last_click = None;
            self.deselect_all(effects);
            effects.push(ControlEffect::SetNodeState {
                node: node.to_owned(),
                state: NodeState::Viewing,
            });
            effects.push(ControlEffect::NodeDetails(node.to_owned()));
            self.transition(ControlState::ViewingNode {
                node: node.to_owned(),
            });
            return;
        }

        self.replace_selection(node, effects);
        self.last_click = Some(Click { target, time });
    }

    fn click_edge(&mut self, edge: usize, time: f64, effects: &mut Vec<ControlEffect>) {
        let target = ClickTarget::Edge(edge);
        if self.is_double_click(&target, time) {
            self.last_click = None;
            effects.push(ControlEffect::EdgeDetails(edge));
            self.transition(ControlState::ViewingEdge { edge });
        } else {
            self.last_click = Some(Click { target, time });
        }
    }

    fn is_double_click(&self, target: &ClickTarget, time: f64) -> bool {
        self.last_click.as_ref().is_some_and(|click| {
            click.target == *target && time >= click.time && time - click.time <= DOUBLE_CLICK_WINDOW
        })
    }

    fn pointer_leave(&mut self, effects: &mut Vec<ControlEffect>) {
        self.pointer = None;
        self.press = None;
        self.abort_drag(effects);
    }

    fn abort_drag(&mut self, effects: &mut Vec<ControlEffect>) {
        match self.state {
            ControlState::DraggingNode => {
                self.settle_selection(effects);
                self.transition(ControlState::Idle);
            }
            ControlState::DraggingCanvas { .. } => self.transition(ControlState::Idle),
            _ => {}
        }
    }

    fn zoom(&mut self, direction: ZoomDirection, view: &ViewContext, effects: &mut Vec<ControlEffect>) {
        if self.state != ControlState::Idle || view.zoom_factor <= 1.0 {
            return;
        }

        // Keep the canvas centre fixed. With the default factor of 2 this is
        // `+d_origin` when zooming in and `-d_origin / 2` when zooming out.
        let factor = view.zoom_factor;
        let d_origin = view.offset - view.canvas_center;
        match direction {
            ZoomDirection::In => {
                if view.scale * factor <= view.max_scale * (1.0 + SCALE_TOLERANCE) {
                    effects.push(ControlEffect::Scale(factor));
                    effects.push(ControlEffect::MoveView(d_origin * (factor - 1.0)));
                }
            }
            ZoomDirection::Out => {
                if view.scale / factor >= view.min_scale * (1.0 - SCALE_TOLERANCE) {
                    effects.push(ControlEffect::MoveView(d_origin * (1.0 / factor - 1.0)));
                    effects.push(ControlEffect::Scale(1.0 / factor));
                }
            }
        }
    }

    fn key(&mut self, key: ControlKey, effects: &mut Vec<ControlEffect>) {
        match key {
            ControlKey::Escape => self.leave_view(effects),
            ControlKey::Delete => {
                if self.state != ControlState::Idle {
                    return;
                }
                self.last_click = None;
                for node in self.selection.drain(..) {
                    effects.push(ControlEffect::RemoveNode(node));
                }
            }
        }
    }

    fn leave_view(&mut self, effects: &mut Vec<ControlEffect>) {
        match self.state.clone() {
            ControlState::ViewingNode { node } => {
                effects.push(ControlEffect::SetNodeState {
                    node,
                    state: NodeState::Active,
                });
                self.transition(ControlState::Idle);
            }
            ControlState::ViewingEdge { .. } => self.transition(ControlState::Idle),
            _ => {}
        }
    }

    fn replace_selection(&mut self, node: &str, effects: &mut Vec<ControlEffect>) {
        for selected in self.selection.drain(..) {
            if selected != node {
                effects.push(ControlEffect::SetNodeState {
                    node: selected,
                    state: NodeState::Active,
                });
            }
        }
        self.selection.push(node.to_owned());
        effects.push(ControlEffect::SetNodeState {
            node: node.to_owned(),
            state: NodeState::Selected,
        });
    }

    fn deselect_all(&mut self, effects: &mut Vec<ControlEffect>) {
        for selected in self.selection.drain(..) {
            effects.push(ControlEffect::SetNodeState {
                node: selected,
                state: NodeState::Active,
            });
        }
    }

    fn settle_selection(&self, effects: &mut Vec<ControlEffect>) {
        for selected in &self.selection {
            effects.push(ControlEffect::SetNodeState {
                node: selected.clone(),
                state: NodeState::Selected,
            });
        }
    }
}

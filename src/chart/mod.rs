mod document;
mod node;
mod search;

use std::collections::HashMap;

pub use document::{ChartDocument, EdgeEntry, LoadReport, NodeEntry};
pub use node::{
    DEFAULT_DESCRIPTION, DEFAULT_EDGE_COLOR, DEFAULT_NODE_COLOR, DETAIL_HEIGHT, DETAIL_WIDTH, Edge,
    NODE_HEIGHT, NODE_WIDTH, Node, NodeState, NodeType,
};

use crate::control::{ControlEffect, ControlHandler, ControlState, Hit, InputEvent, ViewContext};
use crate::error::{ChartError, Result};
use crate::geometry::Point;
use crate::physics;
use crate::scheduler::FrameScheduler;
use crate::settings::ChartSettings;
use crate::view::{self, Surface, ViewTransform};

/// Pixel radius around an edge label that counts as hitting the edge.
pub const EDGE_HIT_RADIUS: f32 = 8.0;

/// Borrowed snapshot of everything drawn in one frame.
#[derive(Clone, Copy)]
pub struct Objects<'a> {
    pub nodes: &'a [Node],
    pub edges: &'a [Edge],
    index_by_name: &'a HashMap<String, usize>,
}

impl<'a> Objects<'a> {
    pub fn new(
        nodes: &'a [Node],
        edges: &'a [Edge],
        index_by_name: &'a HashMap<String, usize>,
    ) -> Self {
        Self {
            nodes,
            edges,
            index_by_name,
        }
    }

    pub fn node(&self, name: &str) -> Option<&'a Node> {
        self.index_by_name
            .get(name)
            .and_then(|index| self.nodes.get(*index))
    }

    pub fn endpoints(&self, edge: &Edge) -> Option<(&'a Node, &'a Node)> {
        Some((self.node(&edge.from)?, self.node(&edge.to)?))
    }
}

/// Hooks the chart calls on its host. Both default to doing nothing.
pub trait ChartObserver {
    fn on_node_details(&mut self, _node: &Node) {}

    fn on_edge_details(&mut self, _index: usize, _edge: &Edge) {}
}

impl ChartObserver for () {}

pub struct Chart {
    settings: ChartSettings,
    nodes: Vec<Node>,
    index_by_name: HashMap<String, usize>,
    edges: Vec<Edge>,
    view: ViewTransform,
    control: ControlHandler,
    scheduler: FrameScheduler,
    canvas_size: Point,
}

impl Chart {
    /// Creates an empty chart with its view placed per `settings` and the
    /// frame loop running.
    pub fn new(settings: ChartSettings, canvas_size: Point) -> Self {
        let view = ViewTransform::initial(canvas_size, &settings.view_settings);
        let mut scheduler = FrameScheduler::new();
        scheduler.start();
        log::info!("created chart `{}`", settings.name);

        Self {
            settings,
            nodes: Vec::new(),
            index_by_name: HashMap::new(),
            edges: Vec::new(),
            view,
            control: ControlHandler::new(),
            scheduler,
            canvas_size,
        }
    }

    pub fn settings(&self) -> &ChartSettings {
        &self.settings
    }

    /// Replaces all settings; the next frame uses them.
    pub fn set_settings(&mut self, settings: ChartSettings) {
        log::debug!("settings replaced for chart `{}`", settings.name);
        self.settings = settings;
    }

    pub fn canvas_size(&self) -> Point {
        self.canvas_size
    }

    pub fn resize(&mut self, size: Point) {
        if size != self.canvas_size {
            log::trace!("canvas resized to {}x{}", size.x, size.y);
            self.canvas_size = size;
        }
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    /// Puts the view back at the configured start position and zoom.
    pub fn reset_view(&mut self) {
        self.view = ViewTransform::initial(self.canvas_size, &self.settings.view_settings);
    }

    pub fn control_state(&self) -> &ControlState {
        self.control.state()
    }

    pub fn selection(&self) -> &[String] {
        self.control.selection()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, name: &str) -> Option<&Node> {
        self.index_by_name
            .get(name)
            .and_then(|index| self.nodes.get(*index))
    }

    fn node_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.index_by_name
            .get(name)
            .and_then(|index| self.nodes.get_mut(*index))
    }

    pub fn objects(&self) -> Objects<'_> {
        Objects::new(&self.nodes, &self.edges, &self.index_by_name)
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut FrameScheduler {
        &mut self.scheduler
    }

    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        node_type: NodeType,
        pos: Point,
    ) -> Result<&Node> {
        let name = name.into();
        if self.index_by_name.contains_key(&name) {
            return Err(ChartError::DuplicateNode(name));
        }

        log::debug!("adding {} node `{name}` at ({}, {})", node_type.label(), pos.x, pos.y);
        let index = self.nodes.len();
        self.index_by_name.insert(name.clone(), index);
        self.nodes.push(Node::new(name, node_type, pos));
        Ok(&self.nodes[index])
    }

    /// Adds a directed edge. Parallel edges between the same pair are allowed.
    pub fn add_edge(
        &mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<&Edge> {
        let (from, to) = (from.into(), to.into());
        for endpoint in [&from, &to] {
            if !self.index_by_name.contains_key(endpoint) {
                return Err(ChartError::UnknownNode(endpoint.clone()));
            }
        }

        let index = self.push_edge(Edge::new(from, to, name));
        Ok(&self.edges[index])
    }

    fn push_edge(&mut self, edge: Edge) -> usize {
        log::debug!("adding edge `{}` from `{}` to `{}`", edge.name, edge.from, edge.to);
        self.edges.push(edge);
        self.edges.len() - 1
    }

    /// Connects every unordered pair in the selection with an unnamed edge and
    /// returns how many edges were added.
    pub fn connect_selected(&mut self) -> usize {
        let selection = self.control.selection().to_vec();
        let mut added = 0;
        for (offset, from) in selection.iter().enumerate() {
            for to in &selection[offset + 1..] {
                self.push_edge(Edge::new(from.as_str(), to.as_str(), ""));
                added += 1;
            }
        }
        added
    }

    /// First node in insertion order whose on-screen box contains `pos`.
    pub fn get_node_at(&self, pos: Point) -> Option<&Node> {
        self.nodes
            .iter()
            .find(|node| self.view.bounds_to_view(node.bounds()).contains(pos))
    }

    /// Resolves what the pointer is over. Disabled nodes are transparent to
    /// the pointer and nodes take priority over edge labels.
    pub fn hit_test(&self, pos: Point) -> Hit {
        let node = self.nodes.iter().find(|node| {
            node.state() != NodeState::Disabled && self.view.bounds_to_view(node.bounds()).contains(pos)
        });
        if let Some(node) = node {
            return Hit::Node(node.name().to_owned());
        }

        let objects = self.objects();
        self.edges
            .iter()
            .enumerate()
            .find(|(_, edge)| {
                objects.endpoints(edge).is_some_and(|(from, to)| {
                    view::edge_anchor(&self.view, from, to).distance(pos) <= EDGE_HIT_RADIUS
                })
            })
            .map_or(Hit::Empty, |(index, _)| Hit::Edge(index))
    }

    /// Removes every node and edge and returns the control layer to idle.
    pub fn clear(&mut self) {
        log::info!(
            "clearing chart `{}` ({} nodes, {} edges)",
            self.settings.name,
            self.nodes.len(),
            self.edges.len()
        );
        self.nodes.clear();
        self.index_by_name.clear();
        self.edges.clear();
        self.control.reset();
    }

    /// Removes a node together with every edge that touches it.
    pub fn remove_node(&mut self, name: &str) -> Result<Node> {
        let index = self
            .index_by_name
            .remove(name)
            .ok_or_else(|| ChartError::UnknownNode(name.to_owned()))?;
        let node = self.nodes.remove(index);
        for later in self.index_by_name.values_mut() {
            if *later > index {
                *later -= 1;
            }
        }

        let before = self.edges.len();
        self.edges.retain(|edge| !edge.touches(name));
        let dropped = before - self.edges.len();

        self.control.forget_node(name);
        if dropped > 0 {
            self.control.forget_edges();
        }
        log::debug!("removed node `{name}` and {dropped} edges");
        Ok(node)
    }

    pub fn set_node_disabled(&mut self, name: &str, disabled: bool) -> Result<()> {
        let state = self
            .node(name)
            .map(Node::state)
            .ok_or_else(|| ChartError::UnknownNode(name.to_owned()))?;

        let next = if disabled {
            self.control.forget_node(name);
            NodeState::Disabled
        } else if state == NodeState::Disabled {
            NodeState::Active
        } else {
            state
        };

        if let Some(node) = self.node_mut(name) {
            node.set_state(next);
        }
        Ok(())
    }

    pub fn set_description(&mut self, name: &str, description: impl Into<String>) -> Result<()> {
        let node = self
            .node_mut(name)
            .ok_or_else(|| ChartError::UnknownNode(name.to_owned()))?;
        node.description = description.into();
        Ok(())
    }

    pub fn set_edge_description(&mut self, index: usize, description: impl Into<String>) -> Result<()> {
        let edge = self
            .edges
            .get_mut(index)
            .ok_or(ChartError::UnknownEdge(index))?;
        edge.description = description.into();
        Ok(())
    }

    /// Node names ranked by fuzzy match against `query`.
    pub fn search_nodes(&self, query: &str) -> Vec<&str> {
        search::rank_nodes(&self.nodes, query)
    }

    /// Selects `name` alone and pans so it sits at the canvas centre. Disabled
    /// nodes are centred without being selected.
    pub fn focus_node(&mut self, name: &str) -> Result<()> {
        let node = self
            .node(name)
            .ok_or_else(|| ChartError::UnknownNode(name.to_owned()))?;
        let (pos, state) = (node.pos, node.state());

        if state != NodeState::Disabled {
            let effects = self.control.select_only(name);
            self.apply(effects, &mut ());
        }

        let target = self.canvas_size * 0.5;
        let current = self.view.world_to_view(pos);
        self.view.move_view(target - current);
        Ok(())
    }

    /// Runs one frame: physics, then drawing. Returns whether the host should
    /// schedule another frame.
    pub fn refresh(&mut self, surface: &mut dyn Surface) -> bool {
        if !self.scheduler.tick() {
            return false;
        }

        let edges = self
            .edges
            .iter()
            .filter_map(|edge| Some((*self.index_by_name.get(&edge.from)?, *self.index_by_name.get(&edge.to)?)))
            .collect::<Vec<_>>();
        physics::step(&mut self.nodes, &edges, &self.settings.physics_settings);

        log::trace!("frame {}", self.scheduler.frames());
        view::draw(
            surface,
            &self.view,
            &self.settings.view_settings,
            Objects::new(&self.nodes, &self.edges, &self.index_by_name),
        );
        true
    }

    pub fn view_context(&self) -> ViewContext {
        let view_settings = &self.settings.view_settings;
        ViewContext {
            offset: self.view.offset(),
            scale: self.view.scale(),
            canvas_center: self.canvas_size * 0.5,
            min_scale: view_settings.min_scale(),
            max_scale: view_settings.max_scale(),
            zoom_factor: view_settings.zoom_multiplier,
        }
    }

    /// Feeds one input event through the control layer and applies the result.
    pub fn handle_input(&mut self, event: &InputEvent, observer: &mut dyn ChartObserver) {
        let hit = event.pos().map_or(Hit::Empty, |pos| self.hit_test(pos));
        let effects = self.control.handle(event, &hit, &self.view_context());
        self.apply(effects, observer);
    }

    fn apply(&mut self, effects: Vec<ControlEffect>, observer: &mut dyn ChartObserver) {
        for effect in effects {
            match effect {
                ControlEffect::SetNodeState { node, state } => match self.node_mut(&node) {
                    Some(target) => target.set_state(state),
                    None => log::warn!("ignoring state change for unknown node `{node}`"),
                },
                ControlEffect::MoveNode { node, delta } => match self.node_mut(&node) {
                    Some(target) => {
                        target.nudge(delta, true);
                    }
                    None => log::warn!("ignoring move for unknown node `{node}`"),
                },
                ControlEffect::MoveView(delta) => self.view.move_view(delta),
                ControlEffect::Scale(factor) => self.view.scale_by(factor),
                ControlEffect::RemoveNode(node) => {
                    if let Err(error) = self.remove_node(&node) {
                        log::warn!("{error}");
                    }
                }
                ControlEffect::NodeDetails(node) => match self.node(&node) {
                    Some(target) => observer.on_node_details(target),
                    None => log::warn!("no details for unknown node `{node}`"),
                },
                ControlEffect::EdgeDetails(index) => match self.edges.get(index) {
                    Some(edge) => observer.on_edge_details(index, edge),
                    None => log::warn!("no details for unknown edge {index}"),
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::control::{ControlKey, Modifiers, ZoomDirection};

    fn chart() -> Chart {
        let mut settings = ChartSettings::default();
        settings.physics_settings.spring_enabled = false;
        Chart::new(settings, Point::new(800.0, 600.0))
    }

    #[derive(Default)]
    struct Details {
        nodes: Vec<String>,
        edges: Vec<usize>,
    }

    impl ChartObserver for Details {
        fn on_node_details(&mut self, node: &Node) {
            self.nodes.push(node.name().to_owned());
        }

        fn on_edge_details(&mut self, index: usize, _edge: &Edge) {
            self.edges.push(index);
        }
    }

    fn click(chart: &mut Chart, pos: Point, modifiers: Modifiers, time: f64, observer: &mut dyn ChartObserver) {
        chart.handle_input(&InputEvent::PointerDown { pos, modifiers }, observer);
        chart.handle_input(&InputEvent::PointerUp { pos, modifiers, time }, observer);
    }

    fn assert_selection_consistent(chart: &Chart) {
        for node in chart.nodes() {
            let selected = chart.selection().iter().any(|name| name == node.name());
            match node.state() {
                NodeState::Selected | NodeState::Dragging => assert!(selected, "{} not in selection", node.name()),
                _ => assert!(!selected, "{} selected in state {:?}", node.name(), node.state()),
            }
        }
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut chart = chart();
        chart.add_node("a", NodeType::Data, Point::ZERO).unwrap();

        let error = chart.add_node("a", NodeType::Other, Point::new(5.0, 5.0)).unwrap_err();

        assert_eq!(error, ChartError::DuplicateNode("a".to_owned()));
        assert_eq!(chart.nodes().len(), 1);
        assert_eq!(chart.node("a").unwrap().node_type, NodeType::Data);
    }

    #[test]
    fn edges_need_existing_endpoints() {
        let mut chart = chart();
        chart.add_node("a", NodeType::Data, Point::ZERO).unwrap();

        assert_eq!(
            chart.add_edge("a", "missing", "x").map(|_| ()),
            Err(ChartError::UnknownNode("missing".to_owned()))
        );

        chart.add_node("b", NodeType::Data, Point::ZERO).unwrap();
        chart.add_edge("a", "b", "x").unwrap();
        chart.add_edge("a", "b", "x").unwrap();
        assert_eq!(chart.edges().len(), 2);
    }

    #[test]
    fn node_lookup_uses_insertion_order_for_overlaps() {
        let mut chart = chart();
        chart.add_node("first", NodeType::Data, Point::ZERO).unwrap();
        chart.add_node("second", NodeType::Data, Point::new(20.0, 0.0)).unwrap();

        let hit = chart.get_node_at(Point::new(420.0, 300.0)).map(Node::name);

        assert_eq!(hit, Some("first"));
        assert!(chart.get_node_at(Point::new(10.0, 10.0)).is_none());
    }

    #[test]
    fn connect_selected_links_every_pair_once() {
        let mut chart = chart();
        for (name, x) in [("a", -300.0), ("b", 0.0), ("c", 300.0)] {
            chart.add_node(name, NodeType::Data, Point::new(x, 0.0)).unwrap();
        }
        click(&mut chart, Point::new(100.0, 300.0), Modifiers::NONE, 0.0, &mut ());
        click(&mut chart, Point::new(400.0, 300.0), Modifiers::SHIFT, 1.0, &mut ());
        click(&mut chart, Point::new(700.0, 300.0), Modifiers::SHIFT, 2.0, &mut ());
        assert_eq!(chart.selection().len(), 3);

        assert_eq!(chart.connect_selected(), 3);

        let pairs = chart
            .edges()
            .iter()
            .map(|edge| (edge.from.as_str(), edge.to.as_str(), edge.name.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(pairs, vec![("a", "b", ""), ("a", "c", ""), ("b", "c", "")]);
        assert_selection_consistent(&chart);
    }

    #[test]
    fn removing_a_node_cascades_to_its_edges() {
        let mut chart = chart();
        for name in ["a", "b", "c"] {
            chart.add_node(name, NodeType::Data, Point::ZERO).unwrap();
        }
        chart.add_edge("a", "b", "ab").unwrap();
        chart.add_edge("b", "c", "bc").unwrap();
        chart.add_edge("a", "c", "ac").unwrap();

        let removed = chart.remove_node("b").unwrap();

        assert_eq!(removed.name(), "b");
        assert_eq!(chart.edges().len(), 1);
        assert_eq!(chart.edges()[0].name, "ac");
        assert_eq!(chart.node("c").map(Node::name), Some("c"));
        assert_eq!(
            chart.remove_node("b").map(|_| ()),
            Err(ChartError::UnknownNode("b".to_owned()))
        );
    }

    #[test]
    fn delete_key_removes_the_selection() {
        let mut chart = chart();
        chart.add_node("a", NodeType::Data, Point::ZERO).unwrap();
        chart.add_node("b", NodeType::Data, Point::new(300.0, 0.0)).unwrap();
        chart.add_edge("a", "b", "").unwrap();
        click(&mut chart, Point::new(400.0, 300.0), Modifiers::NONE, 0.0, &mut ());

        chart.handle_input(&InputEvent::Key(ControlKey::Delete), &mut ());

        assert!(chart.node("a").is_none());
        assert!(chart.edges().is_empty());
        assert!(chart.selection().is_empty());
    }

    #[test]
    fn disabled_nodes_are_not_hit() {
        let mut chart = chart();
        chart.add_node("a", NodeType::Data, Point::ZERO).unwrap();
        click(&mut chart, Point::new(400.0, 300.0), Modifiers::NONE, 0.0, &mut ());

        chart.set_node_disabled("a", true).unwrap();

        assert!(chart.selection().is_empty());
        assert_eq!(chart.hit_test(Point::new(400.0, 300.0)), Hit::Empty);
        assert!(chart.get_node_at(Point::new(400.0, 300.0)).is_some());

        chart.set_node_disabled("a", false).unwrap();
        assert_eq!(chart.node("a").unwrap().state(), NodeState::Active);
    }

    #[test]
    fn double_click_reports_node_and_edge_details() {
        let mut chart = chart();
        chart.add_node("a", NodeType::Data, Point::ZERO).unwrap();
        chart.add_node("b", NodeType::Data, Point::new(300.0, 0.0)).unwrap();
        chart.add_edge("a", "b", "link").unwrap();
        let mut details = Details::default();

        click(&mut chart, Point::new(400.0, 300.0), Modifiers::NONE, 0.0, &mut details);
        click(&mut chart, Point::new(400.0, 300.0), Modifiers::NONE, 0.2, &mut details);
        assert_eq!(details.nodes, vec!["a".to_owned()]);
        assert_eq!(chart.node("a").unwrap().state(), NodeState::Viewing);
        assert_selection_consistent(&chart);

        chart.handle_input(&InputEvent::Key(ControlKey::Escape), &mut details);
        assert_eq!(chart.node("a").unwrap().state(), NodeState::Active);

        // Label anchor sits midway between the node centres.
        let anchor = Point::new(550.0, 303.0);
        click(&mut chart, anchor, Modifiers::NONE, 5.0, &mut details);
        click(&mut chart, anchor, Modifiers::NONE, 5.1, &mut details);
        assert_eq!(details.edges, vec![0]);
        assert_eq!(chart.control_state(), &ControlState::ViewingEdge { edge: 0 });
    }

    #[test]
    fn zoom_keeps_canvas_centre_fixed() {
        let mut chart = chart();
        chart.view.move_view(Point::new(100.0, -40.0));
        let centre_world = chart.view().view_to_world(Point::new(400.0, 300.0));

        chart.handle_input(&InputEvent::Wheel { direction: ZoomDirection::In }, &mut ());
        assert_eq!(chart.view().scale(), 2.0);
        assert_eq!(chart.view().view_to_world(Point::new(400.0, 300.0)), centre_world);

        chart.handle_input(&InputEvent::Wheel { direction: ZoomDirection::Out }, &mut ());
        chart.handle_input(&InputEvent::Wheel { direction: ZoomDirection::Out }, &mut ());
        assert_eq!(chart.view().scale(), 0.5);
        assert_eq!(chart.view().view_to_world(Point::new(400.0, 300.0)), centre_world);
    }

    #[test]
    fn focus_selects_and_centres_the_node() {
        let mut chart = chart();
        chart.add_node("far", NodeType::Data, Point::new(1000.0, -500.0)).unwrap();

        chart.focus_node("far").unwrap();

        assert_eq!(chart.selection(), ["far".to_owned()]);
        assert_eq!(chart.view().world_to_view(Point::new(1000.0, -500.0)), Point::new(400.0, 300.0));
        assert_eq!(chart.search_nodes("fa"), vec!["far"]);
    }

    #[test]
    fn clear_resets_everything() {
        let mut chart = chart();
        chart.add_node("a", NodeType::Data, Point::ZERO).unwrap();
        click(&mut chart, Point::new(400.0, 300.0), Modifiers::NONE, 0.0, &mut ());

        chart.clear();

        assert!(chart.nodes().is_empty());
        assert!(chart.selection().is_empty());
        assert_eq!(chart.control_state(), &ControlState::Idle);
        chart.add_node("a", NodeType::Data, Point::ZERO).unwrap();
    }

    #[test]
    fn descriptions_are_editable_by_name_and_index() {
        let mut chart = chart();
        chart.add_node("a", NodeType::Data, Point::ZERO).unwrap();
        chart.add_node("b", NodeType::Data, Point::new(300.0, 0.0)).unwrap();
        chart.add_edge("a", "b", "feeds").unwrap();

        chart.set_description("a", "source").unwrap();
        chart.set_edge_description(0, "hourly").unwrap();

        assert_eq!(chart.node("a").unwrap().description, "source");
        assert_eq!(chart.edges()[0].description, "hourly");
        assert!(matches!(chart.set_description("zz", "x"), Err(ChartError::UnknownNode(_))));
        assert!(matches!(chart.set_edge_description(3, "x"), Err(ChartError::UnknownEdge(3))));
    }

    #[test]
    fn reset_view_uses_the_resized_canvas() {
        let mut chart = chart();
        let mut settings = chart.settings().clone();
        settings.view_settings.start_position = Point::new(10.0, -20.0);
        chart.set_settings(settings);

        chart.resize(Point::new(1000.0, 400.0));
        chart.reset_view();

        assert_eq!(chart.canvas_size(), Point::new(1000.0, 400.0));
        assert_eq!(chart.view().offset(), Point::new(510.0, 180.0));
    }
}

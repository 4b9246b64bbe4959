use flow_chart::chart::{Chart, ChartObserver, Node, NodeState, NodeType};
use flow_chart::control::{ControlKey, ControlState, InputEvent, Modifiers, ZoomDirection};
use flow_chart::geometry::{Bounds, Point};
use flow_chart::settings::ChartSettings;
use flow_chart::view::{Surface, TextAnchor};
use eframe::egui::Color32;
use pretty_assertions::assert_eq;

const CANVAS: Point = Point::new(800.0, 600.0);

fn still_chart() -> Chart {
    let mut settings = ChartSettings::default();
    settings.physics_settings.spring_enabled = false;
    Chart::new(settings, CANVAS)
}

fn linked_pair() -> Chart {
    let mut chart = still_chart();
    chart.add_node("A", NodeType::Data, Point::ZERO).unwrap();
    chart.add_node("B", NodeType::Application, Point::new(300.0, 0.0)).unwrap();
    chart.add_edge("A", "B", "link").unwrap();
    chart
}

fn press(chart: &mut Chart, pos: Point, modifiers: Modifiers) {
    chart.handle_input(&InputEvent::PointerDown { pos, modifiers }, &mut ());
}

fn release(chart: &mut Chart, pos: Point, modifiers: Modifiers, time: f64) {
    chart.handle_input(&InputEvent::PointerUp { pos, modifiers, time }, &mut ());
}

fn move_to(chart: &mut Chart, pos: Point) {
    chart.handle_input(
        &InputEvent::PointerMove {
            pos,
            primary_down: true,
        },
        &mut (),
    );
}

fn wheel(chart: &mut Chart, direction: ZoomDirection) {
    chart.handle_input(&InputEvent::Wheel { direction }, &mut ());
}

fn assert_selection_matches_states(chart: &Chart) {
    for node in chart.nodes() {
        let selected = chart.selection().iter().any(|name| name == node.name());
        let marked = matches!(node.state(), NodeState::Selected | NodeState::Dragging);
        assert_eq!(selected, marked, "node {} in state {:?}", node.name(), node.state());
    }
}

#[derive(Default)]
struct CountingSurface {
    rects: usize,
    lines: usize,
    clears: usize,
}

impl Surface for CountingSurface {
    fn size(&self) -> Point {
        CANVAS
    }

    fn clear(&mut self) {
        self.clears += 1;
    }

    fn fill_rect(&mut self, _rect: Bounds, _color: Color32) {
        self.rects += 1;
    }

    fn line(&mut self, _from: Point, _to: Point, _color: Color32) {
        self.lines += 1;
    }

    fn fill_polygon(&mut self, _points: &[Point], _color: Color32) {}

    fn text(&mut self, _pos: Point, _text: &str, _size: f32, _anchor: TextAnchor, _color: Color32) {}
}

#[test]
fn node_lookup_follows_the_view() {
    let chart = linked_pair();

    assert_eq!(chart.get_node_at(Point::new(400.0, 300.0)).map(Node::name), Some("A"));
    assert_eq!(chart.get_node_at(Point::new(700.0, 300.0)).map(Node::name), Some("B"));
    assert!(chart.get_node_at(Point::new(550.0, 300.0)).is_none());
}

#[test]
fn zoom_steps_until_the_upper_bound() {
    let mut chart = linked_pair();
    assert_eq!(chart.view().scale(), 1.0);

    wheel(&mut chart, ZoomDirection::In);
    assert_eq!(chart.view().scale(), 2.0);
    assert_eq!(chart.view().offset(), Point::new(400.0, 300.0));

    wheel(&mut chart, ZoomDirection::In);
    assert_eq!(chart.view().scale(), 4.0);

    wheel(&mut chart, ZoomDirection::In);
    assert_eq!(chart.view().scale(), 4.0);
}

#[test]
fn zoom_out_stops_at_the_lower_bound() {
    let mut chart = linked_pair();

    for _ in 0..5 {
        wheel(&mut chart, ZoomDirection::Out);
    }

    assert_eq!(chart.view().scale(), 0.25);
}

#[test]
fn dragging_at_double_zoom_moves_half_the_pointer_distance() {
    let mut chart = linked_pair();
    wheel(&mut chart, ZoomDirection::In);
    // A sits at the canvas centre at any zoom.
    let start = Point::new(400.0, 300.0);

    press(&mut chart, start, Modifiers::NONE);
    move_to(&mut chart, start + Point::new(20.0, 10.0));
    assert_eq!(chart.control_state(), &ControlState::DraggingNode);
    assert_eq!(chart.node("A").unwrap().state(), NodeState::Dragging);
    assert_selection_matches_states(&chart);

    release(&mut chart, start + Point::new(20.0, 10.0), Modifiers::NONE, 1.0);

    let a = chart.node("A").unwrap();
    assert_eq!(a.pos, Point::new(10.0, 5.0));
    assert_eq!(a.state(), NodeState::Selected);
    assert_eq!(chart.node("B").unwrap().pos, Point::new(300.0, 0.0));
    assert_selection_matches_states(&chart);
}

#[test]
fn canvas_drag_pans_without_touching_nodes() {
    let mut chart = linked_pair();

    press(&mut chart, Point::new(100.0, 100.0), Modifiers::NONE);
    move_to(&mut chart, Point::new(130.0, 80.0));
    release(&mut chart, Point::new(130.0, 80.0), Modifiers::NONE, 1.0);

    assert_eq!(chart.view().offset(), Point::new(430.0, 280.0));
    assert_eq!(chart.node("A").unwrap().pos, Point::ZERO);
    assert_eq!(chart.control_state(), &ControlState::Idle);
}

#[test]
fn selection_and_states_stay_in_step() {
    let mut chart = linked_pair();
    let a = Point::new(400.0, 300.0);
    let b = Point::new(700.0, 300.0);

    press(&mut chart, a, Modifiers::NONE);
    release(&mut chart, a, Modifiers::NONE, 0.0);
    assert_selection_matches_states(&chart);

    press(&mut chart, b, Modifiers::SHIFT);
    release(&mut chart, b, Modifiers::SHIFT, 1.0);
    assert_eq!(chart.selection().len(), 2);
    assert_selection_matches_states(&chart);

    press(&mut chart, b, Modifiers::NONE);
    move_to(&mut chart, b + Point::new(0.0, 40.0));
    assert_selection_matches_states(&chart);
    chart.handle_input(&InputEvent::PointerLeave, &mut ());
    assert_eq!(chart.control_state(), &ControlState::Idle);
    assert_selection_matches_states(&chart);

    press(&mut chart, Point::new(50.0, 50.0), Modifiers::NONE);
    release(&mut chart, Point::new(50.0, 50.0), Modifiers::NONE, 2.0);
    assert!(chart.selection().is_empty());
    assert_selection_matches_states(&chart);
}

#[test]
fn viewing_node_blocks_pointer_until_escape() {
    #[derive(Default)]
    struct Opened(Vec<String>);

    impl ChartObserver for Opened {
        fn on_node_details(&mut self, node: &Node) {
            self.0.push(node.name().to_owned());
        }
    }

    let mut chart = linked_pair();
    let mut opened = Opened::default();
    let a = Point::new(400.0, 300.0);
    for time in [0.0, 0.25] {
        chart.handle_input(
            &InputEvent::PointerDown {
                pos: a,
                modifiers: Modifiers::NONE,
            },
            &mut opened,
        );
        chart.handle_input(
            &InputEvent::PointerUp {
                pos: a,
                modifiers: Modifiers::NONE,
                time,
            },
            &mut opened,
        );
    }
    assert_eq!(opened.0, vec!["A".to_owned()]);
    assert_eq!(chart.node("A").unwrap().size(), Point::new(500.0, 200.0));

    press(&mut chart, Point::new(700.0, 300.0), Modifiers::NONE);
    release(&mut chart, Point::new(700.0, 300.0), Modifiers::NONE, 1.0);
    assert!(chart.selection().is_empty());

    chart.handle_input(&InputEvent::Key(ControlKey::Escape), &mut ());
    assert_eq!(chart.node("A").unwrap().state(), NodeState::Active);
    assert_eq!(chart.control_state(), &ControlState::Idle);
}

#[test]
fn refresh_relaxes_then_draws_until_cancelled() {
    let mut chart = Chart::new(ChartSettings::default(), CANVAS);
    chart.add_node("A", NodeType::Data, Point::ZERO).unwrap();
    chart.add_node("B", NodeType::Data, Point::new(50.0, 0.0)).unwrap();
    let mut surface = CountingSurface::default();

    assert!(chart.refresh(&mut surface));

    assert_eq!(chart.node("A").unwrap().pos, Point::new(-0.75, 0.0));
    assert_eq!(chart.node("B").unwrap().pos, Point::new(50.75, 0.0));
    assert_eq!(surface.clears, 1);
    assert_eq!(surface.rects, 2);
    assert_eq!(surface.lines, 0);

    chart.scheduler_mut().cancel();
    assert!(!chart.refresh(&mut surface));
    assert_eq!(surface.clears, 1);
}

#[test]
fn replaced_settings_apply_on_the_next_frame() {
    let mut chart = Chart::new(ChartSettings::default(), CANVAS);
    chart.add_node("A", NodeType::Data, Point::ZERO).unwrap();
    chart.add_node("B", NodeType::Data, Point::new(50.0, 0.0)).unwrap();
    let mut surface = CountingSurface::default();

    chart.refresh(&mut surface);
    let relaxed = chart.node("A").unwrap().pos;
    assert_eq!(relaxed, Point::new(-0.75, 0.0));

    let mut settings = chart.settings().clone();
    settings.physics_settings.spring_enabled = false;
    chart.set_settings(settings);
    chart.refresh(&mut surface);

    assert_eq!(chart.node("A").unwrap().pos, relaxed);
    assert_eq!(chart.node("B").unwrap().pos, Point::new(50.75, 0.0));
}

#[test]
fn raising_the_zoom_limit_allows_another_step() {
    let mut chart = linked_pair();
    wheel(&mut chart, ZoomDirection::In);
    wheel(&mut chart, ZoomDirection::In);
    wheel(&mut chart, ZoomDirection::In);
    assert_eq!(chart.view().scale(), 4.0);

    let mut settings = chart.settings().clone();
    settings.view_settings.max_zoom_level = 3.0;
    chart.set_settings(settings);
    wheel(&mut chart, ZoomDirection::In);

    assert_eq!(chart.view().scale(), 8.0);
}

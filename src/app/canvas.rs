use eframe::egui::{self, Event, Key, PointerButton, Pos2, Rect, Sense, Ui};
use flow_chart::control::{ControlKey, InputEvent, Modifiers, ZoomDirection};
use flow_chart::geometry::Point;

use super::surface::PainterSurface;
use super::{DetailRequests, ViewModel};

impl ViewModel {
    pub(in crate::app) fn draw_canvas(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.chart.resize(rect.size().into());
        if !self.view_placed {
            self.chart.reset_view();
            self.view_placed = true;
        }

        let events = self.collect_pointer_input(ui, rect, &response);
        let mut requests = DetailRequests::default();
        for event in &events {
            self.chart.handle_input(event, &mut requests);
        }
        self.handle_canvas_keys(ui, &mut requests);
        if let Some(target) = requests.0.pop() {
            self.details = Some(target);
        }

        let painter = ui.painter_at(rect);
        let mut surface = PainterSurface::new(&painter, rect);
        if self.chart.refresh(&mut surface) {
            ui.ctx().request_repaint();
        }
    }

    fn collect_pointer_input(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) -> Vec<InputEvent> {
        let (raw_events, primary_down, time) = ui.input(|input| {
            (
                input.events.clone(),
                input.pointer.primary_down(),
                input.time,
            )
        });
        let over_canvas = response.contains_pointer();
        let to_canvas = |pos: Pos2| Point::from(pos - rect.min);
        let mut events = Vec::new();

        for event in raw_events {
            match event {
                Event::PointerButton {
                    pos,
                    button: PointerButton::Primary,
                    pressed,
                    modifiers,
                    ..
                } => {
                    let modifiers = Modifiers {
                        shift: modifiers.shift,
                    };
                    if pressed && over_canvas && rect.contains(pos) {
                        self.pointer_captured = true;
                        events.push(InputEvent::PointerDown {
                            pos: to_canvas(pos),
                            modifiers,
                        });
                    } else if !pressed && self.pointer_captured {
                        self.pointer_captured = false;
                        events.push(InputEvent::PointerUp {
                            pos: to_canvas(pos),
                            modifiers,
                            time,
                        });
                    }
                }
                Event::PointerMoved(pos) => {
                    let inside = rect.contains(pos);
                    if inside {
                        events.push(InputEvent::PointerMove {
                            pos: to_canvas(pos),
                            primary_down,
                        });
                    } else if self.pointer_inside || self.pointer_captured {
                        self.pointer_captured = false;
                        events.push(InputEvent::PointerLeave);
                    }
                    self.pointer_inside = inside;
                }
                Event::PointerGone => {
                    if self.pointer_inside || self.pointer_captured {
                        events.push(InputEvent::PointerLeave);
                    }
                    self.pointer_inside = false;
                    self.pointer_captured = false;
                }
                Event::MouseWheel { delta, .. } if over_canvas => {
                    if delta.y > 0.0 {
                        events.push(InputEvent::Wheel {
                            direction: ZoomDirection::In,
                        });
                    } else if delta.y < 0.0 {
                        events.push(InputEvent::Wheel {
                            direction: ZoomDirection::Out,
                        });
                    }
                }
                _ => {}
            }
        }

        events
    }

    fn handle_canvas_keys(&mut self, ui: &Ui, requests: &mut DetailRequests) {
        if ui.ctx().wants_keyboard_input() {
            return;
        }

        let pressed = ui.input(|input| {
            input
                .events
                .iter()
                .filter_map(|event| match event {
                    Event::Key {
                        key,
                        pressed: true,
                        repeat: false,
                        ..
                    } => Some(*key),
                    _ => None,
                })
                .collect::<Vec<_>>()
        });

        for key in pressed {
            match key {
                Key::A => self.add_generated_node(),
                Key::C => self.connect_selected(),
                Key::Escape => self
                    .chart
                    .handle_input(&InputEvent::Key(ControlKey::Escape), requests),
                Key::Delete | Key::Backspace => self
                    .chart
                    .handle_input(&InputEvent::Key(ControlKey::Delete), requests),
                _ => {}
            }
        }
    }
}

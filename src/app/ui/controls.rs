use eframe::egui::{self, Button, Ui};
use flow_chart::chart::NodeType;
use flow_chart::settings::EdgeType;

use super::super::ViewModel;

const MAX_SEARCH_RESULTS: usize = 12;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Chart Controls");
        ui.separator();
        ui.add_space(4.0);

        let mut settings = self.chart.settings().clone();
        let mut changed = false;

        ui.horizontal(|ui| {
            ui.label("Name");
            changed |= ui.text_edit_singleline(&mut settings.name).changed();
        });

        ui.separator();
        ui.label("New node");
        ui.text_edit_singleline(&mut self.new_node_name)
            .on_hover_text("Node names must be unique within the chart.");
        egui::ComboBox::from_id_salt("new_node_type")
            .selected_text(self.new_node_type.label())
            .show_ui(ui, |ui| {
                for node_type in NodeType::ALL {
                    ui.selectable_value(&mut self.new_node_type, node_type, node_type.label());
                }
            });
        ui.horizontal(|ui| {
            let name = self.new_node_name.trim().to_owned();
            if ui.add_enabled(!name.is_empty(), Button::new("Add")).clicked() {
                let center = self.chart.canvas_size() * 0.5;
                let pos = self.chart.view().view_to_world(center);
                if self.add_node_at(name, self.new_node_type, pos) {
                    self.new_node_name.clear();
                }
            }
            if ui
                .button("Add generated")
                .on_hover_text("Same as pressing `a` over the canvas.")
                .clicked()
            {
                self.add_generated_node();
            }
        });

        let selected = self.chart.selection().len();
        ui.horizontal_wrapped(|ui| {
            if ui
                .add_enabled(selected >= 2, Button::new("Connect selected"))
                .on_hover_text("Link every pair of selected nodes (`c`).")
                .clicked()
            {
                self.connect_selected();
            }
            if ui
                .add_enabled(selected > 0, Button::new("Remove selected"))
                .on_hover_text("Remove the selection and its edges (`Delete`).")
                .clicked()
            {
                self.remove_selected();
            }
            if ui.button("Clear").clicked() {
                self.chart.clear();
                self.details = None;
                self.set_status("chart cleared");
            }
            if ui.button("Reset view").clicked() {
                self.chart.reset_view();
            }
        });

        ui.separator();
        ui.label("Search nodes")
            .on_hover_text("Fuzzy match on node names; click a result to focus it.");
        ui.text_edit_singleline(&mut self.search);
        let matches = self
            .chart
            .search_nodes(&self.search)
            .into_iter()
            .take(MAX_SEARCH_RESULTS)
            .map(str::to_owned)
            .collect::<Vec<_>>();
        for name in matches {
            if ui.link(name.as_str()).clicked()
                && let Err(error) = self.chart.focus_node(&name)
            {
                self.set_status(error.to_string());
            }
        }

        ui.separator();

        ui.collapsing("Physics", |ui| {
            let physics = &mut settings.physics_settings;
            changed |= ui
                .checkbox(&mut physics.spring_enabled, "Spring relaxation")
                .changed();
            changed |= ui
                .add(egui::Slider::new(&mut physics.spring_strength, 0.0..=0.1).text("Strength"))
                .on_hover_text("Fraction of the stretch corrected each frame.")
                .changed();
            changed |= ui
                .add(egui::Slider::new(&mut physics.spring_length, 20.0..=600.0).text("Rest length"))
                .changed();
            changed |= ui
                .add(egui::Slider::new(&mut physics.spring_friction, 0.0..=1.0).text("Friction"))
                .on_hover_text("Saved with the chart; the relaxation does not read it.")
                .changed();
        });

        ui.collapsing("View", |ui| {
            let view = &mut settings.view_settings;
            egui::ComboBox::from_label("Edges")
                .selected_text(view.edge_type.label())
                .show_ui(ui, |ui| {
                    for edge_type in EdgeType::ALL {
                        changed |= ui
                            .selectable_value(&mut view.edge_type, edge_type, edge_type.label())
                            .changed();
                    }
                });
            changed |= ui
                .add(
                    egui::Slider::new(&mut view.zoom_multiplier, 1.25..=4.0)
                        .text("Zoom multiplier"),
                )
                .changed();
            changed |= ui
                .add(
                    egui::Slider::new(&mut view.min_zoom_level, 0.0..=6.0)
                        .step_by(1.0)
                        .text("Zoom-out levels"),
                )
                .changed();
            changed |= ui
                .add(
                    egui::Slider::new(&mut view.max_zoom_level, 0.0..=6.0)
                        .step_by(1.0)
                        .text("Zoom-in levels"),
                )
                .changed();
            changed |= ui
                .add(
                    egui::Slider::new(&mut view.start_zoom_level, -6.0..=6.0)
                        .step_by(1.0)
                        .text("Start zoom level"),
                )
                .changed();
            ui.horizontal(|ui| {
                ui.label("Start position");
                changed |= ui
                    .add(egui::DragValue::new(&mut view.start_position.x).prefix("x "))
                    .changed();
                changed |= ui
                    .add(egui::DragValue::new(&mut view.start_position.y).prefix("y "))
                    .changed();
            });
        });

        if changed {
            self.chart.set_settings(settings);
        }
    }
}

use std::path::Path;

use eframe::egui::{self, Align, Context, Layout};
use flow_chart::chart::{Chart, NodeType};
use flow_chart::control::{ControlKey, InputEvent};
use flow_chart::geometry::Point;
use flow_chart::util::stable_pair;

use super::super::{DetailRequests, ViewModel, load_summary, write_document};

impl ViewModel {
    pub(in crate::app) fn new(chart: Chart) -> Self {
        Self {
            chart,
            details: None,
            search: String::new(),
            new_node_name: String::new(),
            new_node_type: NodeType::Data,
            generated_nodes: 0,
            json_window: None,
            status: None,
            pointer_captured: false,
            pointer_inside: false,
            view_placed: false,
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        chart_path: Option<&Path>,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("flow-chart");
                    ui.separator();
                    ui.label(format!("chart: {}", self.chart.settings().name));
                    ui.label(format!("nodes: {}", self.chart.nodes().len()));
                    ui.label(format!("edges: {}", self.chart.edges().len()));

                    let save_button =
                        ui.add_enabled(chart_path.is_some(), egui::Button::new("Save"));
                    if save_button.clicked()
                        && let Some(path) = chart_path
                    {
                        self.save_to(path);
                    }
                    let reload_button = ui.add_enabled(
                        chart_path.is_some() && !is_loading,
                        egui::Button::new("Reload"),
                    );
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    if ui.button("JSON").clicked() && self.json_window.is_none() {
                        self.json_window = Some(self.export_json());
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if is_loading {
                            ui.spinner();
                        }
                        if let Some(status) = &self.status {
                            ui.label(status.as_str());
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_details(ui));

        self.draw_json_window(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_canvas(ui));
    }

    pub(in crate::app) fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    pub(in crate::app) fn add_node_at(&mut self, name: String, node_type: NodeType, pos: Point) -> bool {
        match self.chart.add_node(name, node_type, pos) {
            Ok(node) => {
                let status = format!("added node `{}`", node.name());
                self.set_status(status);
                true
            }
            Err(error) => {
                self.set_status(error.to_string());
                false
            }
        }
    }

    /// Adds a node with a fresh name at a stable pseudo-random spot inside
    /// the visible canvas.
    pub(in crate::app) fn add_generated_node(&mut self) {
        let name = loop {
            self.generated_nodes += 1;
            let candidate = format!("node-{}", self.generated_nodes);
            if self.chart.node(&candidate).is_none() {
                break candidate;
            }
        };

        let (jx, jy) = stable_pair(&name);
        let size = self.chart.canvas_size();
        let view_pos = size * 0.5 + Point::new(jx * size.x * 0.4, jy * size.y * 0.4);
        let pos = self.chart.view().view_to_world(view_pos);
        self.add_node_at(name, self.new_node_type, pos);
    }

    pub(in crate::app) fn connect_selected(&mut self) {
        let added = self.chart.connect_selected();
        self.set_status(format!("connected selection with {added} edges"));
    }

    pub(in crate::app) fn remove_selected(&mut self) {
        let mut requests = DetailRequests::default();
        let count = self.chart.selection().len();
        self.chart
            .handle_input(&InputEvent::Key(ControlKey::Delete), &mut requests);
        self.set_status(format!("removed {count} nodes"));
    }

    pub(in crate::app) fn replace_chart(&mut self, chart: Chart) {
        self.chart = chart;
        self.details = None;
        self.view_placed = false;
    }

    fn save_to(&mut self, path: &Path) {
        match write_document(path, &self.chart) {
            Ok(()) => self.set_status(format!("saved {}", path.display())),
            Err(error) => {
                log::error!("{error:#}");
                self.set_status(format!("{error:#}"));
            }
        }
    }

    fn export_json(&mut self) -> String {
        match self.chart.to_json() {
            Ok(json) => json,
            Err(error) => {
                self.set_status(error.to_string());
                String::new()
            }
        }
    }

    fn draw_json_window(&mut self, ctx: &Context) {
        let Some(mut text) = self.json_window.take() else {
            return;
        };

        let mut open = true;
        let mut refresh = false;
        let mut import = false;
        egui::Window::new("Chart JSON")
            .open(&mut open)
            .default_size([480.0, 520.0])
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if ui.button("Refresh from chart").clicked() {
                        refresh = true;
                    }
                    if ui
                        .button("Import")
                        .on_hover_text("Replace the chart with this document.")
                        .clicked()
                    {
                        import = true;
                    }
                });
                ui.separator();
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.add(
                        egui::TextEdit::multiline(&mut text)
                            .code_editor()
                            .desired_width(f32::INFINITY),
                    );
                });
            });

        if import {
            match Chart::from_json(&text, self.chart.canvas_size()) {
                Ok((chart, report)) => {
                    let summary = load_summary(&chart, &report);
                    self.replace_chart(chart);
                    self.set_status(summary);
                }
                Err(error) => self.set_status(error.to_string()),
            }
        }
        if refresh {
            text = self.export_json();
        }
        if open {
            self.json_window = Some(text);
        }
    }
}

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use anyhow::{Context as _, Result};
use eframe::egui::{self, Context};
use flow_chart::chart::{Chart, ChartDocument, ChartObserver, Edge, LoadReport, Node, NodeType};
use flow_chart::geometry::Point;
use flow_chart::settings::ChartSettings;

mod canvas;
mod surface;
mod ui;

/// Canvas size assumed until the first frame reports the real one.
const INITIAL_CANVAS: Point = Point::new(800.0, 600.0);

pub struct FlowChartApp {
    chart_path: Option<PathBuf>,
    state: AppState,
    reload_rx: Option<Receiver<Result<ChartDocument, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<ChartDocument, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum DetailTarget {
    Node(String),
    Edge(usize),
}

/// Collects the detail views the chart opened while handling input.
#[derive(Default)]
struct DetailRequests(Vec<DetailTarget>);

impl ChartObserver for DetailRequests {
    fn on_node_details(&mut self, node: &Node) {
        log::debug!("showing details for node `{}`", node.name());
        self.0.push(DetailTarget::Node(node.name().to_owned()));
    }

    fn on_edge_details(&mut self, index: usize, edge: &Edge) {
        log::debug!("showing details for edge `{}` ({} -> {})", edge.name, edge.from, edge.to);
        self.0.push(DetailTarget::Edge(index));
    }
}

struct ViewModel {
    chart: Chart,
    details: Option<DetailTarget>,
    search: String,
    new_node_name: String,
    new_node_type: NodeType,
    generated_nodes: usize,
    json_window: Option<String>,
    status: Option<String>,
    pointer_captured: bool,
    pointer_inside: bool,
    view_placed: bool,
}

fn read_document(path: &Path) -> Result<ChartDocument> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read chart file {}", path.display()))?;
    ChartDocument::from_json(&json)
        .with_context(|| format!("failed to parse chart file {}", path.display()))
}

fn write_document(path: &Path, chart: &Chart) -> Result<()> {
    let json = chart.to_json().context("failed to serialize chart")?;
    fs::write(path, json).with_context(|| format!("failed to write chart file {}", path.display()))
}

fn load_summary(chart: &Chart, report: &LoadReport) -> String {
    let mut summary = format!(
        "loaded `{}`: {} nodes, {} edges",
        chart.settings().name,
        chart.nodes().len(),
        chart.edges().len()
    );
    if !report.is_clean() {
        summary.push_str(&format!(", skipped {} dangling edges", report.skipped_edges.len()));
    }
    summary
}

impl FlowChartApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, chart_path: Option<PathBuf>) -> Self {
        let state = match &chart_path {
            Some(path) => Self::start_load(path.clone()),
            None => AppState::Ready(Box::new(ViewModel::new(Chart::new(
                ChartSettings::default(),
                INITIAL_CANVAS,
            )))),
        };

        Self {
            chart_path,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(path: PathBuf) -> Receiver<Result<ChartDocument, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = read_document(&path).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(path: PathBuf) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(path),
        }
    }

    fn ready_state(document: ChartDocument) -> AppState {
        match Chart::from_document(document, INITIAL_CANVAS) {
            Ok((chart, report)) => {
                let summary = load_summary(&chart, &report);
                let mut model = ViewModel::new(chart);
                model.status = Some(summary);
                AppState::Ready(Box::new(model))
            }
            Err(error) => AppState::Error(error.to_string()),
        }
    }
}

impl eframe::App for FlowChartApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(document) => Self::ready_state(document),
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading chart...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
                ctx.request_repaint();
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to open chart");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    ui.horizontal(|ui| {
                        if let Some(path) = &self.chart_path
                            && ui.button("Retry").clicked()
                        {
                            transition = Some(Self::start_load(path.clone()));
                        }
                        if ui.button("Start empty chart").clicked() {
                            transition = Some(AppState::Ready(Box::new(ViewModel::new(Chart::new(
                                ChartSettings::default(),
                                INITIAL_CANVAS,
                            )))));
                        }
                    });
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, self.chart_path.as_deref(), &mut reload_requested, is_reloading);

                if reload_requested
                    && self.reload_rx.is_none()
                    && let Some(path) = &self.chart_path
                {
                    self.reload_rx = Some(Self::spawn_load(path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(Ok(document)) => transition = Some(Self::ready_state(document)),
                        Ok(Err(error)) => {
                            log::error!("{error}");
                            model.status = Some(error);
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            model.status = Some("background load worker disconnected".to_owned());
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}

mod app;

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Chart document to open; saving writes back to it.
    #[arg(long)]
    chart: Option<PathBuf>,
    #[arg(long, default_value_t = 1280.0)]
    width: f32,
    #[arg(long, default_value_t = 800.0)]
    height: f32,
    /// Default log filter; `RUST_LOG` takes precedence.
    #[arg(long, default_value = "info")]
    log_level: log::LevelFilter,
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.log_level)
        .parse_default_env()
        .init();

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([args.width, args.height]),
        ..Default::default()
    };

    eframe::run_native(
        "flow-chart",
        options,
        Box::new(move |cc| Ok(Box::new(app::FlowChartApp::new(cc, args.chart.clone())))),
    )
}

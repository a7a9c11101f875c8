mod app;
mod document;
mod util;

use std::path::PathBuf;

use clap::Parser;
use node_minimap::config::MinimapConfig;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON minimap settings; defaults are used when omitted or invalid.
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON node document; a generated sample is shown when omitted.
    #[arg(long)]
    graph: Option<PathBuf>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("node_minimap=info")),
        )
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => MinimapConfig::load(path).unwrap_or_else(|error| {
            warn!(path = %path.display(), %error, "falling back to default minimap settings");
            MinimapConfig::default()
        }),
        None => MinimapConfig::default(),
    };
    info!(graph = ?args.graph, "starting node editor");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "node-minimap",
        options,
        Box::new(move |cc| Ok(Box::new(app::NodeMinimapApp::new(cc, args.graph.clone(), config)))),
    )
}

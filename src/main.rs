mod app;
mod config;
mod graph;
mod interaction;
mod relations;
mod simulation;

use anyhow::anyhow;
use clap::Parser;

use crate::config::AppConfig;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Relation dump to visualise (GraphQL connection or flat JSON array).
    #[arg(long, default_value = "relations.json")]
    data_path: String,

    /// Optional JSON file overriding layout and viewport tuning.
    #[arg(long)]
    config_path: Option<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = AppConfig::load(args.config_path.as_deref())?;
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([
            config.viewport.width + 600.0,
            config.viewport.height + 120.0,
        ]),
        ..Default::default()
    };

    log::info!("starting relgraph with {}", args.data_path);
    eframe::run_native(
        "relgraph",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::RelgraphApp::new(
                cc,
                args.data_path.clone(),
                config,
            )))
        }),
    )
    .map_err(|error| anyhow!("failed to run the viewer: {error}"))
}

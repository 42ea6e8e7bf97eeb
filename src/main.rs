mod app;

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;
use concept_atlas::{LayoutConfig, RunMode, Viewport};
use tracing_subscriber::EnvFilter;

use crate::app::{ConceptAtlasApp, GraphSource};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Concept graph JSON; the bundled calculus graph when omitted.
    #[arg(long)]
    graph: Option<PathBuf>,

    /// Layout config JSON; unset fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 800.0)]
    width: f32,

    #[arg(long, default_value_t = 600.0)]
    height: f32,

    /// Skip the periodic keep-alive nudges once the layout has cooled.
    #[arg(long)]
    settle_once: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => LayoutConfig::load(path)?,
        None => LayoutConfig::default(),
    };
    let viewport = Viewport::new(args.width, args.height)?;
    let run_mode = if args.settle_once {
        RunMode::SettleOnce
    } else {
        RunMode::Continuous
    };
    let source = match args.graph {
        Some(path) => GraphSource::File(path),
        None => GraphSource::Bundled,
    };

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([args.width + 360.0, args.height + 48.0]),
        ..Default::default()
    };

    eframe::run_native(
        "concept-atlas",
        options,
        Box::new(move |cc| {
            Ok(Box::new(ConceptAtlasApp::new(
                cc, source, config, viewport, run_mode,
            )))
        }),
    )
    .map_err(|error| anyhow!("viewer exited with an error: {error}"))
}

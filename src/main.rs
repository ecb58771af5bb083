use std::{env, fs::File, path::PathBuf};

use anyhow::{Context, Result};
use env_logger::Target;
use inspector::{InspectorConfig, StaticAssets};
use log::info;

mod app;
mod state;
mod ui;

const CONFIG_VAR: &str = "CNN_INSPECTOR_CONFIG";
const ASSETS_VAR: &str = "CNN_INSPECTOR_ASSETS";
const LOG_VAR: &str = "CNN_INSPECTOR_LOG";
const DEFAULT_LOG_FILE: &str = "cnn-inspector.log";

fn main() -> Result<()> {
    init_logging()?;

    let config = match config_path() {
        Some(path) => InspectorConfig::load(&path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => InspectorConfig::default(),
    };

    let catalog = config.catalog().context("building the layer catalog")?;

    let assets = match env::var_os(ASSETS_VAR).map(PathBuf::from) {
        Some(path) => StaticAssets::load(&path)
            .with_context(|| format!("loading asset manifest {}", path.display()))?,
        None => {
            info!("no asset manifest given, generating placeholder assets");
            StaticAssets::synthetic(&catalog)
        }
    };

    info!(layers = catalog.len(); "starting inspector");
    app::run::run(&catalog, &assets, config.calibration)
}

/// The terminal belongs to the viewer, so log records go to a file.
fn init_logging() -> Result<()> {
    let path = env::var(LOG_VAR).unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
    let file = File::create(&path).with_context(|| format!("creating log file {path}"))?;

    env_logger::Builder::from_default_env()
        .target(Target::Pipe(Box::new(file)))
        .init();

    Ok(())
}

fn config_path() -> Option<PathBuf> {
    env::args_os()
        .nth(1)
        .or_else(|| env::var_os(CONFIG_VAR))
        .map(PathBuf::from)
}

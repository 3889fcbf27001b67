//! Cloud Viewer
//!
//! Builds the cloud particle layers above a terrain model and exports the
//! resulting scene.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use cloud_particles::{MemoryRenderer, TerrainBounds};
use cloud_viewer::fetch::DEFAULT_PROXY_URL;
use cloud_viewer::{CloudViewer, HttpFetcher, ViewerConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Read low/medium/high.json from the data directory
    Static,
    /// Fetch the bands through the cloud proxy
    Live,
}

/// Cloud Viewer
#[derive(Parser, Debug)]
#[command(name = "cloud-viewer")]
#[command(about = "Builds cloud particle layers and exports the scene")]
struct Args {
    /// Terrain model (Wavefront OBJ)
    #[arg(short, long, env = "CLOUD_VIEWER_TERRAIN")]
    terrain: PathBuf,

    /// Where the band documents come from
    #[arg(short, long, value_enum, default_value = "static", env = "CLOUD_VIEWER_MODE")]
    mode: Mode,

    /// Directory holding the static band documents
    #[arg(long, default_value = "data", env = "CLOUD_VIEWER_DATA_DIR")]
    data_dir: PathBuf,

    /// Cloud proxy base URL
    #[arg(long, default_value = DEFAULT_PROXY_URL, env = "CLOUD_VIEWER_PROXY_URL")]
    proxy_url: String,

    /// Date to fetch in live mode (YYYY-MM-DD or YYYY-MM-DDTHH:MM)
    #[arg(short, long, env = "CLOUD_VIEWER_DATE")]
    date: Option<String>,

    /// Scene output file
    #[arg(short, long, default_value = "scene.json", env = "CLOUD_VIEWER_OUTPUT")]
    output: PathBuf,

    /// YAML file overriding region, noise and band presets
    #[arg(long, env = "CLOUD_VIEWER_CONFIG")]
    config: Option<PathBuf>,

    /// Proxy request timeout in seconds
    #[arg(long, default_value = "60", env = "CLOUD_VIEWER_TIMEOUT_SECS")]
    timeout_secs: u64,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    info!(mode = ?args.mode, "Starting cloud viewer");

    let config = ViewerConfig::load_or_default(args.config.as_deref())?;
    let terrain = TerrainBounds::from_obj_file(&args.terrain)
        .with_context(|| format!("Failed to load terrain {:?}", args.terrain))?;
    info!(
        width = terrain.extent().width,
        height = terrain.extent().height,
        top = terrain.top(),
        "Loaded terrain"
    );

    let viewer = CloudViewer::new(config, terrain, MemoryRenderer::new())?;

    let summary = match args.mode {
        Mode::Static => viewer.load_static(&args.data_dir).await,
        Mode::Live => {
            let Some(date) = args.date.as_deref() else {
                bail!("--date is required in live mode");
            };
            let fetcher = HttpFetcher::new(&args.proxy_url, Duration::from_secs(args.timeout_secs))?;
            viewer.refresh(date, Arc::new(fetcher)).await?
        }
    };

    if summary.applied.is_empty() {
        bail!("No cloud layers could be loaded");
    }

    let document = viewer.export_scene(&args.output)?;
    info!(
        layers = document.layers.len(),
        particles = document.particle_count(),
        failed = summary.failed.len(),
        "Cloud viewer finished"
    );

    Ok(())
}

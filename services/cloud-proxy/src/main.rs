//! Cloud Proxy Server
//!
//! Pass-through proxy in front of the weather provider API.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use cloud_proxy::state::AppState;
use cloud_proxy::upstream::{Credentials, UpstreamConfig, DEFAULT_UPSTREAM_URL};

/// Cloud Proxy Server
#[derive(Parser, Debug)]
#[command(name = "cloud-proxy")]
#[command(about = "Forwards cloud cover requests to the weather provider")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:3000", env = "CLOUD_PROXY_LISTEN_ADDR")]
    listen: String,

    /// Provider base URL
    #[arg(long, default_value = DEFAULT_UPSTREAM_URL, env = "CLOUD_PROXY_UPSTREAM_URL")]
    upstream_url: String,

    /// Provider account username
    #[arg(long, env = "CLOUD_PROXY_USERNAME")]
    username: Option<String>,

    /// Provider account password
    #[arg(long, env = "CLOUD_PROXY_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Upstream request timeout in seconds
    #[arg(long, default_value = "60", env = "CLOUD_PROXY_TIMEOUT_SECS")]
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

    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    info!("Starting cloud proxy");

    let credentials = match (args.username, args.password) {
        (Some(username), password) => Some(Credentials {
            username,
            password: password.unwrap_or_default(),
        }),
        (None, _) => {
            warn!("No provider username configured, requests are sent without credentials");
            None
        }
    };

    let config = UpstreamConfig {
        base_url: args.upstream_url,
        credentials,
        request_timeout: Duration::from_secs(args.timeout_secs),
    };
    info!(upstream = %config.base_url, "Upstream configured");

    let state = Arc::new(AppState::new(config, Some(prometheus_handle))?);
    let app = cloud_proxy::router(state);

    let addr: SocketAddr = args.listen.parse().context("Invalid listen address")?;
    info!("Cloud proxy listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind")?;
    axum::serve(listener, app).await.context("Server failed")?;

    Ok(())
}

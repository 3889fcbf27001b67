//! Application state for the cloud proxy.

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusHandle;

use crate::upstream::{UpstreamClient, UpstreamConfig};

/// Shared application state.
pub struct AppState {
    /// Provider client with credentials.
    pub upstream: UpstreamClient,

    /// Prometheus recorder handle, if one was installed.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(config: UpstreamConfig, prometheus: Option<PrometheusHandle>) -> Result<Self> {
        let upstream = UpstreamClient::new(config).context("Failed to create upstream client")?;
        Ok(Self {
            upstream,
            prometheus,
        })
    }
}

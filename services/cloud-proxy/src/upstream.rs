//! Client for the weather provider API.

use std::time::{Duration, Instant};

use cloud_common::BoundingBox;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

/// Default provider endpoint.
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.meteomatics.com";

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request to upstream failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("upstream returned status {0}")]
    Status(StatusCode),

    #[error("upstream body is not JSON: {0}")]
    Decode(String),
}

/// Account credentials sent with HTTP basic auth.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub credentials: Option<Credentials>,
    pub request_timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_UPSTREAM_URL.to_string(),
            credentials: None,
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// Fetches cloud cover series for a bounding box.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    config: UpstreamConfig,
}

impl UpstreamClient {
    pub fn new(config: UpstreamConfig) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client, config })
    }

    /// Provider URL:
    /// `{base}/{date}/{level}_cloud_cover:{unit}/{north},{west}_{south},{east}:{resLat},{resLon}/json`
    pub fn build_url(&self, bbox: &BoundingBox) -> String {
        format!(
            "{}/{}/{}/{}/json",
            self.config.base_url.trim_end_matches('/'),
            bbox.date,
            bbox.level.parameter(&bbox.unit),
            bbox.area_path()
        )
    }

    /// GET the provider document and return its JSON body.
    #[instrument(skip(self, bbox), fields(level = %bbox.level, date = %bbox.date))]
    pub async fn fetch(&self, bbox: &BoundingBox) -> Result<Value, UpstreamError> {
        let url = self.build_url(bbox);
        let started = Instant::now();

        let mut request = self.client.get(&url);
        if let Some(creds) = &self.config.credentials {
            request = request.basic_auth(&creds.username, Some(&creds.password));
        }

        let response = request.send().await?;
        let status = response.status();
        crate::metrics::record_upstream_duration(started.elapsed());

        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }

        let body = response.bytes().await?;
        let value = serde_json::from_slice(&body).map_err(|e| UpstreamError::Decode(e.to_string()))?;
        debug!(url = %url, bytes = body.len(), "Fetched upstream cloud data");
        Ok(value)
    }
}

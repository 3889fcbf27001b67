//! Sources of live cloud cover documents.

use std::time::Duration;

use async_trait::async_trait;
use cloud_common::{BoundingBox, CloudError, CloudResult};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

/// Default address of the cloud proxy.
pub const DEFAULT_PROXY_URL: &str = "http://localhost:3000";

/// Retrieves the provider payload for one band request.
#[async_trait]
pub trait CloudFetcher: Send + Sync {
    async fn fetch(&self, bbox: &BoundingBox) -> CloudResult<Value>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FetchBody<'a> {
    bounding_box: &'a BoundingBox,
}

/// Fetches through the proxy's `POST /fetch-cloud-data` endpoint.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    endpoint: String,
}

impl HttpFetcher {
    pub fn new(proxy_url: &str, timeout: Duration) -> CloudResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CloudError::Fetch(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: format!("{}/fetch-cloud-data", proxy_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CloudFetcher for HttpFetcher {
    #[instrument(skip(self, bbox), fields(level = %bbox.level, date = %bbox.date))]
    async fn fetch(&self, bbox: &BoundingBox) -> CloudResult<Value> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&FetchBody { bounding_box: bbox })
            .send()
            .await
            .map_err(|e| CloudError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CloudError::Fetch(format!("HTTP error! status: {}", status.as_u16())));
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| CloudError::Parse(format!("invalid proxy response: {}", e)))?;
        debug!("Received cloud data from proxy");
        Ok(value)
    }
}

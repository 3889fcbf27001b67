//! POST /fetch-cloud-data

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cloud_common::BoundingBox;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::state::AppState;

/// Request body sent by the viewer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchCloudDataRequest {
    pub bounding_box: BoundingBox,
}

/// Body returned for any upstream failure.
pub const FETCH_ERROR_BODY: &str = "Error fetching data";

/// Forward the request to the provider and relay its JSON body.
pub async fn fetch_cloud_data_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(request): Json<FetchCloudDataRequest>,
) -> Response {
    crate::metrics::record_request();
    let bbox = request.bounding_box;

    if let Err(e) = bbox.validate() {
        warn!(error = %e, level = %bbox.level, "Rejected bounding box");
        let status =
            StatusCode::from_u16(e.http_status_code()).unwrap_or(StatusCode::BAD_REQUEST);
        return (status, e.to_string()).into_response();
    }

    info!(level = %bbox.level, date = %bbox.date, "Fetching cloud data");

    match state.upstream.fetch(&bbox).await {
        Ok(body) => Json(body).into_response(),
        Err(e) => {
            crate::metrics::record_upstream_failure();
            error!(error = %e, level = %bbox.level, "Error fetching data");
            (StatusCode::INTERNAL_SERVER_ERROR, FETCH_ERROR_BODY).into_response()
        }
    }
}

//! Cloud Proxy Service Library
//!
//! Forwards `POST /fetch-cloud-data` requests from the viewer to the weather
//! provider, adding the account credentials. The upstream JSON is returned
//! unchanged.

pub mod handlers;
pub mod metrics;
pub mod state;
pub mod upstream;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use state::AppState;

/// Build the proxy router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/fetch-cloud-data",
            post(handlers::fetch::fetch_cloud_data_handler),
        )
        .route("/health", get(handlers::health::health_handler))
        .route("/metrics", get(handlers::health::metrics_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

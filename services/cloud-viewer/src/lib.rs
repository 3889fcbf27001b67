//! Cloud Viewer Library
//!
//! Headless client of the cloud layer pipeline. It loads the terrain extent,
//! pulls one cloud cover document per altitude band (from static files or
//! live through the proxy), projects each band into a particle layer and
//! keeps the active layers for the renderer. The active scene can be
//! exported as a JSON point cloud.

pub mod config;
pub mod export;
pub mod fetch;
pub mod viewer;

pub use config::{BandPreset, ViewerConfig};
pub use fetch::{CloudFetcher, HttpFetcher};
pub use viewer::{CloudViewer, RefreshSummary};

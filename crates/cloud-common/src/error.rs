//! Error types for the cloud layer pipeline.

use thiserror::Error;

/// Result type alias using CloudError.
pub type CloudResult<T> = Result<T, CloudError>;

/// Primary error type shared by the pipeline crates.
#[derive(Debug, Error)]
pub enum CloudError {
    // === Request Errors ===
    #[error("{0}")]
    InvalidDate(String),

    #[error("Invalid bounding box: {0}")]
    InvalidBoundingBox(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // === Data Errors ===
    #[error("Failed to fetch cloud data: {0}")]
    Fetch(String),

    #[error("Failed to parse cloud data: {0}")]
    Parse(String),

    #[error("Invalid terrain model: {0}")]
    Terrain(String),

    // === Infrastructure Errors ===
    #[error("I/O error: {0}")]
    Io(String),
}

impl CloudError {
    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            CloudError::InvalidDate(_)
            | CloudError::InvalidBoundingBox(_)
            | CloudError::InvalidConfig(_) => 400,
            _ => 500,
        }
    }
}

impl From<std::io::Error> for CloudError {
    fn from(err: std::io::Error) -> Self {
        CloudError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CloudError {
    fn from(err: serde_json::Error) -> Self {
        CloudError::Parse(format!("JSON error: {}", err))
    }
}

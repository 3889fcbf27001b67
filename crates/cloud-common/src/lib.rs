//! Common types and utilities shared across the cloud layer crates and services.

pub mod bbox;
pub mod error;
pub mod level;
pub mod time;

pub use bbox::{BoundingBox, MAX_GRID_CELLS};
pub use error::{CloudError, CloudResult};
pub use level::CloudLevel;
pub use time::DateWindow;

//! Cloud cover grid normalization.
//!
//! Converts the provider's point observations into a [`CloudMatrix`] aligned
//! to the request's bounding box and resolution:
//!
//! ```text
//! { data: [ { coordinates: [ { lat, lon, dates: [ { value } ] } ] } ] }
//!      │
//!      ▼
//! GridNormalizer::normalize(payload)
//!      │
//!      ├─► allocate numRows x numCols absent cells
//!      ├─► first dated value of each observation
//!      ├─► row = round((lat - south) / resLat), col = round((lon - west) / resLon)
//!      └─► drop out-of-grid observations
//!      │
//!      ▼
//! CloudMatrix (row 0 = south, col 0 = west)
//! ```

pub mod matrix;
pub mod normalize;
pub mod payload;

pub use matrix::CloudMatrix;
pub use normalize::{GridNormalizer, NormalizeReport};
pub use payload::CloudSource;

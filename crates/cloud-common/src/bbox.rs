//! Cloud cover request bounding box.

use serde::{Deserialize, Serialize};

use crate::{CloudError, CloudLevel, CloudResult};

/// Largest grid a request may span (`num_rows() * num_cols()`).
pub const MAX_GRID_CELLS: usize = 4_000_000;

/// The geographic rectangle, altitude band and time of a cloud cover request.
///
/// Coordinates are WGS84 degrees. The resolution steps partition the
/// rectangle into a regular grid of `num_rows() x num_cols()` cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub level: CloudLevel,
    pub unit: String,
    /// ISO-8601 timestamp, e.g. `2025-03-01T12:00:00Z`
    pub date: String,
    pub north: f64,
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub resolution_lat: f64,
    pub resolution_lon: f64,
}

impl BoundingBox {
    /// Create a bounding box for the given extent and resolution.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        level: CloudLevel,
        date: impl Into<String>,
        north: f64,
        west: f64,
        south: f64,
        east: f64,
        resolution_lat: f64,
        resolution_lon: f64,
    ) -> Self {
        Self {
            level,
            unit: "octas".to_string(),
            date: date.into(),
            north,
            west,
            south,
            east,
            resolution_lat,
            resolution_lon,
        }
    }

    /// Copy of this box scoped to a single request.
    pub fn for_request(&self, level: CloudLevel, date: impl Into<String>) -> Self {
        Self {
            level,
            date: date.into(),
            ..self.clone()
        }
    }

    /// Check the invariants the grid arithmetic relies on.
    pub fn validate(&self) -> CloudResult<()> {
        let values = [
            self.north,
            self.south,
            self.east,
            self.west,
            self.resolution_lat,
            self.resolution_lon,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(CloudError::InvalidBoundingBox(
                "coordinates and resolutions must be finite".to_string(),
            ));
        }
        if self.north <= self.south {
            return Err(CloudError::InvalidBoundingBox(format!(
                "north ({}) must be greater than south ({})",
                self.north, self.south
            )));
        }
        if self.east <= self.west {
            return Err(CloudError::InvalidBoundingBox(format!(
                "east ({}) must be greater than west ({})",
                self.east, self.west
            )));
        }
        if self.resolution_lat <= 0.0 || self.resolution_lon <= 0.0 {
            return Err(CloudError::InvalidBoundingBox(
                "resolutions must be positive".to_string(),
            ));
        }
        let (rows, cols) = (self.num_rows(), self.num_cols());
        match rows.checked_mul(cols) {
            Some(cells) if cells <= MAX_GRID_CELLS => Ok(()),
            _ => Err(CloudError::InvalidBoundingBox(format!(
                "grid of {} x {} cells exceeds the limit of {} cells",
                rows, cols, MAX_GRID_CELLS
            ))),
        }
    }

    /// Number of latitude rows: `ceil((north - south) / resolution_lat)`.
    pub fn num_rows(&self) -> usize {
        cell_count(self.north - self.south, self.resolution_lat)
    }

    /// Number of longitude columns: `ceil((east - west) / resolution_lon)`.
    pub fn num_cols(&self) -> usize {
        cell_count(self.east - self.west, self.resolution_lon)
    }

    /// Provider path segment: `north,west_south,east:resLat,resLon`.
    pub fn area_path(&self) -> String {
        format!(
            "{},{}_{},{}:{},{}",
            self.north, self.west, self.south, self.east, self.resolution_lat, self.resolution_lon
        )
    }
}

impl Default for BoundingBox {
    /// Uri, Switzerland at 0.005 degree resolution.
    fn default() -> Self {
        Self::new(
            CloudLevel::Low,
            "",
            46.993408,
            8.397377,
            46.527633,
            8.957877,
            0.005,
            0.005,
        )
    }
}

fn cell_count(span: f64, step: f64) -> usize {
    let n = (span / step).ceil();
    if n.is_finite() && n > 0.0 {
        n as usize
    } else {
        0
    }
}

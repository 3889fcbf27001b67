//! Test data generators for provider payloads and cloud matrices.
//!
//! These generators create predictable, verifiable test data patterns
//! that can be used across the test suite.

use cloud_common::BoundingBox;
use serde_json::{json, Value};

/// Builds provider payloads in the `{ data: [ { coordinates: [...] } ] }` shape.
///
/// # Example
///
/// ```
/// use test_utils::PayloadBuilder;
///
/// let payload = PayloadBuilder::new()
///     .observation(46.5, 8.4, &[4.0, 5.0])
///     .build();
/// assert_eq!(payload["data"][0]["coordinates"][0]["dates"][0]["value"], 4.0);
/// ```
#[derive(Debug, Default, Clone)]
pub struct PayloadBuilder {
    coordinates: Vec<Value>,
}

impl PayloadBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an observation with one dated value per entry of `values`.
    pub fn observation(mut self, lat: f64, lon: f64, values: &[f64]) -> Self {
        let dates: Vec<Value> = values
            .iter()
            .enumerate()
            .map(|(hour, v)| json!({ "date": format!("2025-03-01T{:02}:00:00Z", hour), "value": v }))
            .collect();
        self.coordinates
            .push(json!({ "lat": lat, "lon": lon, "dates": dates }));
        self
    }

    /// Add one observation at the south-west corner of each present cell.
    pub fn cells(mut self, bbox: &BoundingBox, rows: &[Vec<Option<f64>>]) -> Self {
        for (row, values) in rows.iter().enumerate() {
            for (col, value) in values.iter().enumerate() {
                if let Some(v) = value {
                    let lat = bbox.south + row as f64 * bbox.resolution_lat;
                    let lon = bbox.west + col as f64 * bbox.resolution_lon;
                    self = self.observation(lat, lon, &[*v]);
                }
            }
        }
        self
    }

    pub fn build(self) -> Value {
        json!({
            "version": "3.0",
            "data": [
                {
                    "parameter": "low_cloud_cover:octas",
                    "coordinates": self.coordinates,
                }
            ]
        })
    }
}

/// Creates a `rows x cols` matrix with every cell set to `value`.
pub fn uniform_rows(rows: usize, cols: usize, value: f64) -> Vec<Vec<Option<f64>>> {
    vec![vec![Some(value); cols]; rows]
}

/// Creates a `rows x cols` matrix with a single present cell.
pub fn single_cell_rows(
    rows: usize,
    cols: usize,
    row: usize,
    col: usize,
    value: f64,
) -> Vec<Vec<Option<f64>>> {
    let mut matrix = vec![vec![None; cols]; rows];
    matrix[row][col] = Some(value);
    matrix
}

/// Creates a matrix with okta values cycling 0..=8 in row-major order.
///
/// Cell `(row, col)` holds `(row * cols + col) % 9`, so roughly one cell in
/// nine is clear sky.
pub fn okta_ramp_rows(rows: usize, cols: usize) -> Vec<Vec<Option<f64>>> {
    (0..rows)
        .map(|row| {
            (0..cols)
                .map(|col| Some(((row * cols + col) % 9) as f64))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_builder_first_value() {
        let payload = PayloadBuilder::new()
            .observation(1.0, 2.0, &[3.0, 4.0])
            .build();
        let coord = &payload["data"][0]["coordinates"][0];
        assert_eq!(coord["lat"], 1.0);
        assert_eq!(coord["dates"].as_array().unwrap().len(), 2);
        assert_eq!(coord["dates"][0]["value"], 3.0);
    }

    #[test]
    fn test_cells_skip_absent() {
        let bbox = crate::fixtures::bbox::unit_grid(2, 2);
        let payload = PayloadBuilder::new()
            .cells(&bbox, &single_cell_rows(2, 2, 1, 0, 5.0))
            .build();
        let coords = payload["data"][0]["coordinates"].as_array().unwrap();
        assert_eq!(coords.len(), 1);
        assert_eq!(coords[0]["lat"], 1.0);
        assert_eq!(coords[0]["lon"], 0.0);
    }

    #[test]
    fn test_okta_ramp() {
        let m = okta_ramp_rows(2, 5);
        assert_eq!(m[0][0], Some(0.0));
        assert_eq!(m[1][3], Some(8.0));
        assert_eq!(m[1][4], Some(0.0));
    }
}

//! Provider payload → CloudMatrix.

use cloud_common::BoundingBox;
use serde_json::Value;
use tracing::debug;

use crate::CloudMatrix;

/// Counters collected while normalizing a payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Observations with at least one numeric reading.
    pub observations: usize,
    /// Readings written into the matrix.
    pub written: usize,
    /// Readings whose cell fell outside the grid.
    pub out_of_grid: usize,
    /// Entries skipped for missing coordinates or values.
    pub skipped: usize,
}

/// Maps point observations onto the regular grid of a bounding box.
#[derive(Debug, Clone)]
pub struct GridNormalizer {
    rows: usize,
    cols: usize,
    south: f64,
    west: f64,
    resolution_lat: f64,
    resolution_lon: f64,
}

impl GridNormalizer {
    pub fn new(bbox: &BoundingBox) -> Self {
        Self {
            rows: bbox.num_rows(),
            cols: bbox.num_cols(),
            south: bbox.south,
            west: bbox.west,
            resolution_lat: bbox.resolution_lat,
            resolution_lon: bbox.resolution_lon,
        }
    }

    /// Normalize a payload. Malformed input yields an all-absent matrix.
    pub fn normalize(&self, payload: &Value) -> CloudMatrix {
        self.normalize_with_report(payload).0
    }

    pub fn normalize_with_report(&self, payload: &Value) -> (CloudMatrix, NormalizeReport) {
        let mut matrix = CloudMatrix::new(self.rows, self.cols);
        let mut report = NormalizeReport::default();

        let Some(series) = payload.get("data").and_then(Value::as_array) else {
            debug!("payload has no observation collection, returning empty matrix");
            return (matrix, report);
        };

        for entry in series {
            let Some(coordinates) = entry.get("coordinates").and_then(Value::as_array) else {
                report.skipped += 1;
                continue;
            };

            for coord in coordinates {
                let (Some(lat), Some(lon)) = (
                    coord.get("lat").and_then(Value::as_f64),
                    coord.get("lon").and_then(Value::as_f64),
                ) else {
                    report.skipped += 1;
                    continue;
                };

                // First dated value wins within an observation.
                let Some(reading) = coord
                    .get("dates")
                    .and_then(Value::as_array)
                    .and_then(|dates| dates.first())
                    .and_then(|first| first.get("value"))
                    .and_then(Value::as_f64)
                else {
                    report.skipped += 1;
                    continue;
                };
                report.observations += 1;

                let written = self
                    .cell_index(lat, lon)
                    .is_some_and(|(row, col)| matrix.set(row, col, Some(reading)));
                if written {
                    report.written += 1;
                } else {
                    report.out_of_grid += 1;
                }
            }
        }

        debug!(
            rows = self.rows,
            cols = self.cols,
            observations = report.observations,
            written = report.written,
            out_of_grid = report.out_of_grid,
            skipped = report.skipped,
            "Normalized cloud cover payload"
        );

        (matrix, report)
    }

    /// Nearest cell for a coordinate, or `None` when outside the grid.
    pub fn cell_index(&self, lat: f64, lon: f64) -> Option<(usize, usize)> {
        let row = ((lat - self.south) / self.resolution_lat).round();
        let col = ((lon - self.west) / self.resolution_lon).round();

        if !row.is_finite() || !col.is_finite() || row < 0.0 || col < 0.0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some((row, col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloud_common::CloudLevel;
    use serde_json::json;

    fn small_box() -> BoundingBox {
        // 4 rows x 5 cols of 1 degree cells
        BoundingBox::new(CloudLevel::Low, "", 14.0, 20.0, 10.0, 25.0, 1.0, 1.0)
    }

    #[test]
    fn test_south_west_corner_is_origin() {
        let normalizer = GridNormalizer::new(&small_box());
        assert_eq!(normalizer.cell_index(10.0, 20.0), Some((0, 0)));
    }

    #[test]
    fn test_rounding_to_nearest_cell() {
        let normalizer = GridNormalizer::new(&small_box());
        assert_eq!(normalizer.cell_index(11.4, 21.6), Some((1, 2)));
    }

    #[test]
    fn test_north_edge_dropped() {
        let normalizer = GridNormalizer::new(&small_box());
        assert_eq!(normalizer.cell_index(14.0, 20.0), None);
        assert_eq!(normalizer.cell_index(9.0, 20.0), None);
    }

    #[test]
    fn test_non_object_payload() {
        let normalizer = GridNormalizer::new(&small_box());
        let (matrix, report) = normalizer.normalize_with_report(&json!("error"));
        assert_eq!((matrix.rows(), matrix.cols()), (4, 5));
        assert!(matrix.is_all_absent());
        assert_eq!(report, NormalizeReport::default());
    }

    #[test]
    fn test_skips_bad_entries() {
        let payload = json!({
            "data": [
                {"parameter": "no coordinates"},
                {"coordinates": [
                    {"lat": "x", "lon": 20.0, "dates": [{"value": 1}]},
                    {"lat": 10.0, "lon": 20.0, "dates": []},
                    {"lat": 10.0, "lon": 20.0, "dates": [{"value": null}]},
                    {"lat": 11.0, "lon": 21.0, "dates": [{"value": 6}, {"value": 2}]}
                ]}
            ]
        });
        let (matrix, report) = GridNormalizer::new(&small_box()).normalize_with_report(&payload);
        assert_eq!(report.skipped, 4);
        assert_eq!(report.written, 1);
        assert_eq!(matrix.get(1, 1), Some(6.0));
        assert_eq!(matrix.present_count(), 1);
    }
}

//! Tests for request bounding boxes.

use cloud_common::{BoundingBox, CloudError, CloudLevel, MAX_GRID_CELLS};

fn unit_box(rows: f64, cols: f64) -> BoundingBox {
    BoundingBox::new(CloudLevel::Low, "2025-01-01T00:00:00Z", rows, 0.0, 0.0, cols, 1.0, 1.0)
}

// ============================================================================
// Grid dimension tests
// ============================================================================

#[test]
fn test_exact_partition() {
    let bbox = unit_box(4.0, 6.0);
    assert_eq!(bbox.num_rows(), 4);
    assert_eq!(bbox.num_cols(), 6);
}

#[test]
fn test_partial_cells_round_up() {
    let bbox = BoundingBox::new(CloudLevel::Low, "", 10.5, 0.0, 0.0, 3.25, 1.0, 0.5);
    assert_eq!(bbox.num_rows(), 11);
    assert_eq!(bbox.num_cols(), 7);
}

#[test]
fn test_uri_region_dimensions() {
    let bbox = BoundingBox::new(
        CloudLevel::Low,
        "",
        46.993408,
        8.397377,
        46.527633,
        8.957877,
        0.005,
        0.005,
    );
    assert_eq!(bbox.num_rows(), 94);
    assert_eq!(bbox.num_cols(), 113);
}

// ============================================================================
// Validation tests
// ============================================================================

#[test]
fn test_validate_accepts_default() {
    assert!(BoundingBox::default().validate().is_ok());
}

#[test]
fn test_validate_rejects_inverted_latitudes() {
    let mut bbox = BoundingBox::default();
    std::mem::swap(&mut bbox.north, &mut bbox.south);
    assert!(matches!(
        bbox.validate(),
        Err(CloudError::InvalidBoundingBox(_))
    ));
}

#[test]
fn test_validate_rejects_inverted_longitudes() {
    let mut bbox = BoundingBox::default();
    bbox.east = bbox.west;
    assert!(bbox.validate().is_err());
}

#[test]
fn test_validate_rejects_zero_resolution() {
    let mut bbox = BoundingBox::default();
    bbox.resolution_lat = 0.0;
    assert!(bbox.validate().is_err());
}

#[test]
fn test_validate_rejects_nan() {
    let mut bbox = BoundingBox::default();
    bbox.west = f64::NAN;
    assert!(bbox.validate().is_err());
}

// ============================================================================
// Wire format tests
// ============================================================================

#[test]
fn test_deserialize_request_body() {
    let json = r#"{
        "level": "medium",
        "unit": "octas",
        "date": "2025-02-01T10:00:00Z",
        "north": 46.993408,
        "west": 8.397377,
        "south": 46.527633,
        "east": 8.957877,
        "resolutionLat": 0.005,
        "resolutionLon": 0.005
    }"#;
    let bbox: BoundingBox = serde_json::from_str(json).unwrap();
    assert_eq!(bbox.level, CloudLevel::Medium);
    assert_eq!(bbox.resolution_lon, 0.005);
    assert_eq!(bbox.date, "2025-02-01T10:00:00Z");
}

#[test]
fn test_area_path() {
    let bbox = BoundingBox::default();
    assert_eq!(
        bbox.area_path(),
        "46.993408,8.397377_46.527633,8.957877:0.005,0.005"
    );
}

#[test]
fn test_validate_rejects_oversized_grid() {
    let mut bbox = BoundingBox::default();
    bbox.resolution_lat = 1e-7;
    bbox.resolution_lon = 1e-7;
    assert!(matches!(
        bbox.validate(),
        Err(CloudError::InvalidBoundingBox(_))
    ));
}

#[test]
fn test_validate_grid_limit_is_inclusive() {
    let side = 2000.0;
    assert_eq!((side * side) as usize, MAX_GRID_CELLS);
    assert!(unit_box(side, side).validate().is_ok());
    assert!(unit_box(side + 1.0, side).validate().is_err());
}

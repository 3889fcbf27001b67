//! Common test fixtures for cloud-layers tests.
//!
//! This module provides pre-defined request boxes, dates and terrain files
//! that represent common scenarios in the pipeline.

/// Common bounding box definitions for testing.
pub mod bbox {
    use cloud_common::{BoundingBox, CloudLevel};

    /// Uri (CH) region at 0.005 degree resolution: 94 rows x 113 cols.
    pub fn uri() -> BoundingBox {
        BoundingBox::new(
            CloudLevel::Low,
            super::dates::VALID_REQUEST,
            46.993408,
            8.397377,
            46.527633,
            8.957877,
            0.005,
            0.005,
        )
    }

    /// A box at the origin with 1 degree cells: `rows` x `cols`.
    pub fn unit_grid(rows: usize, cols: usize) -> BoundingBox {
        BoundingBox::new(
            CloudLevel::Low,
            super::dates::VALID_REQUEST,
            rows as f64,
            0.0,
            0.0,
            cols as f64,
            1.0,
            1.0,
        )
    }
}

/// Common date inputs for testing.
pub mod dates {
    /// Inside the supported window.
    pub const VALID_INPUT: &str = "2025-03-01";

    /// Request timestamp for [`VALID_INPUT`].
    pub const VALID_REQUEST: &str = "2025-03-01T00:00:00Z";

    /// Before the supported window.
    pub const TOO_EARLY: &str = "2023-01-01";

    /// After the supported window.
    pub const TOO_LATE: &str = "2027-01-01";
}

/// Terrain model fixtures.
pub mod terrain {
    use std::io::Write;
    use std::path::PathBuf;

    /// A flat 1000 x 1000 quad whose top sits at y = 12.
    pub const FLAT_QUAD_OBJ: &str = "\
# flat terrain
o terrain
v -500.0 0.0 -500.0
v 500.0 0.0 -500.0
v 500.0 12.0 500.0
v -500.0 0.0 500.0
vn 0.0 1.0 0.0
vt 0.0 0.0
f 1 2 3 4
";

    /// Write OBJ contents into a temporary directory.
    ///
    /// The directory is returned so that it lives as long as the test needs
    /// the file.
    pub fn write_obj(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("terrain.obj");
        let mut file = std::fs::File::create(&path).expect("create obj file");
        file.write_all(contents.as_bytes()).expect("write obj file");
        (dir, path)
    }
}

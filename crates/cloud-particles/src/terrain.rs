//! Terrain model bounds.
//!
//! Only the vertex records of a Wavefront OBJ file are read; the renderer
//! owns the mesh itself.

use std::path::Path;

use cloud_common::{CloudError, CloudResult};
use serde::{Deserialize, Serialize};

/// World-space footprint of the terrain the cloud grid is projected onto.
///
/// `width` spans the X axis, `height` the Z axis (the model's ground plane).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelExtent {
    pub width: f64,
    pub height: f64,
}

impl ModelExtent {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned bounding volume of a terrain model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainBounds {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl TerrainBounds {
    /// Read the vertices of an OBJ file.
    pub fn from_obj_file(path: impl AsRef<Path>) -> CloudResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            CloudError::Terrain(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_obj_str(&text)
    }

    /// Compute bounds from OBJ text. Non-vertex records are ignored.
    pub fn from_obj_str(text: &str) -> CloudResult<Self> {
        let mut bounds: Option<TerrainBounds> = None;

        for (line_no, line) in text.lines().enumerate() {
            let mut fields = line.split_whitespace();
            if fields.next() != Some("v") {
                continue;
            }

            let mut vertex = [0.0; 3];
            for axis in vertex.iter_mut() {
                *axis = fields
                    .next()
                    .and_then(|f| f.parse::<f64>().ok())
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| {
                        CloudError::Terrain(format!("malformed vertex on line {}", line_no + 1))
                    })?;
            }

            bounds = Some(match bounds {
                None => TerrainBounds {
                    min: vertex,
                    max: vertex,
                },
                Some(mut b) => {
                    for i in 0..3 {
                        b.min[i] = b.min[i].min(vertex[i]);
                        b.max[i] = b.max[i].max(vertex[i]);
                    }
                    b
                }
            });
        }

        bounds.ok_or_else(|| CloudError::Terrain("model contains no vertices".to_string()))
    }

    /// Ground-plane extent: X span by Z span.
    pub fn extent(&self) -> ModelExtent {
        ModelExtent {
            width: self.max[0] - self.min[0],
            height: self.max[2] - self.min[2],
        }
    }

    /// Highest point of the model.
    pub fn top(&self) -> f64 {
        self.max[1]
    }
}

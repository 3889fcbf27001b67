//! JSON scene documents handed to an external renderer.

use std::path::Path;

use chrono::{DateTime, Utc};
use cloud_common::CloudResult;
use cloud_particles::{LayerSnapshot, Point3, TerrainBounds};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneTerrain {
    pub width: f64,
    pub height: f64,
    pub top: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneLayer {
    pub name: String,
    pub particle_count: usize,
    /// `[x, y, z]` triples.
    pub positions: Vec<Point3>,
}

/// The active layers at export time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDocument {
    pub generated_at: DateTime<Utc>,
    pub terrain: SceneTerrain,
    pub layers: Vec<SceneLayer>,
}

impl SceneDocument {
    pub fn from_snapshot(snapshot: &LayerSnapshot, terrain: &TerrainBounds) -> Self {
        let extent = terrain.extent();
        let layers = snapshot
            .layers
            .iter()
            .map(|(name, positions)| SceneLayer {
                name: name.clone(),
                particle_count: positions.len(),
                positions: positions.to_vec(),
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            terrain: SceneTerrain {
                width: extent.width,
                height: extent.height,
                top: terrain.top(),
            },
            layers,
        }
    }

    pub fn particle_count(&self) -> usize {
        self.layers.iter().map(|l| l.particle_count).sum()
    }

    pub fn write(&self, path: &Path) -> CloudResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn read(path: &Path) -> CloudResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

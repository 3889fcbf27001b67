//! Viewer configuration loading and types.

use std::path::Path;

use anyhow::{Context, Result};
use cloud_common::{BoundingBox, CloudLevel};
use cloud_particles::NoiseConfig;
use serde::{Deserialize, Serialize};

/// Placement of one altitude band above the terrain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BandPreset {
    pub level: CloudLevel,

    /// Added to the terrain top to get the height band.
    pub height_offset: f64,

    /// Base altitude of the band's particles.
    pub vertical_offset: f64,
}

impl BandPreset {
    pub const fn new(level: CloudLevel, height_offset: f64, vertical_offset: f64) -> Self {
        Self {
            level,
            height_offset,
            vertical_offset,
        }
    }

    /// Height band for a terrain whose highest vertex is `terrain_top`.
    pub fn height_band(&self, terrain_top: f64) -> f64 {
        terrain_top + self.height_offset
    }

    /// Presets used for documents fetched through the proxy.
    pub fn live_defaults() -> Vec<Self> {
        vec![
            Self::new(CloudLevel::Low, 10.0, 50.0),
            Self::new(CloudLevel::Medium, 30.0, 70.0),
            Self::new(CloudLevel::High, 50.0, 90.0),
        ]
    }

    /// Presets used for the bundled static documents.
    pub fn static_defaults() -> Vec<Self> {
        vec![
            Self::new(CloudLevel::Low, 10.0, 50.0),
            Self::new(CloudLevel::Medium, 10.0, 70.0),
            Self::new(CloudLevel::High, 10.0, 90.0),
        ]
    }
}

/// Viewer configuration, optionally loaded from a YAML file.
///
/// ```yaml
/// region:
///   level: low
///   unit: octas
///   date: "2025-03-01T00:00:00Z"
///   north: 46.993408
///   west: 8.397377
///   south: 46.527633
///   east: 8.957877
///   resolutionLat: 0.005
///   resolutionLon: 0.005
/// liveBands:
///   - { level: low, heightOffset: 10, verticalOffset: 50 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewerConfig {
    /// Region requested from the provider; level and date are set per request.
    pub region: BoundingBox,
    pub noise: NoiseConfig,
    pub live_bands: Vec<BandPreset>,
    pub static_bands: Vec<BandPreset>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            region: BoundingBox::default(),
            noise: NoiseConfig::default(),
            live_bands: BandPreset::live_defaults(),
            static_bands: BandPreset::static_defaults(),
        }
    }
}

impl ViewerConfig {
    /// Load configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read: {:?}", path))?;
        let config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse: {:?}", path))?;
        tracing::info!(
            live_bands = config.live_bands.len(),
            static_bands = config.static_bands.len(),
            "Loaded viewer config from {:?}",
            path
        );
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.region.validate().context("Invalid region")?;
        self.noise.validate().context("Invalid noise configuration")?;
        for preset in self.live_bands.iter().chain(&self.static_bands) {
            if !preset.height_offset.is_finite() || !preset.vertical_offset.is_finite() {
                anyhow::bail!("Band {} has non-finite offsets", preset.level);
            }
        }
        Ok(())
    }
}

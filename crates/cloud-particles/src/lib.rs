//! Cloud particle generation.
//!
//! Turns a normalized [`cloud_grid::CloudMatrix`] into world-space point
//! positions above a terrain model and keeps the resulting point-cloud layers
//! for the renderer.
//!
//! ```text
//! CloudMatrix ──► ParticleProjector (+ FbmNoise) ──► Vec<Point3>
//!                         ▲                              │
//!                  ModelExtent (terrain OBJ)             ▼
//!                                              SharedLayers / LayerManager
//!                                                        │
//!                                                        ▼
//!                                                 LayerRenderer
//! ```

pub mod fbm;
pub mod layers;
pub mod projector;
pub mod terrain;

pub use fbm::{FbmNoise, NoiseConfig, NoiseSampler, MAX_OCTAVES};
pub use layers::{
    Generation, LayerData, LayerManager, LayerRenderer, LayerSnapshot, MemoryRenderer,
    ParticleLayer, SharedLayers,
};
pub use projector::{ParticleProjector, Point3, NOISE_COORD_SCALE, OKTA_MAX};
pub use terrain::{ModelExtent, TerrainBounds};

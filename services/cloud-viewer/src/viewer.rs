//! Band loading and layer refresh.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use cloud_common::{BoundingBox, CloudError, CloudLevel, CloudResult, DateWindow};
use cloud_grid::CloudSource;
use cloud_particles::{
    FbmNoise, Generation, LayerData, LayerRenderer, LayerSnapshot, ModelExtent,
    ParticleProjector, SharedLayers, TerrainBounds,
};
use futures::future::join_all;
use tokio::task::JoinSet;
use tracing::{error, info, instrument, warn};

use crate::config::{BandPreset, ViewerConfig};
use crate::export::SceneDocument;
use crate::fetch::CloudFetcher;

/// Outcome of loading every band once.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshSummary {
    pub generation: Generation,
    /// Bands added to the scene, in arrival order.
    pub applied: Vec<CloudLevel>,
    /// Bands whose document could not be fetched or read.
    pub failed: Vec<CloudLevel>,
    /// Bands dropped because a newer refresh started first.
    pub stale: Vec<CloudLevel>,
}

impl RefreshSummary {
    fn new(generation: Generation) -> Self {
        Self {
            generation,
            applied: Vec::new(),
            failed: Vec::new(),
            stale: Vec::new(),
        }
    }

    fn record(&mut self, level: CloudLevel, outcome: BandOutcome) {
        match outcome {
            BandOutcome::Applied => self.applied.push(level),
            BandOutcome::Failed => self.failed.push(level),
            BandOutcome::Stale => self.stale.push(level),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BandOutcome {
    Applied,
    Failed,
    Stale,
}

/// Turns a band document into layer positions.
#[derive(Debug, Clone)]
struct LayerBuilder {
    projector: Arc<ParticleProjector<FbmNoise>>,
    extent: ModelExtent,
    terrain_top: f64,
}

impl LayerBuilder {
    fn build(&self, preset: BandPreset, source: CloudSource, bbox: &BoundingBox) -> LayerData {
        let matrix = source.into_matrix(bbox);
        let positions = self.projector.project(
            &matrix,
            self.extent,
            preset.height_band(self.terrain_top),
            preset.vertical_offset,
        );
        info!(
            level = %preset.level,
            rows = matrix.rows(),
            cols = matrix.cols(),
            particles = positions.len(),
            "Built cloud layer"
        );
        LayerData::new(preset.level.as_str(), positions)
    }
}

/// Headless viewer state: terrain, configuration and the active layers.
pub struct CloudViewer<R: LayerRenderer> {
    config: ViewerConfig,
    terrain: TerrainBounds,
    window: DateWindow,
    builder: LayerBuilder,
    layers: SharedLayers<R>,
}

impl<R> CloudViewer<R>
where
    R: LayerRenderer + Send + 'static,
    R::Handle: Send,
{
    pub fn new(config: ViewerConfig, terrain: TerrainBounds, renderer: R) -> CloudResult<Self> {
        let noise = FbmNoise::new(config.noise)?;
        let builder = LayerBuilder {
            projector: Arc::new(ParticleProjector::new(noise)),
            extent: terrain.extent(),
            terrain_top: terrain.top(),
        };
        Ok(Self {
            config,
            terrain,
            window: DateWindow::supported(),
            builder,
            layers: SharedLayers::new(renderer),
        })
    }

    pub fn layers(&self) -> &SharedLayers<R> {
        &self.layers
    }

    pub fn snapshot(&self) -> LayerSnapshot {
        self.layers.snapshot()
    }

    /// Load `low.json`, `medium.json` and `high.json` from `data_dir` and
    /// replace the scene with the bands that could be read.
    #[instrument(skip(self, data_dir), fields(data_dir = %data_dir.display()))]
    pub async fn load_static(&self, data_dir: &Path) -> RefreshSummary {
        let reads = self.config.static_bands.iter().map(|preset| {
            let path = data_dir.join(format!("{}.json", preset.level));
            async move {
                let text = tokio::fs::read_to_string(&path).await;
                (*preset, path, text)
            }
        });

        let mut layers = Vec::new();
        let mut outcomes = Vec::new();
        for (preset, path, text) in join_all(reads).await {
            match text
                .map_err(CloudError::from)
                .and_then(|text| CloudSource::from_json(&text))
            {
                Ok(source) => {
                    let bbox = self
                        .config
                        .region
                        .for_request(preset.level, self.config.region.date.clone());
                    layers.push(self.builder.build(preset, source, &bbox));
                    outcomes.push((preset.level, BandOutcome::Applied));
                }
                Err(e) => {
                    error!(path = %path.display(), error = %e, "Error loading cloud data");
                    outcomes.push((preset.level, BandOutcome::Failed));
                }
            }
        }

        self.layers.replace_all(layers);
        let mut summary = RefreshSummary::new(self.layers.current_generation());
        for (level, outcome) in outcomes {
            summary.record(level, outcome);
        }
        info!(
            applied = summary.applied.len(),
            failed = summary.failed.len(),
            "Loaded static cloud layers"
        );
        summary
    }

    /// Validate the date input, then fetch every live band concurrently.
    ///
    /// An invalid date is rejected before any request is made and leaves the
    /// scene untouched. Otherwise the scene is cleared and each band is added
    /// as its response arrives. Bands that arrive after a newer refresh has
    /// started are dropped.
    #[instrument(skip(self, fetcher))]
    pub async fn refresh(
        &self,
        input: &str,
        fetcher: Arc<dyn CloudFetcher>,
    ) -> CloudResult<RefreshSummary> {
        let date = self.window.validate(input).map_err(|e| {
            warn!(input = %input, "Rejected date input");
            e
        })?;

        let generation = self.layers.begin_refresh();
        let mut tasks = JoinSet::new();

        for preset in self.config.live_bands.iter().copied() {
            let bbox = self.config.region.for_request(preset.level, date.clone());
            let fetcher = Arc::clone(&fetcher);
            let builder = self.builder.clone();
            let layers = self.layers.clone();

            tasks.spawn(async move {
                let outcome = match fetcher.fetch(&bbox).await {
                    Ok(payload) => {
                        let layer = builder.build(preset, CloudSource::from_value(payload), &bbox);
                        match layers.apply(generation, layer) {
                            Some(_) => BandOutcome::Applied,
                            None => BandOutcome::Stale,
                        }
                    }
                    Err(e) => {
                        error!(level = %preset.level, error = %e, "Error fetching cloud data");
                        BandOutcome::Failed
                    }
                };
                (preset.level, outcome)
            });
        }

        let mut summary = RefreshSummary::new(generation);
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((level, outcome)) => summary.record(level, outcome),
                Err(e) => error!(error = %e, "Band refresh task failed"),
            }
        }

        info!(
            generation = %generation,
            applied = summary.applied.len(),
            failed = summary.failed.len(),
            stale = summary.stale.len(),
            "Finished layer refresh"
        );
        Ok(summary)
    }

    /// Write the active scene as a JSON point-cloud document.
    pub fn export_scene(&self, path: impl Into<PathBuf>) -> CloudResult<SceneDocument> {
        let path = path.into();
        let document = SceneDocument::from_snapshot(&self.snapshot(), &self.terrain);
        document.write(&path)?;
        info!(
            path = %path.display(),
            layers = document.layers.len(),
            "Exported scene"
        );
        Ok(document)
    }
}

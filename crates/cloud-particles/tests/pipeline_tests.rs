//! End-to-end tests: payload → matrix → particles → layers.

use cloud_grid::{CloudMatrix, GridNormalizer};
use cloud_particles::{
    FbmNoise, LayerData, LayerManager, MemoryRenderer, ModelExtent, NoiseConfig, NoiseSampler,
    ParticleProjector, SharedLayers, TerrainBounds,
};
use test_utils::{assert_approx_eq, bbox, okta_ramp_rows, terrain, uniform_rows, PayloadBuilder};

struct FlatNoise;

impl NoiseSampler for FlatNoise {
    fn sample(&self, _x: f64, _y: f64) -> f64 {
        0.0
    }
}

fn default_projector() -> ParticleProjector<FbmNoise> {
    ParticleProjector::new(FbmNoise::new(NoiseConfig::default()).unwrap())
}

// ============================================================================
// Projection
// ============================================================================

#[test]
fn test_uri_single_overcast_cell() {
    let b = bbox::uri();
    let payload = PayloadBuilder::new()
        .observation(b.south, b.west, &[8.0])
        .build();
    let matrix = GridNormalizer::new(&b).normalize(&payload);
    assert_eq!((matrix.rows(), matrix.cols()), (94, 113));

    let points = default_projector().project(&matrix, ModelExtent::new(1000.0, 1000.0), 10.0, 50.0);

    assert_eq!(points.len(), 1);
    let p = points[0];
    assert_approx_eq!(p.y, 58.0, 1e-6);
    assert_approx_eq!(p.x, -500.0 + (1000.0 / 113.0) / 2.0, 1e-3);
    assert_approx_eq!(p.z, -500.0 + (1000.0 / 94.0) / 2.0, 1e-3);
}

#[test]
fn test_non_positive_and_absent_cells_emit_nothing() {
    let matrix = CloudMatrix::from_rows(vec![
        vec![Some(0.0), Some(-1.0), None],
        vec![None, Some(f64::NAN), Some(0.0)],
    ]);
    let points = default_projector().project(&matrix, ModelExtent::new(100.0, 100.0), 10.0, 0.0);
    assert!(points.is_empty());
}

#[test]
fn test_one_particle_per_cloudy_cell() {
    let matrix = CloudMatrix::from_rows(okta_ramp_rows(6, 9));
    let cloudy = matrix.iter_present().filter(|&(_, _, v)| v > 0.0).count();
    let points = default_projector().project(&matrix, ModelExtent::new(90.0, 60.0), 10.0, 20.0);
    assert_eq!(points.len(), cloudy);
    assert!(points.iter().all(|p| p.y > 20.0 && p.y <= 28.0));
}

#[test]
fn test_uniform_grid_is_centered() {
    let matrix = CloudMatrix::from_rows(uniform_rows(5, 7, 4.0));
    let extent = ModelExtent::new(700.0, 500.0);

    let points = ParticleProjector::new(FlatNoise).project(&matrix, extent, 10.0, 0.0);
    assert_eq!(points.len(), 35);
    let n = points.len() as f64;
    let mean_x: f64 = points.iter().map(|p| p.x as f64).sum::<f64>() / n;
    let mean_z: f64 = points.iter().map(|p| p.z as f64).sum::<f64>() / n;
    assert_approx_eq!(mean_x, 0.0, 1e-3);
    assert_approx_eq!(mean_z, 0.0, 1e-3);

    // Cells sit edge to edge: outermost centres half a cell from the border.
    let min_x = points.iter().map(|p| p.x).fold(f32::MAX, f32::min);
    let max_z = points.iter().map(|p| p.z).fold(f32::MIN, f32::max);
    assert_approx_eq!(min_x, -300.0, 1e-3);
    assert_approx_eq!(max_z, 200.0, 1e-3);

    // Noise only displaces z, so x stays symmetric with the real sampler too.
    let noisy = default_projector().project(&matrix, extent, 10.0, 0.0);
    let noisy_mean_x: f64 = noisy.iter().map(|p| p.x as f64).sum::<f64>() / n;
    assert_approx_eq!(noisy_mean_x, 0.0, 1e-3);
}

#[test]
fn test_readings_above_okta_max_not_clamped() {
    let matrix = CloudMatrix::from_rows(vec![vec![Some(12.0)]]);
    let points = ParticleProjector::new(FlatNoise).project(&matrix, ModelExtent::new(10.0, 10.0), 10.0, 50.0);
    assert_eq!(points.len(), 1);
    assert_approx_eq!(points[0].y, 62.0, 1e-6);
}

#[test]
fn test_projection_is_reproducible() {
    let matrix = CloudMatrix::from_rows(okta_ramp_rows(8, 8));
    let extent = ModelExtent::new(400.0, 400.0);
    let a = default_projector().project(&matrix, extent, 30.0, 70.0);
    let b = default_projector().project(&matrix, extent, 30.0, 70.0);
    assert_eq!(a, b);
}

#[test]
fn test_projector_does_not_mutate_matrix() {
    let matrix = CloudMatrix::from_rows(okta_ramp_rows(3, 3));
    let before = matrix.clone();
    default_projector().project(&matrix, ModelExtent::new(30.0, 30.0), 5.0, 5.0);
    assert_eq!(matrix, before);
}

#[test]
fn test_all_absent_matrix_yields_empty_layer() {
    let b = bbox::unit_grid(4, 4);
    let matrix = GridNormalizer::new(&b).normalize(&serde_json::json!({}));
    let points = default_projector().project(&matrix, ModelExtent::new(10.0, 10.0), 1.0, 1.0);
    assert!(points.is_empty());

    let mut manager = LayerManager::new(MemoryRenderer::new());
    manager.add_layer(LayerData::new("low", points));
    assert_eq!(manager.len(), 1);
}

// ============================================================================
// Terrain
// ============================================================================

#[test]
fn test_extent_from_obj_file() {
    let (_dir, path) = terrain::write_obj(terrain::FLAT_QUAD_OBJ);
    let bounds = TerrainBounds::from_obj_file(&path).unwrap();
    assert_eq!(bounds.extent(), ModelExtent::new(1000.0, 1000.0));
    assert_eq!(bounds.top(), 12.0);
}

#[test]
fn test_missing_obj_file() {
    assert!(TerrainBounds::from_obj_file("/nonexistent/terrain.obj").is_err());
}

// ============================================================================
// Layers
// ============================================================================

#[test]
fn test_replace_all_releases_previous_exactly_once() {
    let mut manager = LayerManager::new(MemoryRenderer::new());
    let old: Vec<u64> = manager.replace_all(vec![
        LayerData::new("low", Vec::new()),
        LayerData::new("medium", Vec::new()),
    ]);

    let new = manager.replace_all(vec![
        LayerData::new("low", Vec::new()),
        LayerData::new("medium", Vec::new()),
        LayerData::new("high", Vec::new()),
    ]);

    let names: Vec<&str> = manager.layers().iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["low", "medium", "high"]);
    for handle in &old {
        assert_eq!(manager.renderer().release_count(*handle), 1);
    }
    assert_eq!(manager.renderer().live_handles(), new);

    manager.clear_all();
    for handle in old.iter().chain(new.iter()) {
        assert_eq!(manager.renderer().release_count(*handle), 1);
    }
}

#[test]
fn test_concurrent_apply_sees_whole_layers() {
    let shared = SharedLayers::new(MemoryRenderer::new());
    let generation = shared.begin_refresh();

    let handles: Vec<_> = ["low", "medium", "high"]
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let shared = shared.clone();
            std::thread::spawn(move || {
                let points = vec![cloud_particles::Point3::new(0.0, 0.0, 0.0); (i + 1) * 10];
                shared.apply(generation, LayerData::new(name, points))
            })
        })
        .collect();

    for h in handles {
        assert!(h.join().unwrap().is_some());
    }

    let snapshot = shared.snapshot();
    let mut names = snapshot.names();
    names.sort();
    assert_eq!(names, vec!["high", "low", "medium"]);
    assert_eq!(snapshot.particle_count(), 60);
}

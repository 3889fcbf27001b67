//! Active particle layers and their render resources.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info};

use crate::Point3;

/// Backend that owns the GPU-side (or otherwise external) resources of a layer.
pub trait LayerRenderer {
    type Handle: Clone + fmt::Debug + PartialEq;

    /// Create the resources backing a point-cloud layer.
    fn upload(&mut self, name: &str, positions: &[Point3]) -> Self::Handle;

    /// Release the resources behind a handle. Called exactly once per handle.
    fn release(&mut self, handle: Self::Handle);
}

/// Positions for a layer that has not been added yet.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerData {
    pub name: String,
    pub positions: Vec<Point3>,
}

impl LayerData {
    pub fn new(name: impl Into<String>, positions: Vec<Point3>) -> Self {
        Self {
            name: name.into(),
            positions,
        }
    }
}

/// A displayed point-cloud layer.
#[derive(Debug, Clone)]
pub struct ParticleLayer<H> {
    pub name: String,
    pub positions: Arc<[Point3]>,
    pub handle: H,
}

/// Immutable view of the active layers at one instant.
#[derive(Debug, Clone, Default)]
pub struct LayerSnapshot {
    pub layers: Vec<(String, Arc<[Point3]>)>,
}

impl LayerSnapshot {
    pub fn names(&self) -> Vec<&str> {
        self.layers.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn particle_count(&self) -> usize {
        self.layers.iter().map(|(_, points)| points.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// Owns the set of active layers.
pub struct LayerManager<R: LayerRenderer> {
    renderer: R,
    layers: Vec<ParticleLayer<R::Handle>>,
}

impl<R: LayerRenderer> LayerManager<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            layers: Vec::new(),
        }
    }

    /// Add a layer. Empty position lists still produce a (no-op) layer.
    pub fn add_layer(&mut self, layer: LayerData) -> R::Handle {
        let handle = self.renderer.upload(&layer.name, &layer.positions);
        debug!(
            layer = %layer.name,
            particles = layer.positions.len(),
            handle = ?handle,
            "Added particle layer"
        );
        self.layers.push(ParticleLayer {
            name: layer.name,
            positions: layer.positions.into(),
            handle: handle.clone(),
        });
        handle
    }

    /// Release every layer and empty the set. Returns how many were released.
    pub fn clear_all(&mut self) -> usize {
        let count = self.layers.len();
        for layer in self.layers.drain(..) {
            self.renderer.release(layer.handle);
        }
        if count > 0 {
            debug!(released = count, "Cleared particle layers");
        }
        count
    }

    /// Clear all layers, then add each new one in order.
    pub fn replace_all(&mut self, layers: Vec<LayerData>) -> Vec<R::Handle> {
        self.clear_all();
        layers.into_iter().map(|l| self.add_layer(l)).collect()
    }

    pub fn layers(&self) -> &[ParticleLayer<R::Handle>] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn snapshot(&self) -> LayerSnapshot {
        LayerSnapshot {
            layers: self
                .layers
                .iter()
                .map(|l| (l.name.clone(), Arc::clone(&l.positions)))
                .collect(),
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}

impl<R: LayerRenderer> Drop for LayerManager<R> {
    fn drop(&mut self) {
        self.clear_all();
    }
}

/// Refresh counter value handed to band tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(pub u64);

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct SharedState<R: LayerRenderer> {
    manager: LayerManager<R>,
    generation: Generation,
}

/// Thread-safe layer set with stale-refresh protection.
///
/// Every mutation and snapshot holds the same lock, so a reader sees either
/// the set before or after an operation, never a partial one. Results of a
/// refresh are only applied while its generation is still current.
pub struct SharedLayers<R: LayerRenderer> {
    inner: Arc<Mutex<SharedState<R>>>,
}

impl<R: LayerRenderer> Clone for SharedLayers<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: LayerRenderer> SharedLayers<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SharedState {
                manager: LayerManager::new(renderer),
                generation: Generation(0),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SharedState<R>> {
        // A panic while holding the lock leaves the layer list consistent.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Start a refresh: clear the scene and invalidate older generations.
    pub fn begin_refresh(&self) -> Generation {
        let mut state = self.lock();
        state.generation = Generation(state.generation.0 + 1);
        state.manager.clear_all();
        info!(generation = %state.generation, "Started layer refresh");
        state.generation
    }

    /// Add a layer produced by the refresh `generation`.
    ///
    /// Returns `None` and drops the layer when a newer refresh has started.
    pub fn apply(&self, generation: Generation, layer: LayerData) -> Option<R::Handle> {
        let mut state = self.lock();
        if generation != state.generation {
            info!(
                layer = %layer.name,
                generation = %generation,
                current = %state.generation,
                "Dropping stale layer"
            );
            return None;
        }
        Some(state.manager.add_layer(layer))
    }

    /// Atomically replace the whole set; also invalidates in-flight refreshes.
    pub fn replace_all(&self, layers: Vec<LayerData>) -> Vec<R::Handle> {
        let mut state = self.lock();
        state.generation = Generation(state.generation.0 + 1);
        state.manager.replace_all(layers)
    }

    pub fn clear_all(&self) -> usize {
        self.lock().manager.clear_all()
    }

    pub fn current_generation(&self) -> Generation {
        self.lock().generation
    }

    pub fn snapshot(&self) -> LayerSnapshot {
        self.lock().manager.snapshot()
    }

    /// Run a closure against the manager while holding the lock.
    pub fn with_manager<T>(&self, f: impl FnOnce(&LayerManager<R>) -> T) -> T {
        f(&self.lock().manager)
    }
}

/// In-process renderer that only tracks resource lifetimes.
#[derive(Debug, Default)]
pub struct MemoryRenderer {
    next_id: u64,
    live: BTreeMap<u64, (String, usize)>,
    released: Vec<u64>,
}

impl MemoryRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles whose resources are still allocated.
    pub fn live_handles(&self) -> Vec<u64> {
        self.live.keys().copied().collect()
    }

    /// Every released handle, in release order.
    pub fn released(&self) -> &[u64] {
        &self.released
    }

    /// Number of times `handle` was released.
    pub fn release_count(&self, handle: u64) -> usize {
        self.released.iter().filter(|&&h| h == handle).count()
    }

    /// Total particles held by live layers.
    pub fn live_particles(&self) -> usize {
        self.live.values().map(|(_, n)| n).sum()
    }
}

impl LayerRenderer for MemoryRenderer {
    type Handle = u64;

    fn upload(&mut self, name: &str, positions: &[Point3]) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.live.insert(id, (name.to_string(), positions.len()));
        id
    }

    fn release(&mut self, handle: u64) {
        self.live.remove(&handle);
        self.released.push(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(name: &str, n: usize) -> LayerData {
        LayerData::new(name, vec![Point3::new(0.0, 1.0, 0.0); n])
    }

    #[test]
    fn test_add_and_clear() {
        let mut manager = LayerManager::new(MemoryRenderer::new());
        let a = manager.add_layer(layer("low", 3));
        let b = manager.add_layer(layer("high", 2));
        assert_eq!(manager.len(), 2);
        assert_eq!(manager.renderer().live_particles(), 5);

        assert_eq!(manager.clear_all(), 2);
        assert!(manager.is_empty());
        assert_eq!(manager.renderer().released(), &[a, b]);
    }

    #[test]
    fn test_empty_layer_is_added() {
        let mut manager = LayerManager::new(MemoryRenderer::new());
        manager.add_layer(layer("medium", 0));
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.snapshot().particle_count(), 0);
    }

    #[test]
    fn test_snapshot_survives_clear() {
        let mut manager = LayerManager::new(MemoryRenderer::new());
        manager.add_layer(layer("low", 4));
        let snapshot = manager.snapshot();
        manager.clear_all();
        assert_eq!(snapshot.names(), vec!["low"]);
        assert_eq!(snapshot.particle_count(), 4);
    }

    #[test]
    fn test_stale_generation_dropped() {
        let shared = SharedLayers::new(MemoryRenderer::new());
        let first = shared.begin_refresh();
        let second = shared.begin_refresh();
        assert!(shared.apply(first, layer("low", 1)).is_none());
        assert!(shared.apply(second, layer("low", 2)).is_some());
        assert_eq!(shared.snapshot().particle_count(), 2);
    }

    #[test]
    fn test_replace_all_invalidates_refresh() {
        let shared = SharedLayers::new(MemoryRenderer::new());
        let generation = shared.begin_refresh();
        shared.replace_all(vec![layer("static", 1)]);
        assert!(shared.apply(generation, layer("late", 1)).is_none());
        assert_eq!(shared.snapshot().names(), vec!["static"]);
    }
}

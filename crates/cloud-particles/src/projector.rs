//! Cloud matrix → world-space particle positions.

use cloud_grid::CloudMatrix;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ModelExtent, NoiseSampler};

/// Maximum of the okta scale; readings are divided by this to get intensity.
pub const OKTA_MAX: f64 = 8.0;

/// Grid index → noise input scale.
pub const NOISE_COORD_SCALE: f64 = 0.1;

/// A particle position, serialized as `[x, y, z]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl From<[f32; 3]> for Point3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Point3> for [f32; 3] {
    fn from(p: Point3) -> Self {
        [p.x, p.y, p.z]
    }
}

/// Places one particle per cloudy grid cell above the terrain.
///
/// Cells are laid out edge to edge across the model's ground plane and
/// centred on its origin: columns along X (west → east), rows along Z
/// (south → north). A particle's height is `vertical_offset + reading`, and
/// its Z position is displaced by noise scaled with the cell's intensity.
#[derive(Debug, Clone)]
pub struct ParticleProjector<N> {
    noise: N,
}

impl<N: NoiseSampler> ParticleProjector<N> {
    pub fn new(noise: N) -> Self {
        Self { noise }
    }

    pub fn noise(&self) -> &N {
        &self.noise
    }

    /// Project every present, strictly positive cell.
    ///
    /// `height_band` scales the noise displacement of a fully overcast cell.
    pub fn project(
        &self,
        matrix: &CloudMatrix,
        extent: ModelExtent,
        height_band: f64,
        vertical_offset: f64,
    ) -> Vec<Point3> {
        if matrix.is_empty() {
            return Vec::new();
        }

        let x_axis = Axis::new(matrix.cols(), extent.width);
        let z_axis = Axis::new(matrix.rows(), extent.height);

        let particles: Vec<Point3> = matrix
            .iter_present()
            .filter(|&(_, _, reading)| reading > 0.0)
            .map(|(row, col, reading)| {
                // Readings above the okta maximum are not clamped.
                let intensity = reading / OKTA_MAX;
                let height_offset = intensity * height_band;
                let noise_value = self
                    .noise
                    .sample(col as f64 * NOISE_COORD_SCALE, row as f64 * NOISE_COORD_SCALE);

                Point3::new(
                    x_axis.position(col) as f32,
                    (vertical_offset + reading) as f32,
                    (z_axis.position(row) + height_offset * noise_value) as f32,
                )
            })
            .collect();

        debug!(
            rows = matrix.rows(),
            cols = matrix.cols(),
            particles = particles.len(),
            "Projected cloud particles"
        );

        particles
    }
}

/// Linear placement of `cells` cell centres across a span centred on 0.
#[derive(Debug, Clone, Copy)]
struct Axis {
    last_index: f64,
    first: f64,
    last: f64,
}

impl Axis {
    fn new(cells: usize, span: f64) -> Self {
        let cell = span / cells as f64;
        Self {
            last_index: cells.saturating_sub(1) as f64,
            first: -span / 2.0 + cell / 2.0,
            last: span / 2.0 - cell / 2.0,
        }
    }

    fn position(&self, index: usize) -> f64 {
        // A single cell has an empty source range; it sits at the centre.
        if self.last_index == 0.0 {
            return 0.0;
        }
        map_linear(index as f64, 0.0, self.last_index, self.first, self.last)
    }
}

/// Remap `x` from `[a1, a2]` to `[b1, b2]`.
fn map_linear(x: f64, a1: f64, a2: f64, b1: f64, b2: f64) -> f64 {
    b1 + (x - a1) * (b2 - b1) / (a2 - a1)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ZeroNoise;

    impl NoiseSampler for ZeroNoise {
        fn sample(&self, _x: f64, _y: f64) -> f64 {
            0.0
        }
    }

    struct ConstNoise(f64);

    impl NoiseSampler for ConstNoise {
        fn sample(&self, _x: f64, _y: f64) -> f64 {
            self.0
        }
    }

    #[test]
    fn test_map_linear() {
        assert_eq!(map_linear(5.0, 0.0, 10.0, -1.0, 1.0), 0.0);
        assert_eq!(map_linear(0.0, 0.0, 10.0, -1.0, 1.0), -1.0);
        assert_eq!(map_linear(10.0, 0.0, 10.0, -1.0, 1.0), 1.0);
    }

    #[test]
    fn test_axis_edge_to_edge() {
        let axis = Axis::new(4, 100.0);
        assert_eq!(axis.position(0), -37.5);
        assert_eq!(axis.position(3), 37.5);
        assert_eq!(axis.position(1), -12.5);
    }

    #[test]
    fn test_single_cell_centered() {
        let mut matrix = CloudMatrix::new(1, 1);
        matrix.set(0, 0, Some(4.0));
        let points =
            ParticleProjector::new(ZeroNoise).project(&matrix, ModelExtent::new(10.0, 10.0), 5.0, 1.0);
        assert_eq!(points, vec![Point3::new(0.0, 5.0, 0.0)]);
    }

    #[test]
    fn test_zero_dimensions() {
        let projector = ParticleProjector::new(ZeroNoise);
        let extent = ModelExtent::new(10.0, 10.0);
        assert!(projector.project(&CloudMatrix::new(0, 5), extent, 1.0, 0.0).is_empty());
        assert!(projector.project(&CloudMatrix::new(5, 0), extent, 1.0, 0.0).is_empty());
    }

    #[test]
    fn test_displacement_scales_with_intensity() {
        let mut matrix = CloudMatrix::new(1, 1);
        matrix.set(0, 0, Some(4.0));
        let points = ParticleProjector::new(ConstNoise(0.5)).project(
            &matrix,
            ModelExtent::new(10.0, 10.0),
            20.0,
            0.0,
        );
        // intensity 0.5 * band 20 * noise 0.5
        assert_eq!(points[0].z, 5.0);
    }

    #[test]
    fn test_point_serializes_as_array() {
        let json = serde_json::to_string(&Point3::new(1.0, 2.5, -3.0)).unwrap();
        assert_eq!(json, "[1.0,2.5,-3.0]");
        let back: Point3 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Point3::new(1.0, 2.5, -3.0));
    }
}

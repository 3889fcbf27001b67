//! Deterministic fractal noise used to displace particles.

use cloud_common::{CloudError, CloudResult};
use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

/// A deterministic scalar field over 2D input, roughly in `[-1, 1]`.
pub trait NoiseSampler {
    fn sample(&self, x: f64, y: f64) -> f64;
}

/// Most octaves a noise field may sum.
pub const MAX_OCTAVES: u32 = 16;

/// Parameters of the fractal Brownian motion field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    pub seed: u32,
    /// Input frequency multiplier applied before the first octave.
    pub scale: f64,
    /// Amplitude falloff per octave.
    pub persistence: f64,
    /// Frequency growth per octave.
    pub lacunarity: f64,
    pub octaves: u32,
    /// Exponent applied to the normalized sum (sign preserved).
    pub redistribution: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            scale: 0.1,
            persistence: 0.5,
            lacunarity: 2.0,
            octaves: 6,
            redistribution: 1.0,
        }
    }
}

impl NoiseConfig {
    pub fn validate(&self) -> CloudResult<()> {
        if self.octaves == 0 || self.octaves > MAX_OCTAVES {
            return Err(CloudError::InvalidConfig(format!(
                "noise octaves must be between 1 and {}, got {}",
                MAX_OCTAVES, self.octaves
            )));
        }
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.scale) || !positive(self.lacunarity) || !positive(self.redistribution)
        {
            return Err(CloudError::InvalidConfig(
                "noise scale, lacunarity and redistribution must be positive".to_string(),
            ));
        }
        if !(positive(self.persistence) && self.persistence <= 1.0) {
            return Err(CloudError::InvalidConfig(format!(
                "noise persistence must be in (0, 1], got {}",
                self.persistence
            )));
        }
        Ok(())
    }
}

/// Fractal Brownian motion over Perlin gradient noise.
///
/// Octaves are summed with geometrically decreasing amplitude and
/// normalized by the total amplitude, so the output stays within the range
/// of a single Perlin octave.
#[derive(Debug, Clone)]
pub struct FbmNoise {
    config: NoiseConfig,
    perlin: Perlin,
    amplitude_sum: f64,
}

impl FbmNoise {
    pub fn new(config: NoiseConfig) -> CloudResult<Self> {
        config.validate()?;
        let amplitude_sum = (0..config.octaves)
            .map(|i| config.persistence.powi(i as i32))
            .sum();
        Ok(Self {
            config,
            perlin: Perlin::new(config.seed),
            amplitude_sum,
        })
    }

    pub fn config(&self) -> &NoiseConfig {
        &self.config
    }
}

impl NoiseSampler for FbmNoise {
    fn sample(&self, x: f64, y: f64) -> f64 {
        let (px, py) = (x * self.config.scale, y * self.config.scale);
        let mut frequency = 1.0;
        let mut amplitude = 1.0;
        let mut sum = 0.0;

        for _ in 0..self.config.octaves {
            sum += amplitude * self.perlin.get([px * frequency, py * frequency]);
            frequency *= self.config.lacunarity;
            amplitude *= self.config.persistence;
        }

        let normalized = sum / self.amplitude_sum;
        if self.config.redistribution == 1.0 {
            normalized
        } else {
            normalized.signum() * normalized.abs().powf(self.config.redistribution)
        }
    }
}

impl<N: NoiseSampler + ?Sized> NoiseSampler for &N {
    fn sample(&self, x: f64, y: f64) -> f64 {
        (**self).sample(x, y)
    }
}

//! Procedural terrain from multi-octave fractal Brownian motion (fBm).
//!
//! Composites octaves of simplex noise into a height field with features at
//! many spatial frequencies. Used by the demo and by tests that want
//! non-trivial relief without loading a raster.

use causeway_math::Rect;
use glam::Vec2;
use noise::{NoiseFn, Simplex};
use serde::{Deserialize, Serialize};

use crate::HeightQuery;

/// Configuration for the fBm noise terrain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseTerrainParams {
    /// Seed for deterministic generation.
    pub seed: u32,
    /// Number of noise octaves to composite.
    pub octaves: u32,
    /// Frequency multiplier between successive octaves.
    pub lacunarity: f64,
    /// Amplitude multiplier between successive octaves.
    pub persistence: f64,
    /// Frequency of the first octave, in cycles per metre.
    pub base_frequency: f64,
    /// Amplitude of the first octave, in metres.
    pub amplitude: f64,
    /// Altitude the noise is centred on.
    pub base_altitude: f64,
}

impl Default for NoiseTerrainParams {
    fn default() -> Self {
        Self {
            seed: 0,
            octaves: 5,
            lacunarity: 2.0,
            persistence: 0.5,
            base_frequency: 0.002,
            amplitude: 40.0,
            base_altitude: 100.0,
        }
    }
}

/// fBm height field, optionally limited to a planar rectangle.
pub struct NoiseTerrain {
    noise: Simplex,
    params: NoiseTerrainParams,
    bounds: Option<Rect>,
}

impl NoiseTerrain {
    pub fn new(params: NoiseTerrainParams) -> Self {
        let noise = Simplex::new(params.seed);
        Self {
            noise,
            params,
            bounds: None,
        }
    }

    /// Restrict answers to `bounds`; queries outside return `None`.
    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Sample the height at a planar coordinate, ignoring bounds.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let mut total = 0.0;
        let mut frequency = self.params.base_frequency;
        let mut amplitude = self.params.amplitude;

        for _ in 0..self.params.octaves {
            total += self.noise.get([x * frequency, y * frequency]) * amplitude;
            frequency *= self.params.lacunarity;
            amplitude *= self.params.persistence;
        }

        self.params.base_altitude + total
    }

    /// Largest possible deviation from the base altitude (geometric series sum).
    pub fn max_amplitude(&self) -> f64 {
        let mut sum = 0.0;
        let mut amp = self.params.amplitude;
        for _ in 0..self.params.octaves {
            sum += amp;
            amp *= self.params.persistence;
        }
        sum
    }

    pub fn params(&self) -> &NoiseTerrainParams {
        &self.params
    }
}

impl HeightQuery for NoiseTerrain {
    fn find_altitude(&self, p: Vec2) -> Option<f32> {
        if self.bounds.is_some_and(|b| !b.contains(p)) {
            return None;
        }
        Some(self.sample(f64::from(p.x), f64::from(p.y)) as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_determinism_same_seed_same_coord() {
        let params = NoiseTerrainParams {
            seed: 42,
            ..Default::default()
        };
        let a = NoiseTerrain::new(params.clone());
        let b = NoiseTerrain::new(params);
        let h1 = a.sample(100.0, 200.0);
        let h2 = b.sample(100.0, 200.0);
        assert!(
            (h1 - h2).abs() < EPSILON,
            "Same seed + same coord must produce identical height: {h1} vs {h2}"
        );
    }

    #[test]
    fn test_different_seeds_produce_different_heights() {
        let a = NoiseTerrain::new(NoiseTerrainParams {
            seed: 1,
            ..Default::default()
        });
        let b = NoiseTerrain::new(NoiseTerrainParams {
            seed: 999,
            ..Default::default()
        });
        let h1 = a.sample(500.0, 700.0);
        let h2 = b.sample(500.0, 700.0);
        assert!(
            (h1 - h2).abs() > EPSILON,
            "Different seeds should produce different heights: {h1} vs {h2}"
        );
    }

    #[test]
    fn test_height_within_expected_range() {
        let terrain = NoiseTerrain::new(NoiseTerrainParams::default());
        let max_amp = terrain.max_amplitude();
        let base = terrain.params().base_altitude;
        for x in (0..50).map(|i| i as f64 * 37.0) {
            for y in (0..50).map(|i| i as f64 * 37.0) {
                let h = terrain.sample(x, y);
                assert!(
                    (h - base).abs() <= max_amp + EPSILON,
                    "Height {h} strays more than {max_amp} from {base} at ({x}, {y})"
                );
            }
        }
    }

    #[test]
    fn test_smooth_gradient_no_discontinuities() {
        let terrain = NoiseTerrain::new(NoiseTerrainParams {
            seed: 42,
            ..Default::default()
        });
        let step = 0.05;
        let max_allowed_delta = terrain.max_amplitude() * 0.1;
        for i in 0..5_000 {
            let x = i as f64 * step;
            let delta = (terrain.sample(x + step, 0.0) - terrain.sample(x, 0.0)).abs();
            assert!(
                delta < max_allowed_delta,
                "Discontinuity at x={x}: delta={delta} exceeds max={max_allowed_delta}"
            );
        }
    }

    #[test]
    fn test_zero_amplitude_is_flat() {
        let terrain = NoiseTerrain::new(NoiseTerrainParams {
            amplitude: 0.0,
            base_altitude: 12.0,
            ..Default::default()
        });
        assert_eq!(terrain.find_altitude(Vec2::new(123.0, 456.0)), Some(12.0));
    }

    #[test]
    fn test_params_partial_deserialize() {
        let params: NoiseTerrainParams =
            serde_json::from_str(r#"{"seed": 9, "octaves": 2}"#).unwrap();
        assert_eq!(params.seed, 9);
        assert_eq!(params.octaves, 2);
        assert_eq!(params.lacunarity, 2.0, "missing fields fall back to defaults");
    }

    #[test]
    fn test_bounds_limit_answers() {
        let terrain = NoiseTerrain::new(NoiseTerrainParams::default())
            .with_bounds(Rect::new(Vec2::ZERO, Vec2::splat(100.0)));
        assert!(terrain.find_altitude(Vec2::new(50.0, 50.0)).is_some());
        assert!(terrain.find_altitude(Vec2::new(150.0, 50.0)).is_none());
    }
}

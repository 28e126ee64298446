//! Per-column surface height and middle-layer thickness.
//!
//! Both channels are pure functions of `(seed, params, x)`, so columns can be
//! evaluated in any order (or in parallel) with identical results.

use rayon::prelude::*;

use crate::profile::ColumnProfile;
use crate::strategy::PerlinStrategy;

/// Seed offset of the middle-thickness channel, keeping it decorrelated
/// from the surface channel.
pub const MIDDLE_CHANNEL_SEED_OFFSET: u32 = 100;

/// Noise parameters for the two heightmap channels.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightmapParams {
    /// Surface height around which the noise oscillates.
    pub base_height: i32,
    /// Maximum deviation from `base_height`, in cells.
    pub height_variation: i32,
    /// Column-to-noise frequency for the surface channel.
    pub surface_noise_scale: f64,
    /// Column-to-noise frequency for the middle-thickness channel.
    pub middle_noise_scale: f64,
    pub min_middle_thickness: i32,
    pub max_middle_thickness: i32,
}

impl Default for HeightmapParams {
    fn default() -> Self {
        Self {
            base_height: 0,
            height_variation: 6,
            surface_noise_scale: 0.05,
            middle_noise_scale: 0.1,
            min_middle_thickness: 2,
            max_middle_thickness: 5,
        }
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Computes column heights for one seed and parameter set.
pub struct HeightmapGenerator {
    params: HeightmapParams,
    surface: PerlinStrategy,
    middle: PerlinStrategy,
}

impl HeightmapGenerator {
    pub fn new(seed: u32, params: HeightmapParams) -> Self {
        Self {
            params,
            surface: PerlinStrategy::new(seed),
            middle: PerlinStrategy::new(seed.wrapping_add(MIDDLE_CHANNEL_SEED_OFFSET)),
        }
    }

    pub fn params(&self) -> &HeightmapParams {
        &self.params
    }

    /// Surface height of column `x`, within
    /// `base_height ± height_variation`.
    pub fn height(&self, x: i32) -> i32 {
        let p = &self.params;
        let variation = p.height_variation as f64;
        let n = self.surface.sample_1d(x as f64 * p.surface_noise_scale);
        p.base_height + lerp(-variation, variation, n).round() as i32
    }

    /// Middle-layer thickness of column `x`, within
    /// `[min_middle_thickness, max_middle_thickness]`.
    pub fn middle_thickness(&self, x: i32) -> i32 {
        let p = &self.params;
        let n = self.middle.sample_1d(x as f64 * p.middle_noise_scale);
        lerp(
            p.min_middle_thickness as f64,
            p.max_middle_thickness as f64,
            n,
        )
        .round() as i32
    }

    /// Evaluate every column in `[0, width)`.
    pub fn generate(&self, width: usize) -> ColumnProfile {
        let columns: Vec<(i32, i32)> = (0..width)
            .into_par_iter()
            .map(|x| {
                let x = x as i32;
                (self.height(x), self.middle_thickness(x))
            })
            .collect();

        let (surface, middle) = columns.into_iter().unzip();
        ColumnProfile::new(self.params.base_height, surface, middle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> HeightmapParams {
        HeightmapParams {
            base_height: 10,
            height_variation: 4,
            surface_noise_scale: 0.08,
            middle_noise_scale: 0.13,
            min_middle_thickness: 2,
            max_middle_thickness: 6,
        }
    }

    #[test]
    fn generation_is_deterministic() {
        for seed in [0, 1, 42, 9_999, u32::MAX] {
            let a = HeightmapGenerator::new(seed, params()).generate(256);
            let b = HeightmapGenerator::new(seed, params()).generate(256);
            assert_eq!(a, b, "seed {} diverged", seed);
        }
    }

    #[test]
    fn columns_are_order_independent() {
        let generator = HeightmapGenerator::new(42, params());
        let profile = generator.generate(64);
        for x in (0..64).rev() {
            assert_eq!(profile.surface_height(x), generator.height(x));
            assert_eq!(profile.middle_thickness(x), generator.middle_thickness(x));
        }
    }

    #[test]
    fn heights_stay_in_range() {
        let p = params();
        for seed in [3, 17, 123_456] {
            let generator = HeightmapGenerator::new(seed, p.clone());
            for x in 0..500 {
                let h = generator.height(x);
                assert!(h >= p.base_height - p.height_variation, "height {} too low", h);
                assert!(h <= p.base_height + p.height_variation, "height {} too high", h);
                let t = generator.middle_thickness(x);
                assert!(t >= p.min_middle_thickness && t <= p.max_middle_thickness);
            }
        }
    }

    #[test]
    fn channels_use_distinct_seeds() {
        let p = HeightmapParams {
            base_height: 0,
            height_variation: 100,
            surface_noise_scale: 0.1,
            middle_noise_scale: 0.1,
            min_middle_thickness: -100,
            max_middle_thickness: 100,
        };
        let generator = HeightmapGenerator::new(5, p);
        let differs = (0..100).any(|x| generator.height(x) != generator.middle_thickness(x));
        assert!(differs, "surface and middle channels are correlated");
    }

    #[test]
    fn zero_variation_is_flat() {
        let p = HeightmapParams {
            height_variation: 0,
            ..params()
        };
        let profile = HeightmapGenerator::new(8, p).generate(32);
        assert!(profile.surface_heights().iter().all(|&h| h == 10));
    }
}

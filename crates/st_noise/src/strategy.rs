use noise::{NoiseFn, Perlin};
use st_core::NoiseStrategy;

/// Row the 2D field is sampled along when a single coordinate is wanted.
/// Off the integer lattice so Perlin does not collapse to zero.
const SAMPLE_ROW: f64 = 0.5;

/// Perlin gradient noise remapped to `[0.0, 1.0]`.
pub struct PerlinStrategy {
    noise: Perlin,
}

impl PerlinStrategy {
    pub fn new(seed: u32) -> Self {
        Self {
            noise: Perlin::new(seed),
        }
    }

    /// Sample along the fixed row, for 1D column noise.
    pub fn sample_1d(&self, x: f64) -> f64 {
        self.generate(x, SAMPLE_ROW)
    }
}

impl NoiseStrategy for PerlinStrategy {
    fn generate(&self, x: f64, y: f64) -> f64 {
        ((self.noise.get([x, y]) + 1.0) * 0.5).clamp(0.0, 1.0)
    }

    fn name(&self) -> &'static str {
        "Perlin"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perlin_is_bounded() {
        let strategy = PerlinStrategy::new(7);
        for i in 0..2000 {
            let value = strategy.sample_1d(i as f64 * 0.173);
            assert!((0.0..=1.0).contains(&value), "Value {} out of range", value);
        }
    }

    #[test]
    fn perlin_is_deterministic() {
        let a = PerlinStrategy::new(42);
        let b = PerlinStrategy::new(42);
        assert_eq!(a.generate(12.5, 3.25), b.generate(12.5, 3.25));
    }

    #[test]
    fn perlin_is_smooth() {
        let strategy = PerlinStrategy::new(3);
        let a = strategy.sample_1d(10.0);
        let b = strategy.sample_1d(10.001);
        assert!((a - b).abs() < 0.01);
    }
}

/// Trait for noise generation strategies.
///
/// Implementations are smooth, deterministic and bounded: every sample lies
/// in `[0.0, 1.0]` and depends only on the coordinates and the seed the
/// strategy was built with.
pub trait NoiseStrategy: Send + Sync {
    /// Sample the noise field at the given coordinates.
    fn generate(&self, x: f64, y: f64) -> f64;

    /// Returns the name of this noise strategy for debugging.
    fn name(&self) -> &'static str {
        "NoiseStrategy"
    }
}

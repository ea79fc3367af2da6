//! Offset-charge noise
//!
//! Draws the per-step Gaussian fluctuations of the gate charge for one
//! realization. The random stream is owned by the caller so that a whole
//! ensemble can be replayed from a single seed.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::DecoherenceError;

/// Zero-mean Gaussian noise source with a fixed standard deviation.
#[derive(Debug, Clone, Copy)]
pub struct NoiseGenerator {
    dist: Normal<f64>,
}

impl NoiseGenerator {
    pub fn new(noise_std: f64) -> Result<Self, DecoherenceError> {
        let dist = Normal::new(0.0, noise_std).map_err(|e| {
            DecoherenceError::InvalidConfig(format!("noise_std {noise_std} rejected: {e}"))
        })?;
        Ok(Self { dist })
    }

    pub fn std_dev(&self) -> f64 {
        self.dist.std_dev()
    }

    /// Draw `steps` independent samples from `rng`.
    pub fn trace<R: Rng + ?Sized>(&self, rng: &mut R, steps: usize) -> Vec<f64> {
        self.dist.sample_iter(rng).take(steps).collect()
    }
}

//! Ensemble averaging of the coherence factor
//!
//! Each realization draws a fresh noise trace, integrates it, and is folded
//! into a running sum; only the sum survives the realization.

use log::{debug, info, warn};
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::noise::NoiseGenerator;
use crate::params::SimulationParameters;
use crate::trajectory::TrajectoryIntegrator;
use crate::DecoherenceError;

/// Ensemble mean of P(t) sampled on the integration grid.
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleAverage {
    pub time: Vec<f64>,
    pub mean: Vec<Complex64>,
    pub realizations: usize,
}

/// One row of the averaged series, as written to CSV.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnsembleRow {
    pub t: f64,
    pub re: f64,
    pub im: f64,
    pub abs: f64,
}

impl EnsembleAverage {
    pub fn len(&self) -> usize {
        self.mean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }

    pub fn real(&self) -> Vec<f64> {
        self.mean.iter().map(|p| p.re).collect()
    }

    pub fn imag(&self) -> Vec<f64> {
        self.mean.iter().map(|p| p.im).collect()
    }

    pub fn magnitude(&self) -> Vec<f64> {
        self.mean.iter().map(|p| p.norm()).collect()
    }

    /// First time at which |P(t)| has fallen to 1/e, if it ever does.
    pub fn coherence_time(&self) -> Option<f64> {
        let threshold = (-1.0_f64).exp();
        self.time
            .iter()
            .zip(&self.mean)
            .find(|(_, p)| p.norm() <= threshold)
            .map(|(&t, _)| t)
    }

    pub fn rows(&self) -> Vec<EnsembleRow> {
        self.time
            .iter()
            .zip(&self.mean)
            .map(|(&t, p)| EnsembleRow {
                t,
                re: p.re,
                im: p.im,
                abs: p.norm(),
            })
            .collect()
    }
}

/// Run the full ensemble from the configured seed.
pub fn run_ensemble(params: &SimulationParameters) -> Result<EnsembleAverage, DecoherenceError> {
    let mut rng = StdRng::seed_from_u64(params.random_seed);
    run_ensemble_with_rng(params, &mut rng)
}

/// Run the ensemble drawing every realization, in order, from `rng`.
pub fn run_ensemble_with_rng<R: Rng + ?Sized>(
    params: &SimulationParameters,
    rng: &mut R,
) -> Result<EnsembleAverage, DecoherenceError> {
    params.validate()?;

    if params.is_degenerate() {
        warn!(
            "detuning is identically zero (E_C = {}, n_g0 = {}, std = {}); coherence will stay at 1",
            params.capacitive_scale, params.nominal_offset, params.noise_std
        );
    }

    let steps = params.steps();
    let noise = NoiseGenerator::new(params.noise_std)?;
    let integrator = TrajectoryIntegrator::from_params(params);

    info!(
        "running {} realizations of {} steps (dt = {})",
        params.realization_count, steps, params.time_step
    );

    let mut sum = vec![Complex64::new(0.0, 0.0); steps];

    for realization in 0..params.realization_count {
        let trace = noise.trace(rng, steps);
        let coherence = integrator.coherence(&trace);

        for (acc, p) in sum.iter_mut().zip(&coherence) {
            *acc += *p;
        }

        debug!("realization {}/{} done", realization + 1, params.realization_count);
    }

    let n = params.realization_count as f64;
    let mean = sum.into_iter().map(|acc| acc / n).collect();

    Ok(EnsembleAverage {
        time: params.time_grid(),
        mean,
        realizations: params.realization_count,
    })
}

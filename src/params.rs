//! Simulation parameters
//!
//! Fixed scalar configuration of the offset-charge dephasing experiment.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::DecoherenceError;

/// Largest step count whose accumulator still fits in one allocation.
pub const MAX_STEPS: usize = isize::MAX as usize / std::mem::size_of::<Complex64>();

/// Parameters for one ensemble run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    /// Charging energy scale E_C
    pub capacitive_scale: f64,
    /// Nominal gate offset charge n_g0
    pub nominal_offset: f64,
    /// Standard deviation of the offset-charge fluctuations
    pub noise_std: f64,
    /// Total simulated time (arbitrary units)
    pub total_time: f64,
    /// Integration step
    pub time_step: f64,
    /// Number of independent noise realizations to average
    pub realization_count: usize,
    /// Seed of the ensemble random stream
    pub random_seed: u64,
}

impl SimulationParameters {
    /// Create new parameters
    pub fn new(
        capacitive_scale: f64,
        nominal_offset: f64,
        noise_std: f64,
        total_time: f64,
        time_step: f64,
        realization_count: usize,
        random_seed: u64,
    ) -> Self {
        Self {
            capacitive_scale,
            nominal_offset,
            noise_std,
            total_time,
            time_step,
            realization_count,
            random_seed,
        }
    }

    /// Parameters of the reference experiment.
    ///
    /// The offset sits just off the charge degeneracy point: at exactly 0.5
    /// the noise-free detuning vanishes and the phase only diffuses.
    pub fn default_params() -> Self {
        Self {
            capacitive_scale: 1.0,
            nominal_offset: 0.501,
            noise_std: 0.05,
            total_time: 10_000.0,
            time_step: 0.01,
            realization_count: 100,
            random_seed: 0,
        }
    }

    pub fn validate(&self) -> Result<(), DecoherenceError> {
        if !self.time_step.is_finite() || self.time_step <= 0.0 {
            return Err(DecoherenceError::InvalidConfig(format!(
                "time_step must be finite and > 0, got {}",
                self.time_step
            )));
        }

        if !self.total_time.is_finite() || self.total_time <= 0.0 {
            return Err(DecoherenceError::InvalidConfig(format!(
                "total_time must be finite and > 0, got {}",
                self.total_time
            )));
        }

        if self.realization_count == 0 {
            return Err(DecoherenceError::InvalidConfig(
                "realization_count must be greater than zero".to_string(),
            ));
        }

        if !self.noise_std.is_finite() || self.noise_std < 0.0 {
            return Err(DecoherenceError::InvalidConfig(format!(
                "noise_std must be finite and >= 0, got {}",
                self.noise_std
            )));
        }

        if !self.capacitive_scale.is_finite() || !self.nominal_offset.is_finite() {
            return Err(DecoherenceError::InvalidConfig(
                "capacitive_scale and nominal_offset must be finite".to_string(),
            ));
        }

        let ratio = (self.total_time / self.time_step).floor();
        if ratio > MAX_STEPS as f64 {
            return Err(DecoherenceError::InvalidConfig(format!(
                "total_time / time_step = {ratio:e} exceeds the maximum of {MAX_STEPS} steps"
            )));
        }

        if self.steps() == 0 {
            return Err(DecoherenceError::InvalidConfig(format!(
                "total_time ({}) must cover at least one time_step ({})",
                self.total_time, self.time_step
            )));
        }

        Ok(())
    }

    /// Number of integration steps, floor(T / dt).
    pub fn steps(&self) -> usize {
        (self.total_time / self.time_step).floor() as usize
    }

    /// Sample times t_k = k * dt for k in 0..steps().
    pub fn time_grid(&self) -> Vec<f64> {
        (0..self.steps())
            .map(|k| k as f64 * self.time_step)
            .collect()
    }

    /// Detuning in the absence of noise: 4 E_C (1 - 2 n_g0).
    pub fn detuning_offset(&self) -> f64 {
        4.0 * self.capacitive_scale * (1.0 - 2.0 * self.nominal_offset)
    }

    /// True when every detuning is exactly zero whatever the noise draw,
    /// so the coherence stays pinned at 1.
    pub fn is_degenerate(&self) -> bool {
        self.capacitive_scale == 0.0
            || (self.noise_std == 0.0 && 1.0 - 2.0 * self.nominal_offset == 0.0)
    }
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self::default_params()
    }
}

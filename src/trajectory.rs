//! Single-realization phase integration
//!
//! Turns a noise trace into the accumulated dynamical phase and the
//! corresponding coherence factor P(t) = exp(i Φ(t)).

use num_complex::Complex64;

use crate::params::SimulationParameters;

/// Phase and coherence series of one realization.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub phase: Vec<f64>,
    pub coherence: Vec<Complex64>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.phase.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phase.is_empty()
    }
}

/// Rectangle-rule integrator for the charge-qubit detuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryIntegrator {
    pub capacitive_scale: f64,
    pub nominal_offset: f64,
    pub time_step: f64,
}

impl TrajectoryIntegrator {
    pub fn new(capacitive_scale: f64, nominal_offset: f64, time_step: f64) -> Self {
        Self {
            capacitive_scale,
            nominal_offset,
            time_step,
        }
    }

    pub fn from_params(params: &SimulationParameters) -> Self {
        Self::new(
            params.capacitive_scale,
            params.nominal_offset,
            params.time_step,
        )
    }

    /// Instantaneous detuning 4 E_C (1 - 2 (n_g0 + noise)).
    #[inline]
    pub fn detuning(&self, noise: f64) -> f64 {
        4.0 * self.capacitive_scale * (1.0 - 2.0 * (self.nominal_offset + noise))
    }

    /// Running phase Φ[k] = dt * Σ_{j<=k} δE[j].
    ///
    /// The sum includes the current sample, so Φ[0] is already one full step.
    pub fn phase(&self, noise: &[f64]) -> Vec<f64> {
        let mut acc = 0.0;
        noise
            .iter()
            .map(|&n| {
                acc += self.detuning(n);
                acc * self.time_step
            })
            .collect()
    }

    pub fn coherence(&self, noise: &[f64]) -> Vec<Complex64> {
        coherence_from_phase(&self.phase(noise))
    }

    pub fn integrate(&self, noise: &[f64]) -> Trajectory {
        let phase = self.phase(noise);
        let coherence = coherence_from_phase(&phase);
        Trajectory { phase, coherence }
    }
}

/// Map each phase onto the unit circle.
pub fn coherence_from_phase(phase: &[f64]) -> Vec<Complex64> {
    phase.iter().map(|&phi| Complex64::from_polar(1.0, phi)).collect()
}

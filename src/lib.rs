//! Charge-qubit dephasing under offset-charge noise
//!
//! Monte Carlo estimate of the coherence envelope P(t) = <exp(i Φ(t))> of a
//! charge qubit whose gate offset charge fluctuates around a nominal value.
//! Each realization integrates the noisy detuning with a rectangle rule; the
//! ensemble mean is rendered as a two-panel plot.

pub mod ensemble;
pub mod noise;
pub mod output;
pub mod params;
pub mod trajectory;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use log::info;
use thiserror::Error;

// Re-export main types
pub use ensemble::{run_ensemble, run_ensemble_with_rng, EnsembleAverage, EnsembleRow};
pub use noise::NoiseGenerator;
pub use output::{OutputFiles, Summary};
pub use params::SimulationParameters;
pub use trajectory::{Trajectory, TrajectoryIntegrator};

#[derive(Debug, Error)]
pub enum DecoherenceError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Run the ensemble and write plot, CSV and summary into a fresh run
/// directory under `output_base`.
pub fn run_experiment(params: &SimulationParameters, output_base: &Path) -> anyhow::Result<Summary> {
    params.validate()?;

    let avg = run_ensemble(params)?;

    let output_dir = create_timestamped_run_dir(output_base)?;
    let files = OutputFiles::in_dir(&output_dir);
    let summary = output::write_outputs(params, &avg, &files)?;

    info!(
        "wrote {} samples to {}",
        summary.steps,
        files.output_dir.display()
    );
    Ok(summary)
}

/// Read parameters from a JSON file; absent fields take their defaults.
pub fn load_params(path: &Path) -> Result<SimulationParameters, DecoherenceError> {
    let raw = fs::read_to_string(path)?;
    let params: SimulationParameters = serde_json::from_str(&raw)?;
    Ok(params)
}

/// Create `<base>/<UTC timestamp>`, or `<timestamp>-NN` when that name is
/// already taken. `fs::create_dir` claims the name atomically, so concurrent
/// runs never share a directory.
pub fn create_timestamped_run_dir(base_dir: &Path) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(base_dir)
        .with_context(|| format!("failed to create output base directory {}", base_dir.display()))?;

    let timestamp = Utc::now().format("%Y%m%d-%H%M%S").to_string();
    let mut run_dir = base_dir.join(&timestamp);
    let mut counter: usize = 1;

    loop {
        match fs::create_dir(&run_dir) {
            Ok(()) => return Ok(run_dir),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                run_dir = base_dir.join(format!("{timestamp}-{counter:02}"));
                counter += 1;
            }
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("failed to create run directory {}", run_dir.display())
                })
            }
        }
    }
}

use std::path::PathBuf;

use charge_decoherence::{load_params, run_experiment, SimulationParameters};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about = "Charge-qubit dephasing envelope by Monte Carlo averaging")]
struct Cli {
    /// Output base directory; each run gets a timestamped subdirectory
    #[arg(long, default_value = "output-charge-decoherence")]
    output: PathBuf,

    /// JSON parameter file (missing fields keep their defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Charging energy scale E_C
    #[arg(long)]
    capacitive_scale: Option<f64>,

    /// Nominal gate offset charge n_g0
    #[arg(long)]
    nominal_offset: Option<f64>,

    /// Standard deviation of the offset-charge noise
    #[arg(long)]
    noise_std: Option<f64>,

    /// Total simulated time
    #[arg(long)]
    total_time: Option<f64>,

    /// Integration step
    #[arg(long)]
    time_step: Option<f64>,

    /// Number of noise realizations to average
    #[arg(long)]
    realizations: Option<usize>,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut params = match &cli.config {
        Some(path) => load_params(path)?,
        None => SimulationParameters::default(),
    };
    if let Some(v) = cli.capacitive_scale {
        params.capacitive_scale = v;
    }
    if let Some(v) = cli.nominal_offset {
        params.nominal_offset = v;
    }
    if let Some(v) = cli.noise_std {
        params.noise_std = v;
    }
    if let Some(v) = cli.total_time {
        params.total_time = v;
    }
    if let Some(v) = cli.time_step {
        params.time_step = v;
    }
    if let Some(v) = cli.realizations {
        params.realization_count = v;
    }
    if let Some(v) = cli.seed {
        params.random_seed = v;
    }

    let summary = run_experiment(&params, &cli.output)?;

    println!(
        "Simulation complete. Steps: {} | Realizations: {}",
        summary.steps, summary.realizations
    );
    println!("Run directory: {}", summary.outputs.output_dir.display());
    println!("Plot: {}", summary.outputs.plot_path.display());
    println!("CSV: {}", summary.outputs.csv_path.display());
    println!("Summary: {}", summary.outputs.summary_path.display());
    match summary.coherence_time {
        Some(t) => println!("|P(t)| reaches 1/e at t = {t:.3}"),
        None => println!(
            "|P(t)| stays above 1/e (final {:.4})",
            summary.final_magnitude
        ),
    }

    Ok(())
}

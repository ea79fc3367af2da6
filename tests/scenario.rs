//! Reference scenario: E_C = 1, n_g0 = 0.501, std = 0.05, T = 10, dt = 0.01,
//! 100 realizations, seed 0.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use approx::assert_abs_diff_eq;
use charge_decoherence::output::{write_csv, write_summary, OutputFiles, Summary};
use charge_decoherence::{run_ensemble, run_experiment, EnsembleAverage, SimulationParameters};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct FixtureRow {
    k: usize,
    re: f64,
    im: f64,
}

fn scenario() -> SimulationParameters {
    SimulationParameters::new(1.0, 0.501, 0.05, 10.0, 0.01, 100, 0)
}

fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("scenario_seed0.csv")
}

fn write_fixture(path: &Path, avg: &EnsembleAverage) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut writer = csv::Writer::from_path(path).unwrap();
    for (k, p) in avg.mean.iter().enumerate() {
        writer
            .serialize(FixtureRow {
                k,
                re: p.re,
                im: p.im,
            })
            .unwrap();
    }
    writer.flush().unwrap();
}

fn read_fixture(path: &Path) -> Vec<Complex64> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    reader
        .deserialize::<FixtureRow>()
        .enumerate()
        .map(|(k, row)| {
            let row = row.unwrap();
            assert_eq!(row.k, k);
            Complex64::new(row.re, row.im)
        })
        .collect()
}

#[test]
fn scenario_has_expected_shape() {
    let avg = run_ensemble(&scenario()).unwrap();
    assert_eq!(avg.len(), 1000);
    assert_eq!(avg.realizations, 100);
    assert_abs_diff_eq!(avg.time[1], 0.01, epsilon = 1e-15);
    assert_abs_diff_eq!(avg.time[999], 9.99, epsilon = 1e-9);
    for m in avg.magnitude() {
        assert!(m <= 1.0 + 1e-12);
    }
}

#[test]
fn scenario_is_reproducible() {
    let a = run_ensemble(&scenario()).unwrap();
    let b = run_ensemble(&scenario()).unwrap();
    assert_eq!(a.mean, b.mean);
}

#[test]
fn scenario_matches_snapshot() {
    let avg = run_ensemble(&scenario()).unwrap();
    let path = fixture_path();

    if env::var_os("UPDATE_FIXTURES").is_some() {
        write_fixture(&path, &avg);
    }
    assert!(
        path.exists(),
        "missing snapshot {}; re-record it with UPDATE_FIXTURES=1",
        path.display()
    );

    let expected = read_fixture(&path);
    assert_eq!(expected.len(), 1000);
    assert_eq!(expected.len(), avg.len());
    for (k, (got, want)) in avg.mean.iter().zip(&expected).enumerate() {
        assert!(
            (got.re - want.re).abs() <= 1e-12 && (got.im - want.im).abs() <= 1e-12,
            "sample {k}: got {got}, snapshot has {want}"
        );
    }
}

#[test]
fn snapshot_starts_one_step_into_the_phase() {
    // The recorded P[0] already carries dt * δE[0]; a series whose phase
    // starts at zero would open with exactly 1 + 0i.
    let expected = read_fixture(&fixture_path());
    assert!(expected[0].norm() > 0.99);
    assert!(expected[0].im.abs() > 1e-4);
}

#[test]
fn scenario_first_sample_close_to_one() {
    // Φ[0] = dt * δE[0] is one step of a small detuning, so P(0) sits
    // near but not at 1.
    let avg = run_ensemble(&scenario()).unwrap();
    let p0 = avg.mean[0];
    assert!(p0.norm() > 0.99);
    assert_ne!(p0, Complex64::new(1.0, 0.0));
}

#[test]
fn degenerate_scenario_stays_at_one() {
    let params = SimulationParameters {
        noise_std: 0.0,
        nominal_offset: 0.5,
        ..scenario()
    };
    let avg = run_ensemble(&params).unwrap();
    assert!(avg.mean.iter().all(|&p| p == Complex64::new(1.0, 0.0)));
}

#[test]
fn artifacts_are_written() {
    let params = SimulationParameters {
        realization_count: 10,
        ..scenario()
    };
    let avg = run_ensemble(&params).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let files = OutputFiles::in_dir(dir.path());
    let summary = Summary::new(&params, &avg, files.clone());

    write_csv(&files.csv_path, &avg).unwrap();
    write_summary(&files.summary_path, &summary).unwrap();

    let csv_text = fs::read_to_string(&files.csv_path).unwrap();
    assert_eq!(csv_text.lines().count(), avg.len() + 1);

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&files.summary_path).unwrap()).unwrap();
    assert_eq!(json["steps"], 1000);
    assert_eq!(json["realizations"], 10);
    assert_eq!(json["degenerate"], false);
}

#[test]
fn experiment_renders_plot_into_run_dir() {
    let params = SimulationParameters {
        total_time: 1.0,
        realization_count: 2,
        ..scenario()
    };
    let base = tempfile::tempdir().unwrap();
    let summary = run_experiment(&params, base.path()).unwrap();

    let run_dir = &summary.outputs.output_dir;
    assert_eq!(run_dir.parent(), Some(base.path()));
    assert!(run_dir.is_dir());

    let plot = &summary.outputs.plot_path;
    assert_eq!(plot, &run_dir.join("output.png"));
    assert!(fs::metadata(plot).unwrap().len() > 0);
    let header = fs::read(plot).unwrap();
    assert_eq!(&header[..8], b"\x89PNG\r\n\x1a\n");

    assert!(run_dir.join("summary.json").is_file());
    assert!(run_dir.join("ensemble.csv").is_file());
    assert_eq!(summary.steps, 100);
    assert_eq!(summary.realizations, 2);
}

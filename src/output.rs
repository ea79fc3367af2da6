use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use plotters::prelude::*;
use serde::Serialize;

use crate::ensemble::EnsembleAverage;
use crate::params::SimulationParameters;

pub const PLOT_FILE: &str = "output.png";
pub const CSV_FILE: &str = "ensemble.csv";
pub const SUMMARY_FILE: &str = "summary.json";

const PLOT_SIZE: (u32, u32) = (1500, 700);
const RE_COLOR: RGBColor = RGBColor(0x9e, 0x6e, 0x61);
const IM_COLOR: RGBColor = RGBColor(0x4f, 0x37, 0x31);

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub config: SimulationParameters,
    pub steps: usize,
    pub realizations: usize,
    pub degenerate: bool,
    pub final_magnitude: f64,
    pub min_magnitude: f64,
    pub coherence_time: Option<f64>,
    pub outputs: OutputFiles,
}

impl Summary {
    pub fn new(config: &SimulationParameters, avg: &EnsembleAverage, outputs: OutputFiles) -> Self {
        let magnitude = avg.magnitude();
        Self {
            config: *config,
            steps: avg.len(),
            realizations: avg.realizations,
            degenerate: config.is_degenerate(),
            final_magnitude: magnitude.last().copied().unwrap_or(1.0),
            min_magnitude: magnitude.iter().copied().fold(1.0_f64, f64::min),
            coherence_time: avg.coherence_time(),
            outputs,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OutputFiles {
    pub output_dir: PathBuf,
    pub plot_path: PathBuf,
    pub csv_path: PathBuf,
    pub summary_path: PathBuf,
}

impl OutputFiles {
    pub fn in_dir(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            plot_path: output_dir.join(PLOT_FILE),
            csv_path: output_dir.join(CSV_FILE),
            summary_path: output_dir.join(SUMMARY_FILE),
        }
    }
}

pub fn write_csv(path: &Path, avg: &EnsembleAverage) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to open CSV path {}", path.display()))?;

    for row in avg.rows() {
        writer.serialize(row)?;
    }

    writer.flush()?;
    Ok(())
}

pub fn write_summary(path: &Path, summary: &Summary) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let data = serde_json::to_string_pretty(summary)?;
    fs::write(path, data).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Two panels side by side: Re/Im of the ensemble mean on the left,
/// its magnitude on the right.
pub fn plot_coherence(avg: &EnsembleAverage, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let root = BitMapBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((1, 2));

    let max_time = avg.time.last().copied().unwrap_or(0.0).max(f64::EPSILON);

    let mut chart = ChartBuilder::on(&panels[0])
        .caption("avg Re and Im", ("sans-serif", 28).into_font())
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..max_time, -1.05..1.05)?;

    chart.configure_mesh().x_desc("t").y_desc("P(t)").draw()?;

    chart
        .draw_series(LineSeries::new(
            avg.time.iter().zip(&avg.mean).map(|(&t, p)| (t, p.re)),
            &RE_COLOR,
        ))?
        .label("Re(P(t)) avg")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 25, y)], RE_COLOR.stroke_width(3)));

    chart
        .draw_series(LineSeries::new(
            avg.time.iter().zip(&avg.mean).map(|(&t, p)| (t, p.im)),
            &IM_COLOR,
        ))?
        .label("Im(P(t)) avg")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 25, y)], IM_COLOR.stroke_width(3)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .border_style(BLACK)
        .background_style(WHITE.mix(0.7))
        .draw()?;

    let mut chart = ChartBuilder::on(&panels[1])
        .caption("avg magnitude", ("sans-serif", 28).into_font())
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..max_time, 0.0..1.05)?;

    chart.configure_mesh().x_desc("t").y_desc("|P(t)|").draw()?;

    chart
        .draw_series(LineSeries::new(
            avg.time.iter().zip(&avg.mean).map(|(&t, p)| (t, p.norm())),
            &RE_COLOR,
        ))?
        .label("|P(t)| avg")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 25, y)], RE_COLOR.stroke_width(3)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .border_style(BLACK)
        .background_style(WHITE.mix(0.7))
        .draw()?;

    root.present()
        .with_context(|| format!("failed to write plot {}", path.display()))?;
    Ok(())
}

pub fn write_outputs(
    config: &SimulationParameters,
    avg: &EnsembleAverage,
    files: &OutputFiles,
) -> anyhow::Result<Summary> {
    let summary = Summary::new(config, avg, files.clone());

    write_csv(&files.csv_path, avg)?;
    write_summary(&files.summary_path, &summary)?;
    plot_coherence(avg, &files.plot_path)?;

    Ok(summary)
}

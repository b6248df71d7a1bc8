//! Result output formatting and writing.

use crate::config::OutputConfig;
use anyhow::{anyhow, Result};
use frf_util::DampingFormat;
use half_power::{DampingResult, DampingSample, MemorySession, MissingSide, PeakEstimate, PeakStatus};
use std::fmt::Write;
use std::path::Path;

/// Write each created damping dataset, and a chart of its source curve when enabled.
pub fn write_results(session: &MemorySession, created: &[String], output_dir: &Path, output: &OutputConfig) -> Result<()> {
    for name in created {
        let data = session
            .data(name)
            .ok_or_else(|| anyhow!("Damping data {} is missing from the session", name))?;
        let damping = data
            .data
            .iter()
            .map(|&(frequency, ratio)| DampingSample { frequency, ratio })
            .collect::<DampingResult>();

        let table_path = output_dir.join(format!("{}.{}", name, output.format.extension()));
        frf_util::write_damping(&table_path, &damping, output.format)
            .map_err(|e| anyhow!("Failed to write {:?}: {}", table_path, e))?;
        tracing::info!("Wrote damping table to {:?}", table_path);

        if !output.plot {
            continue;
        }
        let source = name
            .rsplit_once(" DAMPING-")
            .and_then(|(base, _)| session.data(base))
            .ok_or_else(|| anyhow!("No source curve for {}", name))?;
        let plot_path = output_dir.join(format!("{}.svg", source.name));
        frf_plot::create_damping_plot(&plot_path, source, data, output.plot_width, output.plot_height)
            .map_err(|e| anyhow!("Failed to render {:?}: {}", plot_path, e))?;
        tracing::info!("Wrote chart to {:?}", plot_path);
    }
    Ok(())
}

fn missing_label(side: MissingSide) -> &'static str {
    match side {
        MissingSide::Left => "no left crossing",
        MissingSide::Right => "no right crossing",
        MissingSide::Both => "no crossing",
    }
}

fn cell(v: Option<f64>) -> String {
    v.map_or_else(String::new, |v| v.to_string())
}

/// Per peak diagnostic table.
pub fn format_peaks(estimates: &[PeakEstimate], format: DampingFormat) -> Result<String> {
    let mut out = String::new();
    match format {
        DampingFormat::Text => {
            writeln!(
                out,
                "{:>6}  {:>12}  {:>12}  {:>12}  {:>12}  {:>10}  {:>10}",
                "Index", "Frequency", "Amplitude", "Left", "Right", "Q", "Damping"
            )?;
            for e in estimates {
                let left = e.left_crossing.map_or_else(|| "-".to_string(), |v| format!("{:.4}", v));
                let right = e.right_crossing.map_or_else(|| "-".to_string(), |v| format!("{:.4}", v));
                write!(out, "{:>6}  {:>12.4}  {:>12.6}  {:>12}  {:>12}  ", e.index, e.frequency, e.amplitude, left, right)?;
                match e.status {
                    PeakStatus::Resolved { quality_factor, damping_ratio } => {
                        writeln!(out, "{:>10.3}  {:>10.6}", quality_factor, damping_ratio)?
                    }
                    PeakStatus::Unresolved(side) => writeln!(out, "{}", missing_label(side))?,
                }
            }
        }
        DampingFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(estimates)?)?;
        }
        DampingFormat::Csv => {
            writeln!(out, "index,frequency,amplitude,threshold,left_crossing,right_crossing,quality_factor,damping_ratio")?;
            for e in estimates {
                let (q, ratio) = match e.status {
                    PeakStatus::Resolved { quality_factor, damping_ratio } => (Some(quality_factor), Some(damping_ratio)),
                    PeakStatus::Unresolved(_) => (None, None),
                };
                writeln!(
                    out,
                    "{},{},{},{},{},{},{},{}",
                    e.index,
                    e.frequency,
                    e.amplitude,
                    e.threshold,
                    cell(e.left_crossing),
                    cell(e.right_crossing),
                    cell(q),
                    cell(ratio)
                )?;
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use half_power::{analyze_peaks, plot_damping, HalfPowerEstimator, QuantityType, XyData};

    fn shoulder() -> Vec<(f64, f64)> {
        vec![(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0), (4.0, 2.9)]
    }

    fn sine_session() -> (MemorySession, Vec<String>) {
        let data = (0..720).map(|k| (k as f64, (k as f64).to_radians().sin())).collect::<Vec<(f64, f64)>>();
        let curve = XyData::frequency_response("sine", QuantityType::other("Magnitude"), data);
        let mut session = MemorySession::with_plot(vec![curve]).unwrap();
        let created = plot_damping(&mut session, &HalfPowerEstimator::new()).unwrap();
        (session, created)
    }

    #[test]
    fn test_unresolved_peak_rows() {
        let estimates = analyze_peaks(&shoulder());
        assert_eq!(estimates.len(), 1);

        let text = format_peaks(&estimates, DampingFormat::Text).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().nth(1).unwrap().ends_with("no right crossing"));

        let csv = format_peaks(&estimates, DampingFormat::Csv).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert!(row.starts_with("3,3,3,"));
        assert!(row.ends_with(",,,"));

        let json = format_peaks(&estimates, DampingFormat::Json).unwrap();
        let parsed: Vec<PeakEstimate> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, estimates);
    }

    #[test]
    fn test_write_results() {
        let (session, created) = sine_session();
        assert_eq!(created, vec!["sine DAMPING-1".to_string()]);

        let dir = std::env::temp_dir().join(format!("half_power_cli_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        write_results(&session, &created, &dir, &OutputConfig::default()).unwrap();

        let table = std::fs::read_to_string(dir.join("sine DAMPING-1.csv")).unwrap();
        assert_eq!(table.lines().count(), 3);
        let svg = std::fs::read_to_string(dir.join("sine.svg")).unwrap();
        assert_eq!(svg.matches("<circle").count(), 2);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_plot_disabled() {
        let (session, created) = sine_session();
        let dir = std::env::temp_dir().join(format!("half_power_cli_noplot_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let output = OutputConfig { format: DampingFormat::Json, plot: false, ..OutputConfig::default() };
        write_results(&session, &created, &dir, &output).unwrap();

        assert!(dir.join("sine DAMPING-1.json").exists());
        assert!(!dir.join("sine.svg").exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}

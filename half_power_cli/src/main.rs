//! half-power: critical damping ratios of resonance peaks by the half power bandwidth method.
//!
//! Reads frequency response curves (or impulse responses) and writes one damping table per
//! curve, plus an optional SVG chart of the curve with its estimate.

mod config;
mod output;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use config::Config;
use frf_util::DampingFormat;
use half_power::fft::magnitude_response;
use half_power::{plot_damping, MemorySession, QuantityType, XyData};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "half-power")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output format, overrides the config file
    #[arg(short, long)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl From<OutputFormat> for DampingFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => DampingFormat::Text,
            OutputFormat::Json => DampingFormat::Json,
            OutputFormat::Csv => DampingFormat::Csv,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate damping for frequency response curves
    Estimate {
        /// Two column frequency/amplitude text files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Path to the configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output directory for results
        #[arg(short, long, default_value = "output")]
        output: PathBuf,
    },

    /// Estimate damping from a recorded impulse response
    Impulse {
        /// Path to the .wav file
        file: PathBuf,

        /// Path to the configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output directory for results
        #[arg(short, long, default_value = "output")]
        output: PathBuf,
    },

    /// Print every detected peak with its half power crossings
    Peaks {
        /// Two column frequency/amplitude text file
        file: PathBuf,

        /// Path to the configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match cli.command {
        Commands::Estimate { files, config, output } => {
            let config = load(config.as_deref(), cli.format)?;
            estimate_files(&files, &config, &output)?;
        }
        Commands::Impulse { file, config, output } => {
            let config = load(config.as_deref(), cli.format)?;
            estimate_impulse(&file, &config, &output)?;
        }
        Commands::Peaks { file, config } => {
            let config = load(config.as_deref(), cli.format)?;
            print_peaks(&file, &config)?;
        }
    }

    Ok(())
}

fn load(path: Option<&Path>, format: Option<OutputFormat>) -> Result<Config> {
    if let Some(path) = path {
        tracing::info!("Loading configuration from {:?}", path);
    }
    let mut config = config::load_config(path)?;
    if let Some(format) = format {
        config.output.format = format.into();
    }
    Ok(config)
}

fn curve_name(file: &Path) -> Result<&str> {
    file.file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| anyhow!("Cannot name a curve after {:?}", file))
}

fn estimate_files(files: &[PathBuf], config: &Config, output_dir: &Path) -> Result<()> {
    let mut curves = Vec::with_capacity(files.len());
    for file in files {
        tracing::info!("Reading curve: {:?}", file);
        let curve = frf_util::read_curve(file).map_err(|e| anyhow!("Failed to read curve: {}", e))?;
        curves.push(XyData::frequency_response(
            curve_name(file)?,
            QuantityType::other(&config.input.quantity),
            curve.into_points(),
        ));
    }
    estimate_curves(curves, config, output_dir)
}

fn estimate_impulse(file: &Path, config: &Config, output_dir: &Path) -> Result<()> {
    tracing::info!("Reading impulse response: {:?}", file);
    let (samples, sample_rate) = frf_util::read_wave_channel(file, config.input.channel)
        .map_err(|e| anyhow!("Failed to read {:?}: {}", file, e))?;
    tracing::debug!(samples = samples.len(), sample_rate, "computing magnitude response");

    let curve = magnitude_response(&samples, sample_rate as f64, config.input.window.window_fn())
        .with_context(|| format!("Failed to transform {:?}", file))?;
    let data = XyData::frequency_response(
        curve_name(file)?,
        QuantityType::other(&config.input.quantity),
        curve.into_points(),
    );
    estimate_curves(vec![data], config, output_dir)
}

fn estimate_curves(curves: Vec<XyData>, config: &Config, output_dir: &Path) -> Result<()> {
    let mut session = MemorySession::with_plot(curves)?;
    let created = plot_damping(&mut session, &config.estimator)?;
    if created.is_empty() {
        tracing::warn!("No peak resolved on both sides in any curve");
        return Ok(());
    }

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;
    output::write_results(&session, &created, output_dir, &config.output)?;

    tracing::info!("Wrote {} damping curve(s) to {:?}", created.len(), output_dir);
    Ok(())
}

fn print_peaks(file: &Path, config: &Config) -> Result<()> {
    let curve = frf_util::read_curve(file).map_err(|e| anyhow!("Failed to read curve: {}", e))?;
    let estimates = config.estimator.analyze(curve.points());
    let table = output::format_peaks(&estimates, config.output.format)?;
    print!("{}", table);
    Ok(())
}

//! Configuration loading and validation.

use anyhow::{Context, Result};
use frf_util::DampingFormat;
use half_power::fft::window::WindowKind;
use half_power::HalfPowerEstimator;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration. Every field has a default.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Peak filters applied before the half power estimate.
    pub estimator: HalfPowerEstimator,

    /// How input files are interpreted.
    pub input: InputConfig,

    /// What gets written.
    pub output: OutputConfig,
}

/// Input interpretation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    /// Label of the response quantity on the Y axis.
    pub quantity: String,

    /// Channel read from multi channel wav files.
    pub channel: usize,

    /// Taper applied to an impulse response before the transform.
    pub window: WindowKind,
}

fn default_quantity() -> String { "Magnitude".into() }

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            quantity: default_quantity(),
            channel: 0,
            window: WindowKind::default(),
        }
    }
}

/// Output configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Layout of the damping tables.
    pub format: DampingFormat,

    /// Render an SVG chart per source curve.
    pub plot: bool,

    /// Chart width in pixels.
    pub plot_width: u32,

    /// Chart height in pixels.
    pub plot_height: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: DampingFormat::default(),
            plot: true,
            plot_width: frf_plot::DEFAULT_WIDTH,
            plot_height: frf_plot::DEFAULT_HEIGHT,
        }
    }
}

/// Load configuration from a file, or the defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            parse_config(&content, path.extension().map_or(false, |e| e == "json"))?
        }
        None => Config::default(),
    };

    validate_config(&config)?;

    Ok(config)
}

fn parse_config(content: &str, json: bool) -> Result<Config> {
    if json {
        serde_json::from_str(content).with_context(|| "Failed to parse config as JSON")
    } else {
        toml::from_str(content).with_context(|| "Failed to parse config as TOML")
    }
}

/// Validate configuration.
fn validate_config(config: &Config) -> Result<()> {
    config.estimator.validate()?;

    if config.input.quantity.trim().is_empty() {
        anyhow::bail!("Input quantity label must not be empty");
    }

    if config.output.plot_width == 0 || config.output.plot_height == 0 {
        anyhow::bail!(
            "Plot size must be positive (got {}x{})",
            config.output.plot_width,
            config.output.plot_height
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = parse_config("", false).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.input.quantity, "Magnitude");
        assert_eq!(config.output.format, DampingFormat::Csv);
        assert!(config.output.plot);
        assert_eq!((config.output.plot_width, config.output.plot_height), (1000, 500));
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_toml_sections() {
        let text = r#"
            [estimator]
            min_prominence = 0.5
            max_freq = 2000.0

            [input]
            quantity = "Acceleration"
            channel = 1
            window = "blackman_harris"

            [output]
            format = "json"
            plot = false
        "#;
        let config = parse_config(text, false).unwrap();
        assert_eq!(config.estimator, HalfPowerEstimator::new().with_min_prominence(0.5).with_max_freq(2000.0));
        assert_eq!(config.input.quantity, "Acceleration");
        assert_eq!(config.input.channel, 1);
        assert_eq!(config.input.window, WindowKind::BlackmanHarris);
        assert_eq!(config.output.format, DampingFormat::Json);
        assert!(!config.output.plot);
        assert_eq!(config.output.plot_width, 1000);
    }

    #[test]
    fn test_json_config() {
        let config = parse_config(r#"{"output": {"format": "text", "plot_width": 640}}"#, true).unwrap();
        assert_eq!(config.output.format, DampingFormat::Text);
        assert_eq!(config.output.plot_width, 640);
        assert_eq!(config.output.plot_height, 500);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        assert!(parse_config("[output]\nformt = \"csv\"\n", false).is_err());
        assert!(parse_config("[estimator]\nprominence = 1.0\n", false).is_err());
    }

    #[test]
    fn test_validation() {
        let mut config = Config::default();
        config.output.plot_height = 0;
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config.input.quantity = " ".into();
        assert!(validate_config(&config).is_err());

        let config = parse_config("[estimator]\nmin_prominence = -1.0\n", false).unwrap();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        assert!(load_config(Some(Path::new("does/not/exist.toml"))).is_err());
        assert_eq!(load_config(None).unwrap(), Config::default());
    }
}

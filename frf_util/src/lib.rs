//! File helpers for frequency response data: delimited text curves in, WAV impulse responses in,
//! damping tables out.
use std::error::Error;
use std::fmt::Write as _;
use std::path::Path;

use half_power::{Curve, DampingResult};
use serde::{Deserialize, Serialize};

/// Read one channel of a wav file. Integer samples are scaled to the range [-1, 1].
/// Returns the samples and the sample rate.
pub fn read_wave_channel<P: AsRef<Path>>(path: P, channel: usize) -> Result<(Vec<f64>, u32), Box<dyn Error>> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let channels = spec.channels as usize;
    if channel >= channels {
        return Err(format!("channel {} requested but the file has {} channel(s)", channel, channels).into());
    }

    let interleaved = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .map(|v| v.map(|s| s as f64))
            .collect::<Result<Vec<f64>, _>>()?,
        hound::SampleFormat::Int => {
            let scale = (1_i64 << (spec.bits_per_sample - 1)) as f64;
            reader
                .samples::<i32>()
                .map(|v| v.map(|s| s as f64 / scale))
                .collect::<Result<Vec<f64>, _>>()?
        }
    };

    let samples = interleaved.into_iter().skip(channel).step_by(channels).collect();
    Ok((samples, spec.sample_rate))
}

/// Write a mono 32 bit float wav file.
pub fn write_wave_mono<P: AsRef<Path>>(samples: &[f64], path: P, sample_rate: u32) -> Result<(), Box<dyn Error>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for s in samples {
        writer.write_sample(*s as f32)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Read a two column `frequency, amplitude` text file.
pub fn read_curve<P: AsRef<Path>>(path: P) -> Result<Curve, Box<dyn Error>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    parse_curve(&content).map_err(|e| format!("{}: {}", path.display(), e).into())
}

/// Parse two numeric columns separated by commas, semicolons, tabs or spaces.
/// Blank lines and `#` comments are skipped; a non-numeric first line is taken as a header.
pub fn parse_curve(content: &str) -> Result<Curve, Box<dyn Error>> {
    let mut points = Vec::new();
    let mut seen_line = false;
    for (n, raw) in content.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let first = !seen_line;
        seen_line = true;

        let fields = line
            .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect::<Vec<&str>>();
        let parsed = fields.iter().map(|s| s.parse::<f64>()).collect::<Result<Vec<f64>, _>>();
        match parsed {
            Ok(v) if v.len() == 2 => points.push((v[0], v[1])),
            Ok(v) => return Err(format!("line {}: expected 2 columns, got {}", n + 1, v.len()).into()),
            Err(_) if first => continue,
            Err(e) => return Err(format!("line {}: {}", n + 1, e).into()),
        }
    }
    Ok(Curve::from_points(points)?)
}

/// Layout of a written damping table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DampingFormat {
    Text,
    Json,
    #[default]
    Csv,
}

impl DampingFormat {
    pub fn extension(self) -> &'static str {
        match self {
            DampingFormat::Text => "txt",
            DampingFormat::Json => "json",
            DampingFormat::Csv => "csv",
        }
    }
}

pub fn format_damping(damping: &DampingResult, format: DampingFormat) -> Result<String, Box<dyn Error>> {
    let mut out = String::new();
    match format {
        DampingFormat::Text => {
            writeln!(out, "{:>14}  {:>14}  {:>10}", "Frequency", "Damping ratio", "Q")?;
            for s in damping {
                writeln!(out, "{:>14.6}  {:>14.6}  {:>10.3}", s.frequency, s.ratio, s.quality_factor())?;
            }
        }
        DampingFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(damping)?)?;
        }
        DampingFormat::Csv => {
            writeln!(out, "frequency,critical_damping_ratio")?;
            for s in damping {
                writeln!(out, "{},{}", s.frequency, s.ratio)?;
            }
        }
    }
    Ok(out)
}

pub fn write_damping<P: AsRef<Path>>(path: P, damping: &DampingResult, format: DampingFormat) -> Result<(), Box<dyn Error>> {
    std::fs::write(path, format_damping(damping, format)?)?;
    Ok(())
}

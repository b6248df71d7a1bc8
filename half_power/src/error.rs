//! Error type shared by the curve model, the estimator settings and the host glue.
//! The numeric core never produces one of these.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HalfPowerError {
    #[error("Length mismatch: {frequencies} frequencies but {amplitudes} amplitudes")]
    LengthMismatch { frequencies: usize, amplitudes: usize },

    /// Frequencies must strictly increase from one sample to the next.
    #[error("Frequency at sample {index} does not increase")]
    NonIncreasingFrequency { index: usize },

    #[error("Frequency at sample {index} is not finite")]
    NonFiniteFrequency { index: usize },

    #[error("Insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("FFT size {size} plus zero padding {zero_pad} is not a power of 2")]
    InvalidFftSize { size: usize, zero_pad: usize },

    #[error("Invalid setting `{name}`: {reason}")]
    InvalidSetting { name: &'static str, reason: String },

    /// The host is not showing an XY plot to take curves from.
    #[error("You must first display an XY Plot of frequency response in the current viewport")]
    NoFrequencyPlot,

    #[error("Data named `{0}` already exists")]
    DuplicateDataName(String),

    #[error("Plot session failed: {0}")]
    Session(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type HalfPowerResult<T> = Result<T, HalfPowerError>;

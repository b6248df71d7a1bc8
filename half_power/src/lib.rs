//! This library estimates the critical damping ratio of resonance peaks with the half power
//! (-3 dB) bandwidth method.
//!
//! The pipeline is [`peaks::find_peaks`] → [`damping::find_damping`], which calls
//! [`roots::interp_roots`] on either side of every peak. All three are pure functions over
//! borrowed `(frequency, amplitude)` slices and never fail: peaks whose half power level is not
//! crossed on both sides are left out of the result.
//!
//! [`estimator::HalfPowerEstimator`] adds optional peak filters on top, [`fft`] turns a recorded
//! impulse response into a magnitude curve and [`host`] connects the estimate to a plotting host.

pub mod curve;
pub mod damping;
pub mod error;
pub mod estimator;
pub mod fft;
pub mod host;
pub mod peaks;
pub mod roots;

pub use curve::Curve;
pub use damping::{analyze_peaks, find_damping, DampingResult, DampingSample, MissingSide, PeakEstimate, PeakStatus};
pub use error::{HalfPowerError, HalfPowerResult};
pub use estimator::HalfPowerEstimator;
pub use host::{plot_damping, CurveStyle, MemorySession, PlotSession, QuantityKind, QuantityType, XyData};
pub use peaks::find_peaks;
pub use roots::interp_roots;

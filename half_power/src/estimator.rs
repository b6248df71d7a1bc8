//! Implementation of the [`HalfPowerEstimator`] used for picking which peaks get a damping
//! estimate. With nothing set it behaves exactly like [`crate::damping::find_damping`].
use serde::{Deserialize, Serialize};

use crate::damping::{estimate_peaks, DampingResult, PeakEstimate};
use crate::error::{HalfPowerError, HalfPowerResult};
use crate::peaks::{find_peaks, retain_prominent};

/// A type used to estimate damping from a frequency response.
/// Uses a builder pattern to set the parameters for the estimator.
#[derive(Default, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HalfPowerEstimator {
    /// value that filters peaks based on topographic prominence
    min_prominence: Option<f64>,
    /// value that filters peaks based on amplitude
    min_height: Option<f64>,
    /// lowest peak frequency considered
    min_freq: Option<f64>,
    /// highest peak frequency considered
    max_freq: Option<f64>,
}

impl HalfPowerEstimator {
    /// Initialize a new estimator with every filter unset.
    #[inline]
    pub fn new() -> Self {
        Default::default()
    }

    /// Set the prominence threshold for peaks
    #[inline]
    pub fn with_min_prominence(mut self, v: f64) -> Self {
        self.min_prominence = Some(v);
        self
    }

    /// Set the minimum amplitude for peaks
    #[inline]
    pub fn with_min_height(mut self, v: f64) -> Self {
        self.min_height = Some(v);
        self
    }

    /// Set the lower bound for frequency when searching for peaks
    #[inline]
    pub fn with_min_freq(mut self, v: f64) -> Self {
        self.min_freq = Some(v);
        self
    }

    /// Set the upper bound for frequency when searching for peaks
    #[inline]
    pub fn with_max_freq(mut self, v: f64) -> Self {
        self.max_freq = Some(v);
        self
    }

    pub fn min_prominence(&self) -> Option<f64> {
        self.min_prominence
    }

    pub fn min_height(&self) -> Option<f64> {
        self.min_height
    }

    pub fn min_freq(&self) -> Option<f64> {
        self.min_freq
    }

    pub fn max_freq(&self) -> Option<f64> {
        self.max_freq
    }

    /// Check the settings make sense before running on data.
    pub fn validate(&self) -> HalfPowerResult<()> {
        let settings = [
            ("min_prominence", self.min_prominence),
            ("min_height", self.min_height),
            ("min_freq", self.min_freq),
            ("max_freq", self.max_freq),
        ];
        for (name, value) in settings {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(HalfPowerError::InvalidSetting {
                        name,
                        reason: format!("{} must be finite and non-negative", v),
                    });
                }
            }
        }
        if let (Some(lo), Some(hi)) = (self.min_freq, self.max_freq) {
            if lo > hi {
                return Err(HalfPowerError::InvalidSetting {
                    name: "min_freq",
                    reason: format!("band {}..{} is empty", lo, hi),
                });
            }
        }
        Ok(())
    }

    /// Indices of the peaks that pass every filter, ascending.
    pub fn select_peaks(&self, xy: &[(f64, f64)]) -> Vec<usize> {
        let y = xy.iter().map(|p| p.1).collect::<Vec<f64>>();
        let mut peaks = find_peaks(&y);
        let detected = peaks.len();

        if let Some(p) = self.min_prominence {
            peaks = retain_prominent(&y, &peaks, p);
        }
        peaks.retain(|&m| {
            let (f, amp) = xy[m];
            self.min_height.map_or(true, |h| amp >= h)
                && self.min_freq.map_or(true, |lo| f >= lo)
                && self.max_freq.map_or(true, |hi| f <= hi)
        });

        if peaks.len() < detected {
            tracing::debug!(detected, kept = peaks.len(), "filtered peaks");
        }
        peaks
    }

    /// Per peak diagnostics for the selected peaks.
    pub fn analyze(&self, xy: &[(f64, f64)]) -> Vec<PeakEstimate> {
        estimate_peaks(xy, &self.select_peaks(xy))
    }

    /// Damping ratios of the selected peaks that resolve on both sides.
    pub fn estimate(&self, xy: &[(f64, f64)]) -> DampingResult {
        self.analyze(xy).iter().filter_map(PeakEstimate::sample).collect()
    }
}

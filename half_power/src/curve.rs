use serde::{Deserialize, Serialize};

use crate::error::{HalfPowerError, HalfPowerResult};

/// A sampled frequency response magnitude: `(frequency, amplitude)` pairs with strictly
/// increasing frequency.
///
/// The numeric functions in this crate borrow plain `&[(f64, f64)]` slices and never
/// validate them; `Curve` is the checked owner for callers that load data from outside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<(f64, f64)>", into = "Vec<(f64, f64)>")]
pub struct Curve {
    points: Vec<(f64, f64)>,
}

impl Curve {
    /// Pair up separate frequency and amplitude columns.
    pub fn new(frequencies: &[f64], amplitudes: &[f64]) -> HalfPowerResult<Self> {
        if frequencies.len() != amplitudes.len() {
            return Err(HalfPowerError::LengthMismatch {
                frequencies: frequencies.len(),
                amplitudes: amplitudes.len(),
            });
        }
        Self::from_points(frequencies.iter().copied().zip(amplitudes.iter().copied()).collect())
    }

    /// Take ownership of `(frequency, amplitude)` pairs.
    /// Amplitudes are accepted as given, only the frequency axis is checked.
    pub fn from_points(points: Vec<(f64, f64)>) -> HalfPowerResult<Self> {
        for (index, &(f, _)) in points.iter().enumerate() {
            if !f.is_finite() {
                return Err(HalfPowerError::NonFiniteFrequency { index });
            }
            if index > 0 && f <= points[index - 1].0 {
                return Err(HalfPowerError::NonIncreasingFrequency { index });
            }
        }
        Ok(Self { points })
    }

    #[inline]
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn frequencies(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.0).collect()
    }

    pub fn amplitudes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.1).collect()
    }

    /// Copy of the curve with every amplitude reduced by `dy`.
    pub fn shifted(&self, dy: f64) -> Vec<(f64, f64)> {
        shift_down(&self.points, dy)
    }

    pub fn into_points(self) -> Vec<(f64, f64)> {
        self.points
    }
}

impl TryFrom<Vec<(f64, f64)>> for Curve {
    type Error = HalfPowerError;

    fn try_from(points: Vec<(f64, f64)>) -> Result<Self, Self::Error> {
        Self::from_points(points)
    }
}

impl From<Curve> for Vec<(f64, f64)> {
    fn from(curve: Curve) -> Self {
        curve.points
    }
}

impl AsRef<[(f64, f64)]> for Curve {
    fn as_ref(&self) -> &[(f64, f64)] {
        &self.points
    }
}

#[inline]
pub(crate) fn shift_down(xy: &[(f64, f64)], dy: f64) -> Vec<(f64, f64)> {
    xy.iter().map(|&(x, y)| (x, y - dy)).collect()
}

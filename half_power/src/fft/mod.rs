use num_complex::Complex;
use rustfft::algorithm::Radix4;
use rustfft::Fft;
use window::RealWindowFn;

use crate::curve::Curve;
use crate::error::{HalfPowerError, HalfPowerResult};

pub mod window;

/// A structure for calculating FFTs
pub struct FftCalculator {
    fft_planner: Radix4<f64>,
    // the size passed to create the fft planner
    pub size: usize,
    pub zero_pad_length: usize,
    internal_buf: Vec<f64>,
}

impl FftCalculator {
    /// Construct a new Fft calculator with given size and zero pad length
    /// # Arguments
    /// * `size` - the size of the fft to calculate
    /// * `zero_pad_length` - the amount of zero padding to add to end of an input signal
    /// # Note: `size` + `zero_pad_length` should be a power of 2.
    pub fn new(size: usize, zero_pad_length: usize) -> HalfPowerResult<Self> {
        if !(size + zero_pad_length).is_power_of_two() {
            return Err(HalfPowerError::InvalidFftSize { size, zero_pad: zero_pad_length });
        }
        Ok(Self {
            fft_planner: Radix4::new(size + zero_pad_length, rustfft::FftDirection::Forward),
            size,
            zero_pad_length,
            internal_buf: vec![0_f64; size],
        })
    }

    /// Calculator that pads `size` samples up to the next power of two.
    pub fn padded(size: usize) -> HalfPowerResult<Self> {
        let total = size.max(1).next_power_of_two();
        Self::new(size, total - size)
    }

    #[inline]
    pub fn total_len(&self) -> usize {
        self.size + self.zero_pad_length
    }

    /// Computes the fft of the given real-valued signal
    pub fn real_fft(&mut self, samples: &[f64], window_fn: RealWindowFn) -> HalfPowerResult<Vec<Complex<f64>>> {
        if samples.len() != self.size {
            return Err(HalfPowerError::LengthMismatch { frequencies: self.size, amplitudes: samples.len() });
        }
        self.internal_buf.copy_from_slice(samples);
        window_fn(&mut self.internal_buf[..]);
        let mut out = Vec::with_capacity(self.total_len());
        out.extend(self.internal_buf.iter().map(|&v| Complex::<f64>::new(v, 0.0)));
        out.resize(self.total_len(), Complex::<f64>::new(0.0, 0.0));
        self.fft_planner.process(&mut out[..]);
        Ok(out)
    }
}

/// Magnitude frequency response of a recorded impulse response.
///
/// Returns bins `0..=N/2` of the zero padded transform as `(k * sample_rate / N, |X[k]|)`.
pub fn magnitude_response(samples: &[f64], sample_rate: f64, window_fn: RealWindowFn) -> HalfPowerResult<Curve> {
    if samples.len() < 2 {
        return Err(HalfPowerError::InsufficientData { needed: 2, got: samples.len() });
    }
    if !(sample_rate.is_finite() && sample_rate > 0.0) {
        return Err(HalfPowerError::InvalidSetting {
            name: "sample_rate",
            reason: format!("{} is not a positive frequency", sample_rate),
        });
    }
    let mut calc = FftCalculator::padded(samples.len())?;
    let n = calc.total_len();
    let spectrum = calc.real_fft(samples, window_fn)?;
    let points = spectrum[..=n / 2]
        .iter()
        .enumerate()
        .map(|(k, v)| (k as f64 * sample_rate / n as f64, v.norm()))
        .collect();
    Curve::from_points(points)
}

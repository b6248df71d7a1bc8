use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

pub type RealWindowFn = fn(&mut [f64]);

pub trait WindowFunction {
    // applies window function to the buffer
    fn real_window(buffer: &mut [f64]);
}

/// Blackman-Harris taper. Strong leakage suppression, at the cost of a wider main lobe that
/// inflates the measured bandwidth of lightly damped peaks.
pub struct BlackmanHarris;

impl WindowFunction for BlackmanHarris {
    fn real_window(buffer: &mut [f64]) {
        let size = buffer.len() as f64;
        for (i, v) in buffer.iter_mut().enumerate() {
            let phase = i as f64 * PI / size;
            *v *= 0.35875 - 0.48829 * (2.0 * phase).cos() + 0.14128 * (4.0 * phase).cos()
                - 0.01168 * (6.0 * phase).cos();
        }
    }
}

pub struct Rectangular;

impl WindowFunction for Rectangular {
    fn real_window(_buffer: &mut [f64]) {}
}

/// Window selection as it appears in configuration files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowKind {
    /// An impulse response that has decayed inside the record needs no taper.
    #[default]
    Rectangular,
    BlackmanHarris,
}

impl WindowKind {
    pub fn window_fn(self) -> RealWindowFn {
        match self {
            WindowKind::Rectangular => Rectangular::real_window,
            WindowKind::BlackmanHarris => BlackmanHarris::real_window,
        }
    }
}

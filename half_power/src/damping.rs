//! Half power bandwidth damping estimation.
//!
//! For each peak the curve is shifted down by `amplitude / √2` and the zero crossings of
//! the shifted curve are searched between the previous peak and this one (left) and between
//! this peak and the next one (right). The crossings nearest the peak bound the half power
//! bandwidth `Δf`, giving `Q = f_n / Δf` and `ζ = 1 / (2Q)`.

use std::f64::consts::SQRT_2;

use serde::{Deserialize, Serialize};

use crate::curve::shift_down;
use crate::peaks::find_peaks;
use crate::roots::interp_roots;

/// One resolved resonance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DampingSample {
    /// Peak frequency
    pub frequency: f64,
    /// Critical damping ratio ζ
    pub ratio: f64,
}

impl DampingSample {
    #[inline]
    pub fn quality_factor(&self) -> f64 {
        1.0 / (2.0 * self.ratio)
    }
}

/// Damping samples in ascending frequency order. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DampingResult {
    samples: Vec<DampingSample>,
}

impl DampingResult {
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<DampingSample> {
        self.samples.iter()
    }

    pub fn samples(&self) -> &[DampingSample] {
        &self.samples
    }

    pub fn frequencies(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.frequency).collect()
    }

    pub fn ratios(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.ratio).collect()
    }

    /// `(frequency, ratio)` rows, the layout hosts plot.
    pub fn to_points(&self) -> Vec<(f64, f64)> {
        self.samples.iter().map(|s| (s.frequency, s.ratio)).collect()
    }
}

impl IntoIterator for DampingResult {
    type Item = DampingSample;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.into_iter()
    }
}

impl<'a> IntoIterator for &'a DampingResult {
    type Item = &'a DampingSample;
    type IntoIter = std::slice::Iter<'a, DampingSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

impl FromIterator<DampingSample> for DampingResult {
    fn from_iter<I: IntoIterator<Item = DampingSample>>(iter: I) -> Self {
        Self { samples: iter.into_iter().collect() }
    }
}

/// Which side of a peak never reached the half power level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingSide {
    Left,
    Right,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PeakStatus {
    Resolved { quality_factor: f64, damping_ratio: f64 },
    Unresolved(MissingSide),
}

/// Everything learned about one detected peak, resolved or not.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakEstimate {
    pub index: usize,
    pub frequency: f64,
    pub amplitude: f64,
    /// Half power level `amplitude / √2`
    pub threshold: f64,
    /// Last half power crossing below the peak frequency
    pub left_crossing: Option<f64>,
    /// First half power crossing above the peak frequency
    pub right_crossing: Option<f64>,
    pub status: PeakStatus,
}

impl PeakEstimate {
    pub fn sample(&self) -> Option<DampingSample> {
        match self.status {
            PeakStatus::Resolved { damping_ratio, .. } => Some(DampingSample { frequency: self.frequency, ratio: damping_ratio }),
            PeakStatus::Unresolved(_) => None,
        }
    }

    pub fn bandwidth(&self) -> Option<f64> {
        Some(self.right_crossing? - self.left_crossing?)
    }
}

/// Edge of a peak's search window. `End` reaches the last sample whatever the curve length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WindowBound {
    Index(usize),
    End,
}

/// Closed sub-range `[from, to]` of `xy`.
fn window(xy: &[(f64, f64)], from: usize, to: WindowBound) -> &[(f64, f64)] {
    match to {
        WindowBound::Index(k) => &xy[from..=k],
        WindowBound::End => &xy[from..],
    }
}

/// Estimate critical damping for every peak of `xy` whose half power level is crossed on both
/// sides. Unresolved peaks are left out.
pub fn find_damping(xy: &[(f64, f64)]) -> DampingResult {
    analyze_peaks(xy).iter().filter_map(PeakEstimate::sample).collect()
}

/// Same traversal as [`find_damping`], keeping a record for every detected peak.
pub fn analyze_peaks(xy: &[(f64, f64)]) -> Vec<PeakEstimate> {
    let y = xy.iter().map(|p| p.1).collect::<Vec<f64>>();
    estimate_peaks(xy, &find_peaks(&y))
}

/// Run the half power estimate for the given ascending peak indices. Each peak's window runs
/// from the previous peak (or the first sample) to the next peak (or the last sample).
pub(crate) fn estimate_peaks(xy: &[(f64, f64)], peaks: &[usize]) -> Vec<PeakEstimate> {
    if peaks.is_empty() {
        return vec![];
    }
    let bounds = std::iter::once(WindowBound::Index(0))
        .chain(peaks.iter().map(|&p| WindowBound::Index(p)))
        .chain(std::iter::once(WindowBound::End))
        .collect::<Vec<WindowBound>>();

    let mut out = Vec::with_capacity(peaks.len());
    for w in bounds.windows(3) {
        let (i, j, k) = match (w[0], w[1]) {
            (WindowBound::Index(i), WindowBound::Index(j)) => (i, j, w[2]),
            // only the last bound is End
            _ => continue,
        };
        out.push(estimate_single(xy, i, j, k));
    }
    out
}

fn estimate_single(xy: &[(f64, f64)], i: usize, j: usize, k: WindowBound) -> PeakEstimate {
    let (frequency, amplitude) = xy[j];
    let threshold = amplitude / SQRT_2;
    let half_power = shift_down(xy, threshold);

    let left_crossing = interp_roots(window(&half_power, i, WindowBound::Index(j))).last().copied();
    let right_crossing = interp_roots(window(&half_power, j, k)).first().copied();

    let status = match (left_crossing, right_crossing) {
        (Some(left), Some(right)) => {
            let quality_factor = frequency / (right - left);
            let damping_ratio = 1.0 / (2.0 * quality_factor);
            tracing::trace!(index = j, frequency, quality_factor, damping_ratio, "resolved peak");
            PeakStatus::Resolved { quality_factor, damping_ratio }
        }
        (None, Some(_)) => PeakStatus::Unresolved(MissingSide::Left),
        (Some(_), None) => PeakStatus::Unresolved(MissingSide::Right),
        (None, None) => PeakStatus::Unresolved(MissingSide::Both),
    };
    if let PeakStatus::Unresolved(side) = status {
        tracing::debug!(index = j, frequency, ?side, "half power level not crossed, dropping peak");
    }

    PeakEstimate {
        index: j,
        frequency,
        amplitude,
        threshold,
        left_crossing,
        right_crossing,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn sine_720() -> Vec<(f64, f64)> {
        (0..720).map(|k| (k as f64, (k as f64).to_radians().sin())).collect()
    }

    /// Displacement magnitude of a single degree of freedom oscillator.
    fn sdof(f: f64, f_n: f64, zeta: f64) -> f64 {
        let r = f / f_n;
        1.0 / ((1.0 - r * r).powi(2) + (2.0 * zeta * r).powi(2)).sqrt()
    }

    #[test]
    fn test_two_period_sine() {
        let result = find_damping(&sine_720());
        assert_eq!(result.len(), 2);
        let rows = result.to_points();
        assert_eq!(rows[0].0, 90.0);
        assert_relative_eq!(rows[0].1, 0.5, epsilon = 1e-9);
        assert_eq!(rows[1].0, 450.0);
        assert_relative_eq!(rows[1].1, 0.1, epsilon = 1e-9);
    }

    #[test]
    fn test_sine_crossings() {
        let estimates = analyze_peaks(&sine_720());
        assert_eq!(estimates.len(), 2);
        assert_abs_diff_eq!(estimates[0].left_crossing.unwrap(), 45.0, epsilon = 1e-9);
        assert_abs_diff_eq!(estimates[0].right_crossing.unwrap(), 135.0, epsilon = 1e-9);
        // the second peak's left window reaches back to the first peak
        assert_abs_diff_eq!(estimates[1].left_crossing.unwrap(), 405.0, epsilon = 1e-9);
        assert_abs_diff_eq!(estimates[1].right_crossing.unwrap(), 495.0, epsilon = 1e-9);
        assert_abs_diff_eq!(estimates[1].bandwidth().unwrap(), 90.0, epsilon = 1e-9);
    }

    #[test]
    fn test_monotonic_is_empty() {
        let xy = (0..100).map(|k| (k as f64, (k as f64).sqrt())).collect::<Vec<(f64, f64)>>();
        assert!(find_damping(&xy).is_empty());
        assert!(analyze_peaks(&xy).is_empty());
        assert!(find_damping(&[]).is_empty());
    }

    #[test]
    fn test_sdof_resonance() {
        let (f_n, zeta) = (100.0, 0.02);
        let xy = (0..4000).map(|k| {
            let f = 0.05 * k as f64;
            (f, sdof(f, f_n, zeta))
        }).collect::<Vec<(f64, f64)>>();
        let result = find_damping(&xy);
        assert_eq!(result.len(), 1);
        let s = result.samples()[0];
        assert_abs_diff_eq!(s.frequency, f_n * (1.0 - 2.0 * zeta * zeta).sqrt(), epsilon = 0.05);
        assert_relative_eq!(s.ratio, zeta, max_relative = 0.02);
        assert_relative_eq!(s.quality_factor(), 1.0 / (2.0 * zeta), max_relative = 0.02);
    }

    #[test]
    fn test_two_modes() {
        let xy = (1..6000).map(|k| {
            let f = 0.1 * k as f64;
            (f, sdof(f, 120.0, 0.01) + 0.5 * sdof(f, 410.0, 0.03))
        }).collect::<Vec<(f64, f64)>>();
        let result = find_damping(&xy);
        assert_eq!(result.len(), 2);
        assert_relative_eq!(result.samples()[0].ratio, 0.01, max_relative = 0.05);
        assert_relative_eq!(result.samples()[1].ratio, 0.03, max_relative = 0.05);
        assert!(result.samples()[0].frequency < result.samples()[1].frequency);
    }

    #[test]
    fn test_edge_peak_dropped() {
        // still rising towards the peak at the first sample, so no left crossing
        let xy = [(0.0, 0.9), (1.0, 1.0), (2.0, 0.5), (3.0, 0.1)];
        assert!(find_damping(&xy).is_empty());
        let estimates = analyze_peaks(&xy);
        assert_eq!(estimates.len(), 1);
        assert_eq!(estimates[0].status, PeakStatus::Unresolved(MissingSide::Left));
        assert_eq!(estimates[0].left_crossing, None);
        assert_abs_diff_eq!(estimates[0].right_crossing.unwrap(), 1.0 + (1.0 - 1.0 / SQRT_2) / 0.5, epsilon = 1e-12);
        assert_eq!(estimates[0].sample(), None);
    }

    #[test]
    fn test_right_edge_peak() {
        let xy = [(0.0, 0.1), (1.0, 0.5), (2.0, 1.0), (3.0, 0.95)];
        let estimates = analyze_peaks(&xy);
        assert_eq!(estimates.len(), 1);
        assert_eq!(estimates[0].status, PeakStatus::Unresolved(MissingSide::Right));
    }

    #[test]
    fn test_zero_curve() {
        // every interior sample is a (flat) peak with zero threshold; nothing is reported as
        // an error and the result stays ordered
        let xy = (0..6).map(|k| (k as f64, 0.0)).collect::<Vec<(f64, f64)>>();
        let estimates = analyze_peaks(&xy);
        assert_eq!(estimates.len(), 4);
        let result = find_damping(&xy);
        assert!(result.len() <= estimates.len());
    }

    #[test]
    fn test_overlapping_peaks() {
        // the valley between the peaks never drops below either half power level
        let xy = [(0.0, 0.0), (1.0, 1.0), (2.0, 0.9), (3.0, 1.0), (4.0, 0.0)];
        let estimates = analyze_peaks(&xy);
        assert_eq!(estimates.len(), 2);
        assert_eq!(estimates[0].status, PeakStatus::Unresolved(MissingSide::Right));
        assert_eq!(estimates[1].status, PeakStatus::Unresolved(MissingSide::Left));
        assert!(find_damping(&xy).is_empty());
    }

    #[test]
    fn test_window_bounds() {
        let xy = [(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)];
        assert_eq!(window(&xy, 1, WindowBound::End), &xy[1..]);
        assert_eq!(window(&xy, 0, WindowBound::Index(1)), &xy[..2]);
        assert_eq!(window(&xy, 2, WindowBound::Index(2)), &xy[2..]);
    }

    #[test]
    fn test_deterministic() {
        let xy = sine_720();
        let a = find_damping(&xy);
        let b = find_damping(&xy);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.frequency.to_bits(), y.frequency.to_bits());
            assert_eq!(x.ratio.to_bits(), y.ratio.to_bits());
        }
    }

    #[test]
    fn test_random_curves_ordering() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let n = rng.gen_range(0..60);
            let mut f = 0.0;
            let xy = (0..n).map(|_| {
                f += rng.gen_range(0.1..5.0);
                (f, rng.gen_range(0.0..10.0))
            }).collect::<Vec<(f64, f64)>>();

            let y = xy.iter().map(|p| p.1).collect::<Vec<f64>>();
            let peak_freqs = find_peaks(&y).into_iter().map(|m| xy[m].0).collect::<Vec<f64>>();
            let result = find_damping(&xy);
            assert!(result.len() <= peak_freqs.len());

            let freqs = result.frequencies();
            assert!(freqs.windows(2).all(|w| w[0] < w[1]));
            assert!(freqs.iter().all(|f| peak_freqs.contains(f)));
            assert_eq!(result, find_damping(&xy));
        }
    }
}

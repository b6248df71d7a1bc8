//! Slope based local maximum detection.

/// Indices of the local maxima of `y`, ascending.
///
/// Sample `m` is a peak when the slope entering it and the slope leaving it do not have the
/// same strict sign (`d[m-1] * d[m] <= 0`) and the slope does not increase across it
/// (`d[m] <= d[m-1]`). The second condition rejects minima. Flat tops qualify on every
/// flat sample. The first and last samples are never peaks.
pub fn find_peaks(y: &[f64]) -> Vec<usize> {
    if y.len() < 3 {
        return vec![];
    }
    let d = y.windows(2).map(|w| w[1] - w[0]).collect::<Vec<f64>>();
    d.windows(2)
        .enumerate()
        .filter(|(_, s)| s[0] * s[1] <= 0.0 && s[1] <= s[0])
        .map(|(k, _)| k + 1)
        .collect()
}

/// Keep the peaks in `peaks` that the prominence-aware finder also reports with at least
/// `min_prominence`. A plateau is reported once, at its middle sample.
pub fn retain_prominent(y: &[f64], peaks: &[usize], min_prominence: f64) -> Vec<usize> {
    let mut finder = find_peaks::PeakFinder::new(y);
    finder.with_min_prominence(min_prominence);
    let mut prominent = finder
        .find_peaks()
        .into_iter()
        .map(|p| p.middle_position())
        .collect::<Vec<usize>>();
    prominent.sort_unstable();
    peaks
        .iter()
        .copied()
        .filter(|m| prominent.binary_search(m).is_ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine_720() -> Vec<f64> {
        (0..720).map(|k| (k as f64).to_radians().sin()).collect()
    }

    #[test]
    fn test_two_period_sine() {
        assert_eq!(find_peaks(&sine_720()), vec![90, 450]);
    }

    #[test]
    fn test_minima_excluded() {
        let peaks = find_peaks(&sine_720());
        assert!(!peaks.contains(&270));
        assert!(!peaks.contains(&630));
    }

    #[test]
    fn test_short_input() {
        assert!(find_peaks(&[]).is_empty());
        assert!(find_peaks(&[1.0]).is_empty());
        assert!(find_peaks(&[0.0, 1.0]).is_empty());
        assert_eq!(find_peaks(&[0.0, 1.0, 0.0]), vec![1]);
    }

    #[test]
    fn test_monotonic() {
        let rising = (0..50).map(|v| v as f64 * 0.3).collect::<Vec<f64>>();
        assert!(find_peaks(&rising).is_empty());
        let falling = rising.iter().rev().copied().collect::<Vec<f64>>();
        assert!(find_peaks(&falling).is_empty());
    }

    #[test]
    fn test_flat_top() {
        // every sample of the plateau qualifies
        assert_eq!(find_peaks(&[0.0, 1.0, 1.0, 1.0, 0.0]), vec![1, 2, 3]);
        // a flat bottom does not
        assert!(find_peaks(&[1.0, 0.0, 0.0, 1.0]).is_empty());
    }

    #[test]
    fn test_shoulder() {
        // rising into a flat step then rising again: slope 1 -> 0 is non-increasing
        assert_eq!(find_peaks(&[0.0, 1.0, 1.0, 2.0]), vec![1]);
    }

    #[test]
    fn test_constant() {
        assert_eq!(find_peaks(&[2.0; 5]), vec![1, 2, 3]);
    }

    #[test]
    fn test_prominence_filter() {
        // large peak at 2, small ripple at 6
        let y = [0.0, 5.0, 10.0, 5.0, 1.0, 1.2, 1.4, 1.1, 0.0];
        let peaks = find_peaks(&y);
        assert_eq!(peaks, vec![2, 6]);
        assert_eq!(retain_prominent(&y, &peaks, 2.0), vec![2]);
        assert_eq!(retain_prominent(&y, &peaks, 0.1), vec![2, 6]);
    }
}

/// Estimate every `x` where the piecewise linear curve through `xy` crosses `y = 0`.
///
/// Each adjacent pair with `y0 * y1 <= 0` contributes one root. A pair lying flat on zero
/// contributes its start. Roots come back sorted ascending with exact duplicates removed,
/// so a sample sitting exactly on zero is reported once.
pub fn interp_roots(xy: &[(f64, f64)]) -> Vec<f64> {
    let mut roots = xy
        .windows(2)
        .filter(|w| w[0].1 * w[1].1 <= 0.0)
        .map(|w| {
            let ((x0, y0), (x1, y1)) = (w[0], w[1]);
            if y0 == y1 {
                x0
            } else {
                x0 - y0 * (x1 - x0) / (y1 - y0)
            }
        })
        .collect::<Vec<f64>>();
    roots.sort_by(|a, b| a.total_cmp(b));
    roots.dedup();
    roots
}

/// Evenly spaced values in the half-open interval `[start, stop)`.
///
/// The count is computed up front so that accumulated rounding never adds or
/// drops an end point.
pub fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if step == 0.0 || !((stop - start) / step).is_finite() {
        return Vec::new();
    }
    let count = ((stop - start) / step).ceil().max(0.0) as usize;
    (0..count).map(|i| start + i as f64 * step).collect()
}

/// Concatenation of several [`arange`] segments.
pub fn segments(ranges: &[(f64, f64, f64)]) -> Vec<f64> {
    ranges
        .iter()
        .flat_map(|&(start, stop, step)| arange(start, stop, step))
        .collect()
}

/// Sorted copy of `values` with exact duplicates removed.
pub fn unique_sorted(mut values: Vec<f64>) -> Vec<f64> {
    values.sort_by(|a, b| a.total_cmp(b));
    values.dedup();
    values
}

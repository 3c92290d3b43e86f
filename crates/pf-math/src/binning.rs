//! Threshold binning of scalar values.
//!
//! A sequence of `n` ascending edges defines `n + 1` bins:
//! - bin `0` holds values below `edges[0]`
//! - bin `i` holds values in `[edges[i-1], edges[i])`
//! - bin `n` holds values at or above `edges[n-1]`
//!
//! The edges are never sorted or validated here. Callers that accept edges
//! from outside should check them with [`is_strictly_increasing`] first.

/// Bin index for `value` given ascending `edges`.
///
/// Returns the smallest `i` with `value < edges[i]`, or `edges.len()` when no
/// edge exceeds the value. A value equal to an edge lands in the bin above.
/// NaN never compares less than an edge and falls into the overflow bin.
pub fn categorize(value: f64, edges: &[f64]) -> usize {
    edges
        .iter()
        .position(|&edge| value < edge)
        .unwrap_or(edges.len())
}

/// Bin every value independently, preserving order.
pub fn categorize_all(values: &[f64], edges: &[f64]) -> Vec<usize> {
    values.iter().map(|&v| categorize(v, edges)).collect()
}

/// Number of bins defined by `edges`.
pub fn bin_count(edges: &[f64]) -> usize {
    edges.len() + 1
}

/// Index of the overflow bin (values at or above the last edge).
pub fn overflow_bin(edges: &[f64]) -> usize {
    edges.len()
}

/// True when every edge is finite and strictly greater than the previous one.
pub fn is_strictly_increasing(edges: &[f64]) -> bool {
    edges.iter().all(|e| e.is_finite()) && edges.windows(2).all(|w| w[0] < w[1])
}

//! Property-based tests for pf-math binning.
//!
//! Uses proptest to verify the binning contract across many random inputs.

use proptest::prelude::*;
use pf_math::{bin_count, categorize, categorize_all};

/// Strictly increasing, finite edges built from positive gaps.
fn sorted_edges() -> impl Strategy<Value = Vec<f64>> {
    (-1_000.0..1_000.0f64, prop::collection::vec(0.01..100.0f64, 0..12)).prop_map(
        |(start, gaps)| {
            let mut edges = Vec::with_capacity(gaps.len());
            let mut current = start;
            for gap in gaps {
                edges.push(current);
                current += gap;
            }
            edges
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// The bin index is always a valid bin.
    #[test]
    fn categorize_in_range(p in -5_000.0..5_000.0f64, edges in sorted_edges()) {
        let bin = categorize(p, &edges);
        prop_assert!(bin <= edges.len(), "bin {} out of range for {} edges", bin, edges.len());
        prop_assert!(bin < bin_count(&edges));
    }

    /// Larger values never land in a lower bin.
    #[test]
    fn categorize_monotone(a in -5_000.0..5_000.0f64, b in -5_000.0..5_000.0f64, edges in sorted_edges()) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(categorize(lo, &edges) <= categorize(hi, &edges),
            "categorize({})={} > categorize({})={}", lo, categorize(lo, &edges), hi, categorize(hi, &edges));
    }

    /// A value equal to edge i is never placed in bin i.
    #[test]
    fn edge_value_goes_above(edges in sorted_edges()) {
        for (i, &edge) in edges.iter().enumerate() {
            let bin = categorize(edge, &edges);
            prop_assert!(bin > i, "categorize(edges[{}]={}) = {}", i, edge, bin);
        }
    }

    /// The chosen bin actually brackets the value.
    #[test]
    fn bin_brackets_value(p in -5_000.0..5_000.0f64, edges in sorted_edges()) {
        let bin = categorize(p, &edges);
        if bin > 0 {
            prop_assert!(p >= edges[bin - 1]);
        }
        if bin < edges.len() {
            prop_assert!(p < edges[bin]);
        }
    }

    /// Vector binning agrees with scalar binning element-wise.
    #[test]
    fn categorize_all_matches_scalar(values in prop::collection::vec(-5_000.0..5_000.0f64, 0..64), edges in sorted_edges()) {
        let bins = categorize_all(&values, &edges);
        prop_assert_eq!(bins.len(), values.len());
        for (v, b) in values.iter().zip(&bins) {
            prop_assert_eq!(*b, categorize(*v, &edges));
        }
    }
}

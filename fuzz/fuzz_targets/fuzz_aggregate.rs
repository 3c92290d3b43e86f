//! Fuzz target for binning, aggregation and diagram building.
//!
//! Checks the structural invariants on arbitrary values and edges: bins stay
//! in range, flow is conserved, and validated edges always yield a diagram.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pf_core::{generate_flows, ReplayModel, ReplaySnapshot};
use pf_report::{DiagramLayout, SankeyDiagram};

#[derive(Debug, Arbitrary)]
struct Input {
    edges: Vec<f64>,
    paths: u8,
    values: Vec<f64>,
}

fuzz_target!(|input: Input| {
    for &v in &input.values {
        assert!(pf_math::categorize(v, &input.edges) <= input.edges.len());
    }

    let paths = usize::from(input.paths.max(1));
    let snapshots: Vec<ReplaySnapshot> = input
        .values
        .chunks_exact(paths)
        .enumerate()
        .map(|(i, chunk)| ReplaySnapshot::new(i as f64).with_asset("SPX", chunk.to_vec()))
        .collect();
    if snapshots.is_empty() {
        return;
    }
    let times: Vec<f64> = (0..snapshots.len()).map(|i| i as f64).collect();
    let Ok(mut model) = ReplayModel::from_snapshots(snapshots) else {
        return;
    };

    let flows = generate_flows(&mut model, "SPX", &times, &input.edges)
        .expect("consistent snapshots always aggregate");
    for t in 0..times.len().saturating_sub(1) {
        assert_eq!(flows.outgoing_total(t), paths as u64);
        assert_eq!(flows.incoming_total(t + 1), paths as u64);
    }

    if pf_config::validate::validate_bins(&input.edges).is_ok() {
        SankeyDiagram::build(&flows, &times, &input.edges, DiagramLayout::default())
            .expect("validated edges always label every bin");
    }
});

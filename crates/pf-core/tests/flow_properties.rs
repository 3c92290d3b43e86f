//! Property-based tests for flow aggregation invariants.

use pf_common::NodeKey;
use pf_core::generate_flows;
use pf_core::mock_model::ScriptedModel;
use pf_math::categorize_all;
use pf_report::{DiagramLayout, SankeyDiagram};
use proptest::prelude::*;

/// Strictly increasing integer-valued edges.
fn sorted_edges() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::btree_set(-500i32..500, 1..6)
        .prop_map(|set| set.into_iter().map(f64::from).collect())
}

/// `(paths, times)`: each path has one value per time.
fn path_grid() -> impl Strategy<Value = (Vec<Vec<f64>>, Vec<f64>)> {
    (1usize..8, 0usize..6).prop_flat_map(|(path_count, time_count)| {
        let paths = prop::collection::vec(
            prop::collection::vec(-600.0f64..600.0, time_count),
            path_count,
        );
        let times = prop::collection::vec(0.0f64..1.0, time_count).prop_map(|mut t| {
            t.sort_by(|a, b| a.partial_cmp(b).unwrap());
            t
        });
        (paths, times)
    })
}

proptest! {
    #[test]
    fn consecutive_time_pairs_only((paths, times) in path_grid(), edges in sorted_edges()) {
        let mut model = ScriptedModel::from_paths("SPX", &paths);
        let flows = generate_flows(&mut model, "SPX", &times, &edges).unwrap();

        let pairs = flows.time_pairs();
        prop_assert_eq!(pairs.len(), times.len().saturating_sub(1));
        for (from, to) in pairs {
            prop_assert_eq!(to, from + 1);
        }
    }

    #[test]
    fn flow_is_conserved((paths, times) in path_grid(), edges in sorted_edges()) {
        let mut model = ScriptedModel::from_paths("SPX", &paths);
        let flows = generate_flows(&mut model, "SPX", &times, &edges).unwrap();
        let path_count = paths.len() as u64;

        for t in 0..times.len().saturating_sub(1) {
            prop_assert_eq!(flows.outgoing_total(t), path_count);
            prop_assert_eq!(flows.incoming_total(t + 1), path_count);
        }
        prop_assert_eq!(
            flows.total(),
            path_count * times.len().saturating_sub(1) as u64
        );
    }

    #[test]
    fn node_flow_matches_bin_occupancy((paths, times) in path_grid(), edges in sorted_edges()) {
        let mut model = ScriptedModel::from_paths("SPX", &paths);
        let flows = generate_flows(&mut model, "SPX", &times, &edges).unwrap();
        let occupancy = |t: usize, b: usize| {
            let column: Vec<f64> = paths.iter().map(|p| p[t]).collect();
            categorize_all(&column, &edges).iter().filter(|&&x| x == b).count() as u64
        };

        for t in 0..times.len().saturating_sub(1) {
            for b in 0..=edges.len() {
                prop_assert_eq!(flows.outgoing_from(NodeKey::new(t, b)), occupancy(t, b));

                let incoming: u64 = flows
                    .iter()
                    .filter(|(k, _)| k.target() == NodeKey::new(t + 1, b))
                    .map(|(_, count)| count)
                    .sum();
                prop_assert_eq!(incoming, occupancy(t + 1, b));
            }
        }
    }

    #[test]
    fn node_count_is_bounded((paths, times) in path_grid(), edges in sorted_edges()) {
        let mut model = ScriptedModel::from_paths("SPX", &paths);
        let flows = generate_flows(&mut model, "SPX", &times, &edges).unwrap();
        let diagram =
            SankeyDiagram::build(&flows, &times, &edges, DiagramLayout::default()).unwrap();

        prop_assert_eq!(diagram.nodes.len(), flows.node_keys().len());
        prop_assert!(diagram.nodes.len() <= times.len() * (edges.len() + 1));
        for node in &diagram.nodes {
            prop_assert!(node.key.bin <= edges.len());
        }
        prop_assert_eq!(diagram.total_flow(), flows.total());
        prop_assert_eq!(diagram.annotations.len(), times.len());
    }

    #[test]
    fn constant_paths_never_change_bin(
        values in prop::collection::vec(-600.0f64..600.0, 1..8),
        time_count in 2usize..6,
        edges in sorted_edges(),
    ) {
        let paths: Vec<Vec<f64>> = values.iter().map(|&v| vec![v; time_count]).collect();
        let times: Vec<f64> = (0..time_count).map(|i| i as f64).collect();
        let mut model = ScriptedModel::from_paths("SPX", &paths);
        let flows = generate_flows(&mut model, "SPX", &times, &edges).unwrap();

        for (key, _) in flows.iter() {
            prop_assert_eq!(key.from_bin, key.to_bin);
        }
        let diagram =
            SankeyDiagram::build(&flows, &times, &edges, DiagramLayout::default()).unwrap();
        for link in &diagram.links {
            prop_assert_ne!(link.source, link.target);
        }
    }

    #[test]
    fn model_is_driven_once_in_order((paths, times) in path_grid(), edges in sorted_edges()) {
        let mut model = ScriptedModel::from_paths("SPX", &paths);
        generate_flows(&mut model, "SPX", &times, &edges).unwrap();
        prop_assert_eq!(model.reset_count(), 1);
        prop_assert_eq!(model.advanced_times(), times);
    }
}

//! Sankey diagram construction from transition counts.
//!
//! Nodes are the occupied (time index, bin) pairs. Each node is placed at
//! `x = times[time_index]` and `y = 1 - bin * 0.4`, so nodes line up by
//! simulation time and lower price ranges sit higher on the page. Labels
//! depend only on the bin, never on the time index.

use std::collections::BTreeMap;

use pf_common::{FlowCounts, NodeKey};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ReportError, Result};

/// Vertical distance between adjacent bin levels.
pub const NODE_Y_SPACING: f64 = 0.4;

/// Vertical position of the time-axis annotations.
pub const ANNOTATION_Y: f64 = 1.0;

/// One diagram vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub key: NodeKey,
    pub label: String,
    pub x: f64,
    pub y: f64,
}

/// One weighted diagram edge, by node index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub source: usize,
    pub target: usize,
    pub value: u64,
}

/// A text marker placed on the plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub show_arrow: bool,
}

impl Annotation {
    /// The `t=<time>` marker drawn above each sample time.
    pub fn time_marker(time: f64) -> Self {
        Annotation {
            x: time,
            y: ANNOTATION_Y,
            text: format!("t={:.1}", time),
            show_arrow: true,
        }
    }
}

/// Title, font and canvas size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramLayout {
    pub title: String,
    pub font_size: f64,
    pub width: u32,
    pub height: u32,
}

impl Default for DiagramLayout {
    fn default() -> Self {
        DiagramLayout {
            title: "SPX Price Transitions".to_string(),
            font_size: 10.0,
            width: 800,
            height: 400,
        }
    }
}

/// Everything a renderer needs to draw the diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SankeyDiagram {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
    pub annotations: Vec<Annotation>,
    pub layout: DiagramLayout,
}

impl SankeyDiagram {
    /// Build the diagram for `flows` sampled at `times` with bin `edges`.
    ///
    /// Node indices follow (time index, bin) order; links follow transition
    /// key order. One annotation is emitted per entry of `times`, including
    /// repeated or unoccupied times.
    pub fn build(
        flows: &FlowCounts,
        times: &[f64],
        edges: &[f64],
        layout: DiagramLayout,
    ) -> Result<Self> {
        let keys = flows.node_keys();
        let mut index: BTreeMap<NodeKey, usize> = BTreeMap::new();
        let mut nodes = Vec::with_capacity(keys.len());

        for key in keys {
            let label = bin_label(key.bin, edges).ok_or_else(|| {
                ReportError::InvalidInput(format!(
                    "bin {} cannot be labelled with {} edge(s)",
                    key.bin,
                    edges.len()
                ))
            })?;
            let x = *times.get(key.time_index).ok_or_else(|| {
                ReportError::InvalidInput(format!(
                    "time index {} out of range for {} time point(s)",
                    key.time_index,
                    times.len()
                ))
            })?;
            index.insert(key, nodes.len());
            nodes.push(Node {
                key,
                label,
                x,
                y: node_y(key.bin),
            });
        }

        let links = flows
            .iter()
            .map(|(key, count)| Link {
                source: index[&key.source()],
                target: index[&key.target()],
                value: count,
            })
            .collect::<Vec<_>>();

        let annotations = times.iter().map(|&t| Annotation::time_marker(t)).collect();

        debug!(
            nodes = nodes.len(),
            links = links.len(),
            "Built sankey diagram"
        );

        Ok(SankeyDiagram {
            nodes,
            links,
            annotations,
            layout,
        })
    }

    /// Node index for a (time index, bin) pair, if that pair is occupied.
    pub fn node_index(&self, key: NodeKey) -> Option<usize> {
        self.nodes.iter().position(|n| n.key == key)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.label.as_str()).collect()
    }

    /// Sum of all link weights.
    pub fn total_flow(&self) -> u64 {
        self.links.iter().map(|l| l.value).sum()
    }
}

/// Vertical coordinate for a bin level.
pub fn node_y(bin: usize) -> f64 {
    1.0 - bin as f64 * NODE_Y_SPACING
}

/// Human-readable label for a bin.
///
/// `S<first` for the lowest bin, `S>last` for the overflow bin and
/// `lower-upper` in between, all with zero decimals. Returns `None` when the
/// edges are empty or the bin is past the overflow bin.
pub fn bin_label(bin: usize, edges: &[f64]) -> Option<String> {
    let overflow = edges.len();
    if overflow == 0 || bin > overflow {
        return None;
    }
    if bin == overflow {
        return Some(format!("S>{:.0}", edges[overflow - 1]));
    }
    if bin == 0 {
        return Some(format!("S<{:.0}", edges[0]));
    }
    Some(format!("{:.0}-{:.0}", edges[bin - 1], edges[bin]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_common::TransitionKey;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    fn two_path_flows() -> FlowCounts {
        let mut flows = FlowCounts::new();
        flows.increment(TransitionKey::new(0, 0, 1, 1));
        flows.increment(TransitionKey::new(0, 1, 1, 2));
        flows
    }

    #[test]
    fn labels_per_bin() {
        let edges = [100.0, 200.0];
        assert_eq!(bin_label(0, &edges).as_deref(), Some("S<100"));
        assert_eq!(bin_label(1, &edges).as_deref(), Some("100-200"));
        assert_eq!(bin_label(2, &edges).as_deref(), Some("S>200"));
        assert_eq!(bin_label(3, &edges), None);
    }

    #[test]
    fn labels_round_to_zero_decimals() {
        let edges = [99.6, 150.25, 3000.0];
        assert_eq!(bin_label(0, &edges).as_deref(), Some("S<100"));
        assert_eq!(bin_label(1, &edges).as_deref(), Some("100-150"));
        assert_eq!(bin_label(3, &edges).as_deref(), Some("S>3000"));
    }

    #[test]
    fn single_edge_labels() {
        let edges = [50.0];
        assert_eq!(bin_label(0, &edges).as_deref(), Some("S<50"));
        assert_eq!(bin_label(1, &edges).as_deref(), Some("S>50"));
    }

    #[test]
    fn empty_edges_have_no_labels() {
        assert_eq!(bin_label(0, &[]), None);
    }

    #[test]
    fn two_path_scenario() {
        let diagram = SankeyDiagram::build(
            &two_path_flows(),
            &[0.0, 1.0],
            &[100.0, 200.0],
            DiagramLayout::default(),
        )
        .unwrap();

        assert_eq!(diagram.nodes.len(), 4);
        assert_eq!(diagram.labels(), vec!["S<100", "100-200", "100-200", "S>200"]);

        let xs: Vec<f64> = diagram.nodes.iter().map(|n| n.x).collect();
        assert_eq!(xs, vec![0.0, 0.0, 1.0, 1.0]);
        assert!(approx(diagram.nodes[0].y, 1.0));
        assert!(approx(diagram.nodes[1].y, 0.6));
        assert!(approx(diagram.nodes[3].y, 0.2));

        assert_eq!(
            diagram.links,
            vec![
                Link { source: 0, target: 2, value: 1 },
                Link { source: 1, target: 3, value: 1 },
            ]
        );
        assert_eq!(diagram.total_flow(), 2);
    }

    #[test]
    fn annotations_follow_time_sequence() {
        let diagram = SankeyDiagram::build(
            &two_path_flows(),
            &[0.0, 1.0, 1.0, 2.3],
            &[100.0, 200.0],
            DiagramLayout::default(),
        )
        .unwrap();
        let texts: Vec<&str> = diagram.annotations.iter().map(|a| a.text.as_str()).collect();
        assert_eq!(texts, vec!["t=0.0", "t=1.0", "t=1.0", "t=2.3"]);
        assert!(diagram.annotations.iter().all(|a| a.y == 1.0 && a.show_arrow));
        assert_eq!(diagram.annotations[3].x, 2.3);
    }

    #[test]
    fn node_index_lookup() {
        let diagram = SankeyDiagram::build(
            &two_path_flows(),
            &[0.0, 1.0],
            &[100.0, 200.0],
            DiagramLayout::default(),
        )
        .unwrap();
        assert_eq!(diagram.node_index(NodeKey::new(1, 2)), Some(3));
        assert_eq!(diagram.node_index(NodeKey::new(0, 2)), None);
    }

    #[test]
    fn empty_flows_still_annotate() {
        let diagram = SankeyDiagram::build(
            &FlowCounts::new(),
            &[0.5],
            &[100.0],
            DiagramLayout::default(),
        )
        .unwrap();
        assert!(diagram.nodes.is_empty());
        assert!(diagram.links.is_empty());
        assert_eq!(diagram.annotations.len(), 1);
        assert_eq!(diagram.annotations[0].text, "t=0.5");
    }

    #[test]
    fn time_index_out_of_range_is_error() {
        let err = SankeyDiagram::build(
            &two_path_flows(),
            &[0.0],
            &[100.0, 200.0],
            DiagramLayout::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ReportError::InvalidInput(_)));
    }

    #[test]
    fn missing_edges_is_error() {
        let err = SankeyDiagram::build(&two_path_flows(), &[0.0, 1.0], &[], DiagramLayout::default())
            .unwrap_err();
        assert!(err.to_string().contains("edge"));
    }

    #[test]
    fn layout_defaults() {
        let layout = DiagramLayout::default();
        assert_eq!(layout.title, "SPX Price Transitions");
        assert_eq!(layout.font_size, 10.0);
        assert_eq!((layout.width, layout.height), (800, 400));
    }
}

//! Transition keys and the transition-count aggregate.
//!
//! A transition is the move of one path from a (time index, bin) pair to the
//! (time index, bin) pair at the immediately following time index. The
//! aggregate maps each distinct transition to the number of paths that made
//! it. Iteration is ordered by key so that everything derived from it is
//! byte-stable.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One occupied (time index, bin index) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeKey {
    pub time_index: usize,
    pub bin: usize,
}

impl NodeKey {
    pub fn new(time_index: usize, bin: usize) -> Self {
        NodeKey { time_index, bin }
    }
}

impl std::fmt::Display for NodeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t{}:b{}", self.time_index, self.bin)
    }
}

/// (source time index, source bin, destination time index, destination bin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TransitionKey {
    pub from_time: usize,
    pub from_bin: usize,
    pub to_time: usize,
    pub to_bin: usize,
}

impl TransitionKey {
    pub fn new(from_time: usize, from_bin: usize, to_time: usize, to_bin: usize) -> Self {
        TransitionKey {
            from_time,
            from_bin,
            to_time,
            to_bin,
        }
    }

    /// The source endpoint.
    pub fn source(&self) -> NodeKey {
        NodeKey::new(self.from_time, self.from_bin)
    }

    /// The destination endpoint.
    pub fn target(&self) -> NodeKey {
        NodeKey::new(self.to_time, self.to_bin)
    }
}

impl From<(usize, usize, usize, usize)> for TransitionKey {
    fn from((from_time, from_bin, to_time, to_bin): (usize, usize, usize, usize)) -> Self {
        TransitionKey::new(from_time, from_bin, to_time, to_bin)
    }
}

/// Exact transition counts, keyed and iterated in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowCounts {
    counts: BTreeMap<TransitionKey, u64>,
}

impl FlowCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one more path making this transition.
    pub fn increment(&mut self, key: TransitionKey) {
        *self.counts.entry(key).or_insert(0) += 1;
    }

    /// Count for a key (zero when never observed).
    pub fn get(&self, key: &TransitionKey) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Number of distinct transitions.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Transitions with their counts, in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&TransitionKey, u64)> + '_ {
        self.counts.iter().map(|(k, &v)| (k, v))
    }

    /// Sum of all counts (paths times number of steps).
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Every (time index, bin) pair that appears as a transition endpoint.
    pub fn node_keys(&self) -> BTreeSet<NodeKey> {
        let mut nodes = BTreeSet::new();
        for key in self.counts.keys() {
            nodes.insert(key.source());
            nodes.insert(key.target());
        }
        nodes
    }

    /// Distinct (source time index, destination time index) pairs.
    pub fn time_pairs(&self) -> BTreeSet<(usize, usize)> {
        self.counts
            .keys()
            .map(|k| (k.from_time, k.to_time))
            .collect()
    }

    /// Total count of transitions leaving time index `t`.
    pub fn outgoing_total(&self, t: usize) -> u64 {
        self.counts
            .iter()
            .filter(|(k, _)| k.from_time == t)
            .map(|(_, &v)| v)
            .sum()
    }

    /// Total count of transitions arriving at time index `t`.
    pub fn incoming_total(&self, t: usize) -> u64 {
        self.counts
            .iter()
            .filter(|(k, _)| k.to_time == t)
            .map(|(_, &v)| v)
            .sum()
    }

    /// Total count leaving one (time index, bin) node.
    pub fn outgoing_from(&self, node: NodeKey) -> u64 {
        self.counts
            .iter()
            .filter(|(k, _)| k.source() == node)
            .map(|(_, &v)| v)
            .sum()
    }
}

impl FromIterator<(TransitionKey, u64)> for FlowCounts {
    fn from_iter<I: IntoIterator<Item = (TransitionKey, u64)>>(iter: I) -> Self {
        let mut flows = FlowCounts::new();
        for (key, count) in iter {
            *flows.counts.entry(key).or_insert(0) += count;
        }
        flows
    }
}

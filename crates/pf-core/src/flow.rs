//! Flow aggregation: bin every path at every sample time and count the
//! transitions between consecutive samples.

use pf_common::{FlowCounts, TransitionKey};
use pf_math::categorize_all;
use thiserror::Error;
use tracing::{debug, trace};

use crate::model::{ModelError, PathModel};

/// Errors raised while aggregating flows.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Paths are paired by position, which is meaningless once the count changes.
    #[error("path count changed at time index {time_index}: expected {expected}, got {actual}")]
    PathCountChanged {
        time_index: usize,
        expected: usize,
        actual: usize,
    },
}

/// Count bin-to-bin transitions of `asset` across consecutive `times`.
///
/// The model is reset once and then advanced to each time in order. A key
/// `(t-1, from, t, to)` counts the paths in bin `from` at time index `t-1`
/// that are in bin `to` at time index `t`. Fewer than two times yield an
/// empty result.
pub fn generate_flows<M: PathModel + ?Sized>(
    model: &mut M,
    asset: &str,
    times: &[f64],
    edges: &[f64],
) -> Result<FlowCounts, FlowError> {
    let mut flows = FlowCounts::new();
    let mut expected = model.path_count(asset);
    let mut previous: Option<Vec<usize>> = None;

    model.reset();
    for (t_idx, &time) in times.iter().enumerate() {
        model.advance(time)?;
        let values = model.get_value(asset)?;

        let expected_count = *expected.get_or_insert(values.len());
        if values.len() != expected_count {
            return Err(FlowError::PathCountChanged {
                time_index: t_idx,
                expected: expected_count,
                actual: values.len(),
            });
        }

        let bins = categorize_all(&values, edges);
        trace!(time_index = t_idx, time, paths = bins.len(), "Binned snapshot");

        if let Some(prev) = previous.as_ref() {
            for (&from, &to) in prev.iter().zip(&bins) {
                flows.increment(TransitionKey::new(t_idx - 1, from, t_idx, to));
            }
        }
        previous = Some(bins);
    }

    debug!(
        asset,
        times = times.len(),
        transitions = flows.len(),
        total = flows.total(),
        "Aggregated flows"
    );
    Ok(flows)
}

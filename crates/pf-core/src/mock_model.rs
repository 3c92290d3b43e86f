//! Scripted path model for testing.
//!
//! [`ScriptedModel`] returns a pre-set value vector on each successive
//! `advance`, ignoring the requested time, and records every call so tests
//! can assert how the aggregator drove it.
//!
//! # Example
//!
//! ```ignore
//! use pf_core::mock_model::ScriptedModel;
//!
//! // Two paths observed at three times, written path by path.
//! let model = ScriptedModel::from_paths("SPX", &[
//!     vec![50.0, 150.0, 175.0],
//!     vec![150.0, 250.0, 90.0],
//! ]);
//! ```

use crate::model::{ModelError, PathModel};

/// A call the model received.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelCall {
    Reset,
    Advance(f64),
}

/// Deterministic model that replays one value vector per advance.
#[derive(Debug, Clone)]
pub struct ScriptedModel {
    asset: String,
    steps: Vec<Vec<f64>>,
    cursor: Option<usize>,
    calls: Vec<ModelCall>,
}

impl ScriptedModel {
    /// Create an empty script for `asset`.
    pub fn new(asset: impl Into<String>) -> Self {
        ScriptedModel {
            asset: asset.into(),
            steps: Vec::new(),
            cursor: None,
            calls: Vec::new(),
        }
    }

    /// Append the values returned after the next advance.
    ///
    /// Steps may differ in length; nothing here enforces a stable path count.
    pub fn step(mut self, values: Vec<f64>) -> Self {
        self.steps.push(values);
        self
    }

    /// Build a script from per-path trajectories of equal length.
    pub fn from_paths(asset: impl Into<String>, paths: &[Vec<f64>]) -> Self {
        let steps = paths.first().map(Vec::len).unwrap_or(0);
        let mut model = Self::new(asset);
        for i in 0..steps {
            model = model.step(paths.iter().map(|p| p[i]).collect());
        }
        model
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> &[ModelCall] {
        &self.calls
    }

    /// Times passed to `advance`, in order.
    pub fn advanced_times(&self) -> Vec<f64> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                ModelCall::Advance(t) => Some(*t),
                ModelCall::Reset => None,
            })
            .collect()
    }

    pub fn reset_count(&self) -> usize {
        self.calls.iter().filter(|c| **c == ModelCall::Reset).count()
    }
}

impl PathModel for ScriptedModel {
    fn reset(&mut self) {
        self.calls.push(ModelCall::Reset);
        self.cursor = None;
    }

    fn advance(&mut self, time: f64) -> Result<(), ModelError> {
        self.calls.push(ModelCall::Advance(time));
        let next = self.cursor.map_or(0, |c| c + 1);
        if next >= self.steps.len() {
            return Err(ModelError::Invalid(format!(
                "script exhausted after {} step(s)",
                self.steps.len()
            )));
        }
        self.cursor = Some(next);
        Ok(())
    }

    fn get_value(&self, asset: &str) -> Result<Vec<f64>, ModelError> {
        if asset != self.asset {
            return Err(ModelError::UnknownAsset {
                asset: asset.to_string(),
                available: vec![self.asset.clone()],
            });
        }
        let cursor = self.cursor.ok_or(ModelError::NotAdvanced)?;
        Ok(self.steps[cursor].clone())
    }

    fn path_count(&self, asset: &str) -> Option<usize> {
        if asset != self.asset {
            return None;
        }
        self.steps.first().map(Vec::len)
    }
}

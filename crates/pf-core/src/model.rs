//! Path models: the source of per-path values over time.
//!
//! The aggregator drives a model through one pass: `reset`, then `advance`
//! to each sample time in non-decreasing order, reading `get_value` after
//! every advance. Implementations must keep the path-to-index mapping stable
//! for the whole pass; transition counting pairs values by position.
//!
//! [`ReplayModel`] replays pre-computed snapshots (typically the output of an
//! external Monte Carlo run saved as JSON) and is what the CLI uses.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors raised by path models.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown asset '{asset}' (available: {})", available.join(", "))]
    UnknownAsset {
        asset: String,
        available: Vec<String>,
    },

    #[error("model has not been advanced since reset")]
    NotAdvanced,

    #[error("time went backwards: requested {requested}, already at {current}")]
    TimeWentBackwards { requested: f64, current: f64 },

    #[error("no snapshot at or before time {requested} (first snapshot is at {first})")]
    BeforeFirstSnapshot { requested: f64, first: f64 },

    #[error("invalid replay data: {0}")]
    Invalid(String),

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in replay file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A source of simulated per-path values.
pub trait PathModel {
    /// Restart path generation from its deterministic initial state.
    fn reset(&mut self);

    /// Evolve all paths to absolute time `time`.
    fn advance(&mut self, time: f64) -> Result<(), ModelError>;

    /// Current value of every path for `asset`, in stable path order.
    fn get_value(&self, asset: &str) -> Result<Vec<f64>, ModelError>;

    /// Number of paths for `asset`, when the model knows it up front.
    fn path_count(&self, _asset: &str) -> Option<usize> {
        None
    }
}

impl<M: PathModel + ?Sized> PathModel for &mut M {
    fn reset(&mut self) {
        (**self).reset()
    }

    fn advance(&mut self, time: f64) -> Result<(), ModelError> {
        (**self).advance(time)
    }

    fn get_value(&self, asset: &str) -> Result<Vec<f64>, ModelError> {
        (**self).get_value(asset)
    }

    fn path_count(&self, asset: &str) -> Option<usize> {
        (**self).path_count(asset)
    }
}

/// One recorded sample of every path, per asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplaySnapshot {
    pub time: f64,
    pub assets: BTreeMap<String, Vec<f64>>,
}

impl ReplaySnapshot {
    pub fn new(time: f64) -> Self {
        ReplaySnapshot {
            time,
            assets: BTreeMap::new(),
        }
    }

    pub fn with_asset(mut self, asset: impl Into<String>, values: Vec<f64>) -> Self {
        self.assets.insert(asset.into(), values);
        self
    }
}

/// On-disk replay file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayFile {
    pub schema_version: String,

    #[serde(default)]
    pub description: Option<String>,

    pub snapshots: Vec<ReplaySnapshot>,
}

/// Replays recorded snapshots as a [`PathModel`].
///
/// `advance(t)` selects the latest snapshot whose time is `<= t`.
#[derive(Debug, Clone)]
pub struct ReplayModel {
    snapshots: Vec<ReplaySnapshot>,
    cursor: Option<usize>,
    current_time: Option<f64>,
}

impl ReplayModel {
    /// Build a model from in-memory snapshots.
    ///
    /// Snapshot times must be finite and non-decreasing, and each asset must
    /// have the same number of paths in every snapshot.
    pub fn from_snapshots(snapshots: Vec<ReplaySnapshot>) -> Result<Self, ModelError> {
        validate_snapshots(&snapshots)?;
        Ok(ReplayModel {
            snapshots,
            cursor: None,
            current_time: None,
        })
    }

    /// Load a replay file from disk.
    pub fn from_file(path: &Path) -> Result<Self, ModelError> {
        let content = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ReplayFile =
            serde_json::from_str(&content).map_err(|source| ModelError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        if file.schema_version != pf_common::SCHEMA_VERSION {
            return Err(ModelError::Invalid(format!(
                "schema version mismatch: expected {}, got {}",
                pf_common::SCHEMA_VERSION,
                file.schema_version
            )));
        }
        debug!(
            path = %path.display(),
            snapshots = file.snapshots.len(),
            "Loaded replay file"
        );
        Self::from_snapshots(file.snapshots)
    }

    /// Times of the recorded snapshots, in order.
    pub fn snapshot_times(&self) -> Vec<f64> {
        self.snapshots.iter().map(|s| s.time).collect()
    }

    /// Assets present in the first snapshot.
    pub fn assets(&self) -> Vec<String> {
        self.snapshots
            .first()
            .map(|s| s.assets.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn snapshot_count(&self) -> usize {
        self.snapshots.len()
    }
}

impl PathModel for ReplayModel {
    fn reset(&mut self) {
        self.cursor = None;
        self.current_time = None;
    }

    fn advance(&mut self, time: f64) -> Result<(), ModelError> {
        if let Some(current) = self.current_time {
            if time < current {
                return Err(ModelError::TimeWentBackwards {
                    requested: time,
                    current,
                });
            }
        }
        let reached = self.snapshots.partition_point(|s| s.time <= time);
        if reached == 0 {
            return Err(ModelError::BeforeFirstSnapshot {
                requested: time,
                first: self.snapshots[0].time,
            });
        }
        self.cursor = Some(reached - 1);
        self.current_time = Some(time);
        Ok(())
    }

    fn get_value(&self, asset: &str) -> Result<Vec<f64>, ModelError> {
        let cursor = self.cursor.ok_or(ModelError::NotAdvanced)?;
        let snapshot = &self.snapshots[cursor];
        snapshot
            .assets
            .get(asset)
            .cloned()
            .ok_or_else(|| ModelError::UnknownAsset {
                asset: asset.to_string(),
                available: snapshot.assets.keys().cloned().collect(),
            })
    }

    fn path_count(&self, asset: &str) -> Option<usize> {
        self.snapshots
            .first()
            .and_then(|s| s.assets.get(asset))
            .map(Vec::len)
    }
}

fn validate_snapshots(snapshots: &[ReplaySnapshot]) -> Result<(), ModelError> {
    if snapshots.is_empty() {
        return Err(ModelError::Invalid("no snapshots".to_string()));
    }
    if let Some(i) = snapshots.iter().position(|s| !s.time.is_finite()) {
        return Err(ModelError::Invalid(format!(
            "snapshot {} has non-finite time {}",
            i, snapshots[i].time
        )));
    }
    if let Some(i) = snapshots.windows(2).position(|w| w[1].time < w[0].time) {
        return Err(ModelError::Invalid(format!(
            "snapshot times must be non-decreasing: {} follows {}",
            snapshots[i + 1].time,
            snapshots[i].time
        )));
    }

    let mut widths: BTreeMap<&str, usize> = BTreeMap::new();
    for (i, snapshot) in snapshots.iter().enumerate() {
        for (asset, values) in &snapshot.assets {
            let expected = *widths.entry(asset.as_str()).or_insert(values.len());
            if values.len() != expected {
                return Err(ModelError::Invalid(format!(
                    "asset '{}' has {} paths in snapshot {} but {} earlier",
                    asset,
                    values.len(),
                    i,
                    expected
                )));
            }
        }
    }
    Ok(())
}

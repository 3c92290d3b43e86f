//! Configuration snapshots for report provenance.
//!
//! A snapshot captures the configuration a diagram was produced from, so a
//! rendered report can be traced back to the exact file content.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::flow::FlowConfig;
use crate::resolve::ConfigSource;

/// A frozen snapshot of configuration state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    /// When this snapshot was taken.
    pub timestamp: DateTime<Utc>,

    /// Schema version of the configuration.
    pub schema_version: String,

    /// Path the configuration was loaded from.
    #[serde(default)]
    pub config_path: Option<String>,

    /// Source of the configuration.
    pub config_source: String,

    /// SHA-256 hash of the config file content (None for built-in defaults).
    #[serde(default)]
    pub config_hash: Option<String>,

    /// Key configuration values for quick reference.
    pub summary: ConfigSummary,
}

/// Summary of key configuration values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSummary {
    pub asset: String,
    pub time_count: usize,
    pub edge_count: usize,
}

impl ConfigSnapshot {
    /// Create a snapshot from a loaded configuration and its raw JSON.
    pub fn new(
        config: &FlowConfig,
        path: Option<&std::path::Path>,
        source: ConfigSource,
        raw_json: Option<&str>,
    ) -> Self {
        ConfigSnapshot {
            timestamp: Utc::now(),
            schema_version: config.schema_version.clone(),
            config_path: path.map(|p| p.display().to_string()),
            config_source: source.to_string(),
            config_hash: raw_json.map(hash_content),
            summary: ConfigSummary {
                asset: config.asset.clone(),
                time_count: config.times.len(),
                edge_count: config.bins.len(),
            },
        }
    }

    /// Short form of the hash for display (first 12 hex chars).
    pub fn short_hash(&self) -> Option<&str> {
        self.config_hash.as_deref().map(|h| &h[..12.min(h.len())])
    }
}

/// Compute SHA-256 hash of content.
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_content_deterministic() {
        let a = hash_content("{\"asset\":\"SPX\"}");
        let b = hash_content("{\"asset\":\"SPX\"}");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, hash_content("{\"asset\":\"NDX\"}"));
    }

    #[test]
    fn test_snapshot_defaults_have_no_hash() {
        let config = FlowConfig::default();
        let snap = ConfigSnapshot::new(&config, None, ConfigSource::BuiltinDefault, None);
        assert!(snap.config_hash.is_none());
        assert!(snap.short_hash().is_none());
        assert_eq!(snap.config_source, "builtin default");
        assert_eq!(snap.summary.asset, "SPX");
    }

    #[test]
    fn test_snapshot_with_file() {
        let config = FlowConfig {
            bins: vec![1.0, 2.0, 3.0],
            times: vec![0.0, 1.0],
            ..FlowConfig::default()
        };
        let raw = "{}";
        let snap = ConfigSnapshot::new(
            &config,
            Some(std::path::Path::new("/tmp/flow.json")),
            ConfigSource::CliArgument,
            Some(raw),
        );
        assert_eq!(snap.config_path.as_deref(), Some("/tmp/flow.json"));
        assert_eq!(snap.short_hash().map(str::len), Some(12));
        assert_eq!(snap.summary.edge_count, 3);
        assert_eq!(snap.summary.time_count, 2);
    }
}

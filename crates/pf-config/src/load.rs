//! Configuration loading with provenance.

use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use crate::flow::FlowConfig;
use crate::resolve::{resolve_config, ConfigSource};
use crate::snapshot::ConfigSnapshot;
use crate::validate::{validate_schema_version, ValidationError};

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Invalid JSON in config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Semantic validation failed: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("I/O error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Resolved configuration with provenance information.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The loaded configuration.
    pub config: FlowConfig,
    /// Path to the config file (None if using defaults).
    pub path: Option<PathBuf>,
    /// Where the file was found.
    pub source: ConfigSource,
    /// Snapshot for report metadata.
    pub snapshot: ConfigSnapshot,
}

/// Configuration resolution options.
#[derive(Debug, Default)]
pub struct ConfigOptions {
    /// Explicit config file path (highest priority).
    pub config_path: Option<PathBuf>,
}

/// Load configuration with the standard resolution order.
///
/// An explicit path that does not exist is an error rather than a silent
/// fallback. Only the schema version is checked here; semantic validation
/// runs after CLI overrides have been merged in.
pub fn load_config(options: &ConfigOptions) -> Result<ResolvedConfig, ConfigError> {
    if let Some(path) = &options.config_path {
        if !path.exists() {
            return Err(ConfigError::NotFound { path: path.clone() });
        }
    }

    let resolved = resolve_config(options.config_path.as_deref());

    let Some(path) = resolved.path else {
        debug!("No flow config found, using built-in defaults");
        let config = FlowConfig::default();
        let snapshot = ConfigSnapshot::new(&config, None, ConfigSource::BuiltinDefault, None);
        return Ok(ResolvedConfig {
            config,
            path: None,
            source: ConfigSource::BuiltinDefault,
            snapshot,
        });
    };

    let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::IoError {
        path: path.clone(),
        source,
    })?;
    let config: FlowConfig =
        serde_json::from_str(&content).map_err(|source| ConfigError::ParseError {
            path: path.clone(),
            source,
        })?;
    validate_schema_version(&config)?;

    debug!(path = %path.display(), source = %resolved.source, "Loaded flow config");

    let snapshot = ConfigSnapshot::new(&config, Some(&path), resolved.source, Some(&content));
    Ok(ResolvedConfig {
        config,
        path: Some(path),
        source: resolved.source,
        snapshot,
    })
}

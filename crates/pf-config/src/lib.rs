//! path-flow configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for flow.json
//! - Config resolution (CLI → env → XDG → defaults)
//! - Semantic validation of bin edges, time sequences and layout
//! - Config snapshots for report provenance

pub mod flow;
pub mod load;
pub mod resolve;
pub mod snapshot;
pub mod validate;

pub use flow::{DiagramSettings, FlowConfig};
pub use load::{load_config, ConfigError, ConfigOptions, ResolvedConfig};
pub use resolve::{resolve_config, ConfigPath, ConfigSource};
pub use snapshot::ConfigSnapshot;
pub use validate::{ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";

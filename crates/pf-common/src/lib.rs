//! path-flow common types.
//!
//! This crate provides the types shared by the aggregation, reporting and
//! CLI crates:
//! - Transition keys and node coordinates
//! - The transition-count aggregate
//! - Output formats for command results

pub mod flow;
pub mod output;

pub use flow::{FlowCounts, NodeKey, TransitionKey};
pub use output::OutputFormat;

/// Schema version for files read and written by path-flow.
pub const SCHEMA_VERSION: &str = "1.0.0";

//! path-flow core library.
//!
//! Drives a path model across a time sequence, counts bin-to-bin
//! transitions and hands the resulting Sankey diagram to a renderer:
//! - [`model`]: the `PathModel` trait and the snapshot-replay model
//! - [`flow`]: transition counting
//! - [`pipeline`]: `plot_sankey`, the end-to-end entry point
//! - [`report`]: transition tables for the CLI
//! - [`logging`] and [`exit_codes`] for the binary
//!
//! The binary entry point is in `main.rs`.

pub mod exit_codes;
pub mod flow;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod report;

// Re-export test utilities for integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod mock_model;

pub use flow::{generate_flows, FlowError};
pub use model::{ModelError, PathModel, ReplayModel, ReplaySnapshot};
pub use pipeline::{plot_sankey, PipelineError};
pub use report::FlowReport;

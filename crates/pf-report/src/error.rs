//! Error types for diagram building and rendering.

use thiserror::Error;

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors that can occur while building or rendering a diagram.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Inputs that cannot produce a diagram.
    #[error("invalid diagram input: {0}")]
    InvalidInput(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

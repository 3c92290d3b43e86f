//! Configuration validation errors and semantic validation.

use thiserror::Error;

use crate::flow::{DiagramSettings, FlowConfig};

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::MissingField(_) => 64,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

/// Check the schema version of a loaded file.
pub fn validate_schema_version(config: &FlowConfig) -> ValidationResult<()> {
    if config.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: config.schema_version.clone(),
        });
    }
    Ok(())
}

/// Validate a flow configuration semantically.
///
/// An empty `times` list is accepted here; callers fill it from the replay
/// file and then check it with [`validate_times`].
pub fn validate_flow_config(config: &FlowConfig) -> ValidationResult<()> {
    validate_schema_version(config)?;

    if config.asset.trim().is_empty() {
        return Err(ValidationError::MissingField("asset".to_string()));
    }

    validate_bins(&config.bins)?;

    if !config.times.is_empty() {
        validate_times(&config.times)?;
    }

    validate_diagram(&config.diagram)
}

/// Bin edges must be non-empty, finite and strictly increasing.
pub fn validate_bins(bins: &[f64]) -> ValidationResult<()> {
    if bins.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "bins".to_string(),
            message: "At least one bin edge is required".to_string(),
        });
    }
    if let Some(i) = bins.iter().position(|e| !e.is_finite()) {
        return Err(ValidationError::InvalidValue {
            field: format!("bins[{}]", i),
            message: format!("Must be finite, got {}", bins[i]),
        });
    }
    if !pf_math::is_strictly_increasing(bins) {
        return Err(ValidationError::InvalidValue {
            field: "bins".to_string(),
            message: format!("Edges must be strictly increasing, got {:?}", bins),
        });
    }
    Ok(())
}

/// Times must be non-empty, finite and non-decreasing.
pub fn validate_times(times: &[f64]) -> ValidationResult<()> {
    if times.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "times".to_string(),
            message: "At least one time point is required".to_string(),
        });
    }
    if let Some(i) = times.iter().position(|t| !t.is_finite()) {
        return Err(ValidationError::InvalidValue {
            field: format!("times[{}]", i),
            message: format!("Must be finite, got {}", times[i]),
        });
    }
    if let Some(i) = times.windows(2).position(|w| w[1] < w[0]) {
        return Err(ValidationError::InvalidValue {
            field: format!("times[{}]", i + 1),
            message: format!(
                "Times must be non-decreasing, got {} after {}",
                times[i + 1],
                times[i]
            ),
        });
    }
    Ok(())
}

fn validate_diagram(diagram: &DiagramSettings) -> ValidationResult<()> {
    if diagram.width == 0 {
        return Err(ValidationError::InvalidValue {
            field: "diagram.width".to_string(),
            message: "Must be > 0".to_string(),
        });
    }
    if diagram.height == 0 {
        return Err(ValidationError::InvalidValue {
            field: "diagram.height".to_string(),
            message: "Must be > 0".to_string(),
        });
    }
    if !(diagram.font_size.is_finite() && diagram.font_size > 0.0) {
        return Err(ValidationError::InvalidValue {
            field: "diagram.font_size".to_string(),
            message: format!("Must be a positive number, got {}", diagram.font_size),
        });
    }
    Ok(())
}

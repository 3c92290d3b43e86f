//! Flow configuration types.
//!
//! These types match the flow.json file layout:
//!
//! ```json
//! {
//!   "schema_version": "1.0.0",
//!   "asset": "SPX",
//!   "times": [0.0, 0.5, 1.0],
//!   "bins": [3000, 3500, 4000],
//!   "diagram": { "title": "SPX Price Transitions", "font_size": 10, "width": 800, "height": 400 }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::validate::ValidationError;

/// Complete flow configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowConfig {
    pub schema_version: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Asset whose values are binned.
    #[serde(default = "default_asset")]
    pub asset: String,

    /// Sample times; empty means "use the replay file's snapshot times".
    #[serde(default)]
    pub times: Vec<f64>,

    /// Ascending bin edges.
    #[serde(default)]
    pub bins: Vec<f64>,

    #[serde(default)]
    pub diagram: DiagramSettings,
}

/// Layout settings passed through to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramSettings {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_font_size")]
    pub font_size: f64,

    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_asset() -> String {
    "SPX".to_string()
}

fn default_title() -> String {
    "SPX Price Transitions".to_string()
}

fn default_font_size() -> f64 {
    10.0
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    400
}

impl Default for DiagramSettings {
    fn default() -> Self {
        DiagramSettings {
            title: default_title(),
            font_size: default_font_size(),
            width: default_width(),
            height: default_height(),
        }
    }
}

impl Default for FlowConfig {
    fn default() -> Self {
        FlowConfig {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            description: None,
            asset: default_asset(),
            times: Vec::new(),
            bins: Vec::new(),
            diagram: DiagramSettings::default(),
        }
    }
}

impl FlowConfig {
    /// Load a flow configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ValidationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::from_json(&content)
    }

    /// Parse a flow configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }

    /// Number of bins the configured edges define.
    pub fn bin_count(&self) -> usize {
        pf_math::bin_count(&self.bins)
    }
}

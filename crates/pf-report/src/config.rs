//! Report configuration types.

use serde::{Deserialize, Serialize};

/// Report color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportTheme {
    /// Light theme.
    Light,
    /// Dark theme.
    Dark,
    /// Auto-detect from system preference.
    #[default]
    Auto,
}

impl ReportTheme {
    /// Get the CSS class for this theme.
    pub fn css_class(&self) -> &'static str {
        match self {
            ReportTheme::Light => "light",
            ReportTheme::Dark => "dark",
            ReportTheme::Auto => "",
        }
    }
}

/// CDN library configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CdnLibrary {
    /// npm package name.
    pub package: String,
    /// Pinned version number.
    pub version: String,
    /// Path within npm package.
    pub path: String,
    /// Subresource integrity hash (SHA-384), emitted only when set.
    #[serde(default)]
    pub sri: Option<String>,
}

impl CdnLibrary {
    /// Create a new CDN library configuration.
    pub fn new(
        package: impl Into<String>,
        version: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            package: package.into(),
            version: version.into(),
            path: path.into(),
            sri: None,
        }
    }

    /// Pin the subresource integrity hash.
    pub fn with_sri(mut self, sri: impl Into<String>) -> Self {
        self.sri = Some(sri.into());
        self
    }

    /// Get the full CDN URL for this library.
    pub fn url(&self, base_url: &str) -> String {
        format!(
            "{}/{}@{}/{}",
            base_url.trim_end_matches('/'),
            self.package,
            self.version,
            self.path
        )
    }
}

/// CDN configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CdnConfig {
    /// Base URL for CDN resources.
    #[serde(default = "default_cdn_base")]
    pub base_url: String,
    /// The plotly.js bundle.
    #[serde(default = "default_plotly")]
    pub plotly: CdnLibrary,
}

fn default_cdn_base() -> String {
    "https://cdn.jsdelivr.net/npm".to_string()
}

fn default_plotly() -> CdnLibrary {
    CdnLibrary::new("plotly.js-dist-min", "2.35.2", "plotly.min.js")
}

impl Default for CdnConfig {
    fn default() -> Self {
        Self {
            base_url: default_cdn_base(),
            plotly: default_plotly(),
        }
    }
}

/// Complete report configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Color theme.
    #[serde(default)]
    pub theme: ReportTheme,
    /// CDN settings.
    #[serde(default)]
    pub cdn_config: CdnConfig,
    /// Force minification on or off (default: minify in release builds only).
    #[serde(default)]
    pub minify: Option<bool>,
}

impl ReportConfig {
    /// Set the theme.
    pub fn with_theme(mut self, theme: ReportTheme) -> Self {
        self.theme = theme;
        self
    }

    /// Force minification on or off.
    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = Some(minify);
        self
    }

    /// Whether the generated page should be minified.
    pub fn should_minify(&self) -> bool {
        self.minify.unwrap_or(!cfg!(debug_assertions))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        let base = &self.cdn_config.base_url;
        if !(base.starts_with("https://") || base.starts_with("http://")) {
            return Err(format!("CDN base URL must be http(s), got '{}'", base));
        }
        if self.cdn_config.plotly.version.trim().is_empty() {
            return Err("plotly version must be pinned".to_string());
        }
        Ok(())
    }
}

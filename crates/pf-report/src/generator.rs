//! Standalone HTML page generation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::ReportConfig;
use crate::diagram::SankeyDiagram;
use crate::error::{ReportError, Result};
use crate::figure::Figure;

/// Provenance shown in the page footer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Generation timestamp.
    pub generated_at: DateTime<Utc>,
    /// Generator version.
    pub generator_version: String,
    /// Asset the paths were binned on.
    #[serde(default)]
    pub asset: Option<String>,
    /// Number of simulated paths.
    #[serde(default)]
    pub path_count: Option<usize>,
    /// SHA-256 of the configuration file, when one was used.
    #[serde(default)]
    pub config_hash: Option<String>,
    /// Correlation ID of the run that produced the page.
    #[serde(default)]
    pub run_id: Option<String>,
}

impl Default for ReportMeta {
    fn default() -> Self {
        ReportMeta {
            generated_at: Utc::now(),
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
            asset: None,
            path_count: None,
            config_hash: None,
            run_id: None,
        }
    }
}

/// HTML page generator.
pub struct ReportGenerator {
    config: ReportConfig,
}

impl ReportGenerator {
    /// Create a new generator with configuration.
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Create a generator with default configuration.
    pub fn default_config() -> Self {
        Self::new(ReportConfig::default())
    }

    /// Get the current configuration.
    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Generate the HTML page for a diagram.
    pub fn generate(&self, diagram: &SankeyDiagram, meta: &ReportMeta) -> Result<String> {
        self.config.validate().map_err(ReportError::InvalidConfig)?;

        let figure = Figure::from(diagram);
        let figure_json = script_safe_json(&serde_json::to_string(&figure)?);
        let html = self.generate_html(diagram, meta, &figure_json);

        let output = if self.config.should_minify() {
            let cfg = minify_html::Cfg {
                minify_js: true,
                minify_css: true,
                ..Default::default()
            };
            String::from_utf8(minify_html::minify(html.as_bytes(), &cfg)).unwrap_or(html)
        } else {
            html
        };

        info!(
            bytes = output.len(),
            title = %diagram.layout.title,
            "Report generated"
        );

        Ok(output)
    }

    fn generate_html(&self, diagram: &SankeyDiagram, meta: &ReportMeta, figure_json: &str) -> String {
        let cdn = &self.config.cdn_config;
        let plotly_url = cdn.plotly.url(&cdn.base_url);
        let integrity = cdn
            .plotly
            .sri
            .as_deref()
            .map(|sri| format!(r#" integrity="{}""#, html_escape(sri)))
            .unwrap_or_default();

        format!(
            r##"<!DOCTYPE html>
<html lang="en" class="{theme_class}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <meta name="generator" content="pf-report {version}">
    <meta name="robots" content="noindex, nofollow">
    <script src="{plotly_url}"{integrity} crossorigin="anonymous"></script>
    <style>
        :root {{
            --bg-primary: #ffffff;
            --text-primary: #111827;
            --text-secondary: #6b7280;
            --border-color: #e5e7eb;
        }}
        .dark {{
            --bg-primary: #111827;
            --text-primary: #f9fafb;
            --text-secondary: #9ca3af;
            --border-color: #374151;
        }}
        body {{
            margin: 0;
            padding: 1.5rem;
            font-family: system-ui, -apple-system, sans-serif;
            background: var(--bg-primary);
            color: var(--text-primary);
        }}
        .stats {{ display: flex; gap: 2rem; margin: 1rem 0; color: var(--text-secondary); }}
        .stats strong {{ color: var(--text-primary); }}
        footer {{
            margin-top: 2rem;
            padding-top: 1rem;
            border-top: 1px solid var(--border-color);
            font-size: 0.8rem;
            color: var(--text-secondary);
        }}
    </style>
</head>
<body>
    <main>
        <h1>{title}</h1>
        {stats}
        <div id="sankey" style="width: {width}px; height: {height}px;"></div>
    </main>
    <footer>
        {footer}
    </footer>
    <script>
        const FIGURE = {figure_json};
        if (typeof Plotly !== 'undefined') {{
            Plotly.newPlot('sankey', FIGURE.data, FIGURE.layout);
        }} else {{
            document.getElementById('sankey').textContent =
                'plotly.js could not be loaded; the figure data is embedded in this page.';
        }}
    </script>
</body>
</html>"##,
            theme_class = self.config.theme.css_class(),
            title = html_escape(&diagram.layout.title),
            version = env!("CARGO_PKG_VERSION"),
            plotly_url = html_escape(&plotly_url),
            integrity = integrity,
            stats = self.generate_stats(diagram, meta),
            width = diagram.layout.width,
            height = diagram.layout.height,
            footer = self.generate_footer(meta),
            figure_json = figure_json,
        )
    }

    fn generate_stats(&self, diagram: &SankeyDiagram, meta: &ReportMeta) -> String {
        let mut items = Vec::new();
        if let Some(asset) = &meta.asset {
            items.push(format!("<span>Asset <strong>{}</strong></span>", html_escape(asset)));
        }
        if let Some(paths) = meta.path_count {
            items.push(format!("<span>Paths <strong>{}</strong></span>", paths));
        }
        items.push(format!(
            "<span>Time points <strong>{}</strong></span>",
            diagram.annotations.len()
        ));
        items.push(format!("<span>Nodes <strong>{}</strong></span>", diagram.nodes.len()));
        items.push(format!("<span>Links <strong>{}</strong></span>", diagram.links.len()));
        format!(r#"<div class="stats">{}</div>"#, items.join(""))
    }

    fn generate_footer(&self, meta: &ReportMeta) -> String {
        let mut parts = vec![
            format!(
                "Generated {} by pf-report {}",
                meta.generated_at.format("%Y-%m-%d %H:%M UTC"),
                html_escape(&meta.generator_version)
            ),
        ];
        if let Some(hash) = &meta.config_hash {
            parts.push(format!(
                r#"config <code title="{}">{}</code>"#,
                html_escape(hash),
                html_escape(&hash[..12.min(hash.len())])
            ));
        }
        if let Some(run_id) = &meta.run_id {
            parts.push(format!("run <code>{}</code>", html_escape(run_id)));
        }
        parts.join(" · ")
    }
}

/// Make serialized JSON safe to embed inside a `<script>` element.
///
/// `<`, `>` and `&` only occur inside JSON strings, where the `\u` escapes
/// decode to the same characters.
fn script_safe_json(json: &str) -> String {
    json.replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

/// Escape HTML special characters.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

//! Flow report: the stdout payload of the `flows` command.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use pf_common::{FlowCounts, OutputFormat, SCHEMA_VERSION};
use pf_report::bin_label;
use serde::{Deserialize, Serialize};

/// One counted transition with human-readable endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub from_time_index: usize,
    pub from_time: f64,
    pub from_bin: usize,
    pub from_label: String,
    pub to_time_index: usize,
    pub to_time: f64,
    pub to_bin: usize,
    pub to_label: String,
    pub count: u64,
}

/// Transition counts for one aggregation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowReport {
    pub schema_version: String,
    pub generated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    pub asset: String,
    pub times: Vec<f64>,
    pub bins: Vec<f64>,
    /// Paths per snapshot. Inferred from the flows unless the model reported
    /// it, so it is absent only when neither source knows.
    pub path_count: Option<u64>,
    pub total_transitions: u64,
    pub links: Vec<LinkRecord>,
}

impl FlowReport {
    pub fn new(asset: &str, times: &[f64], bins: &[f64], flows: &FlowCounts) -> Self {
        let label = |b: usize| bin_label(b, bins).unwrap_or_else(|| format!("bin {}", b));
        let time = |t: usize| times.get(t).copied().unwrap_or(f64::NAN);

        let links = flows
            .iter()
            .map(|(key, count)| LinkRecord {
                from_time_index: key.from_time,
                from_time: time(key.from_time),
                from_bin: key.from_bin,
                from_label: label(key.from_bin),
                to_time_index: key.to_time,
                to_time: time(key.to_time),
                to_bin: key.to_bin,
                to_label: label(key.to_bin),
                count,
            })
            .collect();

        FlowReport {
            schema_version: SCHEMA_VERSION.to_string(),
            generated_at: Utc::now(),
            run_id: None,
            asset: asset.to_string(),
            times: times.to_vec(),
            bins: bins.to_vec(),
            path_count: (times.len() >= 2).then(|| flows.outgoing_total(0)),
            total_transitions: flows.total(),
            links,
        }
    }

    /// Use the path count reported by the model, which also covers runs
    /// with fewer than two times.
    pub fn with_path_count(mut self, paths: Option<usize>) -> Self {
        if let Some(paths) = paths {
            self.path_count = Some(paths as u64);
        }
        self
    }

    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = Some(run_id.into());
        self
    }

    /// Render the report in the requested output format.
    pub fn render(&self, format: OutputFormat) -> Result<String, serde_json::Error> {
        match format {
            OutputFormat::Json => serde_json::to_string_pretty(self),
            OutputFormat::Md => Ok(self.to_markdown()),
            OutputFormat::Summary => Ok(self.summary_line()),
        }
    }

    fn summary_line(&self) -> String {
        let paths = self
            .path_count
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "{}: {} time point(s), {} bin(s), {} path(s), {} link(s), {} transition(s)",
            self.asset,
            self.times.len(),
            pf_math::bin_count(&self.bins),
            paths,
            self.links.len(),
            self.total_transitions
        )
    }

    fn to_markdown(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# Flows: {}", self.asset);
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", self.summary_line());
        let _ = writeln!(out);
        if self.links.is_empty() {
            let _ = writeln!(out, "_No transitions._");
            return out;
        }
        let _ = writeln!(out, "| from t | from bin | to t | to bin | count |");
        let _ = writeln!(out, "|---:|---|---:|---|---:|");
        for link in &self.links {
            let _ = writeln!(
                out,
                "| {:.1} | {} | {:.1} | {} | {} |",
                link.from_time, link.from_label, link.to_time, link.to_label, link.count
            );
        }
        out
    }
}

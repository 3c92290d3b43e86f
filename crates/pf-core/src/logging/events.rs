//! Event vocabulary shared by every log line: levels, pipeline stages,
//! stable event names and the per-run correlation context.

use serde::Serialize;

/// Severity as written to JSONL output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Level::Trace,
            tracing::Level::DEBUG => Level::Debug,
            tracing::Level::INFO => Level::Info,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::ERROR => Level::Error,
        }
    }
}

/// Stages of one path-flow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Startup and configuration.
    Init,
    /// Reading the replay file.
    Load,
    /// Driving the model and counting transitions.
    Aggregate,
    /// Turning counts into nodes and links.
    Build,
    /// Handing the diagram to a renderer.
    Render,
}

impl Stage {
    pub const fn as_str(self) -> &'static str {
        match self {
            Stage::Init => "init",
            Stage::Load => "load",
            Stage::Aggregate => "aggregate",
            Stage::Build => "build",
            Stage::Render => "render",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event names, used as the tracing target of each event.
pub mod event_names {
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_FINISHED: &str = "run.finished";

    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_DEFAULT_USED: &str = "config.default_used";
    pub const CONFIG_ERROR: &str = "config.error";

    pub const PATHS_LOADED: &str = "paths.loaded";
    pub const FLOWS_AGGREGATED: &str = "flows.aggregated";
    pub const DIAGRAM_BUILT: &str = "diagram.built";
    pub const DIAGRAM_RENDERED: &str = "diagram.rendered";
}

/// Correlation ids for one invocation.
#[derive(Debug, Clone)]
pub struct LogContext {
    pub run_id: String,
    pub host_id: String,
}

impl LogContext {
    pub fn new(run_id: impl Into<String>, host_id: impl Into<String>) -> Self {
        LogContext {
            run_id: run_id.into(),
            host_id: host_id.into(),
        }
    }

    /// Span carrying the run and host ids; events emitted inside it (library
    /// code included) inherit both in JSONL output.
    pub fn span(&self, command: &str) -> tracing::Span {
        tracing::info_span!(
            "run",
            command,
            run_id = %self.run_id,
            host_id = %self.host_id
        )
    }
}

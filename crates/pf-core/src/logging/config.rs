//! Logging configuration, resolved from `PF_LOG`, `RUST_LOG` and
//! `PF_LOG_FORMAT` and then overridden by `-v`/`-q`/`--log-format`.

use clap::ValueEnum;

/// Where log lines go and how they look; both formats write to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    #[value(aliases = ["console", "pretty"])]
    Human,
    #[value(aliases = ["json", "machine"])]
    Jsonl,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            LogFormat::Human => "human",
            LogFormat::Jsonl => "jsonl",
        })
    }
}

/// Minimum level that reaches the output, ordered from most to least verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

/// Accepted spellings, first entry per level is canonical.
const LEVEL_NAMES: &[(&str, LogLevel)] = &[
    ("trace", LogLevel::Trace),
    ("debug", LogLevel::Debug),
    ("info", LogLevel::Info),
    ("warn", LogLevel::Warn),
    ("warning", LogLevel::Warn),
    ("error", LogLevel::Error),
    ("off", LogLevel::Off),
    ("none", LogLevel::Off),
    ("quiet", LogLevel::Off),
];

impl LogLevel {
    /// Level selected by `-v` repetitions (`-v` debug, `-vv` trace).
    pub fn from_verbosity(verbose: u8) -> Option<Self> {
        match verbose {
            0 => None,
            1 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    }

    /// Coarse level implied by a `RUST_LOG` directive string: the most
    /// verbose level name it mentions.
    fn from_directives(directives: &str) -> Option<Self> {
        let lower = directives.to_ascii_lowercase();
        [LogLevel::Trace, LogLevel::Debug, LogLevel::Warn, LogLevel::Error]
            .into_iter()
            .find(|level| lower.contains(level.as_str()))
    }

    pub fn as_str(self) -> &'static str {
        LEVEL_NAMES
            .iter()
            .find(|(_, level)| *level == self)
            .map(|(name, _)| *name)
            .unwrap_or("info")
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        LEVEL_NAMES
            .iter()
            .find(|(name, _)| *name == wanted)
            .map(|(_, level)| *level)
            .ok_or_else(|| format!("unknown log level: {}", s))
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: LogLevel,
    /// Whether to include timestamps in human output.
    pub timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            format: LogFormat::Human,
            level: LogLevel::Info,
            timestamps: true,
        }
    }
}

impl LogConfig {
    /// Create config from environment and CLI overrides.
    pub fn from_env(cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self {
        Self::from_lookup(|key| std::env::var(key).ok(), cli_level, cli_format)
    }

    fn from_lookup(
        env: impl Fn(&str) -> Option<String>,
        cli_level: Option<LogLevel>,
        cli_format: Option<LogFormat>,
    ) -> Self {
        let mut config = LogConfig::default();

        let env_level = match env("PF_LOG") {
            Some(val) => val.parse().ok(),
            None => env("RUST_LOG").and_then(|val| LogLevel::from_directives(&val)),
        };
        let env_format = env("PF_LOG_FORMAT")
            .and_then(|val| <LogFormat as ValueEnum>::from_str(val.trim(), true).ok());

        if let Some(level) = cli_level.or(env_level) {
            config.level = level;
        }
        if let Some(format) = cli_format.or(env_format) {
            config.format = format;
        }
        config
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.timestamps = enabled;
        self
    }
}

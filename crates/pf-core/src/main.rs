//! path-flow core CLI.
//!
//! Loads recorded path snapshots, bins them at each sample time and renders
//! the bin-to-bin transitions as a Sankey diagram:
//! - `render`: write a standalone HTML page (or the plotly figure JSON)
//! - `flows`: print the transition counts
//! - `check`: validate the configuration and, optionally, a replay file

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use pf_common::{OutputFormat, SCHEMA_VERSION};
use pf_config::validate::{validate_flow_config, validate_times};
use pf_config::{load_config, ConfigError, ConfigOptions, FlowConfig, ResolvedConfig, ValidationError};
use pf_core::exit_codes::ExitCode;
use pf_core::logging::{
    event_names, generate_run_id, get_host_id, init_logging, LogConfig, LogContext, LogFormat,
    LogLevel, Stage,
};
use pf_core::{
    generate_flows, log_event, plot_sankey, FlowError, FlowReport, ModelError, PathModel,
    PipelineError, ReplayModel,
};
use pf_report::{
    DiagramLayout, FigureJsonRenderer, HtmlRenderer, Renderer, ReportConfig, ReportError,
    ReportMeta, SankeyDiagram,
};
use thiserror::Error;

/// Path Flow - Sankey diagrams of simulated price-bin transitions
#[derive(Parser)]
#[command(name = "pf-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Path to flow.json (overrides PATH_FLOW_CONFIG and XDG lookup)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Log format on stderr: human or jsonl
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate transitions and render the Sankey diagram
    Render(RenderArgs),

    /// Print the transition counts
    Flows(FlowsArgs),

    /// Validate configuration (and a replay file, if given)
    Check(CheckArgs),

    /// Print version information
    Version,
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Render(_) => "render",
            Commands::Flows(_) => "flows",
            Commands::Check(_) => "check",
            Commands::Version => "version",
        }
    }
}

/// Inputs shared by commands that aggregate flows.
#[derive(Args, Debug)]
struct RunInputs {
    /// Replay file with recorded path snapshots
    #[arg(long)]
    paths: PathBuf,

    /// Asset to bin (overrides config)
    #[arg(long)]
    asset: Option<String>,

    /// Comma-separated sample times (default: config, then snapshot times)
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    times: Option<Vec<f64>>,

    /// Comma-separated ascending bin edges (overrides config)
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    bins: Option<Vec<f64>>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    inputs: RunInputs,

    /// HTML output file
    #[arg(long, short = 'o', default_value = "sankey.html")]
    out: PathBuf,

    /// Write the plotly figure JSON to stdout instead of an HTML page
    #[arg(long)]
    figure_json: bool,

    /// Diagram title (overrides config)
    #[arg(long)]
    title: Option<String>,
}

#[derive(Args, Debug)]
struct FlowsArgs {
    #[command(flatten)]
    inputs: RunInputs,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Also validate this replay file against the configuration
    #[arg(long)]
    paths: Option<PathBuf>,
}

/// Failures surfaced by commands, each mapped to a stable exit code.
#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Input(#[from] ModelError),

    #[error(transparent)]
    Flow(#[from] FlowError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl CliError {
    fn exit_code(&self) -> ExitCode {
        match self {
            CliError::Config(_) | CliError::Validation(_) => ExitCode::ConfigError,
            CliError::Input(_) | CliError::Flow(_) => ExitCode::InputError,
            CliError::Report(ReportError::IoError(_)) | CliError::Output(_) => ExitCode::IoError,
            CliError::Report(_) | CliError::Serialize(_) => ExitCode::InternalError,
        }
    }
}

impl From<PipelineError> for CliError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Flow(err) => CliError::Flow(err),
            PipelineError::Report(err) => CliError::Report(err),
        }
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version come through here too and are not failures.
            let code = if err.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Clean
            };
            let _ = err.print();
            std::process::exit(code.as_i32());
        }
    };

    let cli_level = if cli.global.quiet {
        Some(LogLevel::Error)
    } else {
        LogLevel::from_verbosity(cli.global.verbose)
    };
    init_logging(&LogConfig::from_env(cli_level, cli.global.log_format));

    let ctx = LogContext::new(generate_run_id(), get_host_id());
    let _run = ctx.span(cli.command.name()).entered();

    let result = match &cli.command {
        Commands::Render(args) => run_render(&cli.global, &ctx, args),
        Commands::Flows(args) => run_flows(&cli.global, &ctx, args),
        Commands::Check(args) => run_check(&cli.global, &ctx, args),
        Commands::Version => {
            print_version(&cli.global);
            Ok(ExitCode::Clean)
        }
    };

    let exit_code = result.unwrap_or_else(|err| {
        let code = err.exit_code();
        if code.is_internal_error() {
            log_event!(
                ctx,
                ERROR,
                event_names::RUN_FINISHED,
                Stage::Init,
                "Run failed",
                exit_code = code.code_name()
            );
        } else {
            log_event!(
                ctx,
                WARN,
                event_names::RUN_FINISHED,
                Stage::Init,
                "Run failed",
                exit_code = code.code_name()
            );
        }
        eprintln!("pf-core: {}", err);
        code
    });

    std::process::exit(exit_code.as_i32());
}

/// A fully resolved aggregation run: merged config plus the loaded model.
struct RunPlan {
    resolved: ResolvedConfig,
    config: FlowConfig,
    model: ReplayModel,
}

impl RunPlan {
    fn layout(&self) -> DiagramLayout {
        let d = &self.config.diagram;
        DiagramLayout {
            title: d.title.clone(),
            font_size: d.font_size,
            width: d.width,
            height: d.height,
        }
    }
}

/// Load config and replay file, then merge CLI overrides.
///
/// Precedence for each field is CLI flag, then config file, then (for
/// times only) the replay file's snapshot times.
fn prepare_run(
    global: &GlobalOpts,
    ctx: &LogContext,
    inputs: &RunInputs,
    title: Option<&str>,
) -> Result<RunPlan, CliError> {
    let resolved = load_resolved_config(global, ctx)?;
    let mut config = resolved.config.clone();

    if let Some(asset) = &inputs.asset {
        config.asset = asset.clone();
    }
    if let Some(times) = &inputs.times {
        config.times = times.clone();
    }
    if let Some(bins) = &inputs.bins {
        config.bins = bins.clone();
    }
    if let Some(title) = title {
        config.diagram.title = title.to_string();
    }
    validate_flow_config(&config)?;

    let model = load_model(ctx, &inputs.paths, &config.asset)?;
    if config.times.is_empty() {
        config.times = model.snapshot_times();
    }
    validate_times(&config.times)?;

    Ok(RunPlan {
        resolved,
        config,
        model,
    })
}

fn load_resolved_config(
    global: &GlobalOpts,
    ctx: &LogContext,
) -> Result<ResolvedConfig, CliError> {
    let options = ConfigOptions {
        config_path: global.config.clone(),
    };
    match load_config(&options) {
        Ok(resolved) => {
            match &resolved.path {
                Some(path) => log_event!(
                    ctx,
                    DEBUG,
                    event_names::CONFIG_LOADED,
                    Stage::Init,
                    "Loaded flow config",
                    path = path.display().to_string().as_str()
                ),
                None => log_event!(
                    ctx,
                    DEBUG,
                    event_names::CONFIG_DEFAULT_USED,
                    Stage::Init,
                    "Using built-in flow config"
                ),
            }
            Ok(resolved)
        }
        Err(err) => {
            log_event!(
                ctx,
                WARN,
                event_names::CONFIG_ERROR,
                Stage::Init,
                "Config load failed"
            );
            Err(err.into())
        }
    }
}

fn load_model(ctx: &LogContext, path: &Path, asset: &str) -> Result<ReplayModel, CliError> {
    let model = ReplayModel::from_file(path)?;
    log_event!(
        ctx,
        INFO,
        event_names::PATHS_LOADED,
        Stage::Load,
        "Loaded replay file",
        snapshots = model.snapshot_count(),
        paths = model.path_count(asset).unwrap_or(0)
    );
    Ok(model)
}

fn run_render(global: &GlobalOpts, ctx: &LogContext, args: &RenderArgs) -> Result<ExitCode, CliError> {
    log_event!(ctx, INFO, event_names::RUN_STARTED, Stage::Init, "Starting render");
    let mut plan = prepare_run(global, ctx, &args.inputs, args.title.as_deref())?;
    let layout = plan.layout();

    let mut renderer: Box<dyn Renderer> = if args.figure_json {
        Box::new(FigureJsonRenderer::new(std::io::stdout()))
    } else {
        let meta = ReportMeta {
            asset: Some(plan.config.asset.clone()),
            path_count: plan.model.path_count(&plan.config.asset),
            config_hash: plan.resolved.snapshot.config_hash.clone(),
            run_id: Some(ctx.run_id.clone()),
            ..ReportMeta::default()
        };
        Box::new(HtmlRenderer::new(ReportConfig::default(), &args.out).with_meta(meta))
    };

    let config = &plan.config;
    let diagram = plot_sankey(
        &mut plan.model,
        &config.asset,
        &config.times,
        &config.bins,
        layout,
        renderer.as_mut(),
    )?;

    if !args.figure_json {
        print_render_result(global, ctx, &args.out, &diagram)?;
    }
    Ok(ExitCode::Clean)
}

fn print_render_result(
    global: &GlobalOpts,
    ctx: &LogContext,
    out: &Path,
    diagram: &SankeyDiagram,
) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "run_id": ctx.run_id,
                "command": "render",
                "output": out.display().to_string(),
                "nodes": diagram.nodes.len(),
                "links": diagram.links.len(),
                "total_flow": diagram.total_flow(),
            });
            writeln!(stdout, "{}", serde_json::to_string_pretty(&response)?)?;
        }
        OutputFormat::Md => {
            writeln!(stdout, "# Render\n")?;
            writeln!(stdout, "- output: `{}`", out.display())?;
            writeln!(stdout, "- nodes: {}", diagram.nodes.len())?;
            writeln!(stdout, "- links: {}", diagram.links.len())?;
        }
        OutputFormat::Summary => {
            writeln!(
                stdout,
                "wrote {} ({} nodes, {} links)",
                out.display(),
                diagram.nodes.len(),
                diagram.links.len()
            )?;
        }
    }
    Ok(())
}

fn run_flows(global: &GlobalOpts, ctx: &LogContext, args: &FlowsArgs) -> Result<ExitCode, CliError> {
    log_event!(ctx, INFO, event_names::RUN_STARTED, Stage::Init, "Starting flows");
    let mut plan = prepare_run(global, ctx, &args.inputs, None)?;
    let config = &plan.config;

    let flows = generate_flows(&mut plan.model, &config.asset, &config.times, &config.bins)?;
    log_event!(
        ctx,
        INFO,
        event_names::FLOWS_AGGREGATED,
        Stage::Aggregate,
        "Counted transitions",
        links = flows.len(),
        total = flows.total()
    );

    let report = FlowReport::new(&config.asset, &config.times, &config.bins, &flows)
        .with_path_count(plan.model.path_count(&config.asset))
        .with_run_id(ctx.run_id.clone());
    writeln!(std::io::stdout().lock(), "{}", report.render(global.format)?)?;
    Ok(ExitCode::Clean)
}

fn run_check(global: &GlobalOpts, ctx: &LogContext, args: &CheckArgs) -> Result<ExitCode, CliError> {
    let mut results: Vec<serde_json::Value> = Vec::new();
    let mut exit_code = ExitCode::Clean;

    let config = match load_resolved_config(global, ctx) {
        Ok(resolved) => {
            let validation = validate_flow_config(&resolved.config);
            results.push(serde_json::json!({
                "check": "config",
                "status": if validation.is_ok() { "ok" } else { "error" },
                "source": resolved.source.to_string(),
                "path": resolved.path.as_ref().map(|p| p.display().to_string()),
                "config_hash": resolved.snapshot.short_hash(),
                "error": validation.as_ref().err().map(|e| e.to_string()),
            }));
            if validation.is_err() {
                exit_code = ExitCode::ConfigError;
            }
            Some(resolved.config)
        }
        Err(err) => {
            results.push(serde_json::json!({
                "check": "config",
                "status": "error",
                "error": err.to_string(),
            }));
            exit_code = ExitCode::ConfigError;
            None
        }
    };

    if let Some(path) = &args.paths {
        let check = match ReplayModel::from_file(path) {
            Ok(model) => {
                let asset = config.as_ref().map(|c| c.asset.clone());
                let has_asset = asset
                    .as_ref()
                    .map(|a| model.assets().contains(a))
                    .unwrap_or(true);
                if !has_asset && exit_code == ExitCode::Clean {
                    exit_code = ExitCode::InputError;
                }
                serde_json::json!({
                    "check": "paths",
                    "status": if has_asset { "ok" } else { "error" },
                    "path": path.display().to_string(),
                    "snapshots": model.snapshot_count(),
                    "paths": asset.as_ref().and_then(|a| model.path_count(a)),
                    "assets": model.assets(),
                    "error": (!has_asset).then(|| format!(
                        "asset '{}' not present in replay file",
                        asset.unwrap_or_default()
                    )),
                })
            }
            Err(err) => {
                if exit_code == ExitCode::Clean {
                    exit_code = ExitCode::InputError;
                }
                serde_json::json!({
                    "check": "paths",
                    "status": "error",
                    "path": path.display().to_string(),
                    "error": err.to_string(),
                })
            }
        };
        results.push(check);
    }

    let all_ok = exit_code.is_success();
    let mut stdout = std::io::stdout().lock();
    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "run_id": ctx.run_id,
                "command": "check",
                "status": if all_ok { "ok" } else { "error" },
                "checks": results,
            });
            writeln!(stdout, "{}", serde_json::to_string_pretty(&response)?)?;
        }
        OutputFormat::Md => {
            writeln!(stdout, "# Check\n")?;
            writeln!(stdout, "| check | status | detail |")?;
            writeln!(stdout, "|---|---|---|")?;
            for r in &results {
                writeln!(
                    stdout,
                    "| {} | {} | {} |",
                    r["check"].as_str().unwrap_or("?"),
                    r["status"].as_str().unwrap_or("?"),
                    r["error"].as_str().unwrap_or("")
                )?;
            }
        }
        OutputFormat::Summary => {
            let failed: Vec<&str> = results
                .iter()
                .filter(|r| r["status"] != "ok")
                .filter_map(|r| r["check"].as_str())
                .collect();
            if failed.is_empty() {
                writeln!(stdout, "check: ok ({} check(s))", results.len())?;
            } else {
                writeln!(stdout, "check: failed ({})", failed.join(", "))?;
            }
        }
    }
    Ok(exit_code)
}

fn print_version(global: &GlobalOpts) {
    match global.format {
        OutputFormat::Json => {
            let version_info = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "pf_core_version": env!("CARGO_PKG_VERSION"),
                "rust_version": env!("CARGO_PKG_RUST_VERSION"),
            });
            println!("{:#}", version_info);
        }
        _ => {
            println!("pf-core {}", env!("CARGO_PKG_VERSION"));
            println!("schema version: {}", SCHEMA_VERSION);
        }
    }
}

mod logging;

use std::path::PathBuf;

use apicheck_core::{OperationSpec, Report, Selection, SourceModel, validate};
use apicheck_loader::{
    CheckConfig, OutputFormat, collect_source_paths, load_catalogue, load_structs,
};
use chrono::Utc;
use clap::{ArgAction, Parser};
use serde::Serialize;
use tracing::{debug, info};

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Highest status a process can report; larger finding counts are clamped.
const MAX_EXIT_CODE: i32 = 255;

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Text,
    Json,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(fmt: CliOutputFormat) -> Self {
        match fmt {
            CliOutputFormat::Text => Self::Text,
            CliOutputFormat::Json => Self::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "apicheck", version)]
#[command(about = "Check API request/response structs against a listApis catalogue")]
struct Cli {
    /// YAML run configuration.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Catalogue JSON (listApis response).
    #[arg(long)]
    apis: Option<PathBuf>,
    /// Struct descriptor file or directory (repeatable).
    #[arg(long = "source")]
    sources: Vec<PathBuf>,
    /// Operation to report in detail; exits with its error count.
    #[arg(long)]
    cmd: Option<String>,
    /// Struct to check against the response parameters of --cmd.
    #[arg(long = "type", requires = "cmd")]
    response_type: Option<String>,
    /// Report format (default: text).
    #[arg(long)]
    format: Option<CliOutputFormat>,
    /// Number of matching threads (default: number of CPUs).
    #[arg(long)]
    jobs: Option<usize>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Inputs of one run after merging flags over the configuration file.
#[derive(Debug)]
struct Settings {
    apis: PathBuf,
    sources: Vec<PathBuf>,
    selection: Selection,
    format: OutputFormat,
    jobs: Option<usize>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    version: &'static str,
    generated_at: String,
    exit_code: i32,
    #[serde(flatten)]
    report: &'a Report,
}

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32, String> {
    let config = match &cli.config {
        Some(path) => CheckConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => CheckConfig::default(),
    };

    logging::init(cli.verbose, config.log_level.as_deref())?;

    let settings = resolve_settings(cli, config)?;
    info!(
        apis = %settings.apis.display(),
        sources = settings.sources.len(),
        format = ?settings.format,
        "resolved inputs"
    );

    let operations = load_catalogue(&settings.apis).map_err(|err| {
        format!(
            "Failed to load catalogue '{}': {err}",
            settings.apis.display()
        )
    })?;
    let paths = collect_source_paths(&settings.sources).map_err(|err| err.to_string())?;
    let structs = load_structs(&paths).map_err(|err| err.to_string())?;
    let model = SourceModel::from_structs(structs);

    if let Some(note) = redirect_note(&operations, &settings.selection) {
        eprintln!("{note}");
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(settings.jobs.unwrap_or(0))
        .build()
        .map_err(|err| format!("Failed to create thread pool: {err}"))?;
    debug!(threads = pool.current_num_threads(), "sized matching pool");
    let report = pool.install(|| validate(&operations, &model, &settings.selection));
    let exit_code = report.exit_code().clamp(0, MAX_EXIT_CODE);

    match settings.format {
        OutputFormat::Text => print!("{}", report.render_text()),
        OutputFormat::Json => {
            let doc = JsonReport {
                version: PACKAGE_VERSION,
                generated_at: Utc::now().to_rfc3339(),
                exit_code,
                report: &report,
            };
            let raw = serde_json::to_string_pretty(&doc)
                .map_err(|err| format!("Failed to serialize report: {err}"))?;
            println!("{raw}");
        }
    }

    Ok(exit_code)
}

fn resolve_settings(cli: Cli, config: CheckConfig) -> Result<Settings, String> {
    let apis = cli
        .apis
        .or(config.apis)
        .ok_or_else(|| "Specify the catalogue with --apis or in the config file".to_string())?;

    let sources = if cli.sources.is_empty() {
        config.sources
    } else {
        cli.sources
    };
    if sources.is_empty() {
        return Err(
            "Specify at least one struct descriptor with --source or in the config file"
                .to_string(),
        );
    }

    if cli.jobs == Some(0) {
        return Err("--jobs must be at least 1".to_string());
    }

    Ok(Settings {
        apis,
        sources,
        selection: Selection {
            command: cli.cmd,
            response_type: cli.response_type,
        },
        format: cli.format.map(OutputFormat::from).unwrap_or(config.format),
        jobs: cli.jobs.or(config.jobs),
    })
}

fn redirect_note(operations: &[OperationSpec], selection: &Selection) -> Option<String> {
    let command = selection.command.as_deref()?.to_lowercase();
    let type_name = selection.response_type.as_deref()?;
    let op = operations.iter().find(|op| op.key() == command)?;
    Some(format!(
        "Checking return type of {}Result, using {type_name:?}",
        op.name
    ))
}

//! Project-Management Reports
//!
//! A read-only CLI that loads a project-management snapshot (projects, tasks,
//! users, comments, tags and teams) and prints analytical reports over it.
//! Designed for deterministic, machine-friendly outputs.

use clap::Parser;
use pmreport::cli::{Cli, Commands};
use pmreport::config::{PmReportConfig, DEFAULT_CONFIG_FILE};
use pmreport::errors::{self, ActionableError};
use pmreport::output::{
    render_report, ErrorCode, ExitCode, JsonError, JsonOutput, OutputContext, ReportListEntry,
    ReportResponse, ValidationResponse,
};
use pmreport::reports::{run_all, run_report, ReportKind};
use pmreport::storage::{GraphStore, JsonFileStorage, StorageError};
use pmreport::validation::validate_snapshot;
use pmreport::ReportSchema;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// A command failure carrying its JSON error code and user-facing message
struct Failure {
    code: &'static str,
    error: ActionableError,
}

impl Failure {
    fn new(code: &'static str, error: ActionableError) -> Self {
        Self { code, error }
    }
}

impl From<StorageError> for Failure {
    fn from(err: StorageError) -> Self {
        match &err {
            StorageError::NotFound { path } => {
                Failure::new(ErrorCode::SNAPSHOT_NOT_FOUND, errors::snapshot_not_found(path))
            }
            StorageError::Malformed { path, source } => Failure::new(
                ErrorCode::MALFORMED_SNAPSHOT,
                errors::malformed_snapshot(path, &source.to_string()),
            ),
            StorageError::Serialize { .. } => Failure::new(
                ErrorCode::INTERNAL_ERROR,
                ActionableError::new(err.to_string()),
            ),
            StorageError::Io { .. } => Failure::new(
                ErrorCode::IO_ERROR,
                ActionableError::new(err.to_string())
                    .with_cause("The file is not readable by the current user")
                    .with_remedy("Check the file permissions and try again"),
            ),
        }
    }
}

impl From<std::io::Error> for Failure {
    fn from(err: std::io::Error) -> Self {
        Failure::new(
            ErrorCode::IO_ERROR,
            ActionableError::new(format!("Failed to write output: {}", err)),
        )
    }
}

impl From<serde_json::Error> for Failure {
    fn from(err: serde_json::Error) -> Self {
        Failure::new(
            ErrorCode::INTERNAL_ERROR,
            ActionableError::new(format!("Failed to serialize output: {}", err)),
        )
    }
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "pmreport=warn",
            1 => "pmreport=debug",
            _ => "pmreport=trace",
        })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = OutputContext::new(cli.quiet, cli.json);
    let command_name = cli.command.name();

    let exit_code = match run(&cli, &output) {
        Ok(code) => code,
        Err(failure) => report_failure(&output, &failure, &command_name),
    };

    if exit_code != ExitCode::Success {
        std::process::exit(exit_code.code());
    }
}

fn report_failure(output: &OutputContext, failure: &Failure, command: &str) -> ExitCode {
    let json_error = JsonError::from_actionable(failure.code, &failure.error, command);
    let printed = if output.is_json() {
        json_error
            .to_json_string()
            .map_err(std::io::Error::from)
            .and_then(|json| output.print_json(&json))
    } else {
        output.print_error(failure.error.to_error_message())
    };
    if printed.is_err() {
        eprintln!("Error: {}", failure.error.message());
    }
    json_error.exit_code()
}

fn load_config(cli: &Cli, output: &OutputContext) -> Result<PmReportConfig, Failure> {
    if !cli.config.exists() && cli.config.as_path() != Path::new(DEFAULT_CONFIG_FILE) {
        output.print_warning(format!(
            "Config file {} not found, using defaults",
            cli.config.display()
        ))?;
    }

    PmReportConfig::load(&cli.config).map_err(|e| {
        Failure::new(
            ErrorCode::INVALID_CONFIG,
            errors::invalid_config(&cli.config, &format!("{:#}", e)),
        )
    })
}

fn snapshot_storage(cli: &Cli, config: &PmReportConfig) -> JsonFileStorage {
    let path: PathBuf = cli
        .data
        .clone()
        .unwrap_or_else(|| config.snapshot_path(&cli.config));
    JsonFileStorage::new(path)
}

fn run(cli: &Cli, output: &OutputContext) -> Result<ExitCode, Failure> {
    let command_name = cli.command.name();

    match &cli.command {
        Commands::List => {
            if output.is_json() {
                let entries: Vec<ReportListEntry> =
                    ReportKind::ALL.iter().map(|&kind| kind.into()).collect();
                output.print_json(&JsonOutput::success(entries, command_name).to_json_string()?)?;
            } else {
                for kind in ReportKind::ALL {
                    output.print_data(format!(
                        "{:>2}) {:<20} {}",
                        kind.number(),
                        kind.slug(),
                        kind.title()
                    ))?;
                }
            }
            Ok(ExitCode::Success)
        }
        Commands::Schema => {
            let schema = ReportSchema::generate();
            if output.is_json() {
                output.print_json(&JsonOutput::success(schema, command_name).to_json_string()?)?;
            } else {
                // The schema has no text form; print the bare document
                output.print_data(schema.to_json_string()?)?;
            }
            Ok(ExitCode::Success)
        }
        Commands::Run { report, limit, all } => {
            let config = load_config(cli, output)?;
            let graph = snapshot_storage(cli, &config).load_graph()?;
            let options = config.report_options().with_limit(*limit);

            let result = run_report(&graph, *report, &options);
            if output.is_json() {
                let response = ReportResponse::from(result);
                output.print_json(&JsonOutput::success(response, command_name).to_json_string()?)?;
            } else {
                let display_limit = (!*all).then(|| config.display_limit());
                output.print_data(render_report(&result, display_limit))?;
            }
            Ok(ExitCode::Success)
        }
        Commands::RunAll { all } => {
            let config = load_config(cli, output)?;
            let graph = snapshot_storage(cli, &config).load_graph()?;
            let options = config.report_options();

            let results = run_all(&graph, &options);
            info!(reports = results.len(), "all reports evaluated");

            if output.is_json() {
                let responses: Vec<ReportResponse> =
                    results.into_iter().map(ReportResponse::from).collect();
                output
                    .print_json(&JsonOutput::success(responses, command_name).to_json_string()?)?;
            } else {
                let display_limit = (!*all).then(|| config.display_limit());
                let rendered: Vec<String> = results
                    .iter()
                    .map(|result| render_report(result, display_limit))
                    .collect();
                output.print_data(rendered.join("\n\n"))?;
            }
            Ok(ExitCode::Success)
        }
        Commands::Validate => {
            let config = load_config(cli, output)?;
            let storage = snapshot_storage(cli, &config);
            let snapshot = storage.load_snapshot()?;
            let violations = validate_snapshot(&snapshot);
            let valid = violations.is_empty();

            if output.is_json() && valid {
                let response = ValidationResponse {
                    valid,
                    violations,
                };
                output.print_json(&JsonOutput::success(response, command_name).to_json_string()?)?;
            } else if output.is_json() {
                let json_error = JsonError::from_actionable(
                    ErrorCode::VALIDATION_FAILED,
                    &errors::integrity_failed(violations.len()),
                    command_name,
                )
                .with_details(serde_json::to_value(&violations)?);
                output.print_json(&json_error.to_json_string()?)?;
            } else if valid {
                output.print_info(format!(
                    "Snapshot {} is valid: {} projects, {} tasks, {} users, {} comments, {} tags, {} teams",
                    storage.path().display(),
                    snapshot.projects.len(),
                    snapshot.tasks.len(),
                    snapshot.users.len(),
                    snapshot.comments.len(),
                    snapshot.tags.len(),
                    snapshot.teams.len()
                ))?;
            } else {
                for violation in &violations {
                    output.print_data(format!("  ✗ {}", violation))?;
                }
                output.print_error(errors::integrity_failed(violations.len()).to_error_message())?;
            }

            Ok(if valid {
                ExitCode::Success
            } else {
                ExitCode::ValidationFailed
            })
        }
    }
}

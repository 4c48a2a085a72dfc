//! Command-line interface definitions using clap.

use crate::reports::ReportKind;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Project-management reports
///
/// Runs read-only analytical reports over a project-management snapshot
/// (projects, tasks, users, comments, tags and teams).
///
/// Exit Codes:
///   0  - Command succeeded
///   1  - Generic error occurred
///   2  - Invalid arguments or configuration
///   3  - Snapshot not found
///   4  - Snapshot malformed or failed validation
///  10  - External dependency failed (file system, etc.)
#[derive(Parser)]
#[command(name = "pmreport")]
#[command(about = "Analytical reports over a project-management snapshot", long_about = None)]
pub struct Cli {
    /// Snapshot file (default: from pmreport.toml, else pmreport.json)
    #[arg(long, global = true, value_name = "PATH")]
    pub data: Option<PathBuf>,

    /// Configuration file
    #[arg(long, global = true, value_name = "PATH", default_value = "pmreport.toml")]
    pub config: PathBuf,

    /// Output JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output (for scripting)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List available reports
    List,

    /// Run a single report
    Run {
        /// Report to run
        #[arg(value_enum)]
        report: ReportKind,

        /// Keep only the first N rows of the sorted result
        #[arg(long, value_name = "N")]
        limit: Option<usize>,

        /// Show every row instead of the display limit
        #[arg(long)]
        all: bool,
    },

    /// Run every report
    RunAll {
        /// Show every row instead of the display limit
        #[arg(long)]
        all: bool,
    },

    /// Check the snapshot for dangling references and duplicates
    Validate,

    /// Print the JSON schema of every report's rows
    Schema,
}

impl Commands {
    /// Command name used in JSON metadata
    pub fn name(&self) -> String {
        match self {
            Commands::List => "list".to_string(),
            Commands::Run { report, .. } => format!("run {}", report.slug()),
            Commands::RunAll { .. } => "run-all".to_string(),
            Commands::Validate => "validate".to_string(),
            Commands::Schema => "schema".to_string(),
        }
    }
}

//! Structured output formatting for CLI commands.
//!
//! This module renders report rows as text lines and wraps command results in
//! a consistent JSON envelope for both success and error cases, so output is
//! usable by people and by scripts alike.

use chrono::Utc;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt::Display;
use std::io::{self, Write};

use crate::errors::ActionableError;
use crate::reports::{ReportKind, ReportOutput};
use crate::validation::IntegrityViolation;

/// Version of the JSON output format
const OUTPUT_VERSION: &str = "0.1.0";

// ============================================================================
// Output Context for Quiet Mode
// ============================================================================

/// Context for controlling output verbosity
pub struct OutputContext {
    quiet: bool,
    json: bool,
}

impl OutputContext {
    /// Create a new output context
    pub fn new(quiet: bool, json: bool) -> Self {
        Self { quiet, json }
    }

    /// Print essential output (always shown unless --json)
    pub fn print_data(&self, msg: impl Display) -> io::Result<()> {
        if !self.json {
            writeln_safe(&format!("{}", msg))
        } else {
            Ok(())
        }
    }

    /// Print informational message (suppressed by --quiet or --json)
    pub fn print_info(&self, msg: impl Display) -> io::Result<()> {
        if !self.quiet && !self.json {
            writeln_safe(&format!("{}", msg))
        } else {
            Ok(())
        }
    }

    /// Print warning (suppressed by --quiet or --json)
    pub fn print_warning(&self, msg: impl Display) -> io::Result<()> {
        if !self.quiet && !self.json {
            writeln_safe_stderr(&format!("Warning: {}", msg))
        } else {
            Ok(())
        }
    }

    /// Print error (always shown to stderr)
    pub fn print_error(&self, msg: impl Display) -> io::Result<()> {
        writeln_safe_stderr(&format!("{}", msg))
    }

    /// Print a JSON document to stdout (only in --json mode)
    pub fn print_json(&self, json: &str) -> io::Result<()> {
        if self.json {
            writeln_safe(json)
        } else {
            Ok(())
        }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Safe println that handles broken pipes gracefully
fn writeln_safe(msg: &str) -> io::Result<()> {
    match writeln!(io::stdout(), "{}", msg) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            // Silently exit on broken pipe (expected when piping to head, etc.)
            std::process::exit(0);
        }
        Err(e) => Err(e),
    }
}

/// Safe eprintln that handles broken pipes gracefully
fn writeln_safe_stderr(msg: &str) -> io::Result<()> {
    match writeln!(io::stderr(), "{}", msg) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            std::process::exit(0);
        }
        Err(e) => Err(e),
    }
}

// ============================================================================
// Text Rendering
// ============================================================================

/// Section header for a report, e.g. `--- 4) Task count for each tag ---`
pub fn report_header(kind: ReportKind) -> String {
    format!("--- {}) {} ---", kind.number(), kind.title())
}

/// Render every row of a report as one text line.
pub fn render_report_lines(output: &ReportOutput) -> Vec<String> {
    match output {
        ReportOutput::ProjectSummary(rows) => rows
            .iter()
            .map(|p| {
                format!(
                    "Project: {} | Tasks: {} | Members: {}",
                    p.name, p.tasks_count, p.members_count
                )
            })
            .collect(),
        ReportOutput::BusyTasks(rows) => rows
            .iter()
            .map(|t| format!("Task: {} | Comments: {}", t.title, t.comments_count))
            .collect(),
        ReportOutput::TopBugCreator(Some(top)) => vec![format!(
            "User: {} | BUG Tasks: {}",
            top.user_name, top.bug_task_count
        )],
        ReportOutput::TopBugCreator(None) => vec!["No BUG tasks found.".to_string()],
        ReportOutput::TagUsage(rows) => rows
            .iter()
            .map(|t| format!("Tag: {} | Tasks: {}", t.tag_name, t.task_count))
            .collect(),
        ReportOutput::SelfAssigned(rows) => rows
            .iter()
            .map(|t| format!("Task: {} | Creator/Assignee: {}", t.title, t.creator_name))
            .collect(),
        ReportOutput::LatestComments(rows) => rows
            .iter()
            .map(|c| {
                format!(
                    "Task: {} | Latest Comment: '{}' by {} at {}",
                    c.task_title,
                    c.text,
                    c.author_name.as_deref().unwrap_or("unknown"),
                    c.created_at.to_rfc3339()
                )
            })
            .collect(),
        ReportOutput::MultiTagged(rows) => rows
            .iter()
            .map(|t| format!("Task: {} | Tags: {}", t.title, t.tags.join(", ")))
            .collect(),
        ReportOutput::CommentsPerUser(rows) => rows
            .iter()
            .map(|u| format!("User: {} | Total Comments: {}", u.user_name, u.total_comments))
            .collect(),
        ReportOutput::TeamLoad(rows) => rows
            .iter()
            .map(|t| {
                format!(
                    "Team: {} | Total Unique Tasks: {}",
                    t.team_name, t.total_tasks_load
                )
            })
            .collect(),
        ReportOutput::StoryCommenters(rows) => rows
            .iter()
            .map(|c| {
                format!(
                    "User: {} ({}) | Task: {} | Project: {} | Teams: {}",
                    c.user_name,
                    c.email,
                    c.task_title,
                    c.project_name,
                    c.team_names.join(", ")
                )
            })
            .collect(),
        ReportOutput::TopTagPerCreator(rows) => rows
            .iter()
            .map(|u| {
                format!(
                    "User: {} | Most Frequent Tag: {} (Count: {})",
                    u.user_name, u.tag_name, u.usage_count
                )
            })
            .collect(),
        ReportOutput::AvgComments(rows) => rows
            .iter()
            .map(|p| format!("Project: {} | Avg Comments: {:.2}", p.name, p.average_comments))
            .collect(),
        ReportOutput::CrossCommenters(rows) => rows
            .iter()
            .map(|u| format!("User: {} ({})", u.user_name, u.email))
            .collect(),
    }
}

/// Render a report for display, applying the presenter's row cap.
///
/// `display_limit` only applies to reports that are display-truncated; the
/// computed result is untouched and a trailing note reports hidden rows.
pub fn render_report(output: &ReportOutput, display_limit: Option<usize>) -> String {
    let kind = output.kind();
    let mut lines = vec![report_header(kind)];

    let rendered = render_report_lines(output);
    if rendered.is_empty() {
        lines.push("(no results)".to_string());
    }

    let shown = match display_limit {
        Some(limit) if kind.is_display_truncated() => limit.min(rendered.len()),
        _ => rendered.len(),
    };
    let hidden = rendered.len() - shown;
    lines.extend(rendered.into_iter().take(shown));
    if hidden > 0 {
        lines.push(format!("... {} more (use --all to show everything)", hidden));
    }

    lines.join("\n")
}

// ============================================================================
// JSON Output Types
// ============================================================================

/// Wrapper for successful command output with metadata
#[derive(Debug, Serialize)]
pub struct JsonOutput<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub metadata: Metadata,
}

impl<T: Serialize> JsonOutput<T> {
    /// Create a new successful output with the given data
    pub fn success(data: T, command: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            metadata: Metadata::new(command),
        }
    }

    /// Serialize to JSON string with pretty formatting
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Wrapper for error output with suggestions
#[derive(Debug, Serialize)]
pub struct JsonError {
    pub success: bool,
    pub error: ErrorDetail,
    pub metadata: Metadata,
}

impl JsonError {
    /// Create a new error output
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        command: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
                suggestions: Vec::new(),
            },
            metadata: Metadata::new(command),
        }
    }

    /// Build an error envelope from an actionable error, turning remedies into suggestions
    pub fn from_actionable(
        code: impl Into<String>,
        error: &ActionableError,
        command: impl Into<String>,
    ) -> Self {
        Self::new(code, error.message(), command).with_suggestions(error.remedies().to_vec())
    }

    /// Add details to the error
    pub fn with_details(mut self, details: Value) -> Self {
        self.error.details = Some(details);
        self
    }

    /// Add multiple suggestions to the error
    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.error.suggestions.extend(suggestions);
        self
    }

    /// Serialize to JSON string with pretty formatting
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        ErrorCode::to_exit_code(&self.error.code)
    }
}

/// Error details including code, message, and suggestions
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    /// Error code (e.g., "SNAPSHOT_NOT_FOUND", "VALIDATION_FAILED")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// Suggested actions to resolve the error
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

// ============================================================================
// Exit Codes
// ============================================================================

/// Standardized exit codes for the pmreport CLI
///
/// # Examples
///
/// ```rust
/// use pmreport::ExitCode;
///
/// assert_eq!(ExitCode::Success.code(), 0);
/// assert_eq!(ExitCode::ValidationFailed.code(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Command succeeded (0)
    Success = 0,

    /// Generic error (1)
    GenericError = 1,

    /// Invalid arguments, config or usage error (2)
    InvalidArgument = 2,

    /// Snapshot not found (3)
    NotFound = 3,

    /// Snapshot is malformed or violates integrity (4)
    ValidationFailed = 4,

    /// External dependency failed - file system, etc. (10)
    ExternalError = 10,
}

impl ExitCode {
    /// Convert exit code to i32 for `std::process::exit`
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Get a description of what this exit code means
    pub fn description(self) -> &'static str {
        match self {
            ExitCode::Success => "Command succeeded",
            ExitCode::GenericError => "Generic error occurred",
            ExitCode::InvalidArgument => "Invalid arguments, configuration or usage error",
            ExitCode::NotFound => "Snapshot file not found",
            ExitCode::ValidationFailed => "Snapshot malformed or failed integrity validation",
            ExitCode::ExternalError => "External dependency failed (file system, etc.)",
        }
    }

    /// All exit codes, for documentation and schema output
    pub fn all() -> [ExitCode; 6] {
        [
            ExitCode::Success,
            ExitCode::GenericError,
            ExitCode::InvalidArgument,
            ExitCode::NotFound,
            ExitCode::ValidationFailed,
            ExitCode::ExternalError,
        ]
    }
}

// ============================================================================
// Error Codes (String constants for JSON responses)
// ============================================================================

/// Standard error codes for pmreport operations (JSON format)
pub struct ErrorCode;

impl ErrorCode {
    pub const SNAPSHOT_NOT_FOUND: &'static str = "SNAPSHOT_NOT_FOUND";
    pub const MALFORMED_SNAPSHOT: &'static str = "MALFORMED_SNAPSHOT";
    pub const VALIDATION_FAILED: &'static str = "VALIDATION_FAILED";
    pub const INVALID_CONFIG: &'static str = "INVALID_CONFIG";
    pub const IO_ERROR: &'static str = "IO_ERROR";
    pub const INTERNAL_ERROR: &'static str = "INTERNAL_ERROR";
}

impl ErrorCode {
    /// Map error code string to exit code
    pub fn to_exit_code(code: &str) -> ExitCode {
        match code {
            Self::SNAPSHOT_NOT_FOUND => ExitCode::NotFound,
            Self::MALFORMED_SNAPSHOT | Self::VALIDATION_FAILED => ExitCode::ValidationFailed,
            Self::INVALID_CONFIG => ExitCode::InvalidArgument,
            Self::IO_ERROR => ExitCode::ExternalError,
            _ => ExitCode::GenericError,
        }
    }
}

/// Metadata included in all responses
#[derive(Debug, Serialize)]
pub struct Metadata {
    /// Timestamp when the response was generated
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: chrono::DateTime<Utc>,
    /// Version of the output format
    pub version: String,
    /// Command that generated this response
    pub command: String,
}

impl Metadata {
    fn new(command: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            version: OUTPUT_VERSION.to_string(),
            command: command.into(),
        }
    }
}

/// Serialize timestamp in ISO 8601 format
fn serialize_timestamp<S>(dt: &chrono::DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&dt.to_rfc3339())
}

// ============================================================================
// Response Types
// ============================================================================

/// Response for `list`
#[derive(Debug, Serialize)]
pub struct ReportListEntry {
    pub number: usize,
    pub slug: &'static str,
    pub title: &'static str,
    pub display_truncated: bool,
}

impl From<ReportKind> for ReportListEntry {
    fn from(kind: ReportKind) -> Self {
        Self {
            number: kind.number(),
            slug: kind.slug(),
            title: kind.title(),
            display_truncated: kind.is_display_truncated(),
        }
    }
}

/// Response for `run` and each entry of `run-all`
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub number: usize,
    pub title: &'static str,
    /// Rows in the computed result (after `--limit`, before display truncation)
    pub total: usize,
    pub result: ReportOutput,
}

impl From<ReportOutput> for ReportResponse {
    fn from(output: ReportOutput) -> Self {
        let kind = output.kind();
        Self {
            number: kind.number(),
            title: kind.title(),
            total: output.len(),
            result: output,
        }
    }
}

/// Response for `validate`
#[derive(Debug, Serialize)]
pub struct ValidationResponse {
    pub valid: bool,
    pub violations: Vec<IntegrityViolation>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::{ProjectAverage, TagUsage, TeamLoad};
    use serde_json::json;

    fn team(id: u64, load: usize) -> TeamLoad {
        TeamLoad {
            team_id: id,
            team_name: format!("Team {}", id),
            total_tasks_load: load,
        }
    }

    #[test]
    fn test_json_output_success() {
        let data = json!({"slug": "tag-usage"});
        let output = JsonOutput::success(data, "run tag-usage");

        assert!(output.success);
        assert_eq!(output.data["slug"], "tag-usage");
        assert_eq!(output.metadata.version, OUTPUT_VERSION);
        assert_eq!(output.metadata.command, "run tag-usage");
    }

    #[test]
    fn test_json_output_serialization() {
        let output = JsonOutput::success(json!({"id": 1}), "list");

        let json_str = output.to_json_string().unwrap();
        assert!(json_str.contains("\"success\": true"));
        assert!(json_str.contains("\"timestamp\":"));
        assert!(json_str.contains("\"command\": \"list\""));
    }

    #[test]
    fn test_json_error_from_actionable() {
        let actionable = ActionableError::new("Snapshot not found: data.json")
            .with_cause("The path is wrong")
            .with_remedy("Pass --data <PATH>");
        let error = JsonError::from_actionable(ErrorCode::SNAPSHOT_NOT_FOUND, &actionable, "run");

        assert!(!error.success);
        assert_eq!(error.error.message, "Snapshot not found: data.json");
        assert_eq!(error.error.suggestions, vec!["Pass --data <PATH>"]);
        assert_eq!(error.exit_code(), ExitCode::NotFound);
    }

    #[test]
    fn test_json_error_with_details() {
        let violations = vec![IntegrityViolation::DuplicateId {
            entity: crate::domain::EntityKind::Tag,
            id: 3,
        }];
        let error = JsonError::new(ErrorCode::VALIDATION_FAILED, "1 violation", "validate")
            .with_details(serde_json::to_value(&violations).unwrap());

        let json: Value = serde_json::from_str(&error.to_json_string().unwrap()).unwrap();
        assert_eq!(json["error"]["details"][0]["kind"], "duplicate_id");
        assert_eq!(json["error"]["details"][0]["entity"], "tag");
        assert_eq!(error.exit_code(), ExitCode::ValidationFailed);
    }

    #[test]
    fn test_details_omitted_when_absent() {
        let json_str = JsonError::new(ErrorCode::IO_ERROR, "disk", "run").to_json_string().unwrap();
        assert!(!json_str.contains("details"));
    }

    #[test]
    fn test_error_codes_map_to_exit_codes() {
        assert_eq!(
            ErrorCode::to_exit_code(ErrorCode::MALFORMED_SNAPSHOT),
            ExitCode::ValidationFailed
        );
        assert_eq!(
            ErrorCode::to_exit_code(ErrorCode::INVALID_CONFIG),
            ExitCode::InvalidArgument
        );
        assert_eq!(ErrorCode::to_exit_code("SOMETHING_ELSE"), ExitCode::GenericError);
    }

    #[test]
    fn test_render_average_with_two_decimals() {
        let output = ReportOutput::AvgComments(vec![ProjectAverage {
            project_id: 1,
            name: "Alpha".to_string(),
            average_comments: 1.5,
        }]);

        assert_eq!(
            render_report_lines(&output),
            vec!["Project: Alpha | Avg Comments: 1.50"]
        );
    }

    #[test]
    fn test_render_none_found_for_bug_creator() {
        let rendered = render_report(&ReportOutput::TopBugCreator(None), Some(5));
        assert!(rendered.starts_with("--- 3) Top BUG task creator ---"));
        assert!(rendered.contains("No BUG tasks found."));
    }

    #[test]
    fn test_display_limit_hides_extra_rows() {
        let output = ReportOutput::TeamLoad((1..=7).map(|id| team(id, 10 - id as usize)).collect());

        let rendered = render_report(&output, Some(5));
        assert!(rendered.contains("Team: Team 5"));
        assert!(!rendered.contains("Team: Team 6"));
        assert!(rendered.contains("... 2 more"));

        let everything = render_report(&output, None);
        assert!(everything.contains("Team: Team 7"));
    }

    #[test]
    fn test_display_limit_ignored_for_full_reports() {
        let output = ReportOutput::TagUsage(
            (1..=7)
                .map(|id| TagUsage {
                    tag_id: id,
                    tag_name: format!("tag{}", id),
                    task_count: 0,
                })
                .collect(),
        );

        let rendered = render_report(&output, Some(5));
        assert!(rendered.contains("Tag: tag7"));
        assert!(!rendered.contains("more"));
    }

    #[test]
    fn test_empty_report_says_no_results() {
        let rendered = render_report(&ReportOutput::BusyTasks(Vec::new()), Some(5));
        assert!(rendered.contains("(no results)"));
    }

    #[test]
    fn test_report_response_counts_rows() {
        let response = ReportResponse::from(ReportOutput::TeamLoad(vec![team(1, 2), team(2, 1)]));

        assert_eq!(response.number, 9);
        assert_eq!(response.total, 2);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["result"]["report"], "team-load");
    }
}

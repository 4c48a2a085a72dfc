//! Actionable error formatting for improved user experience.
//!
//! This module provides utilities for creating error messages with:
//! - Clear error description
//! - Possible causes (diagnostics)
//! - Remediation steps (actionable fixes)

use std::fmt;
use std::path::Path;

/// An error with diagnostic context and remediation steps.
///
/// # Example
///
/// ```
/// use pmreport::errors::ActionableError;
///
/// let error = ActionableError::new("Snapshot not found: pmreport.json")
///     .with_cause("The snapshot has not been exported yet")
///     .with_remedy("Point to an existing snapshot: pmreport --data <PATH> list");
///
/// assert!(error.to_string().contains("To fix:"));
/// ```
#[derive(Debug, Clone)]
pub struct ActionableError {
    /// The main error message
    error: String,
    /// Possible causes (diagnostic hints)
    causes: Vec<String>,
    /// Remediation steps (how to fix)
    remediation: Vec<String>,
}

impl ActionableError {
    /// Create a new actionable error with the given message.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            causes: Vec::new(),
            remediation: Vec::new(),
        }
    }

    /// Add a possible cause (diagnostic hint).
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.causes.push(cause.into());
        self
    }

    /// Add a remediation step (actionable fix).
    pub fn with_remedy(mut self, remedy: impl Into<String>) -> Self {
        self.remediation.push(remedy.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.error
    }

    pub fn remedies(&self) -> &[String] {
        &self.remediation
    }

    /// Convert to a formatted error message suitable for display.
    pub fn to_error_message(&self) -> String {
        let mut msg = format!("Error: {}\n", self.error);

        if !self.causes.is_empty() {
            msg.push_str("\nPossible causes:\n");
            for cause in &self.causes {
                msg.push_str(&format!("  • {}\n", cause));
            }
        }

        if !self.remediation.is_empty() {
            msg.push_str("\nTo fix:\n");
            for remedy in &self.remediation {
                msg.push_str(&format!("  • {}\n", remedy));
            }
        }

        msg
    }
}

impl fmt::Display for ActionableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_error_message())
    }
}

impl std::error::Error for ActionableError {}

/// Helper for a missing snapshot file.
pub fn snapshot_not_found(path: &Path) -> ActionableError {
    ActionableError::new(format!("Snapshot not found: {}", path.display()))
        .with_cause("The snapshot has not been exported yet")
        .with_cause("The path in pmreport.toml or --data is wrong")
        .with_remedy("Pass the snapshot explicitly: pmreport --data <PATH> run <REPORT>")
        .with_remedy("Set [data] snapshot = \"<PATH>\" in pmreport.toml")
}

/// Helper for a snapshot that cannot be parsed.
pub fn malformed_snapshot(path: &Path, detail: &str) -> ActionableError {
    ActionableError::new(format!("Malformed snapshot {}: {}", path.display(), detail))
        .with_cause("The file is not valid JSON")
        .with_cause("An entity is missing a required field or has a wrong type")
        .with_remedy("Check that every entity has an id and its required fields and foreign keys")
        .with_remedy(format!("Inspect the file: jq . {}", path.display()))
}

/// Helper for snapshots that failed referential integrity checks.
pub fn integrity_failed(violations: usize) -> ActionableError {
    ActionableError::new(format!(
        "Snapshot failed validation with {} violation(s)",
        violations
    ))
    .with_cause("An entity references an id that does not exist")
    .with_cause("An id or membership is listed twice")
    .with_remedy("Fix the listed entities in the provisioning source and re-export the snapshot")
}

/// Helper for unreadable or invalid configuration.
pub fn invalid_config(path: &Path, detail: &str) -> ActionableError {
    ActionableError::new(format!("Invalid configuration {}: {}", path.display(), detail))
        .with_cause("The file is not valid TOML")
        .with_cause("A setting has the wrong type (e.g. a string where a number is expected)")
        .with_remedy(
            "Supported keys: [data] snapshot; [reports] display_limit, latest_comment_tasks, bug_tag, story_tag",
        )
        .with_remedy("Use a different file: pmreport --config <PATH>")
}

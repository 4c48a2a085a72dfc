//! Configuration file loading and parsing.
//!
//! pmreport reads optional settings from `pmreport.toml`. If no config file
//! exists, the system falls back to sensible defaults. Command-line flags take
//! precedence over anything configured here.

use crate::reports::{
    ReportOptions, DEFAULT_BUG_TAG, DEFAULT_LATEST_COMMENT_TASKS, DEFAULT_STORY_TAG,
};
use crate::storage::json::DEFAULT_SNAPSHOT_FILE;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "pmreport.toml";

/// Rows shown by the presenter for display-truncated reports
pub const DEFAULT_DISPLAY_LIMIT: usize = 5;

/// Root configuration structure loaded from `pmreport.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PmReportConfig {
    /// Snapshot location (optional).
    pub data: Option<DataConfig>,
    /// Report defaults (optional).
    pub reports: Option<ReportsConfig>,
}

/// Where the domain graph snapshot lives.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataConfig {
    /// Path of the JSON snapshot (default: "pmreport.json").
    pub snapshot: Option<PathBuf>,
}

/// Report behavior configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportsConfig {
    /// Rows shown for display-truncated reports (default: 5).
    pub display_limit: Option<usize>,
    /// Commented tasks considered by the latest-comment report (default: 15).
    pub latest_comment_tasks: Option<usize>,
    /// Tag name marking bug tasks (default: "BUG").
    pub bug_tag: Option<String>,
    /// Tag name marking story tasks (default: "STORY").
    pub story_tag: Option<String>,
}

impl ReportsConfig {
    pub fn display_limit(&self) -> usize {
        self.display_limit.unwrap_or(DEFAULT_DISPLAY_LIMIT)
    }

    pub fn latest_comment_tasks(&self) -> usize {
        self.latest_comment_tasks
            .unwrap_or(DEFAULT_LATEST_COMMENT_TASKS)
    }

    pub fn bug_tag(&self) -> String {
        self.bug_tag
            .clone()
            .unwrap_or_else(|| DEFAULT_BUG_TAG.to_string())
    }

    pub fn story_tag(&self) -> String {
        self.story_tag
            .clone()
            .unwrap_or_else(|| DEFAULT_STORY_TAG.to_string())
    }
}

impl PmReportConfig {
    /// Load configuration from `path` if it exists.
    ///
    /// Returns an empty config (all fields None) if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(PmReportConfig::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Snapshot path, resolved against the config file's directory when relative.
    pub fn snapshot_path(&self, config_path: &Path) -> PathBuf {
        match self.data.as_ref().and_then(|d| d.snapshot.as_ref()) {
            Some(snapshot) if snapshot.is_relative() => config_path
                .parent()
                .map_or_else(|| snapshot.clone(), |dir| dir.join(snapshot)),
            Some(snapshot) => snapshot.clone(),
            None => PathBuf::from(DEFAULT_SNAPSHOT_FILE),
        }
    }

    pub fn reports(&self) -> ReportsConfig {
        self.reports.clone().unwrap_or_default()
    }

    pub fn display_limit(&self) -> usize {
        self.reports().display_limit()
    }

    /// Report options derived from configuration (no row limit).
    pub fn report_options(&self) -> ReportOptions {
        let reports = self.reports();
        ReportOptions {
            limit: None,
            latest_comment_tasks: reports.latest_comment_tasks(),
            bug_tag: reports.bug_tag(),
            story_tag: reports.story_tag(),
        }
    }
}

//! JSON schema export for report rows.
//!
//! Lets scripts discover the shape of every report's result without running it.

use crate::output::ExitCode;
use crate::reports::{
    BugCreatorCount, CrossAuthorCommenter, LatestComment, MostFrequentTag, MultiTaggedTask,
    ProjectAverage, ProjectSummary, ReportKind, SelfAssignedTask, StoryCommenter,
    TagUsage, TaskCommentCount, TeamLoad, UserCommentCount,
};
use schemars::schema::RootSchema;
use schemars::schema_for;
use serde::Serialize;
use std::collections::BTreeMap;

/// Schema of the rows produced by one report
pub fn report_schema(kind: ReportKind) -> RootSchema {
    match kind {
        ReportKind::ProjectSummary => schema_for!(Vec<ProjectSummary>),
        ReportKind::BusyTasks => schema_for!(Vec<TaskCommentCount>),
        ReportKind::TopBugCreator => schema_for!(Option<BugCreatorCount>),
        ReportKind::TagUsage => schema_for!(Vec<TagUsage>),
        ReportKind::SelfAssigned => schema_for!(Vec<SelfAssignedTask>),
        ReportKind::LatestComments => schema_for!(Vec<LatestComment>),
        ReportKind::MultiTagged => schema_for!(Vec<MultiTaggedTask>),
        ReportKind::CommentsPerUser => schema_for!(Vec<UserCommentCount>),
        ReportKind::TeamLoad => schema_for!(Vec<TeamLoad>),
        ReportKind::StoryCommenters => schema_for!(Vec<StoryCommenter>),
        ReportKind::TopTagPerCreator => schema_for!(Vec<MostFrequentTag>),
        ReportKind::AvgComments => schema_for!(Vec<ProjectAverage>),
        ReportKind::CrossCommenters => schema_for!(Vec<CrossAuthorCommenter>),
    }
}

/// Exit code documentation entry
#[derive(Debug, Serialize)]
pub struct ExitCodeDoc {
    pub code: i32,
    pub description: &'static str,
}

/// Complete output schema for the pmreport CLI
#[derive(Debug, Serialize)]
pub struct ReportSchema {
    /// CLI version
    pub version: &'static str,
    /// Row schema per report slug
    pub reports: BTreeMap<&'static str, RootSchema>,
    pub exit_codes: Vec<ExitCodeDoc>,
}

impl ReportSchema {
    pub fn generate() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            reports: ReportKind::ALL
                .iter()
                .map(|&kind| (kind.slug(), report_schema(kind)))
                .collect(),
            exit_codes: ExitCode::all()
                .iter()
                .map(|&code| ExitCodeDoc {
                    code: code.code(),
                    description: code.description(),
                })
                .collect(),
        }
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_covers_every_report() {
        let schema = ReportSchema::generate();
        assert_eq!(schema.reports.len(), ReportKind::ALL.len());
        assert!(schema.reports.contains_key("team-load"));
        assert_eq!(schema.exit_codes.len(), 6);
    }

    #[test]
    fn test_row_schema_lists_fields() {
        let json = serde_json::to_value(report_schema(ReportKind::TeamLoad)).unwrap();
        let rendered = json.to_string();

        assert!(rendered.contains("total_tasks_load"));
        assert!(rendered.contains("team_name"));
    }
}

//! The report engine: thirteen read-only queries over a [`DomainGraph`].
//!
//! Every report is a pure function of the graph that filters, groups,
//! aggregates and sorts in explicit stages and returns typed rows. Reports are
//! independent of one another and can run concurrently, see [`run_all`].
//!
//! - **projects**: project summary, average comments per task
//! - **tasks**: busy tasks, self-assigned tasks, latest comments, multi-tagged tasks
//! - **users**: bug creators, comments per user, most frequent tag, cross-author commenters
//! - **tags**: tag usage counts
//! - **teams**: team task load, story commenters

pub mod projects;
pub mod records;
pub mod tags;
pub mod tasks;
pub mod teams;
pub mod users;

pub use projects::{project_summaries, projects_by_average_comments};
pub use records::*;
pub use tags::tag_usage_counts;
pub use tasks::{
    latest_comment_per_task, multi_tagged_tasks, self_assigned_tasks, tasks_with_many_comments,
    BUSY_TASK_THRESHOLD,
};
pub use teams::{story_commenters, team_task_loads};
pub use users::{
    bug_creator_ranking, comments_per_user, cross_author_commenters,
    most_frequent_tag_per_creator, top_bug_creator,
};

use crate::domain::{DomainGraph, EntityId};
use clap::ValueEnum;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Tag name marking bug tasks
pub const DEFAULT_BUG_TAG: &str = "BUG";
/// Tag name marking story tasks
pub const DEFAULT_STORY_TAG: &str = "STORY";
/// Number of commented tasks considered by the latest-comment report
pub const DEFAULT_LATEST_COMMENT_TASKS: usize = 15;

/// Sort rows by a count, largest first, breaking ties by ascending id.
pub(crate) fn rank_by_count<T>(
    rows: &mut [T],
    count: impl Fn(&T) -> usize,
    id: impl Fn(&T) -> EntityId,
) {
    rows.sort_by(|a, b| count(b).cmp(&count(a)).then_with(|| id(a).cmp(&id(b))));
}

/// The thirteen available reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    /// Task and member counts per project
    ProjectSummary,
    /// Tasks with more than two comments
    BusyTasks,
    /// User with the most created bug tasks
    TopBugCreator,
    /// Task count per tag
    TagUsage,
    /// Tasks assigned to their creator
    SelfAssigned,
    /// Latest comment of the first commented tasks
    LatestComments,
    /// Tasks with more than one tag
    MultiTagged,
    /// Comment totals per author
    CommentsPerUser,
    /// Distinct tasks touched by each team
    TeamLoad,
    /// Commenters on story tasks
    StoryCommenters,
    /// Most frequent tag on each user's created tasks
    TopTagPerCreator,
    /// Projects by average comments per task
    AvgComments,
    /// Users commenting on tasks they did not create
    CrossCommenters,
}

impl ReportKind {
    /// All reports in their canonical order
    pub const ALL: [ReportKind; 13] = [
        ReportKind::ProjectSummary,
        ReportKind::BusyTasks,
        ReportKind::TopBugCreator,
        ReportKind::TagUsage,
        ReportKind::SelfAssigned,
        ReportKind::LatestComments,
        ReportKind::MultiTagged,
        ReportKind::CommentsPerUser,
        ReportKind::TeamLoad,
        ReportKind::StoryCommenters,
        ReportKind::TopTagPerCreator,
        ReportKind::AvgComments,
        ReportKind::CrossCommenters,
    ];

    /// 1-based position in [`ReportKind::ALL`]
    pub fn number(self) -> usize {
        Self::ALL
            .iter()
            .position(|kind| *kind == self)
            .map_or(0, |index| index + 1)
    }

    /// Stable identifier used on the command line and in JSON output
    pub fn slug(self) -> &'static str {
        match self {
            ReportKind::ProjectSummary => "project-summary",
            ReportKind::BusyTasks => "busy-tasks",
            ReportKind::TopBugCreator => "top-bug-creator",
            ReportKind::TagUsage => "tag-usage",
            ReportKind::SelfAssigned => "self-assigned",
            ReportKind::LatestComments => "latest-comments",
            ReportKind::MultiTagged => "multi-tagged",
            ReportKind::CommentsPerUser => "comments-per-user",
            ReportKind::TeamLoad => "team-load",
            ReportKind::StoryCommenters => "story-commenters",
            ReportKind::TopTagPerCreator => "top-tag-per-creator",
            ReportKind::AvgComments => "avg-comments",
            ReportKind::CrossCommenters => "cross-commenters",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ReportKind::ProjectSummary => "Project info (name, tasks count, members count)",
            ReportKind::BusyTasks => "Tasks with more than 2 comments",
            ReportKind::TopBugCreator => "Top BUG task creator",
            ReportKind::TagUsage => "Task count for each tag",
            ReportKind::SelfAssigned => "Self-assigned tasks",
            ReportKind::LatestComments => "Latest comment for the first tasks with comments",
            ReportKind::MultiTagged => "Tasks with more than one tag",
            ReportKind::CommentsPerUser => "Total comments per user",
            ReportKind::TeamLoad => "Teams ranked by task load",
            ReportKind::StoryCommenters => "Users who commented on STORY tasks",
            ReportKind::TopTagPerCreator => "Most frequent tag per user",
            ReportKind::AvgComments => "Projects by average comments per task",
            ReportKind::CrossCommenters => "Users commenting on tasks they did not create",
        }
    }

    /// Whether the presenter shows only the first rows of this report by default
    pub fn is_display_truncated(self) -> bool {
        matches!(
            self,
            ReportKind::BusyTasks
                | ReportKind::SelfAssigned
                | ReportKind::MultiTagged
                | ReportKind::CommentsPerUser
                | ReportKind::TeamLoad
                | ReportKind::StoryCommenters
                | ReportKind::TopTagPerCreator
                | ReportKind::CrossCommenters
        )
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Parameters shared by all reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Keep only the first `limit` rows of the sorted result
    pub limit: Option<usize>,
    /// How many commented tasks the latest-comment report considers
    pub latest_comment_tasks: usize,
    /// Tag name identifying bug tasks
    pub bug_tag: String,
    /// Tag name identifying story tasks
    pub story_tag: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            limit: None,
            latest_comment_tasks: DEFAULT_LATEST_COMMENT_TASKS,
            bug_tag: DEFAULT_BUG_TAG.to_string(),
            story_tag: DEFAULT_STORY_TAG.to_string(),
        }
    }
}

impl ReportOptions {
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }
}

/// Typed rows of one evaluated report
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "report", content = "rows", rename_all = "kebab-case")]
pub enum ReportOutput {
    ProjectSummary(Vec<ProjectSummary>),
    BusyTasks(Vec<TaskCommentCount>),
    TopBugCreator(Option<BugCreatorCount>),
    TagUsage(Vec<TagUsage>),
    SelfAssigned(Vec<SelfAssignedTask>),
    LatestComments(Vec<LatestComment>),
    MultiTagged(Vec<MultiTaggedTask>),
    CommentsPerUser(Vec<UserCommentCount>),
    TeamLoad(Vec<TeamLoad>),
    StoryCommenters(Vec<StoryCommenter>),
    TopTagPerCreator(Vec<MostFrequentTag>),
    AvgComments(Vec<ProjectAverage>),
    CrossCommenters(Vec<CrossAuthorCommenter>),
}

impl ReportOutput {
    pub fn kind(&self) -> ReportKind {
        match self {
            ReportOutput::ProjectSummary(_) => ReportKind::ProjectSummary,
            ReportOutput::BusyTasks(_) => ReportKind::BusyTasks,
            ReportOutput::TopBugCreator(_) => ReportKind::TopBugCreator,
            ReportOutput::TagUsage(_) => ReportKind::TagUsage,
            ReportOutput::SelfAssigned(_) => ReportKind::SelfAssigned,
            ReportOutput::LatestComments(_) => ReportKind::LatestComments,
            ReportOutput::MultiTagged(_) => ReportKind::MultiTagged,
            ReportOutput::CommentsPerUser(_) => ReportKind::CommentsPerUser,
            ReportOutput::TeamLoad(_) => ReportKind::TeamLoad,
            ReportOutput::StoryCommenters(_) => ReportKind::StoryCommenters,
            ReportOutput::TopTagPerCreator(_) => ReportKind::TopTagPerCreator,
            ReportOutput::AvgComments(_) => ReportKind::AvgComments,
            ReportOutput::CrossCommenters(_) => ReportKind::CrossCommenters,
        }
    }

    /// Number of computed rows
    pub fn len(&self) -> usize {
        match self {
            ReportOutput::ProjectSummary(rows) => rows.len(),
            ReportOutput::BusyTasks(rows) => rows.len(),
            ReportOutput::TopBugCreator(row) => usize::from(row.is_some()),
            ReportOutput::TagUsage(rows) => rows.len(),
            ReportOutput::SelfAssigned(rows) => rows.len(),
            ReportOutput::LatestComments(rows) => rows.len(),
            ReportOutput::MultiTagged(rows) => rows.len(),
            ReportOutput::CommentsPerUser(rows) => rows.len(),
            ReportOutput::TeamLoad(rows) => rows.len(),
            ReportOutput::StoryCommenters(rows) => rows.len(),
            ReportOutput::TopTagPerCreator(rows) => rows.len(),
            ReportOutput::AvgComments(rows) => rows.len(),
            ReportOutput::CrossCommenters(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keep only the first `n` rows, preserving order.
    pub fn truncate(&mut self, n: usize) {
        match self {
            ReportOutput::ProjectSummary(rows) => rows.truncate(n),
            ReportOutput::BusyTasks(rows) => rows.truncate(n),
            ReportOutput::TopBugCreator(row) => {
                if n == 0 {
                    *row = None;
                }
            }
            ReportOutput::TagUsage(rows) => rows.truncate(n),
            ReportOutput::SelfAssigned(rows) => rows.truncate(n),
            ReportOutput::LatestComments(rows) => rows.truncate(n),
            ReportOutput::MultiTagged(rows) => rows.truncate(n),
            ReportOutput::CommentsPerUser(rows) => rows.truncate(n),
            ReportOutput::TeamLoad(rows) => rows.truncate(n),
            ReportOutput::StoryCommenters(rows) => rows.truncate(n),
            ReportOutput::TopTagPerCreator(rows) => rows.truncate(n),
            ReportOutput::AvgComments(rows) => rows.truncate(n),
            ReportOutput::CrossCommenters(rows) => rows.truncate(n),
        }
    }
}

/// Evaluate one report against the graph.
///
/// The full result is computed and sorted before `options.limit` is applied.
pub fn run_report(graph: &DomainGraph, kind: ReportKind, options: &ReportOptions) -> ReportOutput {
    let mut output = match kind {
        ReportKind::ProjectSummary => ReportOutput::ProjectSummary(project_summaries(graph)),
        ReportKind::BusyTasks => ReportOutput::BusyTasks(tasks_with_many_comments(graph)),
        ReportKind::TopBugCreator => {
            ReportOutput::TopBugCreator(top_bug_creator(graph, &options.bug_tag))
        }
        ReportKind::TagUsage => ReportOutput::TagUsage(tag_usage_counts(graph)),
        ReportKind::SelfAssigned => ReportOutput::SelfAssigned(self_assigned_tasks(graph)),
        ReportKind::LatestComments => ReportOutput::LatestComments(latest_comment_per_task(
            graph,
            options.latest_comment_tasks,
        )),
        ReportKind::MultiTagged => ReportOutput::MultiTagged(multi_tagged_tasks(graph)),
        ReportKind::CommentsPerUser => ReportOutput::CommentsPerUser(comments_per_user(graph)),
        ReportKind::TeamLoad => ReportOutput::TeamLoad(team_task_loads(graph)),
        ReportKind::StoryCommenters => {
            ReportOutput::StoryCommenters(story_commenters(graph, &options.story_tag))
        }
        ReportKind::TopTagPerCreator => {
            ReportOutput::TopTagPerCreator(most_frequent_tag_per_creator(graph))
        }
        ReportKind::AvgComments => ReportOutput::AvgComments(projects_by_average_comments(graph)),
        ReportKind::CrossCommenters => {
            ReportOutput::CrossCommenters(cross_author_commenters(graph))
        }
    };

    debug!(report = %kind, rows = output.len(), "report evaluated");

    if let Some(limit) = options.limit {
        output.truncate(limit);
    }
    output
}

/// Evaluate every report concurrently, returning results in [`ReportKind::ALL`] order.
pub fn run_all(graph: &DomainGraph, options: &ReportOptions) -> Vec<ReportOutput> {
    std::thread::scope(|scope| {
        let handles: Vec<_> = ReportKind::ALL
            .iter()
            .map(|&kind| scope.spawn(move || run_report(graph, kind, options)))
            .collect();

        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GraphBuilder, Project, Task, User};

    #[test]
    fn test_slugs_match_value_enum_names() {
        for kind in ReportKind::ALL {
            let parsed = ReportKind::from_str(kind.slug(), false).unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_numbers_follow_canonical_order() {
        assert_eq!(ReportKind::ProjectSummary.number(), 1);
        assert_eq!(ReportKind::TeamLoad.number(), 9);
        assert_eq!(ReportKind::CrossCommenters.number(), 13);
    }

    #[test]
    fn test_display_truncated_reports() {
        let truncated: Vec<usize> = ReportKind::ALL
            .iter()
            .filter(|k| k.is_display_truncated())
            .map(|k| k.number())
            .collect();
        assert_eq!(truncated, vec![2, 5, 7, 8, 9, 10, 11, 13]);
    }

    #[test]
    fn test_limit_applies_after_sorting() {
        let graph = GraphBuilder::new()
            .project(Project::new(1, "Small"))
            .project(Project::new(2, "Big"))
            .user(User::new(1, "Ann", "ann@example.com"))
            .task(Task::new(1, "a", 2, 1))
            .task(Task::new(2, "b", 2, 1))
            .build();

        let output = run_report(
            &graph,
            ReportKind::AvgComments,
            &ReportOptions::default().with_limit(Some(1)),
        );
        assert_eq!(output.len(), 1);

        let output = run_report(
            &graph,
            ReportKind::ProjectSummary,
            &ReportOptions::default().with_limit(Some(1)),
        );
        match output {
            ReportOutput::ProjectSummary(rows) => assert_eq!(rows[0].name, "Small"),
            other => panic!("unexpected output: {:?}", other),
        }
    }

    #[test]
    fn test_truncate_top_bug_creator_to_zero() {
        let mut output = ReportOutput::TopBugCreator(Some(BugCreatorCount {
            user_id: 1,
            user_name: "Ann".to_string(),
            bug_task_count: 2,
        }));
        output.truncate(1);
        assert_eq!(output.len(), 1);
        output.truncate(0);
        assert!(output.is_empty());
    }

    #[test]
    fn test_run_all_matches_sequential_runs() {
        let graph = GraphBuilder::new()
            .project(Project::new(1, "Alpha"))
            .user(User::new(1, "Ann", "ann@example.com"))
            .task(Task::new(1, "a", 1, 1).assigned_to(1))
            .build();
        let options = ReportOptions::default();

        let all = run_all(&graph, &options);
        assert_eq!(all.len(), ReportKind::ALL.len());
        for (output, kind) in all.iter().zip(ReportKind::ALL) {
            assert_eq!(output.kind(), kind);
            assert_eq!(*output, run_report(&graph, kind, &options));
        }
    }

    #[test]
    fn test_output_serializes_with_report_tag() {
        let output = ReportOutput::TagUsage(vec![TagUsage {
            tag_id: 1,
            tag_name: "BUG".to_string(),
            task_count: 3,
        }]);
        let json = serde_json::to_value(&output).unwrap();

        assert_eq!(json["report"], "tag-usage");
        assert_eq!(json["rows"][0]["task_count"], 3);
    }
}

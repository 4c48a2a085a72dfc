//! Result rows produced by the reports.

use crate::domain::EntityId;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Row of the project summary report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ProjectSummary {
    pub project_id: EntityId,
    pub name: String,
    pub description: String,
    pub tasks_count: usize,
    pub members_count: usize,
}

/// Task together with its number of comments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TaskCommentCount {
    pub task_id: EntityId,
    pub title: String,
    pub comments_count: usize,
}

/// User ranked by the number of created tasks tagged as bugs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BugCreatorCount {
    pub user_id: EntityId,
    pub user_name: String,
    pub bug_task_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TagUsage {
    pub tag_id: EntityId,
    pub tag_name: String,
    pub task_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SelfAssignedTask {
    pub task_id: EntityId,
    pub title: String,
    pub creator_name: String,
}

/// Most recent comment on a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LatestComment {
    pub task_id: EntityId,
    pub task_title: String,
    pub comment_id: EntityId,
    pub text: String,
    pub created_at: DateTime<Utc>,
    /// `None` when the author is missing from the graph
    pub author_name: Option<String>,
}

/// Task carrying more than one tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MultiTaggedTask {
    pub task_id: EntityId,
    pub title: String,
    /// Tag names in alphabetical order
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UserCommentCount {
    pub user_id: EntityId,
    pub user_name: String,
    pub total_comments: usize,
}

/// Distinct task count touched by a team's members
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TeamLoad {
    pub team_id: EntityId,
    pub team_name: String,
    pub total_tasks_load: usize,
}

/// Commenter on a story task, joined out to task, project and teams.
///
/// Rows compare structurally over every field; `team_names` is kept sorted so
/// two rows with the same teams are equal regardless of team order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct StoryCommenter {
    pub user_name: String,
    pub email: String,
    pub task_title: String,
    pub project_name: String,
    pub team_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MostFrequentTag {
    pub user_id: EntityId,
    pub user_name: String,
    pub tag_name: String,
    pub usage_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProjectAverage {
    pub project_id: EntityId,
    pub name: String,
    pub average_comments: f64,
}

/// User identity (name and email) of a cross-author commenter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct CrossAuthorCommenter {
    pub user_name: String,
    pub email: String,
}

//! Team reports.

use super::rank_by_count;
use super::records::{StoryCommenter, TeamLoad};
use crate::domain::{DomainGraph, EntityId};
use std::collections::{BTreeSet, HashSet};

/// Teams ranked by the number of distinct tasks their members touch.
///
/// A team's load is the size of the union of tasks created by any member and
/// tasks assigned to any member; a task matched both ways counts once.
pub fn team_task_loads(graph: &DomainGraph) -> Vec<TeamLoad> {
    let mut rows: Vec<TeamLoad> = graph
        .teams()
        .map(|team| {
            let mut load: BTreeSet<EntityId> = BTreeSet::new();
            for member in graph.team_members(team.id) {
                load.extend(graph.created_tasks(member.id).map(|task| task.id));
                load.extend(graph.assigned_tasks(member.id).map(|task| task.id));
            }

            TeamLoad {
                team_id: team.id,
                team_name: team.name.clone(),
                total_tasks_load: load.len(),
            }
        })
        .collect();

    rank_by_count(&mut rows, |r| r.total_tasks_load, |r| r.team_id);
    rows
}

/// Distinct commenters on tasks tagged `story_tag`.
///
/// Each row joins the comment author to the task, its project and the sorted
/// names of every team on that project. Duplicate rows (equal on all fields)
/// are dropped, keeping the first by comment id.
pub fn story_commenters(graph: &DomainGraph, story_tag: &str) -> Vec<StoryCommenter> {
    let mut seen = HashSet::new();
    let mut rows = Vec::new();

    for comment in graph.comments() {
        let Some(task) = graph.task(comment.task_id) else {
            continue;
        };
        if !graph.task_has_tag_named(task.id, story_tag) {
            continue;
        }
        let (Some(author), Some(project)) =
            (graph.user(comment.author_id), graph.project(task.project_id))
        else {
            continue;
        };

        let mut team_names: Vec<String> = graph
            .project_teams(project.id)
            .map(|team| team.name.clone())
            .collect();
        team_names.sort();

        let row = StoryCommenter {
            user_name: author.name.clone(),
            email: author.email.clone(),
            task_title: task.title.clone(),
            project_name: project.name.clone(),
            team_names,
        };
        if seen.insert(row.clone()) {
            rows.push(row);
        }
    }

    rows
}

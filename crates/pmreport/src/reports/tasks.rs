//! Per-task reports.

use super::records::{LatestComment, MultiTaggedTask, SelfAssignedTask, TaskCommentCount};
use crate::domain::{DomainGraph, Tag};

/// A task needs strictly more comments than this to count as busy
pub const BUSY_TASK_THRESHOLD: usize = 2;

/// Tasks with more than [`BUSY_TASK_THRESHOLD`] comments, in task id order.
pub fn tasks_with_many_comments(graph: &DomainGraph) -> Vec<TaskCommentCount> {
    graph
        .tasks()
        .filter_map(|task| {
            let comments_count = graph.task_comments(task.id).count();
            (comments_count > BUSY_TASK_THRESHOLD).then(|| TaskCommentCount {
                task_id: task.id,
                title: task.title.clone(),
                comments_count,
            })
        })
        .collect()
}

/// Tasks whose creator is also the assignee, in task id order.
///
/// Tasks without an assignee never match.
pub fn self_assigned_tasks(graph: &DomainGraph) -> Vec<SelfAssignedTask> {
    graph
        .tasks()
        .filter(|task| task.is_self_assigned())
        .filter_map(|task| {
            let creator = graph.user(task.creator_id)?;
            Some(SelfAssignedTask {
                task_id: task.id,
                title: task.title.clone(),
                creator_name: creator.name.clone(),
            })
        })
        .collect()
}

/// Latest comment for the first `max_tasks` commented tasks.
///
/// Tasks are taken in ascending id order, skipping tasks without comments.
/// The latest comment has the greatest `created_at`; on equal timestamps the
/// comment with the higher id wins.
pub fn latest_comment_per_task(graph: &DomainGraph, max_tasks: usize) -> Vec<LatestComment> {
    graph
        .tasks()
        .filter_map(|task| {
            let latest = graph.task_comments(task.id).max_by(|a, b| {
                a.created_at
                    .cmp(&b.created_at)
                    .then_with(|| a.id.cmp(&b.id))
            })?;

            Some(LatestComment {
                task_id: task.id,
                task_title: task.title.clone(),
                comment_id: latest.id,
                text: latest.text.clone(),
                created_at: latest.created_at,
                author_name: graph.user(latest.author_id).map(|u| u.name.clone()),
            })
        })
        .take(max_tasks)
        .collect()
}

/// Tasks with more than one distinct tag, in task id order.
///
/// Tag names are listed alphabetically, equal names in tag id order.
pub fn multi_tagged_tasks(graph: &DomainGraph) -> Vec<MultiTaggedTask> {
    graph
        .tasks()
        .filter_map(|task| {
            let mut tags: Vec<&Tag> = graph.task_tags(task.id).collect();
            tags.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
            tags.dedup_by_key(|tag| tag.id);

            (tags.len() > 1).then(|| MultiTaggedTask {
                task_id: task.id,
                title: task.title.clone(),
                tags: tags.iter().map(|tag| tag.name.clone()).collect(),
            })
        })
        .collect()
}

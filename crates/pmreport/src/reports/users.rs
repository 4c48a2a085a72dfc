//! Per-user reports.

use super::rank_by_count;
use super::records::{BugCreatorCount, CrossAuthorCommenter, MostFrequentTag, UserCommentCount};
use crate::domain::{DomainGraph, EntityId};
use std::collections::{BTreeMap, HashSet};

/// Users ranked by how many of their created tasks carry `bug_tag`.
///
/// Users with no such task are left out. Ties keep user id order.
pub fn bug_creator_ranking(graph: &DomainGraph, bug_tag: &str) -> Vec<BugCreatorCount> {
    let mut ranking: Vec<BugCreatorCount> = graph
        .users()
        .filter_map(|user| {
            let bug_task_count = graph
                .created_tasks(user.id)
                .filter(|task| graph.task_has_tag_named(task.id, bug_tag))
                .count();

            (bug_task_count > 0).then(|| BugCreatorCount {
                user_id: user.id,
                user_name: user.name.clone(),
                bug_task_count,
            })
        })
        .collect();

    rank_by_count(&mut ranking, |r| r.bug_task_count, |r| r.user_id);
    ranking
}

/// The user who created the most tasks tagged `bug_tag`.
///
/// Returns `None` when no user created such a task; ties go to the lowest user id.
pub fn top_bug_creator(graph: &DomainGraph, bug_tag: &str) -> Option<BugCreatorCount> {
    bug_creator_ranking(graph, bug_tag).into_iter().next()
}

/// Authored comment totals per user, largest first.
///
/// Only users with at least one comment appear.
pub fn comments_per_user(graph: &DomainGraph) -> Vec<UserCommentCount> {
    let mut totals: BTreeMap<EntityId, usize> = BTreeMap::new();
    for comment in graph.comments() {
        *totals.entry(comment.author_id).or_default() += 1;
    }

    let mut rows: Vec<UserCommentCount> = totals
        .into_iter()
        .filter_map(|(user_id, total_comments)| {
            let user = graph.user(user_id)?;
            Some(UserCommentCount {
                user_id,
                user_name: user.name.clone(),
                total_comments,
            })
        })
        .collect();

    rank_by_count(&mut rows, |r| r.total_comments, |r| r.user_id);
    rows
}

/// For each user, the tag name used most often on tasks they created.
///
/// Users without created tagged tasks are excluded. On equal counts the
/// alphabetically smallest tag name wins. Rows are in user id order.
pub fn most_frequent_tag_per_creator(graph: &DomainGraph) -> Vec<MostFrequentTag> {
    graph
        .users()
        .filter_map(|user| {
            let mut usage: BTreeMap<&str, usize> = BTreeMap::new();
            for task in graph.created_tasks(user.id) {
                for tag in graph.task_tags(task.id) {
                    *usage.entry(tag.name.as_str()).or_default() += 1;
                }
            }

            // names arrive in ascending order, so only a strictly larger count replaces the best
            let (tag_name, usage_count) = usage
                .into_iter()
                .reduce(|best, candidate| if candidate.1 > best.1 { candidate } else { best })?;

            Some(MostFrequentTag {
                user_id: user.id,
                user_name: user.name.clone(),
                tag_name: tag_name.to_string(),
                usage_count,
            })
        })
        .collect()
}

/// Users who commented on at least one task they did not create.
///
/// Distinct by name and email, in order of each user's first such comment.
pub fn cross_author_commenters(graph: &DomainGraph) -> Vec<CrossAuthorCommenter> {
    let mut seen = HashSet::new();
    let mut rows = Vec::new();

    for comment in graph.comments() {
        let Some(task) = graph.task(comment.task_id) else {
            continue;
        };
        if comment.author_id == task.creator_id {
            continue;
        }
        let Some(author) = graph.user(comment.author_id) else {
            continue;
        };

        let row = CrossAuthorCommenter {
            user_name: author.name.clone(),
            email: author.email.clone(),
        };
        if seen.insert(row.clone()) {
            rows.push(row);
        }
    }

    rows
}

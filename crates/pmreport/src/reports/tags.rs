//! Tag reports.

use super::rank_by_count;
use super::records::TagUsage;
use crate::domain::DomainGraph;

/// Number of tasks associated with every tag, largest first.
///
/// Unused tags appear with a count of 0. Ties keep tag id order.
pub fn tag_usage_counts(graph: &DomainGraph) -> Vec<TagUsage> {
    let mut rows: Vec<TagUsage> = graph
        .tags()
        .map(|tag| TagUsage {
            tag_id: tag.id,
            tag_name: tag.name.clone(),
            task_count: graph.tag_tasks(tag.id).count(),
        })
        .collect();

    rank_by_count(&mut rows, |r| r.task_count, |r| r.tag_id);
    rows
}

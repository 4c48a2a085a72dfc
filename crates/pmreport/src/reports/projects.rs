//! Per-project reports.

use super::records::{ProjectAverage, ProjectSummary};
use crate::domain::DomainGraph;

/// Task and member counts for every project, in project id order.
///
/// Projects without tasks or members report zero rather than being omitted.
pub fn project_summaries(graph: &DomainGraph) -> Vec<ProjectSummary> {
    graph
        .projects()
        .map(|project| ProjectSummary {
            project_id: project.id,
            name: project.name.clone(),
            description: project.description.clone(),
            tasks_count: graph.project_tasks(project.id).count(),
            members_count: graph.project_members(project.id).count(),
        })
        .collect()
}

/// Projects ordered by the mean number of comments per task.
///
/// The mean is taken over all of a project's tasks, including uncommented
/// ones. A project with no tasks averages 0. Ties keep project id order.
pub fn projects_by_average_comments(graph: &DomainGraph) -> Vec<ProjectAverage> {
    let mut rows: Vec<ProjectAverage> = graph
        .projects()
        .map(|project| {
            let (tasks, comments) = graph
                .project_tasks(project.id)
                .fold((0usize, 0usize), |(tasks, comments), task| {
                    (tasks + 1, comments + graph.task_comments(task.id).count())
                });

            let average_comments = if tasks == 0 {
                0.0
            } else {
                comments as f64 / tasks as f64
            };

            ProjectAverage {
                project_id: project.id,
                name: project.name.clone(),
                average_comments,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.average_comments
            .total_cmp(&a.average_comments)
            .then_with(|| a.project_id.cmp(&b.project_id))
    });
    rows
}

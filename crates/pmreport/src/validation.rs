//! Referential integrity checks for graph snapshots.
//!
//! The reports assume a well-formed graph and never validate it themselves.
//! Provisioning code (and `pmreport validate`) runs these checks upstream to
//! find dangling foreign keys and duplicated ids or memberships.

use crate::domain::{EntityId, EntityKind, GraphSnapshot};
use serde::Serialize;
use std::collections::HashSet;
use thiserror::Error;
use tracing::warn;

/// A single integrity problem found in a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityViolation {
    /// Two entities of the same kind share an id
    #[error("duplicate {entity} id {id}")]
    DuplicateId { entity: EntityKind, id: EntityId },

    /// A foreign key points at an entity that does not exist
    #[error("{entity} {id} field '{field}' references missing {target} {target_id}")]
    DanglingReference {
        entity: EntityKind,
        id: EntityId,
        field: &'static str,
        target: EntityKind,
        target_id: EntityId,
    },

    /// A many-to-many pair is listed more than once
    #[error("{entity} {id} lists {target} {target_id} more than once")]
    DuplicateMembership {
        entity: EntityKind,
        id: EntityId,
        target: EntityKind,
        target_id: EntityId,
    },
}

/// Known ids per entity kind
struct IdSets {
    projects: HashSet<EntityId>,
    users: HashSet<EntityId>,
    tags: HashSet<EntityId>,
    tasks: HashSet<EntityId>,
}

impl IdSets {
    fn contains(&self, kind: EntityKind, id: EntityId) -> bool {
        match kind {
            EntityKind::Project => self.projects.contains(&id),
            EntityKind::User => self.users.contains(&id),
            EntityKind::Tag => self.tags.contains(&id),
            EntityKind::Task => self.tasks.contains(&id),
            EntityKind::Comment | EntityKind::Team => true,
        }
    }
}

fn collect_ids(
    kind: EntityKind,
    ids: impl Iterator<Item = EntityId>,
    violations: &mut Vec<IntegrityViolation>,
) -> HashSet<EntityId> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            violations.push(IntegrityViolation::DuplicateId { entity: kind, id });
        }
    }
    seen
}

struct Checker<'a> {
    ids: IdSets,
    violations: &'a mut Vec<IntegrityViolation>,
}

impl Checker<'_> {
    fn reference(
        &mut self,
        entity: EntityKind,
        id: EntityId,
        field: &'static str,
        target: EntityKind,
        target_id: EntityId,
    ) {
        if !self.ids.contains(target, target_id) {
            self.violations.push(IntegrityViolation::DanglingReference {
                entity,
                id,
                field,
                target,
                target_id,
            });
        }
    }

    fn memberships(
        &mut self,
        entity: EntityKind,
        id: EntityId,
        field: &'static str,
        target: EntityKind,
        target_ids: &[EntityId],
    ) {
        let mut seen = HashSet::new();
        for &target_id in target_ids {
            if !seen.insert(target_id) {
                self.violations.push(IntegrityViolation::DuplicateMembership {
                    entity,
                    id,
                    target,
                    target_id,
                });
                continue;
            }
            self.reference(entity, id, field, target, target_id);
        }
    }
}

/// Check a snapshot for referential integrity problems.
///
/// Returns every violation found, in a deterministic order (collection by
/// collection, entities in snapshot order). An empty list means the snapshot
/// satisfies the domain invariants.
pub fn validate_snapshot(snapshot: &GraphSnapshot) -> Vec<IntegrityViolation> {
    let mut violations = Vec::new();

    let ids = IdSets {
        projects: collect_ids(
            EntityKind::Project,
            snapshot.projects.iter().map(|p| p.id),
            &mut violations,
        ),
        users: collect_ids(
            EntityKind::User,
            snapshot.users.iter().map(|u| u.id),
            &mut violations,
        ),
        tags: collect_ids(
            EntityKind::Tag,
            snapshot.tags.iter().map(|t| t.id),
            &mut violations,
        ),
        tasks: collect_ids(
            EntityKind::Task,
            snapshot.tasks.iter().map(|t| t.id),
            &mut violations,
        ),
    };
    collect_ids(
        EntityKind::Comment,
        snapshot.comments.iter().map(|c| c.id),
        &mut violations,
    );
    collect_ids(
        EntityKind::Team,
        snapshot.teams.iter().map(|t| t.id),
        &mut violations,
    );

    let mut checker = Checker {
        ids,
        violations: &mut violations,
    };

    for project in &snapshot.projects {
        checker.memberships(
            EntityKind::Project,
            project.id,
            "member_ids",
            EntityKind::User,
            &project.member_ids,
        );
    }

    for task in &snapshot.tasks {
        let kind = EntityKind::Task;
        checker.reference(kind, task.id, "project_id", EntityKind::Project, task.project_id);
        checker.reference(kind, task.id, "creator_id", EntityKind::User, task.creator_id);
        if let Some(assignee_id) = task.assignee_id {
            checker.reference(kind, task.id, "assignee_id", EntityKind::User, assignee_id);
        }
        checker.memberships(kind, task.id, "tag_ids", EntityKind::Tag, &task.tag_ids);
    }

    for comment in &snapshot.comments {
        let kind = EntityKind::Comment;
        checker.reference(kind, comment.id, "task_id", EntityKind::Task, comment.task_id);
        checker.reference(kind, comment.id, "author_id", EntityKind::User, comment.author_id);
    }

    for team in &snapshot.teams {
        let kind = EntityKind::Team;
        checker.reference(kind, team.id, "project_id", EntityKind::Project, team.project_id);
        checker.memberships(kind, team.id, "member_ids", EntityKind::User, &team.member_ids);
    }

    for violation in &violations {
        warn!(%violation, "snapshot integrity violation");
    }
    violations
}

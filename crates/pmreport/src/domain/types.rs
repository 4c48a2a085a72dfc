//! Entity types of the project-management domain.
//!
//! Entities reference each other by id only; relationship navigation lives on
//! [`DomainGraph`](super::DomainGraph).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier shared by every entity type.
///
/// Ids are unique per entity type and their numeric order is the natural
/// order used for reproducible report output.
pub type EntityId = u64;

/// Kind of entity, used when describing integrity problems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Project,
    Task,
    User,
    Comment,
    Tag,
    Team,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Project => "project",
            EntityKind::Task => "task",
            EntityKind::User => "user",
            EntityKind::Comment => "comment",
            EntityKind::Tag => "tag",
            EntityKind::Team => "team",
        };
        f.write_str(name)
    }
}

/// A project owning tasks and teams
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier
    pub id: EntityId,
    /// Display name
    pub name: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Users participating in the project
    #[serde(default)]
    pub member_ids: Vec<EntityId>,
}

impl Project {
    /// Create a project with no description and no members
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            member_ids: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_members(mut self, member_ids: impl IntoIterator<Item = EntityId>) -> Self {
        self.member_ids = member_ids.into_iter().collect();
        self
    }
}

/// A unit of work inside a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: EntityId,
    /// Short summary of the task
    pub title: String,
    /// Owning project
    pub project_id: EntityId,
    /// User who created the task
    pub creator_id: EntityId,
    /// User the task is assigned to, if any
    #[serde(default)]
    pub assignee_id: Option<EntityId>,
    /// Associated tags, in membership order
    #[serde(default)]
    pub tag_ids: Vec<EntityId>,
}

impl Task {
    /// Create an unassigned, untagged task
    pub fn new(
        id: EntityId,
        title: impl Into<String>,
        project_id: EntityId,
        creator_id: EntityId,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            project_id,
            creator_id,
            assignee_id: None,
            tag_ids: Vec::new(),
        }
    }

    pub fn assigned_to(mut self, user_id: EntityId) -> Self {
        self.assignee_id = Some(user_id);
        self
    }

    pub fn tagged(mut self, tag_ids: impl IntoIterator<Item = EntityId>) -> Self {
        self.tag_ids = tag_ids.into_iter().collect();
        self
    }

    /// True when the creator is also the assignee.
    ///
    /// A task without an assignee is never self-assigned.
    pub fn is_self_assigned(&self) -> bool {
        self.assignee_id == Some(self.creator_id)
    }
}

/// A person who creates, works on and comments on tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub name: String,
    pub email: String,
}

impl User {
    pub fn new(id: EntityId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
        }
    }
}

/// A comment left on a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: EntityId,
    /// Task the comment belongs to
    pub task_id: EntityId,
    /// User who wrote the comment
    pub author_id: EntityId,
    pub text: String,
    /// When the comment was written
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(
        id: EntityId,
        task_id: EntityId,
        author_id: EntityId,
        text: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            task_id,
            author_id,
            text: text.into(),
            created_at,
        }
    }
}

/// A label attached to tasks.
///
/// Names are treated as grouping keys but are not guaranteed to be unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: EntityId,
    pub name: String,
}

impl Tag {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A group of users working on one project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: EntityId,
    pub name: String,
    /// Project the team belongs to
    pub project_id: EntityId,
    /// Users in the team
    #[serde(default)]
    pub member_ids: Vec<EntityId>,
}

impl Team {
    pub fn new(id: EntityId, name: impl Into<String>, project_id: EntityId) -> Self {
        Self {
            id,
            name: name.into(),
            project_id,
            member_ids: Vec::new(),
        }
    }

    pub fn with_members(mut self, member_ids: impl IntoIterator<Item = EntityId>) -> Self {
        self.member_ids = member_ids.into_iter().collect();
        self
    }
}

//! In-memory storage implementation for testing and embedding.
//!
//! Holds a snapshot behind an `Arc`, so clones share the same data and can be
//! handed to several threads.

use crate::domain::GraphSnapshot;
use crate::storage::{GraphStore, StorageError};
use std::sync::Arc;

/// In-memory storage backend.
///
/// # Examples
///
/// ```
/// use pmreport::domain::{GraphBuilder, User};
/// use pmreport::storage::{GraphStore, InMemoryStorage};
///
/// let storage = InMemoryStorage::new(
///     GraphBuilder::new().user(User::new(1, "Ann", "ann@example.com")).snapshot(),
/// );
/// let graph = storage.load_graph().unwrap();
/// assert_eq!(graph.user(1).unwrap().name, "Ann");
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    snapshot: Arc<GraphSnapshot>,
}

impl InMemoryStorage {
    pub fn new(snapshot: GraphSnapshot) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
        }
    }
}

impl GraphStore for InMemoryStorage {
    fn load_snapshot(&self) -> Result<GraphSnapshot, StorageError> {
        Ok(self.snapshot.as_ref().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GraphBuilder, Project, Task, User};

    #[test]
    fn test_default_storage_is_empty() {
        let storage = InMemoryStorage::default();
        let graph = storage.load_graph().unwrap();

        assert_eq!(graph.projects().count(), 0);
        assert_eq!(graph.tasks().count(), 0);
    }

    #[test]
    fn test_clones_share_the_snapshot() {
        let storage = InMemoryStorage::new(
            GraphBuilder::new()
                .project(Project::new(1, "Alpha"))
                .user(User::new(1, "Ann", "ann@example.com"))
                .task(Task::new(1, "Task", 1, 1))
                .snapshot(),
        );
        let clone = storage.clone();

        assert_eq!(
            storage.load_snapshot().unwrap(),
            clone.load_snapshot().unwrap()
        );
        assert_eq!(clone.load_graph().unwrap().project_tasks(1).count(), 1);
    }

    #[test]
    fn test_loading_is_repeatable() {
        let storage = InMemoryStorage::new(
            GraphBuilder::new()
                .project(Project::new(1, "Alpha"))
                .snapshot(),
        );

        let first = storage.load_snapshot().unwrap();
        let second = storage.load_snapshot().unwrap();
        assert_eq!(first, second);
    }
}

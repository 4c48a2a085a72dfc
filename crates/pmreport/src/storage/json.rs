//! JSON file-based storage implementation.
//!
//! A whole domain graph is stored as one JSON document. Writes are atomic
//! (write to a temp file, then rename) so a reader never sees a partial file.

use crate::domain::GraphSnapshot;
use crate::storage::{GraphStore, StorageError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

/// Snapshot file name used when nothing else is configured
pub const DEFAULT_SNAPSHOT_FILE: &str = "pmreport.json";

/// Snapshot stored as a single JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Create a storage instance reading the snapshot at `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a snapshot, replacing any existing file.
    ///
    /// Used by data provisioning; the reports never write.
    pub fn write_snapshot(&self, snapshot: &GraphSnapshot) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(snapshot).map_err(|source| {
            StorageError::Serialize {
                path: self.path.clone(),
                source,
            }
        })?;

        let io_error = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };

        // Atomic write: write to temp file, then rename
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, json).map_err(io_error)?;
        fs::rename(&temp_path, &self.path).map_err(io_error)?;

        Ok(())
    }
}

impl GraphStore for JsonFileStorage {
    fn load_snapshot(&self) -> Result<GraphSnapshot, StorageError> {
        let contents = fs::read_to_string(&self.path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                StorageError::NotFound {
                    path: self.path.clone(),
                }
            } else {
                StorageError::Io {
                    path: self.path.clone(),
                    source,
                }
            }
        })?;

        let snapshot: GraphSnapshot =
            serde_json::from_str(&contents).map_err(|source| StorageError::Malformed {
                path: self.path.clone(),
                source,
            })?;

        info!(
            path = %self.path.display(),
            projects = snapshot.projects.len(),
            tasks = snapshot.tasks.len(),
            comments = snapshot.comments.len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Comment, GraphBuilder, Project, Tag, Task, User};
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn setup_storage() -> (TempDir, JsonFileStorage) {
        let temp = TempDir::new().unwrap();
        let storage = JsonFileStorage::new(temp.path().join(DEFAULT_SNAPSHOT_FILE));
        (temp, storage)
    }

    #[test]
    fn test_write_then_load_snapshot() {
        let (_temp, storage) = setup_storage();
        let snapshot = GraphBuilder::new()
            .project(Project::new(1, "Alpha").with_description("First"))
            .user(User::new(1, "Ann", "ann@example.com"))
            .tag(Tag::new(1, "BUG"))
            .task(Task::new(1, "Fix crash", 1, 1).tagged([1]))
            .comment(Comment::new(
                1,
                1,
                1,
                "On it",
                Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            ))
            .snapshot();

        storage.write_snapshot(&snapshot).unwrap();
        let loaded = storage.load_snapshot().unwrap();

        assert_eq!(loaded, snapshot);
        assert!(!storage.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let (_temp, storage) = setup_storage();

        let err = storage.load_snapshot().unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));
        assert!(err.to_string().contains("Snapshot not found"));
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let (_temp, storage) = setup_storage();
        fs::write(storage.path(), "{ not json").unwrap();

        let err = storage.load_snapshot().unwrap_err();
        assert!(matches!(err, StorageError::Malformed { .. }));
    }

    #[test]
    fn test_serialize_failure_is_not_reported_as_malformed() {
        let source = serde_json::from_str::<u8>("x").unwrap_err();
        let err = StorageError::Serialize {
            path: PathBuf::from("out.json"),
            source,
        };

        let message = err.to_string();
        assert!(message.starts_with("Failed to serialize snapshot out.json"));
        assert!(!message.contains("Malformed"));
    }

    #[test]
    fn test_missing_collections_default_to_empty() {
        let (_temp, storage) = setup_storage();
        fs::write(
            storage.path(),
            r#"{"projects": [{"id": 1, "name": "Alpha"}]}"#,
        )
        .unwrap();

        let graph = storage.load_graph().unwrap();
        assert_eq!(graph.projects().count(), 1);
        assert_eq!(graph.users().count(), 0);
        assert_eq!(graph.project(1).unwrap().description, "");
    }
}

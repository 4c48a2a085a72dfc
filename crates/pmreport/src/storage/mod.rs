//! Storage abstraction for loading domain graphs.
//!
//! This module defines the `GraphStore` trait that abstracts where a snapshot
//! comes from, allowing different backends (JSON files, in-memory fixtures)
//! to feed the reports interchangeably. Stores are read-only.

use crate::domain::{DomainGraph, GraphSnapshot};
use std::path::PathBuf;
use thiserror::Error;

pub mod json;
pub mod memory;

pub use json::JsonFileStorage;
pub use memory::InMemoryStorage;

/// Errors raised while loading a snapshot
#[derive(Debug, Error)]
pub enum StorageError {
    /// The snapshot file does not exist
    #[error("Snapshot not found: {}", path.display())]
    NotFound { path: PathBuf },
    /// The snapshot could not be read or written
    #[error("Failed to access snapshot {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The snapshot is not valid JSON or does not match the expected shape
    #[error("Malformed snapshot {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// A snapshot could not be encoded for writing
    #[error("Failed to serialize snapshot {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Trait for backends that provide a domain graph snapshot.
///
/// # Examples
///
/// ```
/// use pmreport::domain::{GraphBuilder, Project};
/// use pmreport::storage::{GraphStore, InMemoryStorage};
///
/// let snapshot = GraphBuilder::new().project(Project::new(1, "Alpha")).snapshot();
/// let storage = InMemoryStorage::new(snapshot);
///
/// let graph = storage.load_graph().unwrap();
/// assert_eq!(graph.projects().count(), 1);
/// ```
pub trait GraphStore {
    /// Load the raw snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot is missing, unreadable or malformed.
    fn load_snapshot(&self) -> Result<GraphSnapshot, StorageError>;

    /// Load the snapshot and build an indexed graph from it.
    fn load_graph(&self) -> Result<DomainGraph, StorageError> {
        self.load_snapshot().map(DomainGraph::from_snapshot)
    }
}

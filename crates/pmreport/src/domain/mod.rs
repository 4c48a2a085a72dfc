//! Core domain types for the project-management graph.
//!
//! This module provides the domain layer containing:
//! - **types**: Entity data structures (Project, Task, User, Comment, Tag, Team)
//! - **graph**: The read-only `DomainGraph` with relationship navigation
//!
//! The domain layer performs no I/O and exposes read traversal only.

pub mod graph;
pub mod types;

pub use graph::{DomainGraph, GraphBuilder, GraphSnapshot};
pub use types::*;

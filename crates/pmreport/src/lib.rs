//! Project-Management Reports Library
//!
//! This library provides the domain graph, the thirteen analytical reports
//! and the snapshot loading used by the `pmreport` CLI. It can also be
//! embedded in other applications that already hold a [`DomainGraph`].

pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod output;
pub mod reports;
pub mod schema;
pub mod storage;
pub mod validation;

// Re-export commonly used types
pub use domain::{DomainGraph, EntityId, GraphBuilder, GraphSnapshot};
pub use output::{ExitCode, JsonError, JsonOutput};
pub use reports::{run_all, run_report, ReportKind, ReportOptions, ReportOutput};
pub use schema::ReportSchema;
pub use storage::{GraphStore, InMemoryStorage, JsonFileStorage, StorageError};
pub use validation::{validate_snapshot, IntegrityViolation};

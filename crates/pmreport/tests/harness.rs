//! Shared fixtures for report and CLI tests
//!
//! The sample graph has three projects, four users, four tags, four tasks,
//! five comments and three teams. Expected report results are spelled out in
//! the tests that use it.

#![allow(dead_code)]

use assert_cmd::Command;
use chrono::{DateTime, Duration, TimeZone, Utc};
use pmreport::domain::{Comment, GraphBuilder, GraphSnapshot, Project, Tag, Task, Team, User};
use pmreport::storage::JsonFileStorage;
use pmreport::DomainGraph;
use std::path::PathBuf;
use tempfile::TempDir;

/// Fixed point in time, offset by `minutes`
pub fn ts(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap() + Duration::minutes(minutes)
}

pub fn sample_snapshot() -> GraphSnapshot {
    GraphBuilder::new()
        .user(User::new(1, "Ann", "ann@example.com"))
        .user(User::new(2, "Bob", "bob@example.com"))
        .user(User::new(3, "Cid", "cid@example.com"))
        .user(User::new(4, "Dee", "dee@example.com"))
        .tag(Tag::new(1, "BUG"))
        .tag(Tag::new(2, "STORY"))
        .tag(Tag::new(3, "UI"))
        .tag(Tag::new(4, "Unused"))
        .project(
            Project::new(1, "Alpha")
                .with_description("Core product")
                .with_members([1, 2]),
        )
        .project(Project::new(2, "Beta").with_members([3]))
        .project(Project::new(3, "Gamma"))
        .task(Task::new(1, "Login page", 1, 1).assigned_to(2).tagged([1, 3]))
        .task(Task::new(2, "Signup flow", 1, 1).assigned_to(1).tagged([2, 3]))
        .task(Task::new(3, "Export CSV", 2, 3).tagged([1]))
        .task(Task::new(4, "Fix crash", 2, 1).assigned_to(3).tagged([1]))
        .comment(Comment::new(1, 1, 2, "Looks off", ts(0)))
        .comment(Comment::new(2, 1, 1, "Fixed", ts(10)))
        .comment(Comment::new(3, 1, 2, "Confirmed", ts(20)))
        .comment(Comment::new(4, 2, 3, "Needs copy", ts(5)))
        .comment(Comment::new(5, 3, 3, "Started", ts(1)))
        .team(Team::new(1, "Frontend", 1).with_members([1, 2]))
        .team(Team::new(2, "Backend", 2).with_members([3, 4]))
        .team(Team::new(3, "Design", 1))
        .snapshot()
}

pub fn sample_graph() -> DomainGraph {
    DomainGraph::from_snapshot(sample_snapshot())
}

/// Isolated working directory holding a snapshot file, for CLI tests
pub struct TestHarness {
    temp: TempDir,
    pub snapshot_path: PathBuf,
}

impl TestHarness {
    /// Write `snapshot` to `pmreport.json` inside a fresh temp directory
    pub fn with_snapshot(snapshot: &GraphSnapshot) -> Self {
        let temp = TempDir::new().unwrap();
        let snapshot_path = temp.path().join("pmreport.json");
        JsonFileStorage::new(&snapshot_path)
            .write_snapshot(snapshot)
            .unwrap();
        Self {
            temp,
            snapshot_path,
        }
    }

    pub fn new() -> Self {
        Self::with_snapshot(&sample_snapshot())
    }

    /// An empty directory without any snapshot
    pub fn empty() -> Self {
        let temp = TempDir::new().unwrap();
        let snapshot_path = temp.path().join("pmreport.json");
        Self {
            temp,
            snapshot_path,
        }
    }

    pub fn dir(&self) -> &std::path::Path {
        self.temp.path()
    }

    /// `pmreport` command running inside the harness directory
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("pmreport").unwrap();
        cmd.current_dir(self.temp.path()).env_remove("RUST_LOG");
        cmd
    }
}

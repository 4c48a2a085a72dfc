//! Integration tests for snapshot storage backends

mod harness;

use harness::sample_snapshot;
use pmreport::reports::{run_all, ReportOptions};
use pmreport::storage::{GraphStore, InMemoryStorage, JsonFileStorage, StorageError};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_json_snapshot_yields_same_reports_as_memory() {
    let temp = TempDir::new().unwrap();
    let storage = JsonFileStorage::new(temp.path().join("graph.json"));
    storage.write_snapshot(&sample_snapshot()).unwrap();

    let from_file = storage.load_graph().unwrap();
    let in_memory = InMemoryStorage::new(sample_snapshot()).load_graph().unwrap();

    let options = ReportOptions::default();
    assert_eq!(run_all(&from_file, &options), run_all(&in_memory, &options));
}

#[test]
fn test_write_leaves_no_temp_file() {
    let temp = TempDir::new().unwrap();
    let storage = JsonFileStorage::new(temp.path().join("graph.json"));
    storage.write_snapshot(&sample_snapshot()).unwrap();

    let entries: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec!["graph.json"]);
}

#[test]
fn test_hand_written_snapshot_with_missing_collections() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("graph.json");
    fs::write(
        &path,
        r#"{
  "users": [{ "id": 1, "name": "Ann", "email": "ann@example.com" }],
  "projects": [{ "id": 1, "name": "Alpha", "member_ids": [1] }],
  "tasks": [{ "id": 1, "title": "Docs", "project_id": 1, "creator_id": 1, "assignee_id": 1 }]
}"#,
    )
    .unwrap();

    let graph = JsonFileStorage::new(&path).load_graph().unwrap();
    assert_eq!(graph.project_tasks(1).count(), 1);
    assert_eq!(graph.project_members(1).count(), 1);
    assert_eq!(graph.comments().count(), 0);
    assert!(graph.task(1).unwrap().is_self_assigned());
}

#[test]
fn test_missing_and_malformed_snapshots() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("graph.json");

    let err = JsonFileStorage::new(&path).load_snapshot().unwrap_err();
    assert!(matches!(err, StorageError::NotFound { .. }));

    fs::write(&path, "{ \"tasks\": [{ \"id\": \"one\" }] }").unwrap();
    let err = JsonFileStorage::new(&path).load_snapshot().unwrap_err();
    assert!(matches!(err, StorageError::Malformed { .. }));
    assert!(err.to_string().contains("graph.json"));
}

#![cfg(feature = "sqlite")]

use critical_path_tool::{PersistenceError, ProjectTasks, SqliteTaskStore, TaskRecord, TaskStore};
use serde_json::json;
use tempfile::NamedTempFile;

fn project(key: &str, summaries: &[&str]) -> ProjectTasks {
    let tasks = summaries
        .iter()
        .enumerate()
        .map(|(idx, summary)| {
            TaskRecord::new(format!("{key}-{}", idx + 1), *summary).with_estimate_seconds(3600)
        })
        .collect();
    ProjectTasks::new(key, tasks)
}

#[test]
fn sqlite_store_round_trip_project() {
    let file = NamedTempFile::new().unwrap();
    let store = SqliteTaskStore::new(file.path()).unwrap();

    let mut saved = project("PRJ", &["Design", "Build"]);
    saved.project_name = Some("Platform".into());
    saved.tasks[1].predecessors = Some(vec!["PRJ-1".into()]);
    saved.tasks[1].extra.insert("status".into(), json!("Done"));
    store.save_project(&saved).expect("save project");

    // A second connection sees the committed row.
    let reopened = SqliteTaskStore::new(file.path()).unwrap();
    let loaded = reopened
        .load_project("PRJ")
        .expect("load project")
        .expect("project exists");

    assert_eq!(loaded, saved);
    assert_eq!(loaded.tasks[1].extra["status"], json!("Done"));
}

#[test]
fn saving_again_replaces_the_snapshot() {
    let store = SqliteTaskStore::in_memory().unwrap();
    store.save_project(&project("PRJ", &["One"])).unwrap();
    let first_stamp = store.updated_at("PRJ").unwrap();
    assert!(first_stamp.is_some());

    store
        .save_project(&project("PRJ", &["One", "Two", "Three"]))
        .unwrap();

    let loaded = store.require_project("PRJ").unwrap();
    assert_eq!(loaded.tasks.len(), 3);
    assert_eq!(store.project_keys().unwrap(), vec!["PRJ"]);
}

#[test]
fn keys_are_listed_in_order() {
    let store = SqliteTaskStore::in_memory().unwrap();
    for key in ["ZETA", "ALPHA", "MID"] {
        store.save_project(&project(key, &["Task"])).unwrap();
    }
    assert_eq!(store.project_keys().unwrap(), vec!["ALPHA", "MID", "ZETA"]);
}

#[test]
fn missing_project_is_none() {
    let store = SqliteTaskStore::in_memory().unwrap();
    assert!(store.load_project("NOPE").unwrap().is_none());
    assert!(store.updated_at("NOPE").unwrap().is_none());
    assert!(matches!(
        store.require_project("NOPE"),
        Err(PersistenceError::NotFound(key)) if key == "NOPE"
    ));
}

#[test]
fn invalid_keys_are_not_stored() {
    let store = SqliteTaskStore::in_memory().unwrap();
    assert!(matches!(
        store.save_project(&ProjectTasks::new("", Vec::new())),
        Err(PersistenceError::InvalidData(_))
    ));
    assert!(store.project_keys().unwrap().is_empty());
}

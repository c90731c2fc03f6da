use critical_path_tool::{
    AnalysisStatus, CriticalPathAnalyzer, JsonDirTaskStore, PersistenceError, ProjectTasks,
    TaskRecord, TaskStore, load_project_from_json, load_tasks_from_csv,
    save_critical_tasks_to_csv, save_outcome_to_json, save_project_to_json,
};
use serde_json::json;
use std::fs;
use tempfile::{NamedTempFile, tempdir};

const HOUR: i64 = 3600;

fn sample_project() -> ProjectTasks {
    let mut design = TaskRecord::new("PRJ-1", "Design").with_estimate_seconds(8 * HOUR);
    design.extra.insert("assignee".into(), json!("dev-a"));
    ProjectTasks {
        project_key: "PRJ".into(),
        project_name: Some("Platform".into()),
        tasks: vec![
            design,
            TaskRecord::new("PRJ-2", "Build")
                .with_predecessors(["PRJ-1"])
                .with_estimate_seconds(16 * HOUR),
            TaskRecord::new("PRJ-3", "Review").with_estimate_seconds(2 * HOUR),
        ],
    }
}

#[test]
fn project_snapshot_json_round_trip() {
    let file = NamedTempFile::new().unwrap();
    let project = sample_project();

    save_project_to_json(&project, file.path()).unwrap();
    let loaded = load_project_from_json(file.path(), "IGNORED").unwrap();

    assert_eq!(loaded, project);
    assert_eq!(loaded.tasks[0].extra["assignee"], json!("dev-a"));
}

#[test]
fn bare_task_array_takes_fallback_key() {
    let file = NamedTempFile::new().unwrap();
    fs::write(
        file.path(),
        r#"[
            {"key": "K-1", "summary": "One", "predecessors": [], "aggregatetimeoriginalestimate": 3600},
            {"key": "K-2", "summary": "Two", "predecessors": ["K-1"], "keytask": "true"}
        ]"#,
    )
    .unwrap();

    let project = load_project_from_json(file.path(), "FALLBACK").unwrap();
    assert_eq!(project.project_key, "FALLBACK");
    assert_eq!(project.project_name, None);
    assert_eq!(project.tasks.len(), 2);
    assert_eq!(project.tasks[1].keytask, Some(true));
}

#[test]
fn malformed_json_is_an_error() {
    let file = NamedTempFile::new().unwrap();
    fs::write(file.path(), r#"{"tasks": "nope"}"#).unwrap();
    assert!(matches!(
        load_project_from_json(file.path(), "X"),
        Err(PersistenceError::Serialization(_))
    ));
}

#[test]
fn outcome_is_written_as_json() {
    let mut project = sample_project();
    let outcome = CriticalPathAnalyzer::default()
        .analyze_project(&mut project)
        .outcome();
    let file = NamedTempFile::new().unwrap();

    save_outcome_to_json(&outcome, file.path()).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(file.path()).unwrap()).unwrap();

    assert_eq!(value["project_key"], json!("PRJ"));
    assert_eq!(value["status"], json!("completed"));
    assert_eq!(value["critical_tasks"].as_array().unwrap().len(), 2);
}

#[test]
fn critical_tasks_csv_has_one_row_per_key_task() {
    let mut project = sample_project();
    let outcome = CriticalPathAnalyzer::default()
        .analyze_project(&mut project)
        .outcome();
    assert_eq!(outcome.status, AnalysisStatus::Completed);
    let file = NamedTempFile::new().unwrap();

    save_critical_tasks_to_csv(&outcome, file.path()).unwrap();
    let contents = fs::read_to_string(file.path()).unwrap();
    let lines: Vec<&str> = contents.lines().collect();

    assert_eq!(
        lines[0],
        "project_key,key,summary,parent,is_subtask,predecessors,duration_hours"
    );
    assert_eq!(lines[1], "PRJ,PRJ-1,Design,,false,,8");
    assert_eq!(lines[2], "PRJ,PRJ-2,Build,,false,PRJ-1,16");
    assert_eq!(lines.len(), 3);
}

#[test]
fn tasks_load_from_csv() {
    let file = NamedTempFile::new().unwrap();
    fs::write(
        file.path(),
        "key,summary,isSubtask,parent,subtasks,predecessors,plan_start,plan_end,actual_start,actual_end,aggregatetimeoriginalestimate\n\
         P-1,Parent,false,,P-2;P-3,,,,,,\n\
         P-2,Child one,true,P-1,,,2026-03-02,2026-03-03,,,\n\
         P-3,Child two,true,P-1,,P-2,,,,,7200\n",
    )
    .unwrap();

    let tasks = load_tasks_from_csv(file.path()).unwrap();
    assert_eq!(tasks.len(), 3);
    assert_eq!(tasks[0].subtasks, vec!["P-2", "P-3"]);
    assert_eq!(tasks[0].predecessors, Some(Vec::new()));
    assert_eq!(tasks[1].parent.as_deref(), Some("P-1"));
    assert_eq!(tasks[1].plan_start.as_deref(), Some("2026-03-02"));
    assert_eq!(tasks[2].predecessors, Some(vec!["P-2".to_string()]));
    assert_eq!(tasks[2].estimate_seconds(), Some(7200));

    let mut project = ProjectTasks::new("P", tasks);
    let analysis = CriticalPathAnalyzer::default().analyze_project(&mut project);
    assert_eq!(analysis.total_duration(), Some(18.0));
}

#[test]
fn csv_with_bad_values_is_rejected() {
    let file = NamedTempFile::new().unwrap();
    fs::write(
        file.path(),
        "key,summary,isSubtask,aggregatetimeoriginalestimate\nK,One,sometimes,\n",
    )
    .unwrap();
    assert!(matches!(
        load_tasks_from_csv(file.path()),
        Err(PersistenceError::InvalidData(_))
    ));

    fs::write(file.path(), "key,summary\n").unwrap();
    assert!(matches!(
        load_tasks_from_csv(file.path()),
        Err(PersistenceError::InvalidData(_))
    ));
}

#[test]
fn json_dir_store_keeps_one_file_per_project() {
    let dir = tempdir().unwrap();
    let store = JsonDirTaskStore::new(dir.path().join("projects")).unwrap();

    assert!(store.project_keys().unwrap().is_empty());
    assert!(store.load_project("PRJ").unwrap().is_none());
    assert!(matches!(
        store.require_project("PRJ"),
        Err(PersistenceError::NotFound(_))
    ));

    let project = sample_project();
    store.save_project(&project).unwrap();
    store
        .save_project(&ProjectTasks::new("ALPHA", Vec::new()))
        .unwrap();

    assert!(store.dir().join("PRJ.json").is_file());
    assert_eq!(store.project_keys().unwrap(), vec!["ALPHA", "PRJ"]);
    assert_eq!(store.require_project("PRJ").unwrap(), project);
}

#[test]
fn json_dir_store_rejects_path_like_keys() {
    let dir = tempdir().unwrap();
    let store = JsonDirTaskStore::new(dir.path()).unwrap();

    assert!(matches!(
        store.save_project(&ProjectTasks::new("../escape", Vec::new())),
        Err(PersistenceError::InvalidData(_))
    ));
    assert!(matches!(
        store.load_project("a/b"),
        Err(PersistenceError::InvalidData(_))
    ));
}

use super::{PersistenceError, PersistenceResult, TaskStore};
use crate::analysis::AnalysisOutcome;
use crate::task::{ProjectTasks, TaskRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A task file is either a full snapshot or a bare task array.
#[derive(Deserialize)]
#[serde(untagged)]
enum ProjectFile {
    Snapshot(ProjectTasks),
    Tasks(Vec<TaskRecord>),
}

/// Load a project; a bare task array is assigned `fallback_key`.
pub fn load_project_from_json<P: AsRef<Path>>(
    path: P,
    fallback_key: &str,
) -> PersistenceResult<ProjectTasks> {
    let file = File::open(path.as_ref())?;
    let project = match serde_json::from_reader::<_, ProjectFile>(file)? {
        ProjectFile::Snapshot(project) => project,
        ProjectFile::Tasks(tasks) => ProjectTasks::new(fallback_key, tasks),
    };
    debug!(
        path = %path.as_ref().display(),
        project = %project.project_key,
        tasks = project.tasks.len(),
        "loaded project json"
    );
    Ok(project)
}

pub fn save_project_to_json<P: AsRef<Path>>(
    project: &ProjectTasks,
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, project)?;
    Ok(())
}

pub fn save_outcome_to_json<P: AsRef<Path>>(
    outcome: &AnalysisOutcome,
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, outcome)?;
    Ok(())
}

#[derive(Serialize)]
struct CriticalTaskCsvRecord {
    project_key: String,
    key: String,
    summary: String,
    parent: String,
    is_subtask: bool,
    predecessors: String,
    duration_hours: String,
}

/// One row per critical task of a completed analysis.
pub fn save_critical_tasks_to_csv<P: AsRef<Path>>(
    outcome: &AnalysisOutcome,
    path: P,
) -> PersistenceResult<()> {
    let durations: HashMap<&str, f64> = outcome
        .critical_activities
        .iter()
        .filter(|activity| activity.is_work)
        .filter_map(|activity| {
            activity
                .from
                .strip_suffix(crate::graph::START_SUFFIX)
                .map(|key| (key, activity.duration_hours))
        })
        .collect();

    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for task in &outcome.critical_tasks {
        let key = task.key().unwrap_or_default();
        writer.serialize(CriticalTaskCsvRecord {
            project_key: outcome.project_key.clone(),
            key: key.to_string(),
            summary: task.summary.clone().unwrap_or_default(),
            parent: task.parent.clone().unwrap_or_default(),
            is_subtask: task.is_subtask(),
            predecessors: join_strings(&task.effective_predecessors().unwrap_or_default()),
            duration_hours: durations
                .get(key)
                .map(|hours| hours.to_string())
                .unwrap_or_default(),
        })?;
    }
    writer.flush()?;
    Ok(())
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct TaskCsvRecord {
    key: String,
    summary: String,
    #[serde(rename = "isSubtask")]
    is_subtask: String,
    parent: String,
    subtasks: String,
    predecessors: String,
    plan_start: String,
    plan_end: String,
    actual_start: String,
    actual_end: String,
    aggregatetimeoriginalestimate: String,
}

impl TaskCsvRecord {
    fn into_task(self) -> PersistenceResult<TaskRecord> {
        let estimate = parse_i64(&self.aggregatetimeoriginalestimate)?;
        Ok(TaskRecord {
            key: parse_string_option(self.key),
            summary: parse_string_option(self.summary),
            is_subtask: parse_bool(&self.is_subtask)?,
            parent: parse_string_option(self.parent),
            subtasks: split_strings(&self.subtasks),
            predecessors: Some(split_strings(&self.predecessors)),
            plan_start: parse_string_option(self.plan_start),
            plan_end: parse_string_option(self.plan_end),
            actual_start: parse_string_option(self.actual_start),
            actual_end: parse_string_option(self.actual_end),
            aggregatetimeoriginalestimate: estimate.map(Value::from),
            ..TaskRecord::default()
        })
    }
}

/// Read task core fields from CSV. List columns are `;`-separated; an empty
/// `predecessors` cell is an empty list.
pub fn load_tasks_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<TaskRecord>> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut tasks = Vec::new();
    for record in reader.deserialize::<TaskCsvRecord>() {
        tasks.push(record?.into_task()?);
    }
    if tasks.is_empty() {
        return Err(PersistenceError::InvalidData(
            "CSV file contained no tasks".into(),
        ));
    }
    Ok(tasks)
}

/// One `<project_key>.json` snapshot per project inside a directory.
pub struct JsonDirTaskStore {
    dir: PathBuf,
}

impl JsonDirTaskStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> PersistenceResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn project_path(&self, project_key: &str) -> PathBuf {
        self.dir.join(format!("{project_key}.json"))
    }
}

impl TaskStore for JsonDirTaskStore {
    fn save_project(&self, project: &ProjectTasks) -> PersistenceResult<()> {
        super::validate_project(project)?;
        let path = self.project_path(&project.project_key);
        save_project_to_json(project, &path)?;
        info!(path = %path.display(), "saved project snapshot");
        Ok(())
    }

    fn load_project(&self, project_key: &str) -> PersistenceResult<Option<ProjectTasks>> {
        super::validate_project_key(project_key)?;
        let path = self.project_path(project_key);
        if !path.is_file() {
            return Ok(None);
        }
        load_project_from_json(&path, project_key).map(Some)
    }

    fn project_keys(&self) -> PersistenceResult<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

fn parse_string_option(input: String) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_i64(input: &str) -> PersistenceResult<Option<i64>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    input
        .trim()
        .parse::<i64>()
        .map(Some)
        .map_err(|e| PersistenceError::InvalidData(format!("invalid integer '{input}': {e}")))
}

fn parse_bool(input: &str) -> PersistenceResult<Option<bool>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    match input.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(Some(true)),
        "false" => Ok(Some(false)),
        other => Err(PersistenceError::InvalidData(format!(
            "invalid boolean '{other}'"
        ))),
    }
}

fn join_strings(values: &[String]) -> String {
    values.join(";")
}

fn split_strings(input: &str) -> Vec<String> {
    input
        .split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

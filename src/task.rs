use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::links;
use crate::metadata::ProjectMetadata;

/// A task as delivered by the task-listing collaborator.
///
/// Only the fields the critical-path engine reads are typed; everything else
/// (assignee, status, priority, ...) is carried untouched in `extra` so annotated
/// records serialize back with the same shape they arrived in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(
        rename = "isSubtask",
        default,
        deserialize_with = "deserialize_flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_subtask: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predecessors: Option<Vec<String>>,
    /// Predecessor keys grouped by inward link type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prelinks: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_end: Option<String>,
    /// Original estimate in seconds. Only positive integers are honoured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregatetimeoriginalestimate: Option<Value>,
    /// Accepts `true`/`false` as booleans or strings; always written as a boolean.
    #[serde(
        default,
        deserialize_with = "deserialize_flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub keytask: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TaskRecord {
    pub fn new(key: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            summary: Some(summary.into()),
            is_subtask: Some(false),
            predecessors: Some(Vec::new()),
            ..Self::default()
        }
    }

    pub fn with_predecessors<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.predecessors = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_subtasks<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subtasks = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn as_subtask_of(mut self, parent: impl Into<String>) -> Self {
        self.is_subtask = Some(true);
        self.parent = Some(parent.into());
        self
    }

    pub fn with_plan(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.plan_start = Some(start.into());
        self.plan_end = Some(end.into());
        self
    }

    pub fn with_actual(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.actual_start = Some(start.into());
        self.actual_end = Some(end.into());
        self
    }

    pub fn with_estimate_seconds(mut self, seconds: i64) -> Self {
        self.aggregatetimeoriginalestimate = Some(Value::from(seconds));
        self
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref().filter(|k| !k.trim().is_empty())
    }

    pub fn display_name(&self) -> &str {
        self.summary
            .as_deref()
            .or(self.key.as_deref())
            .unwrap_or_default()
    }

    /// Explicit flag when present, otherwise a task with a parent is a subtask.
    pub fn is_subtask(&self) -> bool {
        self.is_subtask.unwrap_or(self.parent.is_some())
    }

    pub fn is_keytask(&self) -> bool {
        self.keytask == Some(true)
    }

    pub fn estimate_seconds(&self) -> Option<i64> {
        self.aggregatetimeoriginalestimate
            .as_ref()
            .and_then(Value::as_i64)
            .filter(|secs| *secs > 0)
    }

    /// The explicit predecessor list, or one resolved from `prelinks` when that is absent.
    /// `None` means the record carries no dependency information at all.
    pub fn effective_predecessors(&self) -> Option<Vec<String>> {
        if let Some(preds) = &self.predecessors {
            return Some(preds.clone());
        }
        self.prelinks.as_ref().map(links::resolve_predecessors)
    }
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let flag = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Bool(flag)) => Some(flag),
        Some(Value::String(raw)) => match raw.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    };
    Ok(flag)
}

/// A project's task list as handed over by the task-listing collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectTasks {
    pub project_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(default)]
    pub tasks: Vec<TaskRecord>,
}

impl ProjectTasks {
    pub fn new(project_key: impl Into<String>, tasks: Vec<TaskRecord>) -> Self {
        Self {
            project_key: project_key.into(),
            project_name: None,
            tasks,
        }
    }

    pub fn metadata(&self) -> ProjectMetadata {
        match &self.project_name {
            Some(name) => ProjectMetadata::new(&self.project_key, name),
            None => ProjectMetadata::for_key(&self.project_key),
        }
    }
}

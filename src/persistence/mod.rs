use crate::task::ProjectTasks;

pub use crate::error::{PersistenceError, PersistenceResult};

/// Storage for project task snapshots, keyed by project key.
pub trait TaskStore: Send + Sync {
    fn save_project(&self, project: &ProjectTasks) -> PersistenceResult<()>;
    fn load_project(&self, project_key: &str) -> PersistenceResult<Option<ProjectTasks>>;
    /// Stored project keys, sorted.
    fn project_keys(&self) -> PersistenceResult<Vec<String>>;

    fn require_project(&self, project_key: &str) -> PersistenceResult<ProjectTasks> {
        self.load_project(project_key)?
            .ok_or_else(|| PersistenceError::NotFound(project_key.to_string()))
    }
}

/// Project keys double as file names, so only `[A-Za-z0-9_-]` is accepted.
pub fn validate_project_key(project_key: &str) -> PersistenceResult<()> {
    if project_key.is_empty() {
        return Err(PersistenceError::InvalidData("project key is empty".into()));
    }
    if !project_key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(PersistenceError::InvalidData(format!(
            "invalid project key '{project_key}'"
        )));
    }
    Ok(())
}

pub fn validate_project(project: &ProjectTasks) -> PersistenceResult<()> {
    validate_project_key(&project.project_key)
}

pub mod file;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{
    JsonDirTaskStore, load_project_from_json, load_tasks_from_csv, save_critical_tasks_to_csv,
    save_outcome_to_json, save_project_to_json,
};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteTaskStore;

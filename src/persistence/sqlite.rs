use super::{PersistenceError, PersistenceResult, TaskStore};
use crate::task::ProjectTasks;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// One row per project holding the snapshot as JSON.
pub struct SqliteTaskStore {
    connection: Mutex<Connection>,
}

impl SqliteTaskStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    pub fn in_memory() -> PersistenceResult<Self> {
        let connection = Connection::open_in_memory()?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS projects (
                project_key TEXT PRIMARY KEY,
                project_json TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn lock(&self) -> PersistenceResult<MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|_| PersistenceError::InvalidData("sqlite connection lock poisoned".into()))
    }

    /// Timestamp of the last save, RFC 3339.
    pub fn updated_at(&self, project_key: &str) -> PersistenceResult<Option<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT updated_at FROM projects WHERE project_key = ?1")?;
        let updated = stmt
            .query_row(params![project_key], |row| row.get(0))
            .optional()?;
        Ok(updated)
    }
}

impl TaskStore for SqliteTaskStore {
    fn save_project(&self, project: &ProjectTasks) -> PersistenceResult<()> {
        super::validate_project(project)?;
        let json = serde_json::to_string(project)?;
        let now = Utc::now().to_rfc3339();
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO projects (project_key, project_json, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(project_key) DO UPDATE SET
                project_json = excluded.project_json,
                updated_at = excluded.updated_at",
            params![project.project_key, json, now],
        )?;
        tx.commit()?;
        debug!(project = %project.project_key, tasks = project.tasks.len(), "saved project to sqlite");
        Ok(())
    }

    fn load_project(&self, project_key: &str) -> PersistenceResult<Option<ProjectTasks>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT project_json FROM projects WHERE project_key = ?1")?;
        let json: Option<String> = stmt
            .query_row(params![project_key], |row| row.get(0))
            .optional()?;

        let Some(json) = json else {
            return Ok(None);
        };
        let project: ProjectTasks = serde_json::from_str(&json)?;
        Ok(Some(project))
    }

    fn project_keys(&self) -> PersistenceResult<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT project_key FROM projects ORDER BY project_key ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut keys = Vec::new();
        for key in rows {
            keys.push(key?);
        }
        Ok(keys)
    }
}

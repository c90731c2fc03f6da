use std::{collections::HashMap, net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::analysis::{AnalysisOutcome, CriticalPathAnalyzer};
use crate::error::PersistenceError;
use crate::persistence::{self, TaskStore};
use crate::task::{ProjectTasks, TaskRecord};

#[derive(Clone)]
pub struct AppState {
    projects: Arc<RwLock<HashMap<String, ProjectTasks>>>,
    analyzer: Arc<CriticalPathAnalyzer>,
    store: Option<Arc<dyn TaskStore>>,
}

impl AppState {
    pub fn new(analyzer: CriticalPathAnalyzer) -> Self {
        Self {
            projects: Arc::new(RwLock::new(HashMap::new())),
            analyzer: Arc::new(analyzer),
            store: None,
        }
    }

    /// Write every uploaded project through to `store`, starting from what it already holds.
    pub fn with_store(
        analyzer: CriticalPathAnalyzer,
        store: Arc<dyn TaskStore>,
    ) -> Result<Self, PersistenceError> {
        let mut projects = HashMap::new();
        for key in store.project_keys()? {
            if let Some(project) = store.load_project(&key)? {
                projects.insert(key, project);
            }
        }
        info!(projects = projects.len(), "restored projects from store");
        Ok(Self {
            projects: Arc::new(RwLock::new(projects)),
            analyzer: Arc::new(analyzer),
            store: Some(store),
        })
    }

    fn project(&self, key: &str) -> Option<ProjectTasks> {
        self.projects.read().get(key).cloned()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Invalid(String),
    Internal(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }
}

impl From<PersistenceError> for ApiError {
    fn from(value: PersistenceError) -> Self {
        match value {
            PersistenceError::InvalidData(message) => ApiError::Invalid(message),
            PersistenceError::NotFound(key) => {
                ApiError::NotFound(format!("project {key} not found"))
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct TasksPayload {
    #[serde(default)]
    project_name: Option<String>,
    tasks: Vec<TaskRecord>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/projects", get(list_projects))
        .route("/projects/:key/tasks", get(get_tasks).put(put_tasks))
        .route("/projects/:key/critical-path", get(project_critical_path))
        .route("/critical-path", post(adhoc_critical_path))
        .route("/critical-path/batch", post(batch_critical_path))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "critical path HTTP API listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list_projects(State(state): State<AppState>) -> Json<Vec<String>> {
    let mut keys: Vec<String> = state.projects.read().keys().cloned().collect();
    keys.sort();
    Json(keys)
}

async fn get_tasks(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ProjectTasks>, ApiError> {
    state
        .project(&key)
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("project {key} not found")))
}

async fn put_tasks(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(payload): Json<TasksPayload>,
) -> Result<Json<ProjectTasks>, ApiError> {
    persistence::validate_project_key(&key)?;
    let project = ProjectTasks {
        project_key: key.clone(),
        project_name: payload.project_name,
        tasks: payload.tasks,
    };

    if let Some(store) = &state.store {
        store.save_project(&project)?;
    }
    state.projects.write().insert(key.clone(), project.clone());
    info!(project = %key, tasks = project.tasks.len(), "stored project tasks");
    Ok(Json(project))
}

async fn project_critical_path(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<AnalysisOutcome>, ApiError> {
    let mut project = state
        .project(&key)
        .ok_or_else(|| ApiError::not_found(format!("project {key} not found")))?;
    let analysis = state.analyzer.analyze_project(&mut project);
    if !analysis.is_completed() {
        warn!(project = %key, status = %analysis.status(), "no critical path");
    }
    Ok(Json(analysis.outcome()))
}

async fn adhoc_critical_path(
    State(state): State<AppState>,
    Json(mut project): Json<ProjectTasks>,
) -> Json<AnalysisOutcome> {
    Json(state.analyzer.analyze_project(&mut project).outcome())
}

async fn batch_critical_path(
    State(state): State<AppState>,
    Json(mut projects): Json<Vec<ProjectTasks>>,
) -> Result<Json<Vec<AnalysisOutcome>>, ApiError> {
    let analyzer = Arc::clone(&state.analyzer);
    let outcomes = tokio::task::spawn_blocking(move || analyzer.analyze_projects(&mut projects))
        .await
        .map_err(|err| ApiError::Internal(format!("batch analysis failed: {err}")))?;
    Ok(Json(outcomes))
}

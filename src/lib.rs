pub mod analysis;
pub mod annotate;
pub mod calculations;
pub mod calendar;
pub mod config;
pub mod duration;
pub mod error;
pub mod graph;
pub mod links;
pub mod metadata;
pub mod persistence;
pub mod report;
pub mod task;

#[cfg(feature = "http_api")]
pub mod http_api;
#[cfg(any(feature = "cli", feature = "http_api"))]
pub mod logging;

pub use analysis::{
    AnalysisOutcome, AnalysisStatus, AnalysisSummary, CriticalEdgeRecord, CriticalPathAnalyzer,
    ProjectAnalysis,
};
pub use annotate::annotate_critical_tasks;
pub use calculations::{CriticalActivity, CriticalPath, enumerate_critical_paths, solve};
pub use calendar::{WorkCalendar, WorkCalendarConfig};
pub use config::AnalyzerConfig;
pub use duration::DurationResolver;
pub use error::{ConfigError, GraphError, PersistenceError, PersistenceResult};
pub use graph::AoeGraph;
pub use graph::builder::GraphBuilder;
pub use metadata::ProjectMetadata;
pub use persistence::{
    JsonDirTaskStore, TaskStore, load_project_from_json, load_tasks_from_csv,
    save_critical_tasks_to_csv, save_outcome_to_json, save_project_to_json,
};
#[cfg(feature = "sqlite")]
pub use persistence::SqliteTaskStore;
pub use task::{ProjectTasks, TaskRecord};

//! End-to-end critical-path analysis of one or more projects.
//!
//! The analyzer never fails: empty input and cyclic dependency data surface as an
//! [`AnalysisStatus`] instead of an error, and task records are annotated in place.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{error, info, info_span};

use crate::annotate::annotate_critical_tasks;
use crate::calculations::{CriticalActivity, CriticalPath, enumerate_critical_paths, solve};
use crate::config::AnalyzerConfig;
use crate::duration::DurationResolver;
use crate::graph::AoeGraph;
use crate::graph::builder::GraphBuilder;
use crate::metadata::ProjectMetadata;
use crate::task::{ProjectTasks, TaskRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Completed,
    /// Nothing to analyse: no tasks, or no project key.
    NoTasks,
    /// The dependency data contains a cycle; no critical path exists.
    CycleDetected,
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AnalysisStatus::Completed => "completed",
            AnalysisStatus::NoTasks => "no_tasks",
            AnalysisStatus::CycleDetected => "cycle_detected",
        };
        f.write_str(label)
    }
}

/// Serializable form of one critical activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalEdgeRecord {
    pub from: String,
    pub to: String,
    pub duration_hours: f64,
    pub is_work: bool,
}

impl From<&CriticalActivity> for CriticalEdgeRecord {
    fn from(activity: &CriticalActivity) -> Self {
        Self {
            from: activity.from.clone(),
            to: activity.to.clone(),
            duration_hours: activity.duration_hours,
            is_work: activity.is_work(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    pub project_key: String,
    pub project_name: String,
    pub status: AnalysisStatus,
    pub total_duration_hours: Option<f64>,
    pub critical_activities: Vec<CriticalEdgeRecord>,
    pub critical_paths: Vec<Vec<String>>,
    pub tasks: Vec<TaskRecord>,
    pub critical_tasks: Vec<TaskRecord>,
}

impl AnalysisOutcome {
    pub fn critical_tasks_by_project(&self) -> BTreeMap<String, Vec<TaskRecord>> {
        critical_map(self.status, &self.project_key, &self.critical_tasks)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub project_key: String,
    pub status: AnalysisStatus,
    pub task_count: usize,
    pub node_count: usize,
    pub edge_count: usize,
    pub critical_activity_count: usize,
    pub critical_task_count: usize,
    pub path_count: usize,
    pub total_duration_hours: Option<f64>,
}

impl AnalysisSummary {
    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("project={}", self.project_key));
        parts.push(format!("status={}", self.status));
        parts.push(format!("tasks={}", self.task_count));
        parts.push(format!("nodes={}", self.node_count));
        parts.push(format!("edges={}", self.edge_count));
        if let Some(hours) = self.total_duration_hours {
            parts.push(format!("duration={hours:.1}h"));
        }
        if self.status == AnalysisStatus::Completed {
            parts.push(format!("critical={}", self.critical_activity_count));
            parts.push(format!("keytasks={}", self.critical_task_count));
            parts.push(format!("paths={}", self.path_count));
        }
        parts.join(", ")
    }
}

/// Result of analysing one project. Owns the solved graph.
#[derive(Debug, Clone)]
pub struct ProjectAnalysis {
    metadata: ProjectMetadata,
    status: AnalysisStatus,
    graph: AoeGraph,
    solution: Option<CriticalPath>,
    paths: Vec<Vec<String>>,
    tasks: Vec<TaskRecord>,
    critical_tasks: Vec<TaskRecord>,
}

impl ProjectAnalysis {
    fn unsolved(
        metadata: &ProjectMetadata,
        status: AnalysisStatus,
        graph: AoeGraph,
        tasks: &[TaskRecord],
    ) -> Self {
        Self {
            metadata: metadata.clone(),
            status,
            graph,
            solution: None,
            paths: Vec::new(),
            tasks: tasks.to_vec(),
            critical_tasks: Vec::new(),
        }
    }

    pub fn metadata(&self) -> &ProjectMetadata {
        &self.metadata
    }

    pub fn status(&self) -> AnalysisStatus {
        self.status
    }

    pub fn is_completed(&self) -> bool {
        self.status == AnalysisStatus::Completed
    }

    pub fn graph(&self) -> &AoeGraph {
        &self.graph
    }

    pub fn solution(&self) -> Option<&CriticalPath> {
        self.solution.as_ref()
    }

    pub fn total_duration(&self) -> Option<f64> {
        self.solution.as_ref().map(|s| s.total_duration)
    }

    pub fn critical_edges(&self) -> &[CriticalActivity] {
        self.solution
            .as_ref()
            .map(|s| s.critical_edges.as_slice())
            .unwrap_or_default()
    }

    pub fn critical_paths(&self) -> &[Vec<String>] {
        &self.paths
    }

    /// Annotated copy of every input task.
    pub fn tasks(&self) -> &[TaskRecord] {
        &self.tasks
    }

    pub fn critical_tasks(&self) -> &[TaskRecord] {
        &self.critical_tasks
    }

    /// Project key to its critical tasks; empty unless the analysis completed.
    pub fn critical_tasks_by_project(&self) -> BTreeMap<String, Vec<TaskRecord>> {
        critical_map(self.status, &self.metadata.project_key, &self.critical_tasks)
    }

    pub fn summary(&self) -> AnalysisSummary {
        AnalysisSummary {
            project_key: self.metadata.project_key.clone(),
            status: self.status,
            task_count: self.tasks.len(),
            node_count: self.graph.node_count(),
            edge_count: self.graph.edge_count(),
            critical_activity_count: self.critical_edges().len(),
            critical_task_count: self.critical_tasks.len(),
            path_count: self.paths.len(),
            total_duration_hours: self.total_duration(),
        }
    }

    pub fn outcome(&self) -> AnalysisOutcome {
        AnalysisOutcome {
            project_key: self.metadata.project_key.clone(),
            project_name: self.metadata.project_name.clone(),
            status: self.status,
            total_duration_hours: self.total_duration(),
            critical_activities: self.critical_edges().iter().map(Into::into).collect(),
            critical_paths: self.paths.clone(),
            tasks: self.tasks.clone(),
            critical_tasks: self.critical_tasks.clone(),
        }
    }
}

fn critical_map(
    status: AnalysisStatus,
    project_key: &str,
    critical_tasks: &[TaskRecord],
) -> BTreeMap<String, Vec<TaskRecord>> {
    let mut map = BTreeMap::new();
    if status == AnalysisStatus::Completed {
        map.insert(project_key.to_string(), critical_tasks.to_vec());
    }
    map
}

#[derive(Debug, Clone, Default)]
pub struct CriticalPathAnalyzer {
    resolver: DurationResolver,
}

impl CriticalPathAnalyzer {
    pub fn new(resolver: DurationResolver) -> Self {
        Self { resolver }
    }

    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self::new(config.duration_resolver())
    }

    pub fn resolver(&self) -> &DurationResolver {
        &self.resolver
    }

    /// Build the event network for `tasks`, solve it and flag critical tasks in place.
    pub fn analyze(&self, metadata: &ProjectMetadata, tasks: &mut [TaskRecord]) -> ProjectAnalysis {
        let span = info_span!("critical_path", project = %metadata.project_key);
        let _guard = span.enter();

        if metadata.project_key.trim().is_empty() || tasks.is_empty() {
            info!(tasks = tasks.len(), "nothing to analyse");
            return ProjectAnalysis::unsolved(
                metadata,
                AnalysisStatus::NoTasks,
                AoeGraph::new(),
                tasks,
            );
        }

        let mut graph = GraphBuilder::new(&self.resolver).build(tasks, metadata);
        let solution = match solve(&mut graph) {
            Ok(solution) => solution,
            Err(err) => {
                error!(%err, "dependency cycle, no critical path");
                return ProjectAnalysis::unsolved(
                    metadata,
                    AnalysisStatus::CycleDetected,
                    graph,
                    tasks,
                );
            }
        };

        let paths = enumerate_critical_paths(&graph, &solution.critical_edges);
        let critical_tasks = annotate_critical_tasks(tasks, &solution.critical_edges);
        info!(
            total_duration = solution.total_duration,
            critical_tasks = critical_tasks.len(),
            paths = paths.len(),
            "analysis complete"
        );

        ProjectAnalysis {
            metadata: metadata.clone(),
            status: AnalysisStatus::Completed,
            graph,
            solution: Some(solution),
            paths,
            tasks: tasks.to_vec(),
            critical_tasks,
        }
    }

    pub fn analyze_project(&self, project: &mut ProjectTasks) -> ProjectAnalysis {
        let metadata = project.metadata();
        self.analyze(&metadata, &mut project.tasks)
    }

    /// Analyse independent projects in parallel; outcomes keep the input order.
    pub fn analyze_projects(&self, projects: &mut [ProjectTasks]) -> Vec<AnalysisOutcome> {
        projects
            .par_iter_mut()
            .map(|project| self.analyze_project(project).outcome())
            .collect()
    }
}

use super::{AoeGraph, end_event_id, start_event_id};
use crate::duration::DurationResolver;
use crate::metadata::ProjectMetadata;
use crate::task::TaskRecord;
use std::collections::{HashMap, HashSet};
use tracing::{debug, error, info, warn};

/// Task fields the wiring rules need, resolved once per build.
struct PreparedTask<'t> {
    record: &'t TaskRecord,
    key: &'t str,
    predecessors: Option<Vec<String>>,
}

pub struct GraphBuilder<'a> {
    resolver: &'a DurationResolver,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(resolver: &'a DurationResolver) -> Self {
        Self { resolver }
    }

    pub fn build(&self, tasks: &[TaskRecord], metadata: &ProjectMetadata) -> AoeGraph {
        info!(
            project = %metadata.project_key,
            tasks = tasks.len(),
            "building activity-on-edge graph"
        );

        // Step 1: Normalize task records
        let prepared = Self::prepare(tasks, &metadata.project_key);
        let by_key: HashMap<&str, &PreparedTask> = prepared.iter().map(|t| (t.key, t)).collect();
        let referenced = Self::referenced_tasks(&prepared);

        // Step 2: Event nodes
        let mut graph = AoeGraph::new();
        let project_start = start_event_id(&metadata.project_key);
        let project_end = end_event_id(&metadata.project_key);
        graph.add_node(&project_start, &metadata.start_event_name());
        for task in &prepared {
            let name = task.record.display_name();
            graph.add_node(&start_event_id(task.key), &format!("{name} start"));
            graph.add_node(&end_event_id(task.key), &format!("{name} done"));
        }
        graph.add_node(&project_end, &metadata.end_event_name());

        // Step 3: Duration and predecessor activities
        for task in &prepared {
            self.add_task_activities(&mut graph, task, &by_key, &project_start);
        }

        // Step 4: Subtask subgraphs
        for task in prepared.iter().filter(|t| !t.record.subtasks.is_empty()) {
            if task.predecessors.is_none() {
                continue;
            }
            Self::wire_subtasks(&mut graph, task, &by_key, &referenced);
        }

        // Step 5: Leaf tasks feed the project end
        for task in &prepared {
            if task.predecessors.is_none() || task.record.is_subtask() {
                continue;
            }
            if !referenced.contains(task.key) {
                graph.add_edge(&end_event_id(task.key), &project_end, 0.0);
            }
        }

        let dangling = graph.dangling_events(&project_start, &project_end);
        if !dangling.is_empty() {
            warn!(
                project = %metadata.project_key,
                events = ?dangling,
                "events reachable from project start never reach project end"
            );
        }

        info!(
            project = %metadata.project_key,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "graph built"
        );
        graph
    }

    fn prepare<'t>(tasks: &'t [TaskRecord], project_key: &str) -> Vec<PreparedTask<'t>> {
        let mut seen = HashSet::with_capacity(tasks.len());
        let mut prepared = Vec::with_capacity(tasks.len());
        for record in tasks {
            let Some(key) = record.key() else {
                error!(summary = record.display_name(), "task missing key, skipped");
                continue;
            };
            // Its events would be the project's own start and end events.
            if key == project_key {
                error!(task = key, "task key equals the project key, skipped");
                continue;
            }
            if !seen.insert(key) {
                warn!(task = key, "duplicate task key, events are shared");
            }
            let predecessors = record.effective_predecessors();
            if predecessors.is_none() {
                error!(task = key, "task has no predecessors list, skipped for edge creation");
            }
            prepared.push(PreparedTask {
                record,
                key,
                predecessors,
            });
        }
        prepared
    }

    /// Keys that appear in any task's predecessor list.
    fn referenced_tasks(prepared: &[PreparedTask<'_>]) -> HashSet<String> {
        prepared
            .iter()
            .filter_map(|t| t.predecessors.as_ref())
            .flatten()
            .cloned()
            .collect()
    }

    fn add_task_activities(
        &self,
        graph: &mut AoeGraph,
        task: &PreparedTask<'_>,
        by_key: &HashMap<&str, &PreparedTask<'_>>,
        project_start: &str,
    ) {
        let Some(predecessors) = &task.predecessors else {
            return;
        };
        let Some(duration) = self.resolver.resolve(task.record) else {
            error!(
                task = task.key,
                "could not calculate duration, task excluded from critical path"
            );
            return;
        };

        let start = start_event_id(task.key);
        graph.add_edge(&start, &end_event_id(task.key), duration);

        if predecessors.is_empty() {
            if !task.record.is_subtask() {
                graph.add_edge(project_start, &start, 0.0);
            }
            return;
        }

        for pred in predecessors {
            if !by_key.contains_key(pred.as_str()) {
                warn!(task = task.key, predecessor = %pred, "predecessor not in task list");
                continue;
            }
            graph.add_edge(&end_event_id(pred), &start, 0.0);
        }
    }

    fn wire_subtasks(
        graph: &mut AoeGraph,
        parent: &PreparedTask<'_>,
        by_key: &HashMap<&str, &PreparedTask<'_>>,
        referenced: &HashSet<String>,
    ) {
        let parent_start = start_event_id(parent.key);
        let parent_end = end_event_id(parent.key);

        for sub_key in &parent.record.subtasks {
            let Some(subtask) = by_key.get(sub_key.as_str()) else {
                warn!(task = parent.key, subtask = %sub_key, "subtask not in task list");
                continue;
            };
            // Entry points of the subgraph hang off the parent's start event.
            if subtask.predecessors.as_ref().is_some_and(Vec::is_empty) {
                graph.add_edge(&parent_start, &start_event_id(sub_key), 0.0);
            }
        }

        // Exit points: subtasks nothing else depends on.
        for sub_key in &parent.record.subtasks {
            if referenced.contains(sub_key) {
                continue;
            }
            match by_key.get(sub_key.as_str()) {
                Some(subtask) if subtask.predecessors.is_some() => {
                    graph.add_edge(&end_event_id(sub_key), &parent_end, 0.0);
                }
                _ => {}
            }
        }

        // The work of a parent flows through its subtasks.
        debug!(task = parent.key, "zeroing parent activity");
        graph.add_edge(&parent_start, &parent_end, 0.0);
    }
}

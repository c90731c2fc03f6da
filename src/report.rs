//! Tabular views of a solved analysis.

use polars::prelude::*;

use crate::analysis::ProjectAnalysis;
use crate::calculations::CRITICAL_EPSILON;
use crate::calculations::critical::is_critical;
use crate::graph::{END_SUFFIX, START_SUFFIX};
use crate::task::TaskRecord;

/// Task records as a table:
/// `key, summary, parent, is_subtask, predecessors, subtasks, estimate_hours, keytask`.
pub fn tasks_frame(tasks: &[TaskRecord]) -> PolarsResult<DataFrame> {
    let keys: Vec<Option<String>> = tasks.iter().map(|t| t.key().map(str::to_string)).collect();
    let summaries: Vec<Option<String>> = tasks.iter().map(|t| t.summary.clone()).collect();
    let parents: Vec<Option<String>> = tasks.iter().map(|t| t.parent.clone()).collect();
    let subtask_flags: Vec<bool> = tasks.iter().map(TaskRecord::is_subtask).collect();
    let predecessors: Vec<Option<String>> = tasks
        .iter()
        .map(|t| t.effective_predecessors().map(|p| p.join(",")))
        .collect();
    let subtasks: Vec<String> = tasks.iter().map(|t| t.subtasks.join(",")).collect();
    let estimates: Vec<Option<f64>> = tasks
        .iter()
        .map(|t| t.estimate_seconds().map(|secs| secs as f64 / 3600.0))
        .collect();
    let keytask: Vec<bool> = tasks.iter().map(TaskRecord::is_keytask).collect();

    df!(
        "key" => keys,
        "summary" => summaries,
        "parent" => parents,
        "is_subtask" => subtask_flags,
        "predecessors" => predecessors,
        "subtasks" => subtasks,
        "estimate_hours" => estimates,
        "keytask" => keytask
    )
}

/// One row per event in insertion order:
/// `node_id, name, ve, vl, slack, critical`. Schema only when unsolved.
pub fn events_frame(analysis: &ProjectAnalysis) -> PolarsResult<DataFrame> {
    let mut ids: Vec<String> = Vec::new();
    let mut names: Vec<String> = Vec::new();
    let mut ves: Vec<f64> = Vec::new();
    let mut vls: Vec<f64> = Vec::new();
    let mut slacks: Vec<f64> = Vec::new();
    let mut critical: Vec<bool> = Vec::new();

    if analysis.solution().is_some() {
        for node in analysis.graph().nodes() {
            let slack = node.slack();
            ids.push(node.id.clone());
            names.push(node.name.clone());
            ves.push(node.ve);
            vls.push(node.vl);
            slacks.push(slack);
            critical.push(slack.abs() <= CRITICAL_EPSILON);
        }
    }

    df!(
        "node_id" => ids,
        "name" => names,
        "ve" => ves,
        "vl" => vls,
        "slack" => slacks,
        "critical" => critical
    )
}

/// One row per activity ordered by earliest start:
/// `from, to, task_key, duration_hours, earliest_start, latest_start, slack, critical`.
/// `task_key` is set only on task work activities (`K_start -> K_end`).
pub fn activities_frame(analysis: &ProjectAnalysis) -> PolarsResult<DataFrame> {
    let mut from: Vec<String> = Vec::new();
    let mut to: Vec<String> = Vec::new();
    let mut task_keys: Vec<Option<String>> = Vec::new();
    let mut durations: Vec<f64> = Vec::new();
    let mut earliest: Vec<f64> = Vec::new();
    let mut latest: Vec<f64> = Vec::new();
    let mut slacks: Vec<f64> = Vec::new();
    let mut critical: Vec<bool> = Vec::new();

    if analysis.solution().is_some() {
        let graph = analysis.graph();
        for activity in graph.activities() {
            let (Some(u), Some(v)) = (graph.node(activity.from), graph.node(activity.to)) else {
                continue;
            };
            let earliest_start = u.ve;
            let latest_start = v.vl - activity.duration;
            from.push(activity.from.to_string());
            to.push(activity.to.to_string());
            task_keys.push(work_task_key(activity.from, activity.to));
            durations.push(activity.duration);
            earliest.push(earliest_start);
            latest.push(latest_start);
            slacks.push(latest_start - earliest_start);
            critical.push(is_critical(u.ve, v.vl, activity.duration));
        }
    }

    df!(
        "from" => from,
        "to" => to,
        "task_key" => task_keys,
        "duration_hours" => durations,
        "earliest_start" => earliest,
        "latest_start" => latest,
        "slack" => slacks,
        "critical" => critical
    )?
    .lazy()
    .sort(
        ["earliest_start"],
        SortMultipleOptions::default().with_maintain_order(true),
    )
    .collect()
}

fn work_task_key(from: &str, to: &str) -> Option<String> {
    let key = from.strip_suffix(START_SUFFIX)?;
    let end_key = to.strip_suffix(END_SUFFIX)?;
    (key == end_key).then(|| key.to_string())
}

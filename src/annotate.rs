use crate::calculations::CriticalActivity;
use crate::graph::task_key_from_start;
use crate::task::TaskRecord;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Flag the owners of critical work activities as key tasks and return copies of them.
///
/// Zero-duration activities are ordering constraints and never attributed to a task.
/// A task flagged by an earlier run that is no longer critical is reset to `false`.
pub fn annotate_critical_tasks(
    tasks: &mut [TaskRecord],
    critical: &[CriticalActivity],
) -> Vec<TaskRecord> {
    let mut by_key: HashMap<String, usize> = HashMap::with_capacity(tasks.len());
    for (idx, task) in tasks.iter().enumerate() {
        if let Some(key) = task.key() {
            by_key.entry(key.to_string()).or_insert(idx);
        }
    }

    let mut flagged: HashSet<usize> = HashSet::new();
    let mut order = Vec::new();
    for activity in critical.iter().filter(|a| a.is_work()) {
        let key = task_key_from_start(&activity.from);
        match by_key.get(key) {
            Some(&idx) => {
                if flagged.insert(idx) {
                    order.push(idx);
                }
            }
            None => warn!(task = key, "critical activity has no matching task"),
        }
    }

    for (idx, task) in tasks.iter_mut().enumerate() {
        if flagged.contains(&idx) {
            task.keytask = Some(true);
        } else if task.is_keytask() {
            task.keytask = Some(false);
        }
    }

    debug!(critical_tasks = order.len(), "annotated key tasks");
    order.into_iter().map(|idx| tasks[idx].clone()).collect()
}

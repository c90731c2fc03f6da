//! Critical activity extraction over a solved event network.

use super::backward_pass::BackwardPass;
use super::forward_pass::ForwardPass;
use crate::error::GraphError;
use crate::graph::AoeGraph;
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

/// Absolute tolerance, in hours, for the zero-slack test.
pub const CRITICAL_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalActivity {
    pub from: String,
    pub to: String,
    pub duration_hours: f64,
}

impl CriticalActivity {
    /// Positive-duration activities are task work; zero-duration ones only order events.
    pub fn is_work(&self) -> bool {
        self.duration_hours > 0.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CriticalPath {
    pub critical_edges: Vec<CriticalActivity>,
    /// Largest earliest event time in the network.
    pub total_duration: f64,
    pub topo_order: Vec<NodeIndex>,
}

/// `ve[u] == vl[v] - w` within [`CRITICAL_EPSILON`].
pub fn is_critical(ve_from: f64, vl_to: f64, duration: f64) -> bool {
    (ve_from - (vl_to - duration)).abs() <= CRITICAL_EPSILON
}

/// Recompute event times from scratch and collect every zero-slack activity.
pub fn solve(graph: &mut AoeGraph) -> Result<CriticalPath, GraphError> {
    graph.reset_times();

    let topo_order = ForwardPass::new(graph).execute().inspect_err(|err| {
        error!(%err, "critical path unavailable");
    })?;

    let total_duration = topo_order
        .iter()
        .map(|&ix| graph.node_at(ix).ve)
        .fold(0.0, f64::max);
    debug!(total_duration, "forward pass complete");

    BackwardPass::new(graph).execute(&topo_order, total_duration);
    debug!("backward pass complete");

    let critical_edges: Vec<CriticalActivity> = graph
        .activities()
        .filter(|activity| {
            let (Some(from), Some(to)) = (graph.node(activity.from), graph.node(activity.to))
            else {
                return false;
            };
            is_critical(from.ve, to.vl, activity.duration)
        })
        .map(|activity| CriticalActivity {
            from: activity.from.to_string(),
            to: activity.to.to_string(),
            duration_hours: activity.duration,
        })
        .collect();

    info!(
        total_duration,
        critical_activities = critical_edges.len(),
        "critical path solved"
    );

    Ok(CriticalPath {
        critical_edges,
        total_duration,
        topo_order,
    })
}

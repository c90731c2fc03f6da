use super::critical::CriticalActivity;
use crate::graph::AoeGraph;
use petgraph::graph::NodeIndex;
use std::collections::HashMap;
use tracing::debug;

/// Every maximal start-to-end node sequence that runs over critical activities only.
///
/// Starts have no incoming activity and ends no outgoing activity in the full graph.
/// Isolated events are deliberately not treated as starts, so they never yield
/// single-node paths. A node already on the current path is never revisited.
pub fn enumerate_critical_paths(graph: &AoeGraph, critical: &[CriticalActivity]) -> Vec<Vec<String>> {
    let mut adjacency: HashMap<NodeIndex, Vec<NodeIndex>> = HashMap::new();
    for activity in critical {
        let (Some(u), Some(v)) = (graph.node_index(&activity.from), graph.node_index(&activity.to))
        else {
            continue;
        };
        adjacency.entry(u).or_default().push(v);
    }

    let is_end = |ix: NodeIndex| graph.out_degree_at(ix) == 0;
    let starts: Vec<NodeIndex> = graph
        .node_indices()
        .filter(|&ix| graph.in_degree_at(ix) == 0 && !is_end(ix))
        .collect();

    let mut paths = Vec::new();
    for start in starts {
        let mut stack: Vec<Vec<NodeIndex>> = vec![vec![start]];
        while let Some(path) = stack.pop() {
            let Some(&tail) = path.last() else {
                continue;
            };
            if is_end(tail) {
                paths.push(path.iter().map(|&ix| graph.node_at(ix).id.clone()).collect());
                continue;
            }
            let Some(next) = adjacency.get(&tail) else {
                continue;
            };
            // Reverse push keeps discovery in activity insertion order.
            for &v in next.iter().rev() {
                if path.contains(&v) {
                    continue;
                }
                let mut extended = path.clone();
                extended.push(v);
                stack.push(extended);
            }
        }
    }

    debug!(paths = paths.len(), "critical paths enumerated");
    paths
}

use crate::error::GraphError;
use crate::graph::AoeGraph;
use petgraph::graph::NodeIndex;
use std::collections::VecDeque;
use tracing::debug;

/// Kahn-order sweep that fills in earliest event times.
pub struct ForwardPass<'a> {
    graph: &'a mut AoeGraph,
}

impl<'a> ForwardPass<'a> {
    pub fn new(graph: &'a mut AoeGraph) -> Self {
        Self { graph }
    }

    /// Returns the topological order used, or a cycle error when some events
    /// could never be released.
    pub fn execute(self) -> Result<Vec<NodeIndex>, GraphError> {
        let total = self.graph.node_count();
        let mut remaining: Vec<usize> = self
            .graph
            .node_indices()
            .map(|ix| self.graph.in_degree_at(ix))
            .collect();

        // Seed with sources in insertion order
        let mut queue: VecDeque<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|ix| remaining[ix.index()] == 0)
            .collect();
        let mut order = Vec::with_capacity(total);

        while let Some(u) = queue.pop_front() {
            order.push(u);
            let ve_u = self.graph.node_at(u).ve;
            let successors: Vec<(NodeIndex, f64)> = self.graph.successors(u).collect();
            for (v, duration) in successors {
                let candidate = ve_u + duration;
                let node = self.graph.node_at_mut(v);
                if candidate > node.ve {
                    node.ve = candidate;
                }
                remaining[v.index()] -= 1;
                if remaining[v.index()] == 0 {
                    queue.push_back(v);
                }
            }
        }

        if order.len() < total {
            debug!(visited = order.len(), total, "forward pass stalled");
            return Err(GraphError::Cycle {
                visited: order.len(),
                total,
            });
        }
        Ok(order)
    }
}

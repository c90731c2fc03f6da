use crate::graph::AoeGraph;
use petgraph::graph::NodeIndex;

/// Reverse-topological sweep that fills in latest event times.
pub struct BackwardPass<'a> {
    graph: &'a mut AoeGraph,
}

impl<'a> BackwardPass<'a> {
    pub fn new(graph: &'a mut AoeGraph) -> Self {
        Self { graph }
    }

    /// `order` must be the topological order produced by the forward pass.
    /// Every event starts at `max_time` and is pulled back by its successors.
    pub fn execute(self, order: &[NodeIndex], max_time: f64) {
        for &ix in order {
            self.graph.node_at_mut(ix).vl = max_time;
        }

        for &u in order.iter().rev() {
            let successors: Vec<(NodeIndex, f64)> = self.graph.successors(u).collect();
            let mut vl = self.graph.node_at(u).vl;
            for (v, duration) in successors {
                let candidate = self.graph.node_at(v).vl - duration;
                if candidate < vl {
                    vl = candidate;
                }
            }
            self.graph.node_at_mut(u).vl = vl;
        }
    }
}

//! Activity-on-edge network: events are nodes, activities are weighted edges.
//!
//! Nodes are addressed by string id within one graph instance. At most one edge exists
//! per ordered node pair; adding it again overwrites the duration.

use petgraph::Direction;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::{Dfs, EdgeRef, Reversed};
use std::collections::HashMap;
use tracing::{debug, warn};

pub mod builder;

pub const START_SUFFIX: &str = "_start";
pub const END_SUFFIX: &str = "_end";

pub fn start_event_id(key: &str) -> String {
    format!("{key}{START_SUFFIX}")
}

pub fn end_event_id(key: &str) -> String {
    format!("{key}{END_SUFFIX}")
}

/// Owning task key of an activity whose source is a task start event.
pub fn task_key_from_start(event_id: &str) -> &str {
    event_id.strip_suffix(START_SUFFIX).unwrap_or(event_id)
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventNode {
    pub id: String,
    pub name: String,
    /// Earliest event time in hours.
    pub ve: f64,
    /// Latest event time in hours.
    pub vl: f64,
}

impl EventNode {
    fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ve: 0.0,
            vl: 0.0,
        }
    }

    pub fn slack(&self) -> f64 {
        self.vl - self.ve
    }
}

/// Borrowed view of one activity edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivityRef<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub duration: f64,
}

#[derive(Debug, Clone, Default)]
pub struct AoeGraph {
    graph: DiGraph<EventNode, f64>,
    id_to_index: HashMap<String, NodeIndex>,
    edge_lookup: HashMap<(NodeIndex, NodeIndex), EdgeIndex>,
    in_degree: Vec<usize>,
}

impl AoeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an event, or rename it when the id already exists.
    pub fn add_node(&mut self, id: &str, name: &str) -> NodeIndex {
        if let Some(&ix) = self.id_to_index.get(id) {
            self.graph[ix].name = name.to_string();
            return ix;
        }
        let ix = self.graph.add_node(EventNode::new(id, name));
        self.id_to_index.insert(id.to_string(), ix);
        self.in_degree.push(0);
        debug!(node = id, name, "added event");
        ix
    }

    /// Upsert the activity `from -> to`. Returns `false` when either endpoint is unknown.
    pub fn add_edge(&mut self, from: &str, to: &str, duration: f64) -> bool {
        let (Some(&u), Some(&v)) = (self.id_to_index.get(from), self.id_to_index.get(to)) else {
            warn!(from, to, "skipping activity with unknown endpoint");
            return false;
        };

        if let Some(&edge) = self.edge_lookup.get(&(u, v)) {
            self.graph[edge] = duration;
            debug!(from, to, duration, "updated activity");
        } else {
            let edge = self.graph.add_edge(u, v, duration);
            self.edge_lookup.insert((u, v), edge);
            self.in_degree[v.index()] += 1;
            debug!(from, to, duration, "added activity");
        }
        true
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.id_to_index.contains_key(id)
    }

    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.id_to_index.get(id).copied()
    }

    pub fn node(&self, id: &str) -> Option<&EventNode> {
        self.node_index(id).map(|ix| &self.graph[ix])
    }

    pub fn node_at(&self, ix: NodeIndex) -> &EventNode {
        &self.graph[ix]
    }

    pub(crate) fn node_at_mut(&mut self, ix: NodeIndex) -> &mut EventNode {
        &mut self.graph[ix]
    }

    /// Zero both event times on every node.
    pub(crate) fn reset_times(&mut self) {
        for node in self.graph.node_weights_mut() {
            node.ve = 0.0;
            node.vl = 0.0;
        }
    }

    pub fn edge_duration(&self, from: &str, to: &str) -> Option<f64> {
        let u = self.node_index(from)?;
        let v = self.node_index(to)?;
        self.edge_lookup.get(&(u, v)).map(|&edge| self.graph[edge])
    }

    pub fn in_degree(&self, id: &str) -> Option<usize> {
        self.node_index(id).map(|ix| self.in_degree[ix.index()])
    }

    pub(crate) fn in_degree_at(&self, ix: NodeIndex) -> usize {
        self.in_degree[ix.index()]
    }

    pub fn out_degree_at(&self, ix: NodeIndex) -> usize {
        self.graph.edges_directed(ix, Direction::Outgoing).count()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Node indices in insertion order.
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &EventNode> + '_ {
        self.graph.node_indices().map(move |ix| &self.graph[ix])
    }

    /// Outgoing activities of `ix` as `(target, duration)`.
    pub fn successors(&self, ix: NodeIndex) -> impl Iterator<Item = (NodeIndex, f64)> + '_ {
        self.graph
            .edges_directed(ix, Direction::Outgoing)
            .map(|edge| (edge.target(), *edge.weight()))
    }

    /// All activities in insertion order.
    pub fn activities(&self) -> impl Iterator<Item = ActivityRef<'_>> + '_ {
        self.graph.edge_references().map(|edge| ActivityRef {
            from: self.graph[edge.source()].id.as_str(),
            to: self.graph[edge.target()].id.as_str(),
            duration: *edge.weight(),
        })
    }

    /// Events reachable from `start_id` that have no route to `end_id`.
    pub fn dangling_events(&self, start_id: &str, end_id: &str) -> Vec<String> {
        let (Some(start), Some(end)) = (self.node_index(start_id), self.node_index(end_id)) else {
            return Vec::new();
        };

        let mut reaches_end = vec![false; self.graph.node_count()];
        let reversed = Reversed(&self.graph);
        let mut dfs = Dfs::new(reversed, end);
        while let Some(ix) = dfs.next(reversed) {
            reaches_end[ix.index()] = true;
        }

        let mut dangling = Vec::new();
        let mut dfs = Dfs::new(&self.graph, start);
        while let Some(ix) = dfs.next(&self.graph) {
            if !reaches_end[ix.index()] {
                dangling.push(self.graph[ix].id.clone());
            }
        }
        dangling
    }
}

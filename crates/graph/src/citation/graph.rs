//! Citation graph representation
//!
//! Directed citer -> cited graph over dense indices. Edges only enter
//! through `add_edge_acyclic`, so the graph is acyclic at all times.

use crate::highlight::palette::{EdgeRole, NodeRole, Rgba};
use std::collections::HashMap;

pub type NodeIndex = usize;
pub type EdgeIndex = usize;

/// Node with its visual attributes
#[derive(Debug, Clone)]
pub struct GraphNode {
    /// Paper ID
    pub id: String,

    /// Display label
    pub label: String,

    pub x: f64,
    pub y: f64,

    /// Rendered size, derived from the citation count
    pub size: f64,

    /// Accepted incoming citations at build time
    pub citation_count: u32,

    pub role: NodeRole,

    pub color: Rgba,

    pub label_color: Rgba,
}

/// Directed edge from the citing paper to the cited paper
#[derive(Debug, Clone)]
pub struct GraphEdge {
    pub source: NodeIndex,

    pub target: NodeIndex,

    pub role: EdgeRole,

    pub color: Rgba,
}

/// Result of an edge insertion attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeInsert {
    Added(EdgeIndex),
    /// The ordered pair already has an edge
    Duplicate(EdgeIndex),
    /// The target already reaches the source
    WouldCycle,
}

/// Direction for graph traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalDirection {
    /// Follow references (papers cited by this paper)
    Forward,
    /// Follow citations (papers citing this paper)
    Backward,
}

/// In-memory citation graph
#[derive(Debug, Clone, Default)]
pub struct CitationGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,

    /// Paper id -> node index
    index: HashMap<String, NodeIndex>,

    /// Adjacency list: node -> edges to papers it cites
    outgoing: Vec<Vec<EdgeIndex>>,

    /// Reverse adjacency: node -> edges from papers citing it
    incoming: Vec<Vec<EdgeIndex>>,

    edge_keys: HashMap<(NodeIndex, NodeIndex), EdgeIndex>,
}

impl CitationGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, or return the existing index for `id`
    pub fn add_node(&mut self, id: impl Into<String>, label: impl Into<String>) -> NodeIndex {
        let id = id.into();
        if let Some(&idx) = self.index.get(&id) {
            return idx;
        }

        let idx = self.nodes.len();
        self.nodes.push(GraphNode {
            id: id.clone(),
            label: label.into(),
            x: 0.0,
            y: 0.0,
            size: 0.0,
            citation_count: 0,
            role: NodeRole::Default,
            color: Rgba::default(),
            label_color: Rgba::default(),
        });
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        self.index.insert(id, idx);
        idx
    }

    /// Add `source -> target` unless it duplicates an edge or closes a cycle
    pub fn add_edge_acyclic(&mut self, source: NodeIndex, target: NodeIndex) -> EdgeInsert {
        if let Some(&existing) = self.edge_keys.get(&(source, target)) {
            return EdgeInsert::Duplicate(existing);
        }
        if self.would_create_cycle(source, target) {
            return EdgeInsert::WouldCycle;
        }
        EdgeInsert::Added(self.push_edge(source, target))
    }

    /// True when `target` already reaches `source` (self-loops included)
    pub fn would_create_cycle(&self, source: NodeIndex, target: NodeIndex) -> bool {
        if source >= self.nodes.len() || target >= self.nodes.len() {
            return false;
        }

        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![target];

        while let Some(current) = stack.pop() {
            if current == source {
                return true;
            }
            if visited[current] {
                continue;
            }
            visited[current] = true;

            for &edge in &self.outgoing[current] {
                let next = self.edges[edge].target;
                if !visited[next] {
                    stack.push(next);
                }
            }
        }

        false
    }

    fn push_edge(&mut self, source: NodeIndex, target: NodeIndex) -> EdgeIndex {
        let idx = self.edges.len();
        self.edges.push(GraphEdge {
            source,
            target,
            role: EdgeRole::Default,
            color: Rgba::default(),
        });
        self.outgoing[source].push(idx);
        self.incoming[target].push(idx);
        self.edge_keys.insert((source, target), idx);
        idx
    }

    /// Insert an edge without the cycle check
    #[cfg(test)]
    pub(crate) fn insert_edge_unchecked(&mut self, source: NodeIndex, target: NodeIndex) -> EdgeIndex {
        self.push_edge(source, target)
    }

    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    pub fn node(&self, idx: NodeIndex) -> &GraphNode {
        &self.nodes[idx]
    }

    pub fn node_mut(&mut self, idx: NodeIndex) -> &mut GraphNode {
        &mut self.nodes[idx]
    }

    #[cfg(test)]
    pub(crate) fn node_by_id(&self, id: &str) -> Option<&GraphNode> {
        self.node_index(id).map(|idx| &self.nodes[idx])
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [GraphNode] {
        &mut self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn edges_mut(&mut self) -> &mut [GraphEdge] {
        &mut self.edges
    }

    /// Get node count
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn has_edge(&self, source: &str, target: &str) -> bool {
        match (self.node_index(source), self.node_index(target)) {
            (Some(s), Some(t)) => self.edge_keys.contains_key(&(s, t)),
            _ => false,
        }
    }

    /// Get papers cited by this paper
    pub fn references(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.outgoing[idx].iter().map(move |&e| self.edges[e].target)
    }

    /// Get papers citing this paper
    #[cfg(test)]
    pub(crate) fn citations(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.incoming[idx].iter().map(move |&e| self.edges[e].source)
    }

    pub fn in_degree(&self, idx: NodeIndex) -> usize {
        self.incoming[idx].len()
    }

    pub fn out_degree(&self, idx: NodeIndex) -> usize {
        self.outgoing[idx].len()
    }

    /// Mark every node reachable from `start` (inclusive) in `visited`.
    ///
    /// Iterative depth-first search; nodes already marked are never expanded
    /// again, so the walk terminates even on a cyclic graph.
    pub fn mark_reachable(&self, start: NodeIndex, direction: TraversalDirection, visited: &mut [bool]) {
        let mut stack = vec![start];

        while let Some(current) = stack.pop() {
            if visited[current] {
                continue;
            }
            visited[current] = true;

            let edges = match direction {
                TraversalDirection::Forward => &self.outgoing[current],
                TraversalDirection::Backward => &self.incoming[current],
            };

            for &edge in edges {
                let next = match direction {
                    TraversalDirection::Forward => self.edges[edge].target,
                    TraversalDirection::Backward => self.edges[edge].source,
                };
                if !visited[next] {
                    stack.push(next);
                }
            }
        }
    }

    /// Nodes strictly reachable from `start`, in index order
    #[cfg(test)]
    pub(crate) fn reachable(&self, start: NodeIndex, direction: TraversalDirection) -> Vec<NodeIndex> {
        let mut visited = vec![false; self.nodes.len()];
        self.mark_reachable(start, direction, &mut visited);
        visited
            .iter()
            .enumerate()
            .filter(|&(idx, &seen)| seen && idx != start)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Ids strictly reachable from `id`; empty for unknown ids
    #[cfg(test)]
    pub(crate) fn reachable_ids(&self, id: &str, direction: TraversalDirection) -> std::collections::HashSet<&str> {
        match self.node_index(id) {
            Some(idx) => self
                .reachable(idx, direction)
                .into_iter()
                .map(|n| self.nodes[n].id.as_str())
                .collect(),
            None => std::collections::HashSet::new(),
        }
    }

    /// True when some node reaches itself
    #[cfg(test)]
    pub(crate) fn has_cycle(&self) -> bool {
        (0..self.nodes.len()).any(|idx| {
            self.references(idx)
                .any(|next| next == idx || self.reachable(next, TraversalDirection::Forward).contains(&idx))
        })
    }
}

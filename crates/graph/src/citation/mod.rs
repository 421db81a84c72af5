//! Citation graph module
//!
//! Builds the acyclic citer -> cited graph from the paper catalog and
//! answers reachability queries over it.

mod builder;
mod graph;

pub use builder::{build, BuildOutcome, BuildReport};
pub use graph::{CitationGraph, EdgeIndex, EdgeInsert, GraphEdge, GraphNode, NodeIndex, TraversalDirection};

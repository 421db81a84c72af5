//! Topological generations and the initial layered placement

use crate::citation::{CitationGraph, NodeIndex};
use rand::Rng;

/// Partition nodes into topological generations.
///
/// Generation 0 holds the nodes without incoming edges, in index order;
/// each later generation holds the nodes whose last predecessor sits in the
/// previous one, in discovery order. On a graph that somehow still has a
/// cycle the nodes that never become free go into one final generation.
pub fn topological_generations(graph: &CitationGraph) -> Vec<Vec<NodeIndex>> {
    let n = graph.node_count();
    let mut remaining: Vec<usize> = (0..n).map(|idx| graph.in_degree(idx)).collect();
    let mut placed = vec![false; n];
    let mut generations = Vec::new();

    let mut current: Vec<NodeIndex> = (0..n).filter(|&idx| remaining[idx] == 0).collect();

    while !current.is_empty() {
        let mut next = Vec::new();
        for &idx in &current {
            placed[idx] = true;
            for target in graph.references(idx) {
                remaining[target] -= 1;
                if remaining[target] == 0 {
                    next.push(target);
                }
            }
        }
        generations.push(std::mem::replace(&mut current, next));
    }

    let stuck: Vec<NodeIndex> = (0..n).filter(|&idx| !placed[idx]).collect();
    if !stuck.is_empty() {
        generations.push(stuck);
    }

    generations
}

/// Spacing parameters of the layered placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub generation_gap: f64,
    pub spacing: f64,
    pub jitter: f64,
}

impl Placement {
    /// Place every generation on its own row, the first one on top, each row
    /// centered on zero with uniform jitter in `[-jitter/2, jitter/2)`.
    pub fn place<R: Rng>(&self, graph: &mut CitationGraph, generations: &[Vec<NodeIndex>], rng: &mut R) {
        let total = generations.len();

        for (gen_index, generation) in generations.iter().enumerate() {
            let y = (total - 1 - gen_index) as f64 * self.generation_gap;
            let start_x = -((generation.len() as f64 - 1.0) * self.spacing) / 2.0;

            for (slot, &idx) in generation.iter().enumerate() {
                let base_x = start_x + slot as f64 * self.spacing;
                let offset = (rng.gen::<f64>() - 0.5) * self.jitter;

                let node = graph.node_mut(idx);
                node.x = base_x + offset;
                node.y = y;
            }
        }
    }
}

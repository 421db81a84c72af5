//! ForceAtlas2-style relaxation
//!
//! Degree-weighted repulsion between every pair of nodes, attraction along
//! edges (logarithmic in lin-log mode) and a pull toward the origin. Each
//! node's step shrinks with its own oscillation, so a short fixed budget of
//! iterations spreads overlapping rows without exploding.

use super::LayoutRefiner;
use crate::citation::CitationGraph;
use citemap_common::config::LayoutConfig;

const MIN_DISTANCE: f64 = 0.01;

/// Bounded force relaxation
#[derive(Debug, Clone, PartialEq)]
pub struct ForceRelaxation {
    pub iterations: usize,
    pub scaling_ratio: f64,
    pub gravity: f64,
    pub lin_log: bool,
}

impl ForceRelaxation {
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self {
            iterations: config.force_iterations,
            scaling_ratio: config.scaling_ratio,
            gravity: config.gravity,
            lin_log: config.lin_log,
        }
    }

    fn forces(&self, graph: &CitationGraph, mass: &[f64]) -> Vec<(f64, f64)> {
        let nodes = graph.nodes();
        let n = nodes.len();
        let mut forces = vec![(0.0, 0.0); n];

        for i in 0..n {
            for j in (i + 1)..n {
                let dx = nodes[i].x - nodes[j].x;
                let dy = nodes[i].y - nodes[j].y;
                let dist_sq = (dx * dx + dy * dy).max(MIN_DISTANCE * MIN_DISTANCE);

                let factor = self.scaling_ratio * mass[i] * mass[j] / dist_sq;
                forces[i].0 += dx * factor;
                forces[i].1 += dy * factor;
                forces[j].0 -= dx * factor;
                forces[j].1 -= dy * factor;
            }
        }

        for edge in graph.edges() {
            let (s, t) = (edge.source, edge.target);
            let dx = nodes[s].x - nodes[t].x;
            let dy = nodes[s].y - nodes[t].y;
            let dist = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);

            let factor = if self.lin_log { -(1.0 + dist).ln() / dist } else { -1.0 };
            forces[s].0 += dx * factor;
            forces[s].1 += dy * factor;
            forces[t].0 -= dx * factor;
            forces[t].1 -= dy * factor;
        }

        for (i, node) in nodes.iter().enumerate() {
            let dist = (node.x * node.x + node.y * node.y).sqrt();
            if dist > MIN_DISTANCE {
                let factor = -self.gravity * mass[i] / dist;
                forces[i].0 += node.x * factor;
                forces[i].1 += node.y * factor;
            }
        }

        forces
    }
}

impl LayoutRefiner for ForceRelaxation {
    fn name(&self) -> &'static str {
        "force_atlas"
    }

    fn refine(&self, graph: &mut CitationGraph) -> usize {
        let n = graph.node_count();
        if n < 2 {
            return 0;
        }

        let mass: Vec<f64> = (0..n)
            .map(|idx| 1.0 + (graph.in_degree(idx) + graph.out_degree(idx)) as f64)
            .collect();
        let mut previous = vec![(0.0, 0.0); n];

        for _ in 0..self.iterations {
            let forces = self.forces(graph, &mass);

            for (idx, node) in graph.nodes_mut().iter_mut().enumerate() {
                let (fx, fy) = forces[idx];
                let (px, py) = previous[idx];
                let swinging = mass[idx] * ((px - fx).powi(2) + (py - fy).powi(2)).sqrt();
                let speed = 1.0 / (1.0 + swinging.sqrt());

                if fx.is_finite() && fy.is_finite() {
                    node.x += fx * speed;
                    node.y += fy * speed;
                }
            }

            previous = forces;
        }

        self.iterations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::citation::EdgeInsert;

    fn relaxation(iterations: usize) -> ForceRelaxation {
        ForceRelaxation::from_config(&LayoutConfig {
            force_iterations: iterations,
            ..LayoutConfig::default()
        })
    }

    fn row(n: usize) -> CitationGraph {
        let mut graph = CitationGraph::new();
        for i in 0..n {
            let idx = graph.add_node(format!("N{}", i), "");
            graph.node_mut(idx).x = i as f64;
        }
        for i in 1..n {
            assert!(matches!(graph.add_edge_acyclic(0, i), EdgeInsert::Added(_)));
        }
        graph
    }

    #[test]
    fn test_iteration_budget_respected() {
        let mut graph = row(5);
        assert_eq!(relaxation(10).refine(&mut graph), 10);
        assert_eq!(relaxation(0).refine(&mut graph), 0);
    }

    #[test]
    fn test_crowded_row_spreads_out() {
        let mut graph = row(6);
        let width = |g: &CitationGraph| {
            let xs: Vec<f64> = g.nodes().iter().map(|n| n.x).collect();
            xs.iter().cloned().fold(f64::MIN, f64::max) - xs.iter().cloned().fold(f64::MAX, f64::min)
        };
        let before = width(&graph);

        relaxation(10).refine(&mut graph);

        assert!(width(&graph) > before);
        assert!(graph.nodes().iter().all(|n| n.x.is_finite() && n.y.is_finite()));
    }

    #[test]
    fn test_deterministic() {
        let mut first = row(8);
        let mut second = row(8);
        relaxation(10).refine(&mut first);
        relaxation(10).refine(&mut second);

        let positions = |g: &CitationGraph| g.nodes().iter().map(|n| (n.x, n.y)).collect::<Vec<_>>();
        assert_eq!(positions(&first), positions(&second));
    }

    #[test]
    fn test_coincident_nodes_stay_finite() {
        let mut graph = CitationGraph::new();
        graph.add_node("A", "");
        graph.add_node("B", "");
        relaxation(10).refine(&mut graph);
        assert!(graph.nodes().iter().all(|n| n.x.is_finite() && n.y.is_finite()));
    }
}

//! Layered layout planner
//!
//! Initial placement comes from topological generations (roots on top)
//! with seeded horizontal jitter. A `LayoutRefiner` then relaxes overlaps
//! within a fixed iteration budget.

mod force;
mod layered;

pub use force::ForceRelaxation;
pub use layered::{topological_generations, Placement};

use crate::citation::{CitationGraph, NodeIndex};
use citemap_common::config::LayoutConfig;
use citemap_common::metrics;
use rand::{rngs::StdRng, SeedableRng};
use std::time::Instant;
use tracing::{debug, instrument};

/// Relaxation pass run after the initial placement
pub trait LayoutRefiner: Send + Sync {
    fn name(&self) -> &'static str;

    /// Adjust positions in place; returns the iterations actually run
    fn refine(&self, graph: &mut CitationGraph) -> usize;
}

/// Result of one planning run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutReport {
    pub generations: Vec<Vec<NodeIndex>>,
    pub refine_iterations: usize,
}

/// Assigns positions and sizes to a built graph
pub struct LayeredPlanner {
    placement: Placement,
    seed: u64,
    base_node_size: f64,
    size_per_citation: f64,
    refiner: Option<Box<dyn LayoutRefiner>>,
}

impl LayeredPlanner {
    /// Planner with the configured force relaxation (none when the
    /// iteration budget is zero)
    pub fn from_config(config: &LayoutConfig) -> Self {
        let refiner: Option<Box<dyn LayoutRefiner>> = if config.force_iterations > 0 {
            Some(Box::new(ForceRelaxation::from_config(config)))
        } else {
            None
        };

        Self {
            placement: Placement {
                generation_gap: config.generation_gap,
                spacing: config.spacing,
                jitter: config.jitter,
            },
            seed: config.seed,
            base_node_size: config.base_node_size,
            size_per_citation: config.size_per_citation,
            refiner,
        }
    }

    pub fn with_refiner(mut self, refiner: Option<Box<dyn LayoutRefiner>>) -> Self {
        self.refiner = refiner;
        self
    }

    /// Size, place and relax every node. An empty graph is left as is.
    #[instrument(skip(self, graph), fields(nodes = graph.node_count()))]
    pub fn plan(&self, graph: &mut CitationGraph) -> LayoutReport {
        let start = Instant::now();

        for node in graph.nodes_mut() {
            node.size = self.base_node_size + node.citation_count as f64 * self.size_per_citation;
        }

        let generations = topological_generations(graph);
        let mut rng = StdRng::seed_from_u64(self.seed);
        self.placement.place(graph, &generations, &mut rng);

        let refine_iterations = match &self.refiner {
            Some(refiner) if !graph.is_empty() => {
                let iterations = refiner.refine(graph);
                debug!(refiner = refiner.name(), iterations, "Layout relaxed");
                iterations
            }
            _ => 0,
        };

        metrics::record_layout(start.elapsed().as_secs_f64());
        debug!(generations = generations.len(), "Layout planned");

        LayoutReport {
            generations,
            refine_iterations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::citation::build;
    use citemap_common::models::{PaperCatalog, PaperRecord};

    fn scenario() -> CitationGraph {
        let mut papers: PaperCatalog = [
            ("A", vec!["B", "C"]),
            ("B", vec!["D"]),
            ("C", vec![]),
            ("D", vec!["A"]),
        ]
        .into_iter()
        .map(|(id, refs)| (id, PaperRecord::new(id).with_references(refs)))
        .collect();
        build(&mut papers).graph
    }

    fn ids(graph: &CitationGraph, generations: &[Vec<NodeIndex>]) -> Vec<Vec<String>> {
        generations
            .iter()
            .map(|g| g.iter().map(|&idx| graph.node(idx).id.clone()).collect())
            .collect()
    }

    #[test]
    fn test_scenario_generations() {
        let mut graph = scenario();
        let report = LayeredPlanner::from_config(&LayoutConfig::default()).plan(&mut graph);

        assert_eq!(ids(&graph, &report.generations), vec![vec!["A"], vec!["B", "C"], vec!["D"]]);
        assert_eq!(report.refine_iterations, 10);
    }

    #[test]
    fn test_planning_is_repeatable() {
        let planner = LayeredPlanner::from_config(&LayoutConfig::default());
        let mut graph = scenario();

        let first = planner.plan(&mut graph);
        let positions: Vec<_> = graph.nodes().iter().map(|n| (n.x, n.y)).collect();
        let second = planner.plan(&mut graph);

        assert_eq!(first.generations, second.generations);
        assert_eq!(positions, graph.nodes().iter().map(|n| (n.x, n.y)).collect::<Vec<_>>());
    }

    #[test]
    fn test_rows_without_refiner() {
        let config = LayoutConfig {
            force_iterations: 0,
            ..LayoutConfig::default()
        };
        let mut graph = scenario();
        let report = LayeredPlanner::from_config(&config).plan(&mut graph);

        assert_eq!(report.refine_iterations, 0);
        assert_eq!(graph.node_by_id("A").unwrap().y, 300.0);
        assert_eq!(graph.node_by_id("B").unwrap().y, 150.0);
        assert_eq!(graph.node_by_id("D").unwrap().y, 0.0);
    }

    #[test]
    fn test_size_grows_with_citations() {
        let mut graph = scenario();
        LayeredPlanner::from_config(&LayoutConfig::default()).plan(&mut graph);

        assert_eq!(graph.node_by_id("A").unwrap().size, 5.0);
        assert_eq!(graph.node_by_id("D").unwrap().size, 5.25);
    }

    #[test]
    fn test_different_seed_moves_nodes() {
        let base = LayoutConfig {
            force_iterations: 0,
            ..LayoutConfig::default()
        };
        let mut first = scenario();
        let mut second = scenario();
        LayeredPlanner::from_config(&base).plan(&mut first);
        LayeredPlanner::from_config(&LayoutConfig { seed: 7, ..base }).plan(&mut second);

        assert_ne!(first.node(0).x, second.node(0).x);
        assert_eq!(first.node(0).y, second.node(0).y);
    }

    #[test]
    fn test_empty_graph() {
        let mut graph = CitationGraph::new();
        let report = LayeredPlanner::from_config(&LayoutConfig::default()).plan(&mut graph);
        assert!(report.generations.is_empty());
        assert_eq!(report.refine_iterations, 0);
    }
}

//! Per-frame focus highlighting
//!
//! Every frame recomputes the full coloring from the focus state; nothing
//! carries over between frames, so the output depends only on the graph
//! and the current `FocusState`.

use super::focus::{FocusSource, FocusState};
use super::palette::{EdgeRole, NodeRole, Palette};
use crate::citation::{CitationGraph, NodeIndex, TraversalDirection};

/// Outcome of one highlight frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameSummary {
    /// Focused node, if the focus id resolved to one
    pub focus: Option<NodeIndex>,
    pub source: Option<FocusSource>,
    /// Nodes strictly downstream of the focus
    pub downstream: usize,
    /// Nodes strictly upstream of the focus
    pub upstream: usize,
}

/// Recolors nodes and edges by their relation to the focused paper
#[derive(Debug, Clone)]
pub struct HighlightEngine {
    palette: Palette,
    downstream: Vec<bool>,
    upstream: Vec<bool>,
}

impl HighlightEngine {
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            downstream: Vec::new(),
            upstream: Vec::new(),
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Run one frame against `focus`
    pub fn apply(&mut self, graph: &mut CitationGraph, focus: &FocusState) -> FrameSummary {
        let Some((focus_id, source)) = focus.active() else {
            self.reset(graph);
            return FrameSummary::default();
        };

        Self::assign_all(graph, NodeRole::Dimmed, EdgeRole::Dimmed);

        // A focus id that no longer names a node leaves everything dimmed
        let Some(f) = graph.node_index(focus_id) else {
            self.paint(graph, Some(source));
            return FrameSummary {
                source: Some(source),
                ..FrameSummary::default()
            };
        };

        let n = graph.node_count();
        self.downstream.clear();
        self.downstream.resize(n, false);
        self.upstream.clear();
        self.upstream.resize(n, false);

        graph.mark_reachable(f, TraversalDirection::Forward, &mut self.downstream);
        graph.mark_reachable(f, TraversalDirection::Backward, &mut self.upstream);

        let (down, up) = (&self.downstream, &self.upstream);

        // Upstream overrides downstream, which only matters on a cyclic graph
        for (idx, node) in graph.nodes_mut().iter_mut().enumerate() {
            if up[idx] {
                node.role = NodeRole::Upstream;
            } else if down[idx] {
                node.role = NodeRole::Downstream;
            }
        }

        for edge in graph.edges_mut() {
            if up[edge.target] {
                edge.role = EdgeRole::Upstream;
            } else if edge.source == f {
                edge.role = EdgeRole::Active;
            } else if down[edge.source] {
                edge.role = EdgeRole::Downstream;
            }
        }

        graph.node_mut(f).role = NodeRole::Focus;
        self.paint(graph, Some(source));

        FrameSummary {
            focus: Some(f),
            source: Some(source),
            downstream: self.downstream.iter().filter(|&&seen| seen).count() - 1,
            upstream: self.upstream.iter().filter(|&&seen| seen).count() - 1,
        }
    }

    /// Default style on every node and edge
    pub fn reset(&self, graph: &mut CitationGraph) {
        Self::assign_all(graph, NodeRole::Default, EdgeRole::Default);
        self.paint(graph, None);
    }

    fn assign_all(graph: &mut CitationGraph, node_role: NodeRole, edge_role: EdgeRole) {
        for node in graph.nodes_mut() {
            node.role = node_role;
        }
        for edge in graph.edges_mut() {
            edge.role = edge_role;
        }
    }

    fn paint(&self, graph: &mut CitationGraph, source: Option<FocusSource>) {
        for node in graph.nodes_mut() {
            node.color = self.palette.node_color(node.role, source);
            node.label_color = self.palette.label_color(node.role, source);
        }
        for edge in graph.edges_mut() {
            edge.color = self.palette.edge_color(edge.role, source);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::citation::{build, EdgeInsert};
    use crate::highlight::FocusEvent;
    use citemap_common::models::{PaperCatalog, PaperRecord};
    use std::collections::HashSet;

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

    fn focused(kind: fn(String) -> FocusEvent, id: &str) -> FocusState {
        let mut state = FocusState::default();
        state.apply(kind(id.to_string()));
        state
    }

    fn ids_with(graph: &CitationGraph, role: NodeRole) -> HashSet<String> {
        graph
            .nodes()
            .iter()
            .filter(|n| n.role == role)
            .map(|n| n.id.clone())
            .collect()
    }

    fn set(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn edge_role(graph: &CitationGraph, source: &str, target: &str) -> EdgeRole {
        let s = graph.node_index(source).unwrap();
        let t = graph.node_index(target).unwrap();
        graph
            .edges()
            .iter()
            .find(|e| e.source == s && e.target == t)
            .map(|e| e.role)
            .unwrap()
    }

    #[test]
    fn test_focus_root_colors_descendants() {
        let mut graph = scenario();
        let mut engine = HighlightEngine::new(Palette::default());

        let summary = engine.apply(&mut graph, &focused(FocusEvent::EnterNode, "A"));

        assert_eq!(ids_with(&graph, NodeRole::Focus), set(&["A"]));
        assert_eq!(ids_with(&graph, NodeRole::Downstream), set(&["B", "C", "D"]));
        assert!(ids_with(&graph, NodeRole::Upstream).is_empty());
        assert_eq!(summary.downstream, 3);
        assert_eq!(summary.upstream, 0);

        assert_eq!(edge_role(&graph, "A", "B"), EdgeRole::Active);
        assert_eq!(edge_role(&graph, "A", "C"), EdgeRole::Active);
        assert_eq!(edge_role(&graph, "B", "D"), EdgeRole::Downstream);
    }

    #[test]
    fn test_focus_leaf_colors_ancestors() {
        let mut graph = scenario();
        let mut engine = HighlightEngine::new(Palette::default());

        engine.apply(&mut graph, &focused(FocusEvent::ClickNode, "D"));

        assert_eq!(ids_with(&graph, NodeRole::Upstream), set(&["A", "B"]));
        assert!(ids_with(&graph, NodeRole::Downstream).is_empty());
        assert_eq!(ids_with(&graph, NodeRole::Dimmed), set(&["C"]));
        assert_eq!(edge_role(&graph, "B", "D"), EdgeRole::Upstream);
        assert_eq!(edge_role(&graph, "A", "B"), EdgeRole::Upstream);
        assert_eq!(edge_role(&graph, "A", "C"), EdgeRole::Dimmed);

        let d = graph.node_by_id("D").unwrap();
        assert_eq!(d.color, engine.palette().clicked_focus);
        assert_eq!(d.label_color, engine.palette().clicked_focus_label);
        let a_to_c = graph.edges().iter().find(|e| e.role == EdgeRole::Dimmed).unwrap();
        assert_eq!(a_to_c.color, engine.palette().dimmed_edge_clicked);
    }

    #[test]
    fn test_no_focus_resets_everything() {
        let mut graph = scenario();
        let mut engine = HighlightEngine::new(Palette::default());

        engine.apply(&mut graph, &focused(FocusEvent::EnterNode, "B"));
        let summary = engine.apply(&mut graph, &FocusState::default());

        assert_eq!(summary, FrameSummary::default());
        let palette = engine.palette().clone();
        assert!(graph
            .nodes()
            .iter()
            .all(|n| n.role == NodeRole::Default && n.color == palette.base_node && n.label_color == palette.label));
        assert!(graph
            .edges()
            .iter()
            .all(|e| e.role == EdgeRole::Default && e.color == palette.idle_edge));
    }

    #[test]
    fn test_stale_focus_dims_everything() {
        let mut graph = scenario();
        let mut engine = HighlightEngine::new(Palette::default());

        let summary = engine.apply(&mut graph, &focused(FocusEvent::ClickNode, "gone"));

        assert_eq!(summary.focus, None);
        assert!(graph.nodes().iter().all(|n| n.role == NodeRole::Dimmed));
        assert!(graph.edges().iter().all(|e| e.role == EdgeRole::Dimmed));
    }

    #[test]
    fn test_frames_are_identical_for_same_focus() {
        let mut graph = scenario();
        let mut engine = HighlightEngine::new(Palette::default());
        let state = focused(FocusEvent::EnterNode, "B");

        engine.apply(&mut graph, &state);
        let first: Vec<_> = graph.nodes().iter().map(|n| (n.role, n.color)).collect();

        // An unrelated frame in between must not leak into the next one
        engine.apply(&mut graph, &focused(FocusEvent::EnterNode, "C"));
        engine.apply(&mut graph, &state);
        let second: Vec<_> = graph.nodes().iter().map(|n| (n.role, n.color)).collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_partition_matches_reachability() {
        let mut graph = CitationGraph::new();
        let ids: Vec<_> = (0..8).map(|i| graph.add_node(format!("N{}", i), "")).collect();
        for (s, t) in [(0, 1), (0, 2), (1, 3), (2, 3), (3, 4), (5, 3), (6, 7)] {
            assert!(matches!(graph.add_edge_acyclic(ids[s], ids[t]), EdgeInsert::Added(_)));
        }

        let mut engine = HighlightEngine::new(Palette::default());
        for &f in &ids {
            let focus_id = graph.node(f).id.clone();
            engine.apply(&mut graph, &focused(FocusEvent::EnterNode, &focus_id));

            let down: HashSet<_> = graph.reachable(f, TraversalDirection::Forward).into_iter().collect();
            let up: HashSet<_> = graph.reachable(f, TraversalDirection::Backward).into_iter().collect();

            for idx in 0..graph.node_count() {
                let expected = if idx == f {
                    NodeRole::Focus
                } else if up.contains(&idx) {
                    NodeRole::Upstream
                } else if down.contains(&idx) {
                    NodeRole::Downstream
                } else {
                    NodeRole::Dimmed
                };
                assert_eq!(graph.node(idx).role, expected);
            }
        }
    }

    #[test]
    fn test_traversal_guard_on_cyclic_graph() {
        let mut graph = CitationGraph::new();
        let a = graph.add_node("A", "A");
        let b = graph.add_node("B", "B");
        graph.insert_edge_unchecked(a, b);
        graph.insert_edge_unchecked(b, a);

        let mut engine = HighlightEngine::new(Palette::default());
        let summary = engine.apply(&mut graph, &focused(FocusEvent::EnterNode, "A"));
        assert_eq!(summary.downstream, 1);
        assert_eq!(summary.upstream, 1);
    }
}

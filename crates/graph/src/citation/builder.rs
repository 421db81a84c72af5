//! Citation graph construction from the paper catalog

use super::graph::{CitationGraph, EdgeInsert};
use citemap_common::metrics;
use citemap_common::models::{display_label, PaperCatalog};
use std::time::Instant;
use tracing::{debug, info, instrument};

/// What happened to the references during one build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Edges accepted into the graph
    pub accepted: usize,

    /// `(citing, cited)` pairs dropped because they would close a cycle,
    /// in the order they were encountered
    pub rejected: Vec<(String, String)>,

    /// References to ids missing from the catalog
    pub dangling: usize,

    /// Repeated references to an already linked paper
    pub duplicates: usize,
}

/// Graph plus its build report
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub graph: CitationGraph,
    pub report: BuildReport,
}

/// Build the acyclic citation graph and recompute citation counts.
///
/// Papers are visited in catalog order and references in list order; an
/// edge that would close a cycle with edges accepted earlier is dropped.
/// Every record's `citation_count` is overwritten with its number of
/// accepted incoming edges.
#[instrument(skip(papers), fields(papers = papers.len()))]
pub fn build(papers: &mut PaperCatalog) -> BuildOutcome {
    let start = Instant::now();
    let mut graph = CitationGraph::new();
    let mut report = BuildReport::default();

    for (id, record) in papers.iter() {
        graph.add_node(id.as_str(), display_label(record));
    }

    let mut counts = vec![0u32; graph.node_count()];

    for (id, record) in papers.iter() {
        let Some(source) = graph.node_index(id) else { continue };

        for reference in &record.references {
            let Some(target) = graph.node_index(reference) else {
                report.dangling += 1;
                continue;
            };

            match graph.add_edge_acyclic(source, target) {
                EdgeInsert::Added(_) => {
                    counts[target] += 1;
                    report.accepted += 1;
                }
                EdgeInsert::Duplicate(_) => report.duplicates += 1,
                EdgeInsert::WouldCycle => {
                    debug!(citing = %id, cited = %reference, "Dropping citation that would close a cycle");
                    report.rejected.push((id.clone(), reference.clone()));
                }
            }
        }
    }

    for (id, record) in papers.iter_mut() {
        let count = graph.node_index(id).map(|idx| counts[idx]).unwrap_or(0);
        record.citation_count = count;
        if let Some(idx) = graph.node_index(id) {
            graph.node_mut(idx).citation_count = count;
        }
    }

    let elapsed = start.elapsed().as_secs_f64();
    metrics::record_graph_build(elapsed, report.accepted, report.rejected.len(), report.dangling);

    info!(
        nodes = graph.node_count(),
        edges = report.accepted,
        rejected = report.rejected.len(),
        dangling = report.dangling,
        "Citation graph built"
    );

    BuildOutcome { graph, report }
}

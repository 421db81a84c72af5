//! JSON export of the positioned, colored graph

use citemap_common::errors::Result;
use citemap_graph::highlight::Rgba;
use citemap_graph::CitationGraph;
use serde::Serialize;
use std::path::Path;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct NodeExport<'a> {
    pub id: &'a str,
    pub label: &'a str,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub color: Rgba,
}

#[derive(Debug, Serialize)]
pub struct EdgeExport<'a> {
    pub source: &'a str,
    pub target: &'a str,
    pub color: Rgba,
}

/// Snapshot of the graph as a rendering surface would consume it
#[derive(Debug, Serialize)]
pub struct GraphExport<'a> {
    pub nodes: Vec<NodeExport<'a>>,
    pub edges: Vec<EdgeExport<'a>>,
}

impl<'a> GraphExport<'a> {
    pub fn from_graph(graph: &'a CitationGraph) -> Self {
        let nodes = graph
            .nodes()
            .iter()
            .map(|n| NodeExport {
                id: &n.id,
                label: &n.label,
                x: n.x,
                y: n.y,
                size: n.size,
                color: n.color,
            })
            .collect();

        let edges = graph
            .edges()
            .iter()
            .map(|e| EdgeExport {
                source: &graph.node(e.source).id,
                target: &graph.node(e.target).id,
                color: e.color,
            })
            .collect();

        Self { nodes, edges }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Write the export to `path`, creating parent directories
pub async fn write_export(graph: &CitationGraph, path: &Path) -> Result<()> {
    let json = GraphExport::from_graph(graph).to_json()?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, json).await?;

    info!(path = %path.display(), nodes = graph.node_count(), "Graph exported");
    Ok(())
}

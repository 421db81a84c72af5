//! Rendering surfaces
//!
//! The session pushes the colored graph and side-panel content through
//! `RenderSurface`. `TerminalSurface` prints a textual view; frames are
//! only printed when the highlight outcome changes.

use citemap_common::models::{format_summary, PaperRecord};
use citemap_graph::highlight::{FocusSource, NodeRole};
use citemap_graph::{CitationGraph, FrameSummary};
use std::io::Write;
use tracing::warn;

/// Side-panel region a message belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Search,
    Lookup,
    Assistant,
    Saved,
    Export,
    Input,
}

impl Region {
    fn as_str(&self) -> &'static str {
        match self {
            Region::Search => "search",
            Region::Lookup => "lookup",
            Region::Assistant => "assistant",
            Region::Saved => "saved",
            Region::Export => "export",
            Region::Input => "input",
        }
    }
}

/// Consumer of the colored graph and panel content
pub trait RenderSurface {
    /// Redraw after a highlight frame
    fn refresh(&mut self, graph: &CitationGraph, frame: &FrameSummary);

    /// Show the paper info panel
    fn show_paper(&mut self, id: &str, paper: &PaperRecord);

    fn show_text(&mut self, region: Region, text: &str);

    /// Inline error in `region`; the session stays interactive
    fn show_error(&mut self, region: Region, message: &str);
}

/// Plain-text surface over any writer
pub struct TerminalSurface<W: Write> {
    out: W,
    last_frame: Option<FrameSummary>,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out, last_frame: None }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text).and_then(|_| self.out.flush()) {
            warn!(error = %e, "Failed to write to terminal");
        }
    }
}

fn describe_frame(graph: &CitationGraph, frame: &FrameSummary) -> String {
    let Some(focus) = frame.focus else {
        return match frame.source {
            Some(_) => "focus: (paper not in graph)".to_string(),
            None => format!("focus: none ({} papers, {} citations)", graph.node_count(), graph.edge_count()),
        };
    };

    let node = graph.node(focus);
    let how = match frame.source {
        Some(FocusSource::Click) => "clicked",
        _ => "hovered",
    };

    let names = |role: NodeRole| {
        graph
            .nodes()
            .iter()
            .filter(|n| n.role == role)
            .map(|n| n.id.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "focus: {} [{}] {} ({})\n  cites ({}): {}\n  cited by ({}): {}",
        node.id,
        how,
        node.label,
        node.color,
        frame.downstream,
        names(NodeRole::Downstream),
        frame.upstream,
        names(NodeRole::Upstream),
    )
}

impl<W: Write> RenderSurface for TerminalSurface<W> {
    fn refresh(&mut self, graph: &CitationGraph, frame: &FrameSummary) {
        if self.last_frame.as_ref() == Some(frame) {
            return;
        }
        self.last_frame = Some(frame.clone());
        let text = describe_frame(graph, frame);
        self.emit(&text);
    }

    fn show_paper(&mut self, id: &str, paper: &PaperRecord) {
        let mut text = format!("== {} ({}) ==\n{}", paper.title, id, paper.author);
        if !paper.journal.is_empty() {
            text.push_str(&format!("\n{}", paper.journal));
        }
        text.push_str(&format!("\ncitations: {}", paper.citation_count));
        if !paper.summary.is_empty() {
            text.push_str(&format!("\n{}", format_summary(&paper.summary)));
        }
        self.emit(&text);
    }

    fn show_text(&mut self, region: Region, text: &str) {
        let text = format!("[{}] {}", region.as_str(), text);
        self.emit(&text);
    }

    fn show_error(&mut self, region: Region, message: &str) {
        let text = format!("[{}] error: {}", region.as_str(), message);
        self.emit(&text);
    }
}

/// What a `RecordingSurface` saw
#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    Refresh(FrameSummary),
    Paper(String),
    Text(Region, String),
    Error(Region, String),
}

/// Surface that records every call, for tests
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub events: Vec<SurfaceEvent>,
}

#[cfg(test)]
impl RecordingSurface {
    pub fn papers(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Paper(id) => Some(id.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self, region: Region) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Text(r, text) if *r == region => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self, region: Region) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Error(r, text) if *r == region => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
impl RenderSurface for RecordingSurface {
    fn refresh(&mut self, _graph: &CitationGraph, frame: &FrameSummary) {
        self.events.push(SurfaceEvent::Refresh(frame.clone()));
    }

    fn show_paper(&mut self, id: &str, _paper: &PaperRecord) {
        self.events.push(SurfaceEvent::Paper(id.to_string()));
    }

    fn show_text(&mut self, region: Region, text: &str) {
        self.events.push(SurfaceEvent::Text(region, text.to_string()));
    }

    fn show_error(&mut self, region: Region, message: &str) {
        self.events.push(SurfaceEvent::Error(region, message.to_string()));
    }
}

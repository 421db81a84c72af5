//! Interactive session
//!
//! One cooperative loop owns the graph, the focus store and the surface.
//! Frames, input lines, focus notifications and finished background tasks
//! are all handled on that loop, so nothing here needs a lock.

use crate::commands::{Command, HELP};
use crate::export::write_export;
use crate::lookup::{Services, TaskResult, TaskRunner};
use crate::panels::{InfoView, SavedPapers};
use crate::surface::{Region, RenderSurface};
use citemap_common::errors::{AppError, Result};
use citemap_common::generation::MIN_QUERY_CHARS;
use citemap_common::metrics;
use citemap_common::models::PaperCatalog;
use citemap_graph::retrieval::DEFAULT_SEARCH_LIMIT;
use citemap_graph::{
    search_titles, CitationGraph, FocusEvent, FocusState, FocusStore, FrameSummary, HighlightEngine, Palette,
};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

const DEFAULT_EXPORT_PATH: &str = "graph-export.json";

/// Whether the loop should keep going after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session<S: RenderSurface> {
    graph: CitationGraph,
    papers: Arc<PaperCatalog>,
    focus: FocusStore,
    focus_rx: watch::Receiver<FocusState>,
    engine: HighlightEngine,
    surface: S,
    info: InfoView,
    saved: SavedPapers,
    tasks: TaskRunner,
    results: mpsc::UnboundedReceiver<TaskResult>,
    frame_interval: Duration,
    export_path: PathBuf,
}

impl<S: RenderSurface> Session<S> {
    /// Take ownership of a fully built and positioned graph
    pub fn new(graph: CitationGraph, services: Services, palette: Palette, surface: S, frame_interval: Duration) -> Self {
        let focus = FocusStore::new();
        let focus_rx = focus.subscribe();
        let papers = services.papers.clone();
        let (tasks, results) = TaskRunner::new(services);

        Self {
            graph,
            papers,
            focus,
            focus_rx,
            engine: HighlightEngine::new(palette),
            surface,
            info: InfoView::default(),
            saved: SavedPapers::default(),
            tasks,
            results,
            frame_interval,
            export_path: PathBuf::from(DEFAULT_EXPORT_PATH),
        }
    }

    pub fn with_export_path(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.export_path = path;
        }
        self
    }

    pub fn focus(&self) -> &FocusStore {
        &self.focus
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Run until `quit`, end of input with no task pending, or `shutdown`
    pub async fn run<R, F>(&mut self, input: R, shutdown: F) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        F: Future<Output = ()>,
    {
        let mut lines = input.lines();
        let mut ticker = tokio::time::interval(self.frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        let mut input_open = true;
        info!(
            papers = self.papers.len(),
            frame_ms = self.frame_interval.as_millis() as u64,
            "Session started"
        );

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }
                _ = ticker.tick() => {
                    self.frame();
                }
                changed = self.focus_rx.changed() => {
                    if changed.is_ok() {
                        self.on_focus_changed();
                    }
                }
                Some(result) = self.results.recv() => {
                    self.on_task(result);
                }
                line = lines.next_line(), if input_open => {
                    match line? {
                        Some(line) => {
                            if self.handle_line(&line).await == Flow::Quit {
                                break;
                            }
                        }
                        None => {
                            debug!(pending = self.tasks.pending(), "Input closed");
                            input_open = false;
                        }
                    }
                }
            }

            if !input_open && self.tasks.pending() == 0 {
                break;
            }
        }

        // Make the surface reflect the final focus
        self.on_focus_changed();
        self.frame();

        info!("Session ended");
        Ok(())
    }

    /// One highlight frame followed by a refresh
    pub fn frame(&mut self) -> FrameSummary {
        let start = Instant::now();
        let state = self.focus.snapshot();
        let summary = self.engine.apply(&mut self.graph, &state);
        self.surface.refresh(&self.graph, &summary);
        metrics::record_frame(start.elapsed().as_secs_f64());
        summary
    }

    /// Update the info panel from the latest focus state
    pub fn on_focus_changed(&mut self) {
        let state = self.focus_rx.borrow_and_update().clone();
        if let Some(id) = self.info.observe(&state) {
            match self.papers.get(id) {
                Some(paper) => self.surface.show_paper(id, paper),
                None => debug!(paper = %id, "Focused id has no paper record"),
            }
        }
    }

    pub fn on_task(&mut self, result: TaskResult) {
        self.tasks.completed();

        match result {
            TaskResult::Lookup { query, result } => match result {
                Ok(Some(id)) => {
                    self.surface.show_text(Region::Lookup, &format!("\"{}\" -> {}", query, id));
                    // Applied like a click; the latest result wins
                    self.focus.dispatch(FocusEvent::ClickNode(id));
                }
                Ok(None) => self
                    .surface
                    .show_text(Region::Lookup, &format!("No paper matches \"{}\"", query)),
                Err(e) => self.surface.show_error(Region::Lookup, &e.user_message()),
            },
            TaskResult::Suggestion { id, result } => match result {
                Ok(text) => self.surface.show_text(Region::Assistant, &format!("Follow-ups for {}:\n{}", id, text)),
                Err(e) => self.surface.show_error(Region::Assistant, &e.user_message()),
            },
            TaskResult::Comparison { first, second, result } => match result {
                Ok(text) => self
                    .surface
                    .show_text(Region::Assistant, &format!("{} vs {}:\n{}", first, second, text)),
                Err(e) => self.surface.show_error(Region::Assistant, &e.user_message()),
            },
        }
    }

    /// Parse and execute one input line
    pub async fn handle_line(&mut self, line: &str) -> Flow {
        match Command::parse(line) {
            Ok(Some(command)) => self.handle_command(command).await,
            Ok(None) => Flow::Continue,
            Err(e) => {
                self.surface.show_error(Region::Input, &e.to_string());
                Flow::Continue
            }
        }
    }

    pub async fn handle_command(&mut self, command: Command) -> Flow {
        match command {
            Command::Enter(id) => self.dispatch(FocusEvent::EnterNode(id)),
            Command::Leave => self.dispatch(FocusEvent::LeaveNode),
            Command::Click(id) => self.dispatch(FocusEvent::ClickNode(id)),
            Command::Stage => self.dispatch(FocusEvent::ClickStage),
            Command::Select(id) => self.dispatch(FocusEvent::Select(id)),
            Command::Search(query) => self.search(&query),
            Command::Think(query) => {
                if query.trim().chars().count() < MIN_QUERY_CHARS {
                    debug!(%query, "Ignoring short lookup query");
                } else {
                    self.surface.show_text(Region::Lookup, "Thinking...");
                    self.tasks.lookup(query);
                }
            }
            Command::Suggest(id) => match self.target_paper(id) {
                Ok(id) => self.tasks.suggest(id),
                Err(e) => self.surface.show_error(Region::Assistant, &e.user_message()),
            },
            Command::Compare(first, second) => self.tasks.compare(first, second),
            Command::Save(id) => match self.target_paper(id) {
                Ok(id) => {
                    let text = if self.saved.add(&id) {
                        format!("Saved {}", id)
                    } else {
                        format!("{} is already saved", id)
                    };
                    self.surface.show_text(Region::Saved, &text);
                }
                Err(e) => self.surface.show_error(Region::Saved, &e.user_message()),
            },
            Command::Saved => self.list_saved(),
            Command::Export(path) => self.export(path).await,
            Command::Help => self.surface.show_text(Region::Input, HELP),
            Command::Quit => return Flow::Quit,
        }

        Flow::Continue
    }

    fn dispatch(&mut self, event: FocusEvent) {
        self.focus.dispatch(event);
    }

    /// Explicit id, else the paper on display
    fn target_paper(&self, id: Option<String>) -> Result<String> {
        let id = id
            .or_else(|| self.info.current().map(str::to_owned))
            .ok_or_else(|| AppError::Validation {
                message: "No paper selected".to_string(),
            })?;
        self.papers.require(&id)?;
        Ok(id)
    }

    fn search(&mut self, query: &str) {
        let hits = search_titles(&self.papers, query, DEFAULT_SEARCH_LIMIT);
        if hits.is_empty() {
            self.surface.show_text(Region::Search, &format!("No papers match \"{}\"", query));
            return;
        }

        let text = hits
            .iter()
            .map(|hit| format!("{}  {}", hit.id, hit.title))
            .collect::<Vec<_>>()
            .join("\n");
        self.surface.show_text(Region::Search, &text);
    }

    fn list_saved(&mut self) {
        if self.saved.is_empty() {
            self.surface.show_text(Region::Saved, "No saved papers");
            return;
        }

        let text = self
            .saved
            .ids()
            .iter()
            .map(|id| match self.papers.get(id) {
                Some(paper) => format!("{}  {}", id, paper.title),
                None => id.clone(),
            })
            .collect::<Vec<_>>()
            .join("\n");
        self.surface.show_text(Region::Saved, &text);
    }

    async fn export(&mut self, path: Option<PathBuf>) {
        let path = path.unwrap_or_else(|| self.export_path.clone());
        match write_export(&self.graph, &path).await {
            Ok(()) => self.surface.show_text(
                Region::Export,
                &format!("Wrote {} papers to {}", self.graph.node_count(), path.display()),
            ),
            Err(e) => self.surface.show_error(Region::Export, &e.user_message()),
        }
    }
}

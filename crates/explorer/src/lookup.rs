//! Background work for the session
//!
//! Semantic lookups and assistant requests may wait on the network for a
//! long time, so they run as spawned tasks and report back over a channel.

use citemap_common::embeddings::Embedder;
use citemap_common::errors::Result;
use citemap_common::generation::ResearchAssistant;
use citemap_common::metrics::LookupMetrics;
use citemap_common::models::PaperCatalog;
use citemap_graph::find_closest;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, instrument, warn};

/// Result of a finished background task
#[derive(Debug)]
pub enum TaskResult {
    /// Paper closest to a free-text description
    Lookup {
        query: String,
        result: Result<Option<String>>,
    },
    Suggestion {
        id: String,
        result: Result<String>,
    },
    Comparison {
        first: String,
        second: String,
        result: Result<String>,
    },
}

/// AI collaborators shared by all tasks
#[derive(Clone)]
pub struct Services {
    pub embedder: Arc<dyn Embedder>,
    pub assistant: ResearchAssistant,
    pub papers: Arc<PaperCatalog>,
}

impl Services {
    /// Expand the description into a hypothetical summary, embed it and
    /// return the closest paper
    #[instrument(skip(self))]
    pub async fn semantic_lookup(&self, query: &str) -> Result<Option<String>> {
        let metrics = LookupMetrics::start();

        let outcome = self.closest_to(query).await;

        match &outcome {
            Ok(Some(id)) => {
                debug!(paper = %id, "Semantic lookup matched");
                metrics.finish("matched");
            }
            Ok(None) => metrics.finish("no_match"),
            Err(e) => {
                warn!(error = %e, code = e.code().as_code(), "Semantic lookup failed");
                metrics.finish("error");
            }
        }

        outcome
    }

    async fn closest_to(&self, query: &str) -> Result<Option<String>> {
        let summary = self.assistant.hypothetical_summary(query).await?;
        let embedding = self.embedder.embed(&summary).await?;
        Ok(find_closest(&self.papers, &embedding).map(str::to_owned))
    }
}

/// Spawns background tasks that report on one channel
pub struct TaskRunner {
    services: Services,
    tx: mpsc::UnboundedSender<TaskResult>,
    pending: usize,
}

impl TaskRunner {
    pub fn new(services: Services) -> (Self, mpsc::UnboundedReceiver<TaskResult>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                services,
                tx,
                pending: 0,
            },
            rx,
        )
    }

    /// Tasks spawned but not yet reported back
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Call once for every received `TaskResult`
    pub fn completed(&mut self) {
        self.pending = self.pending.saturating_sub(1);
    }

    pub fn lookup(&mut self, query: String) {
        let services = self.services.clone();
        self.spawn(async move {
            let result = services.semantic_lookup(&query).await;
            TaskResult::Lookup { query, result }
        });
    }

    pub fn suggest(&mut self, id: String) {
        let services = self.services.clone();
        self.spawn(async move {
            let result = match services.papers.require(&id) {
                Ok(paper) => services.assistant.suggest_directions(paper).await,
                Err(e) => Err(e),
            };
            TaskResult::Suggestion { id, result }
        });
    }

    pub fn compare(&mut self, first: String, second: String) {
        let services = self.services.clone();
        self.spawn(async move {
            let papers = services
                .papers
                .require(&first)
                .and_then(|a| services.papers.require(&second).map(|b| (a, b)));
            let result = match papers {
                Ok((a, b)) => services.assistant.compare(a, b).await,
                Err(e) => Err(e),
            };
            TaskResult::Comparison { first, second, result }
        });
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: std::future::Future<Output = TaskResult> + Send + 'static,
    {
        self.pending += 1;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            // The receiver is gone only when the session has ended
            let _ = tx.send(task.await);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use citemap_common::embeddings::MockEmbedder;
    use citemap_common::errors::AppError;
    use citemap_common::generation::MockGenerator;
    use citemap_common::models::PaperRecord;

    fn services(papers: PaperCatalog) -> Services {
        Services {
            embedder: Arc::new(MockEmbedder::new(8)),
            assistant: ResearchAssistant::new(Arc::new(MockGenerator)),
            papers: Arc::new(papers),
        }
    }

    fn papers() -> PaperCatalog {
        let mut papers = PaperCatalog::new();
        papers.insert("A", PaperRecord::new("No vector"));
        papers.insert("B", PaperRecord::new("With vector").with_embedding(vec![0.3; 8]));
        papers
    }

    #[tokio::test]
    async fn test_lookup_finds_embedded_paper() {
        let found = services(papers()).semantic_lookup("bone loss in orbit").await.unwrap();
        assert_eq!(found.as_deref(), Some("B"));
    }

    #[tokio::test]
    async fn test_lookup_without_embeddings_finds_nothing() {
        let mut catalog = PaperCatalog::new();
        catalog.insert("A", PaperRecord::new("No vector"));
        let found = services(catalog).semantic_lookup("bone loss in orbit").await.unwrap();
        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn test_short_query_is_rejected() {
        let err = services(papers()).semantic_lookup("ab").await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_runner_reports_results() {
        let (mut runner, mut rx) = TaskRunner::new(services(papers()));

        runner.lookup("plants in microgravity".into());
        runner.compare("A".into(), "missing".into());
        assert_eq!(runner.pending(), 2);

        let mut seen_lookup = false;
        let mut seen_compare = false;
        for _ in 0..2 {
            match rx.recv().await.unwrap() {
                TaskResult::Lookup { result, .. } => {
                    assert_eq!(result.unwrap().as_deref(), Some("B"));
                    seen_lookup = true;
                }
                TaskResult::Comparison { result, .. } => {
                    assert!(matches!(result, Err(AppError::PaperNotFound { .. })));
                    seen_compare = true;
                }
                other => panic!("unexpected result {:?}", other),
            }
            runner.completed();
        }

        assert!(seen_lookup && seen_compare);
        assert_eq!(runner.pending(), 0);
    }
}

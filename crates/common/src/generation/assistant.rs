//! Research assistant prompts

use super::Generator;
use crate::errors::{AppError, Result};
use crate::models::{strip_emphasis, PaperRecord};
use std::sync::Arc;
use tracing::instrument;

/// Minimum trimmed length of a free-text concept query
pub const MIN_QUERY_CHARS: usize = 3;

/// Prompt builder around a `Generator`
#[derive(Clone)]
pub struct ResearchAssistant {
    generator: Arc<dyn Generator>,
}

impl ResearchAssistant {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self { generator }
    }

    /// Three follow-up approaches for a paper, as plain bullet text
    #[instrument(skip(self, paper), fields(title = %paper.title))]
    pub async fn suggest_directions(&self, paper: &PaperRecord) -> Result<String> {
        let prompt = format!(
            "Based on the following summary of a research paper, describe 3 approaches a follow up paper \
             could take. Answer in the form of 3 bullet points each describing a different approach, with \
             each bullet point under 500 characters. It will be displayed as plaintext, NO MARKDOWN. {}",
            paper.summary
        );

        let text = self.generator.generate(&prompt).await?;
        Ok(strip_emphasis(&text))
    }

    /// Key differences between two papers, as plain text
    #[instrument(skip(self, first, second), fields(first = %first.title, second = %second.title))]
    pub async fn compare(&self, first: &PaperRecord, second: &PaperRecord) -> Result<String> {
        let prompt = format!(
            "Based on the following summaries of two research papers, describe the key differences between \
             the two papers in 1000 characters or less of plaintext, NO MARKDOWN, use the names of the papers \
             you are talking about.\n\n\
             Paper 1: {}\nSummary: {}\n\n\
             Paper 2: {}\nSummary: {}",
            first.title, first.summary, second.title, second.summary
        );

        let text = self.generator.generate(&prompt).await?;
        Ok(strip_emphasis(&text))
    }

    /// Summary of a paper that could be written from `description`.
    ///
    /// Stored embeddings were computed from paper summaries, so a query is
    /// expanded into the same register before it is embedded.
    #[instrument(skip(self))]
    pub async fn hypothetical_summary(&self, description: &str) -> Result<String> {
        let description = description.trim();
        if description.chars().count() < MIN_QUERY_CHARS {
            return Err(AppError::Validation {
                message: format!("Query must be at least {} characters", MIN_QUERY_CHARS),
            });
        }

        let prompt = format!(
            "Please provide a summary in around 500 characters and have 3 bullet points of the biggest \
             takeaways for a paper that could be written based on the following description {}",
            description
        );

        self.generator.generate(&prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::MockGenerator;

    fn assistant() -> ResearchAssistant {
        ResearchAssistant::new(Arc::new(MockGenerator))
    }

    #[tokio::test]
    async fn test_suggest_strips_markdown() {
        let mut paper = PaperRecord::new("Bone loss");
        paper.summary = "Mice lost bone mass in orbit".into();

        let text = assistant().suggest_directions(&paper).await.unwrap();
        assert!(!text.contains('*'));
        assert!(text.contains("Mice lost bone mass in orbit"));
    }

    #[tokio::test]
    async fn test_compare_mentions_both_papers() {
        let mut first = PaperRecord::new("Bone loss");
        first.summary = "first".into();
        let mut second = PaperRecord::new("Muscle atrophy");
        second.summary = "second".into();

        let text = assistant().compare(&first, &second).await.unwrap();
        assert!(text.contains("Muscle atrophy"));
        assert!(!text.contains('*'));
    }

    #[tokio::test]
    async fn test_short_query_rejected() {
        let err = assistant().hypothetical_summary("  ab ").await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }
}

//! Text generation client
//!
//! Provides:
//! - A `Generator` trait over Gemini, OpenAI-compatible chat and mock backends
//! - The research assistant prompts (follow-up directions, paper comparison,
//!   hypothetical summaries for semantic lookup)

mod assistant;

pub use assistant::{ResearchAssistant, MIN_QUERY_CHARS};

use crate::config::GenerationConfig;
use crate::errors::{AppError, Result};
use crate::resilience::{classify_http_error, with_retry, Service};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Trait for free-form text generation
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a completion for a single prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Get the model name
    fn model_name(&self) -> &str;
}

fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::Internal {
            message: format!("Failed to create HTTP client: {}", e),
        })
}

async fn error_body(response: reqwest::Response) -> AppError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    AppError::GenerationError {
        message: format!("API error {}: {}", status, body),
    }
}

/// Gemini `generateContent` client
pub struct GeminiGenerator {
    client: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
    config: GenerationConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerateRequest<'a> {
    contents: [GeminiContent<'a>; 1],
    generation_config: GeminiGenerationConfig,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    role: &'static str,
    parts: [GeminiPart<'a>; 1],
}

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    max_output_tokens: usize,
    temperature: f32,
}

#[derive(Deserialize)]
struct GeminiGenerateResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiCandidateContent>,
}

#[derive(Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiCandidatePart>,
}

#[derive(Deserialize)]
struct GeminiCandidatePart {
    #[serde(default)]
    text: String,
}

impl GeminiGenerator {
    pub fn new(api_key: String, config: &GenerationConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(Duration::from_secs(config.timeout_secs))?,
            api_key,
            model: config.model.clone(),
            endpoint: config
                .endpoint
                .clone()
                .unwrap_or_else(|| "https://generativelanguage.googleapis.com/v1beta".to_string()),
            config: config.clone(),
        })
    }

    async fn make_request(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.endpoint, self.model);

        let request = GeminiGenerateRequest {
            contents: [GeminiContent {
                role: "user",
                parts: [GeminiPart { text: prompt }],
            }],
            generation_config: GeminiGenerationConfig {
                max_output_tokens: self.config.max_tokens,
                temperature: self.config.temperature,
            },
        };

        let response = self.client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                classify_http_error(e, Duration::from_secs(self.config.timeout_secs), Service::Generation)
            })?;

        if !response.status().is_success() {
            return Err(error_body(response).await);
        }

        let result: GeminiGenerateResponse = response.json().await.map_err(|e| {
            AppError::GenerationError {
                message: format!("Failed to parse response: {}", e),
            }
        })?;

        let text: String = result
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AppError::GenerationError {
                message: "Empty response from model".to_string(),
            });
        }

        Ok(text)
    }
}

#[async_trait]
impl Generator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        with_retry("gemini_generate", self.config.max_retries, || self.make_request(prompt)).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// OpenAI-compatible chat completions client
pub struct ChatGenerator {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    config: GenerationConfig,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: usize,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

impl ChatGenerator {
    pub fn new(api_key: String, config: &GenerationConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(Duration::from_secs(config.timeout_secs))?,
            api_key,
            endpoint: config
                .endpoint
                .clone()
                .unwrap_or_else(|| "https://api.openai.com/v1/chat/completions".to_string()),
            config: config.clone(),
        })
    }

    async fn make_request(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "You are a helpful research assistant.",
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let response = self.client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                classify_http_error(e, Duration::from_secs(self.config.timeout_secs), Service::Generation)
            })?;

        if !response.status().is_success() {
            return Err(error_body(response).await);
        }

        let chat_response: ChatResponse = response.json().await
            .map_err(|e| AppError::GenerationError {
                message: format!("Failed to parse LLM response: {}", e),
            })?;

        chat_response.choices.into_iter().next()
            .map(|c| c.message.content)
            .ok_or_else(|| AppError::GenerationError {
                message: "Empty response from LLM".to_string(),
            })
    }
}

#[async_trait]
impl Generator for ChatGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        with_retry("chat_generate", self.config.max_retries, || self.make_request(prompt)).await
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// Mock generator for development and tests.
///
/// Echoes the tail of the prompt so downstream code has stable input.
pub struct MockGenerator;

#[async_trait]
impl Generator for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let tail: String = prompt.chars().rev().take(200).collect::<Vec<_>>().into_iter().rev().collect();
        Ok(format!(
            "* Mock response [generation API key not configured]\n* {}",
            tail.trim()
        ))
    }

    fn model_name(&self) -> &str {
        "mock-generation"
    }
}

/// Create a generator based on configuration
pub fn create_generator(config: &GenerationConfig) -> Result<Arc<dyn Generator>> {
    let key = config.api_key.clone().filter(|k| !k.is_empty());

    match (config.provider.as_str(), key) {
        ("gemini", Some(key)) => Ok(Arc::new(GeminiGenerator::new(key, config)?)),
        ("openai", Some(key)) => Ok(Arc::new(ChatGenerator::new(key, config)?)),
        ("mock", _) => Ok(Arc::new(MockGenerator)),
        ("gemini", None) | ("openai", None) => Err(AppError::Configuration {
            message: format!("{} generation provider requires generation.api_key", config.provider),
        }),
        (other, _) => {
            tracing::warn!(provider = other, "Unknown generation provider, using mock");
            Ok(Arc::new(MockGenerator))
        }
    }
}

//! Configuration management for Citemap
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config.toml, config.yaml)
//! - Default values

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Paper data configuration
    #[serde(default)]
    pub data: DataConfig,

    /// Initial layout configuration
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Highlight loop configuration
    #[serde(default)]
    pub highlight: HighlightConfig,

    /// Embedding service configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Text generation service configuration
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataConfig {
    /// Adjacency-list JSON file (paper id -> record)
    #[serde(default = "default_papers_path")]
    pub papers_path: PathBuf,

    /// Where `export` writes the positioned graph when no path is given
    pub export_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LayoutConfig {
    /// Vertical distance between two generations
    #[serde(default = "default_generation_gap")]
    pub generation_gap: f64,

    /// Horizontal distance between neighbours of one generation
    #[serde(default = "default_spacing")]
    pub spacing: f64,

    /// Width of the uniform horizontal jitter window
    #[serde(default = "default_jitter")]
    pub jitter: f64,

    /// Seed for the jitter generator
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Node size at zero citations
    #[serde(default = "default_base_node_size")]
    pub base_node_size: f64,

    /// Size added per accepted citation
    #[serde(default = "default_size_per_citation")]
    pub size_per_citation: f64,

    /// Force relaxation iteration budget (0 disables relaxation)
    #[serde(default = "default_force_iterations")]
    pub force_iterations: usize,

    /// Repulsion scaling
    #[serde(default = "default_scaling_ratio")]
    pub scaling_ratio: f64,

    /// Pull toward the origin
    #[serde(default = "default_gravity")]
    pub gravity: f64,

    /// Logarithmic attraction along edges
    #[serde(default = "default_lin_log")]
    pub lin_log: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HighlightConfig {
    /// Target frames per second for the highlight loop
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,

    /// Colors used by the highlight engine
    #[serde(default)]
    pub palette: PaletteConfig,
}

/// Hex colors (`#rrggbbaa`) for every visual role
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PaletteConfig {
    #[serde(default = "default_idle_edge")]
    pub idle_edge: String,
    #[serde(default = "default_dimmed_edge_clicked")]
    pub dimmed_edge_clicked: String,
    #[serde(default = "default_dimmed_edge_hovered")]
    pub dimmed_edge_hovered: String,
    #[serde(default = "default_base_node")]
    pub base_node: String,
    #[serde(default = "default_label")]
    pub label: String,
    #[serde(default = "default_downstream")]
    pub downstream: String,
    #[serde(default = "default_active_edge")]
    pub active_edge: String,
    #[serde(default = "default_upstream")]
    pub upstream: String,
    #[serde(default = "default_clicked_focus")]
    pub clicked_focus: String,
    #[serde(default = "default_clicked_focus_label")]
    pub clicked_focus_label: String,
    #[serde(default = "default_hovered_focus")]
    pub hovered_focus: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    /// Embedding provider: gemini, openai, mock
    #[serde(default = "default_embedding_provider")]
    pub provider: String,

    /// API key for embedding service
    pub api_key: Option<String>,

    /// API base URL (for custom endpoints)
    pub api_base: Option<String>,

    /// Model to use
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Embedding dimension
    #[serde(default = "default_embedding_dimension")]
    pub dimension: usize,

    /// Request timeout in seconds
    #[serde(default = "default_service_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries
    #[serde(default = "default_service_retries")]
    pub max_retries: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerationConfig {
    /// Generation provider: gemini, openai, mock
    #[serde(default = "default_generation_provider")]
    pub provider: String,

    /// API key
    pub api_key: Option<String>,

    /// API endpoint override
    pub endpoint: Option<String>,

    /// Model name
    #[serde(default = "default_generation_model")]
    pub model: String,

    /// Timeout in seconds
    #[serde(default = "default_service_timeout")]
    pub timeout_secs: u64,

    /// Maximum output tokens
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// Sampling temperature (0.0 - 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum retries
    #[serde(default = "default_service_retries")]
    pub max_retries: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default = "default_json_logging")]
    pub json_logging: bool,

    /// Prometheus exporter port (0 to disable)
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,

    /// Service name for tracing
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

// Default value functions
fn default_papers_path() -> PathBuf { PathBuf::from("data/adjacency-list.json") }
fn default_generation_gap() -> f64 { 150.0 }
fn default_spacing() -> f64 { 10.0 }
fn default_jitter() -> f64 { 4000.0 }
fn default_seed() -> u64 { 42 }
fn default_base_node_size() -> f64 { 5.0 }
fn default_size_per_citation() -> f64 { 0.25 }
fn default_force_iterations() -> usize { 10 }
fn default_scaling_ratio() -> f64 { 2.0 }
fn default_gravity() -> f64 { 1.0 }
fn default_lin_log() -> bool { true }
fn default_frame_rate() -> u32 { 60 }
fn default_idle_edge() -> String { "#121212ff".to_string() }
fn default_dimmed_edge_clicked() -> String { "#212121ff".to_string() }
fn default_dimmed_edge_hovered() -> String { "#0000002a".to_string() }
fn default_base_node() -> String { "#0077cc32".to_string() }
fn default_label() -> String { "#ffffff".to_string() }
fn default_downstream() -> String { "#ffb62dff".to_string() }
fn default_active_edge() -> String { "#ffa500".to_string() }
fn default_upstream() -> String { "#e32cffff".to_string() }
fn default_clicked_focus() -> String { "#f2ff00ff".to_string() }
fn default_clicked_focus_label() -> String { "#000000".to_string() }
fn default_hovered_focus() -> String { "#84f1ffff".to_string() }
fn default_embedding_provider() -> String { "gemini".to_string() }
fn default_embedding_model() -> String { crate::DEFAULT_EMBEDDING_MODEL.to_string() }
fn default_embedding_dimension() -> usize { crate::DEFAULT_EMBEDDING_DIMENSION }
fn default_generation_provider() -> String { "gemini".to_string() }
fn default_generation_model() -> String { crate::DEFAULT_GENERATION_MODEL.to_string() }
fn default_service_timeout() -> u64 { 30 }
fn default_service_retries() -> u32 { 3 }
fn default_max_tokens() -> usize { 1000 }
fn default_temperature() -> f32 { 0.7 }
fn default_log_level() -> String { "info".to_string() }
fn default_json_logging() -> bool { false }
fn default_metrics_port() -> u16 { 0 }
fn default_service_name() -> String { "citemap".to_string() }

impl AppConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Load base config file
            .add_source(File::with_name("config/default").required(false))

            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))

            // Load local overrides
            .add_source(File::with_name("config/local").required(false))

            // Load from environment variables with APP__ prefix
            // e.g., APP__LAYOUT__SEED=7
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
            )

            .build()?;

        config.try_deserialize()
    }

    /// Load from a specific TOML file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
            )
            .build()?;

        config.try_deserialize()
    }

    /// Time budget of one highlight frame
    pub fn frame_interval(&self) -> Duration {
        let rate = self.highlight.frame_rate.max(1);
        Duration::from_secs_f64(1.0 / rate as f64)
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            papers_path: default_papers_path(),
            export_path: None,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            generation_gap: default_generation_gap(),
            spacing: default_spacing(),
            jitter: default_jitter(),
            seed: default_seed(),
            base_node_size: default_base_node_size(),
            size_per_citation: default_size_per_citation(),
            force_iterations: default_force_iterations(),
            scaling_ratio: default_scaling_ratio(),
            gravity: default_gravity(),
            lin_log: default_lin_log(),
        }
    }
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            palette: PaletteConfig::default(),
        }
    }
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            idle_edge: default_idle_edge(),
            dimmed_edge_clicked: default_dimmed_edge_clicked(),
            dimmed_edge_hovered: default_dimmed_edge_hovered(),
            base_node: default_base_node(),
            label: default_label(),
            downstream: default_downstream(),
            active_edge: default_active_edge(),
            upstream: default_upstream(),
            clicked_focus: default_clicked_focus(),
            clicked_focus_label: default_clicked_focus_label(),
            hovered_focus: default_hovered_focus(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            api_key: None,
            api_base: None,
            model: default_embedding_model(),
            dimension: default_embedding_dimension(),
            timeout_secs: default_service_timeout(),
            max_retries: default_service_retries(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: default_generation_provider(),
            api_key: None,
            endpoint: None,
            model: default_generation_model(),
            timeout_secs: default_service_timeout(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            max_retries: default_service_retries(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: default_json_logging(),
            metrics_port: default_metrics_port(),
            service_name: default_service_name(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            layout: LayoutConfig::default(),
            highlight: HighlightConfig::default(),
            embedding: EmbeddingConfig::default(),
            generation: GenerationConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.layout.generation_gap, 150.0);
        assert_eq!(config.layout.force_iterations, 10);
        assert_eq!(config.embedding.model, "gemini-embedding-001");
        assert_eq!(config.highlight.palette.upstream, "#e32cffff");
    }

    #[test]
    fn test_frame_interval() {
        let mut config = AppConfig::default();
        assert!(config.frame_interval() <= Duration::from_millis(17));

        config.highlight.frame_rate = 0;
        assert_eq!(config.frame_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_partial_sections_deserialize() {
        let config: AppConfig = serde_json::from_str(r#"{"layout": {"seed": 7}}"#).unwrap();
        assert_eq!(config.layout.seed, 7);
        assert_eq!(config.layout.spacing, 10.0);
        assert_eq!(config.observability.service_name, "citemap");
    }
}

//! Citemap Common Library
//!
//! Shared code for the Citemap crates including:
//! - Paper records and adjacency-list loading
//! - Embedding client abstraction
//! - Text generation client (follow-up ideas, paper comparison)
//! - Error types and handling
//! - Configuration management
//! - Metrics and observability

pub mod config;
pub mod embeddings;
pub mod errors;
pub mod generation;
pub mod metrics;
pub mod models;
pub mod resilience;

// Re-export commonly used types
pub use errors::{AppError, Result};
pub use config::AppConfig;
pub use embeddings::Embedder;
pub use generation::Generator;
pub use models::{PaperCatalog, PaperRecord};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default embedding model
pub const DEFAULT_EMBEDDING_MODEL: &str = "gemini-embedding-001";

/// Default embedding dimension
pub const DEFAULT_EMBEDDING_DIMENSION: usize = 3072;

/// Default text generation model
pub const DEFAULT_GENERATION_MODEL: &str = "gemini-2.5-flash-lite";

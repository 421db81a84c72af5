//! Error types for Citemap
//!
//! Only failures that cross a process boundary become an `AppError`:
//! - Data files that cannot be read or parsed
//! - Embedding and text generation service failures
//! - Configuration problems
//!
//! Unknown references, cycle-forming citations and stale focus ids are
//! absorbed where they occur and never reach this type.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (1xxx)
    ValidationError,

    // Data errors (4xxx)
    DataLoadError,
    PaperNotFound,

    // External service errors (8xxx)
    UpstreamError,
    EmbeddingError,
    EmbeddingTimeout,
    GenerationError,

    // Internal errors (9xxx)
    InternalError,
    ConfigurationError,
    SerializationError,
    IoError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn as_code(&self) -> u16 {
        match self {
            ErrorCode::ValidationError => 1001,

            ErrorCode::DataLoadError => 4001,
            ErrorCode::PaperNotFound => 4002,

            ErrorCode::UpstreamError => 8001,
            ErrorCode::EmbeddingError => 8002,
            ErrorCode::EmbeddingTimeout => 8003,
            ErrorCode::GenerationError => 8004,

            ErrorCode::InternalError => 9001,
            ErrorCode::ConfigurationError => 9002,
            ErrorCode::SerializationError => 9003,
            ErrorCode::IoError => 9004,
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Failed to load paper data from {path}: {message}")]
    DataLoad { path: String, message: String },

    #[error("Paper not found: {id}")]
    PaperNotFound { id: String },

    // External service errors
    #[error("Embedding service error: {message}")]
    EmbeddingError { message: String },

    #[error("Embedding timeout after {timeout_ms}ms")]
    EmbeddingTimeout { timeout_ms: u64 },

    #[error("Text generation error: {message}")]
    GenerationError { message: String },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    // Internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { .. } => ErrorCode::ValidationError,
            AppError::DataLoad { .. } => ErrorCode::DataLoadError,
            AppError::PaperNotFound { .. } => ErrorCode::PaperNotFound,
            AppError::EmbeddingError { .. } => ErrorCode::EmbeddingError,
            AppError::EmbeddingTimeout { .. } => ErrorCode::EmbeddingTimeout,
            AppError::GenerationError { .. } => ErrorCode::GenerationError,
            AppError::HttpClient(_) => ErrorCode::UpstreamError,
            AppError::Internal { .. } => ErrorCode::InternalError,
            AppError::Configuration { .. } => ErrorCode::ConfigurationError,
            AppError::Serialization(_) => ErrorCode::SerializationError,
            AppError::Io(_) => ErrorCode::IoError,
            AppError::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Whether a client may retry the call that produced this error
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::EmbeddingTimeout { .. } => true,
            AppError::HttpClient(e) => e.is_timeout() || e.is_connect(),
            AppError::EmbeddingError { .. } | AppError::GenerationError { .. } => true,
            _ => false,
        }
    }

    /// Short text suitable for an inline message in the UI
    pub fn user_message(&self) -> String {
        match self {
            AppError::EmbeddingError { .. }
            | AppError::EmbeddingTimeout { .. }
            | AppError::HttpClient(_) => {
                "Semantic lookup is unavailable right now, please try again.".to_string()
            }
            AppError::GenerationError { .. } => {
                "The assistant could not produce a response.".to_string()
            }
            AppError::PaperNotFound { id } => format!("No paper with id {}", id),
            other => other.to_string(),
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration {
            message: err.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        let err = AppError::PaperNotFound { id: "PMC1".into() };
        assert_eq!(err.code(), ErrorCode::PaperNotFound);
        assert_eq!(err.code().as_code(), 4002);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_external_errors() {
        let err = AppError::EmbeddingTimeout { timeout_ms: 30_000 };
        assert_eq!(err.code().as_code(), 8003);
        assert!(err.is_retryable());

        let err = AppError::GenerationError { message: "quota".into() };
        assert!(err.is_retryable());
        assert_eq!(err.user_message(), "The assistant could not produce a response.");
    }

    #[test]
    fn test_internal_error_not_retryable() {
        let err = AppError::Internal {
            message: "Something went wrong".into()
        };
        assert_eq!(err.code(), ErrorCode::InternalError);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_io_error_conversion() {
        let err: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert!(matches!(err, AppError::Io(_)));
        assert_eq!(err.code().as_code(), 9004);
    }
}

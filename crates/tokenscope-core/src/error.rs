//! Centralized error types for Tokenscope.

use thiserror::Error;

/// Main error type for Tokenscope operations.
#[derive(Error, Debug)]
pub enum ScopeError {
    #[error("Extraction not found: {0}")]
    ExtractionNotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Crawl failed for {url}: {reason}")]
    CrawlFailed { url: String, reason: String },

    #[error("No design tokens found in CSS for {0}")]
    EmptyCss(String),

    #[error("Strategy error: {0}")]
    Strategy(String),

    #[error("Database error: {0}")]
    Database(#[from] tokenscope_db::DbError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config file error: {0}")]
    ConfigFile(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for Tokenscope operations.
pub type ScopeResult<T> = Result<T, ScopeError>;

impl ScopeError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a crawl error.
    pub fn crawl(url: &str, reason: impl Into<String>) -> Self {
        Self::CrawlFailed {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}

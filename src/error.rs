//! Error types for the search bridge

use thiserror::Error;

/// Result type alias using the bridge's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the search bridge
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (fatal at startup)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Tool-call body was missing, not JSON, or not a JSON object
    #[error("Invalid request")]
    InvalidRequest,

    /// Tool-call named a tool this server does not expose
    #[error("Unknown tool name")]
    UnknownTool(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// LLM API error
    #[error("LLM API error: {0}")]
    Llm(String),

    /// Search provider error
    #[error("Search provider error: {0}")]
    Search(String),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unauthorized access
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    /// Timeout error
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(e) => e.is_timeout() || e.is_connect(),
            Error::RateLimit(_) | Error::Timeout(_) => true,
            _ => false,
        }
    }

    /// Check if error is a client error (caller's fault)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidRequest | Error::UnknownTool(_) | Error::InvalidInput(_)
        )
    }
}

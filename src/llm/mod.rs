//! LLM capability - the language model used for query extraction
//!
//! The rest of the crate only sees the [`LanguageModel`] trait, which lets
//! tests swap in a stub and keeps backend choice in one place.
//!
//! - **client**: `AnthropicClient`, a Messages API client
//! - **types**: request/response wire types for the Messages API

mod client;
mod types;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{Config, ProviderKind};
use crate::error::Result;

pub use client::AnthropicClient;
pub use types::{ContentBlock, Message, MessageRequest, MessageResponse, Usage};

/// A single-turn completion request
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System prompt
    pub system: String,
    /// User message
    pub user: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        CompletionRequest {
            system: system.into(),
            user: user.into(),
            temperature: 1.0,
            max_tokens: 1024,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Text completion backend
///
/// Fails with `Error::Unauthorized` on bad credentials and with
/// `Error::Http`/`Error::Llm` on transport or API errors.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Short backend identifier for logs
    fn name(&self) -> &str;

    /// Run one completion and return the concatenated text output
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

/// Build the configured LLM backend
///
/// Fails with `Error::Config` when the credential is missing.
pub fn from_config(config: &Config) -> Result<Arc<dyn LanguageModel>> {
    config.validate()?;

    match config.llm.provider {
        ProviderKind::Claude => Ok(Arc::new(AnthropicClient::new(config.llm.clone())?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_completion_request_builder() {
        let request = CompletionRequest::new("sys", "hello")
            .with_temperature(0.1)
            .with_max_tokens(1000);
        assert_eq!(request.system, "sys");
        assert_eq!(request.user, "hello");
        assert_eq!(request.temperature, 0.1);
        assert_eq!(request.max_tokens, 1000);
    }

    #[test]
    fn test_from_config_requires_credential() {
        let empty: HashMap<String, String> = HashMap::new();
        let config = Config::from_lookup(|k| empty.get(k).cloned()).unwrap();
        assert!(matches!(from_config(&config), Err(crate::Error::Config(_))));
    }

    #[test]
    fn test_from_config_builds_claude() {
        let config = Config::from_lookup(|k| {
            (k == "CLAUDE_API_KEY").then(|| "sk-test".to_string())
        })
        .unwrap();
        let llm = from_config(&config).unwrap();
        assert_eq!(llm.name(), "claude");
    }
}

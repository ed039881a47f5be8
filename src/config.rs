//! Configuration management for the search bridge
//!
//! Loads configuration from environment variables (and a `.env` file if
//! present). Configuration is read once at startup and never mutated.

use crate::{Error, Result};
use secrecy::{ExposeSecret, SecretString};
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Model used for query extraction unless `CLAUDE_MODEL` overrides it
pub const DEFAULT_CLAUDE_MODEL: &str = "claude-3-5-sonnet-20240620";

/// Default Anthropic API base URL
pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";

/// Default DuckDuckGo Instant Answer endpoint
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://api.duckduckgo.com";

/// Default tool server base URL for client binaries
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

/// LLM backend used for query extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    /// Anthropic Claude via the Messages API
    #[default]
    Claude,
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "claude" | "anthropic" => Ok(ProviderKind::Claude),
            _ => Err(Error::Config(format!(
                "Unsupported LLM provider: {}. Valid options: claude",
                s
            ))),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::Claude => write!(f, "claude"),
        }
    }
}

/// LLM configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Which backend to talk to
    pub provider: ProviderKind,
    /// API key (`CLAUDE_API_KEY`)
    pub api_key: SecretString,
    /// Model name
    pub model: String,
    /// Base URL for the Messages API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Search provider configuration
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Instant Answer endpoint
    pub endpoint: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Advisory cap on results per query
    pub max_results: usize,
}

impl SearchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Listen port
    pub port: u16,
}

/// Settings for binaries that talk to a running tool server
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Tool server base URL (`MCP_SERVER_URL`)
    pub server_url: String,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level filter
    pub level: String,
    /// Log format (pretty, json)
    pub format: String,
}

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// LLM settings
    pub llm: LlmConfig,
    /// Search provider settings
    pub search: SearchConfig,
    /// HTTP server settings
    pub server: ServerConfig,
    /// Client settings
    pub client: ClientConfig,
    /// Logging settings
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Does not check the LLM credential; call [`Config::validate`] before
    /// constructing anything that talks to the LLM.
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let llm_base_url = var("ANTHROPIC_BASE_URL", DEFAULT_ANTHROPIC_BASE_URL);
        let search_endpoint = var("SEARCH_ENDPOINT", DEFAULT_SEARCH_ENDPOINT);
        let server_url = var("MCP_SERVER_URL", DEFAULT_SERVER_URL);

        for (key, value) in [
            ("ANTHROPIC_BASE_URL", &llm_base_url),
            ("SEARCH_ENDPOINT", &search_endpoint),
            ("MCP_SERVER_URL", &server_url),
        ] {
            Url::parse(value)
                .map_err(|e| Error::Config(format!("{} is not a valid URL ({}): {}", key, value, e)))?;
        }

        Ok(Config {
            llm: LlmConfig {
                provider: var("LLM_PROVIDER", "claude").parse()?,
                api_key: SecretString::from(var("CLAUDE_API_KEY", "")),
                model: var("CLAUDE_MODEL", DEFAULT_CLAUDE_MODEL),
                base_url: llm_base_url.trim_end_matches('/').to_string(),
                timeout_secs: parse_var(&lookup, "LLM_TIMEOUT_SECS", 15)?,
            },
            search: SearchConfig {
                endpoint: search_endpoint,
                timeout_secs: parse_var(&lookup, "SEARCH_TIMEOUT_SECS", 5)?,
                max_results: parse_var(&lookup, "SEARCH_MAX_RESULTS", 10)?,
            },
            server: ServerConfig {
                host: var("HOST", "0.0.0.0"),
                port: parse_var(&lookup, "PORT", 8000)?,
            },
            client: ClientConfig {
                server_url: server_url.trim_end_matches('/').to_string(),
            },
            log: LogConfig {
                level: var("RUST_LOG", "info,mcp_search_bridge=debug"),
                format: var("LOG_FORMAT", "pretty"),
            },
        })
    }

    /// Validate that all required configuration is present
    pub fn validate(&self) -> Result<()> {
        if self.llm.api_key.expose_secret().trim().is_empty() {
            return Err(Error::Config(
                "CLAUDE_API_KEY environment variable is not set".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {} ({})", key, raw, e))),
        _ => Ok(default),
    }
}

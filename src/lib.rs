//! # MCP Search Bridge
//!
//! Exposes web search to LLM agents as an MCP-style tool over HTTP.
//!
//! ## Features
//!
//! - **Tool server:** `/health`, `/` and `/tool_call` on axum
//! - **Web search:** DuckDuckGo Instant Answer API, degraded to empty results on failure
//! - **Query extraction:** Claude turns free text into discrete search queries,
//!   falling back to the text itself
//! - **Client:** health probe and tool calls against a running server

pub mod config;
pub mod error;
pub mod llm;
pub mod logging;
pub mod mcp;
pub mod search;
pub mod server;

pub use config::Config;
pub use error::{Error, Result};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const NAME: &str = env!("CARGO_PKG_NAME");

//! MCP (Model Context Protocol) tool bridge
//!
//! Exposes web search to LLM agents as a single callable tool,
//! `fetch_web_content`.
//!
//! ## Architecture
//!
//! - **protocol**: Tool-call wire types and the service descriptor
//! - **extractor**: LLM-assisted extraction of search queries from free text
//! - **bridge**: Validated tool call -> search -> response
//! - **client**: HTTP client for a running tool server
//!
//! ## Usage
//!
//! ```rust,no_run
//! use mcp_search_bridge::mcp::{ToolBridge, ToolCallRequest};
//! use mcp_search_bridge::Config;
//!
//! # async fn example() -> mcp_search_bridge::Result<()> {
//! let config = Config::from_env()?;
//! let bridge = ToolBridge::from_config(&config)?;
//!
//! let response = bridge
//!     .handle(&ToolCallRequest::fetch_web_content("Eiffel Tower"))
//!     .await;
//! println!("{}", serde_json::to_string(&response)?);
//! # Ok(())
//! # }
//! ```

mod bridge;
mod client;
mod extractor;
mod protocol;

pub use bridge::{ToolBridge, NO_QUERY_PROVIDED};
pub use client::ToolServerClient;
pub use extractor::{ExtractionOutcome, ExtractionSource, QueryExtractor, EXTRACTION_PROMPT};
pub use protocol::{
    EndpointInfo, ServiceDescriptor, ToolCallEnvelope, ToolCallRequest, ToolCallResponse,
    ToolDescriptor, ToolName,
};

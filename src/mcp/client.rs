//! HTTP client for a running tool server
//!
//! Used by agent-side binaries to probe `/health` and issue tool calls.

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::protocol::{ServiceDescriptor, ToolCallEnvelope, ToolCallRequest, ToolCallResponse};
use crate::error::{Error, Result};

/// Timeout for the health probe
const HEALTH_TIMEOUT: Duration = Duration::from_secs(2);

/// Timeout for tool calls (covers the server's own outbound search)
const CALL_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for the tool server's HTTP surface
#[derive(Clone)]
pub struct ToolServerClient {
    client: Client,
    base_url: String,
}

impl ToolServerClient {
    /// Create a client for the server at `base_url`
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(CALL_TIMEOUT)
            .user_agent(concat!("mcp-search-bridge/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(ToolServerClient {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `true` only if `GET /health` answers 200 within the probe timeout
    pub async fn health(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        match self.client.get(&url).timeout(HEALTH_TIMEOUT).send().await {
            Ok(response) => response.status() == StatusCode::OK,
            Err(e) => {
                debug!(url = %url, error = %e, "Health check failed");
                false
            }
        }
    }

    /// Fetch the service descriptor from `GET /`
    pub async fn info(&self) -> Result<ServiceDescriptor> {
        let url = format!("{}/", self.base_url);
        let response = self.client.get(&url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }

    /// Run `fetch_web_content` for `query`
    pub async fn fetch_web_content(&self, query: &str) -> Result<ToolCallResponse> {
        self.call_tool(&ToolCallRequest::fetch_web_content(query)).await
    }

    /// POST a tool call and unwrap the `{"results": ...}` envelope
    ///
    /// A 400 from the server comes back as `Error::InvalidInput` carrying
    /// the server's message.
    pub async fn call_tool(&self, request: &ToolCallRequest) -> Result<ToolCallResponse> {
        let url = format!("{}/tool_call", self.base_url);
        debug!(url = %url, tool = %request.tool, "Calling tool");

        let response = self.client.post(&url).json(&request.to_body()).send().await?;
        let status = response.status();

        if status == StatusCode::BAD_REQUEST {
            let body: ErrorBody = response.json().await?;
            return Err(Error::InvalidInput(body.error));
        }

        let envelope: ToolCallEnvelope = response.error_for_status()?.json().await?;
        Ok(envelope.results)
    }
}

//! DuckDuckGo search provider
//!
//! Uses the Instant Answer API (no API key required). The API returns at
//! most one abstract per query, so this provider yields zero or one result.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use super::types::{SearchQuery, SearchResult};
use super::SearchProvider;
use crate::config::SearchConfig;
use crate::error::{Error, Result};

/// Query string sent to the Instant Answer API
#[derive(Debug, Serialize)]
struct InstantAnswerRequest<'a> {
    q: &'a str,
    format: &'static str,
    no_html: u8,
    skip_disambig: u8,
}

impl<'a> InstantAnswerRequest<'a> {
    fn new(q: &'a str) -> Self {
        InstantAnswerRequest {
            q,
            format: "json",
            no_html: 1,
            skip_disambig: 1,
        }
    }
}

/// DuckDuckGo Instant Answer API response (only the fields we read)
#[derive(Debug, Default, Deserialize)]
struct InstantAnswerResponse {
    #[serde(rename = "Abstract", default)]
    abstract_: Option<String>,
    #[serde(rename = "AbstractText", default)]
    abstract_text: Option<String>,
    #[serde(rename = "AbstractURL", default)]
    abstract_url: Option<String>,
    #[serde(rename = "AbstractSource", default)]
    abstract_source: Option<String>,
    #[serde(rename = "Heading", default)]
    heading: Option<String>,
}

impl InstantAnswerResponse {
    fn into_result(self) -> Option<SearchResult> {
        let description = self
            .abstract_
            .filter(|s| !s.is_empty())
            .or(self.abstract_text.filter(|s| !s.is_empty()))?;

        let title = self
            .heading
            .filter(|s| !s.is_empty())
            .or(self.abstract_source)
            .unwrap_or_default();

        Some(SearchResult {
            title,
            url: self.abstract_url.unwrap_or_default(),
            description,
        })
    }
}

/// DuckDuckGo search provider
pub struct DuckDuckGoSearch {
    client: Client,
    endpoint: String,
}

impl DuckDuckGoSearch {
    /// Create a provider against `endpoint` with a request timeout
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mcp-search-bridge/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(DuckDuckGoSearch {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Create from configuration
    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        Self::new(config.endpoint.clone(), config.timeout())
    }

    async fn try_search(&self, query: &str) -> Result<Option<SearchResult>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&InstantAnswerRequest::new(query))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Search(format!(
                "DuckDuckGo search failed with status {}",
                status
            )));
        }

        let body = response.bytes().await?;
        let answer: InstantAnswerResponse = serde_json::from_slice(&body)?;

        Ok(answer.into_result())
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoSearch {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    async fn search(&self, query: &SearchQuery, limit: usize) -> Vec<SearchResult> {
        match self.try_search(query.as_str()).await {
            Ok(result) => {
                let results: Vec<SearchResult> = result.into_iter().take(limit).collect();
                debug!(query = %query, count = results.len(), "DuckDuckGo search complete");
                results
            }
            Err(e) => {
                warn!(
                    query = %query,
                    error = %e,
                    retryable = e.is_retryable(),
                    "Error searching web"
                );
                Vec::new()
            }
        }
    }
}

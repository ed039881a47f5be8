//! Tool-call bridge
//!
//! Turns a validated [`ToolCallRequest`] into a search and wraps the
//! results. Every failure inside becomes data in the response; nothing
//! escapes to the transport layer.

use std::sync::Arc;
use tracing::{debug, info};

use super::extractor::{ExtractionOutcome, QueryExtractor};
use super::protocol::{ToolCallRequest, ToolCallResponse, ToolName};
use crate::config::Config;
use crate::error::Result;
use crate::search::{DuckDuckGoSearch, SearchProvider};

/// Error text returned when `parameters.query` is missing or blank
pub const NO_QUERY_PROVIDED: &str = "No query provided";

/// Default advisory result cap per query
const DEFAULT_MAX_RESULTS: usize = 10;

/// Routes tool calls to the search provider
///
/// Holds the capability handles built once at startup. Cheap to share
/// behind an `Arc`; no state changes after construction.
pub struct ToolBridge {
    search: Arc<dyn SearchProvider>,
    extractor: QueryExtractor,
    max_results: usize,
}

impl ToolBridge {
    pub fn new(search: Arc<dyn SearchProvider>, extractor: QueryExtractor) -> Self {
        ToolBridge {
            search,
            extractor,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Build the production bridge: Claude for extraction, DuckDuckGo for search
    ///
    /// Fails with `Error::Config` when the LLM credential is missing, so a
    /// misconfigured server never starts.
    pub fn from_config(config: &Config) -> Result<Self> {
        let extractor = QueryExtractor::from_config(config)?;
        let search = DuckDuckGoSearch::from_config(&config.search)?;

        info!(
            llm = %config.llm.provider,
            model = %config.llm.model,
            search = search.name(),
            "Tool bridge initialized"
        );

        Ok(ToolBridge::new(Arc::new(search), extractor).with_max_results(config.search.max_results))
    }

    /// Handle one tool call
    pub async fn handle(&self, request: &ToolCallRequest) -> ToolCallResponse {
        match request.tool {
            ToolName::FetchWebContent => self.fetch_web_content(request).await,
        }
    }

    /// Extract search queries from unstructured text
    pub async fn extract_queries(&self, message: &str) -> ExtractionOutcome {
        self.extractor.extract(message).await
    }

    async fn fetch_web_content(&self, request: &ToolCallRequest) -> ToolCallResponse {
        let Some(query) = request.query() else {
            debug!(tool = %request.tool, "Tool call without a query");
            return ToolCallResponse::error(NO_QUERY_PROVIDED);
        };

        let results = self.search.search(&query, self.max_results).await;
        info!(
            tool = %request.tool,
            provider = self.search.name(),
            query = %query,
            count = results.len(),
            "Tool call complete"
        );

        ToolCallResponse::results(results)
    }
}

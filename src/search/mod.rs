//! Search module - web search capability behind the tool call
//!
//! - **types**: `SearchQuery` and `SearchResult`
//! - **duckduckgo**: DuckDuckGo Instant Answer provider (no API key required)

mod duckduckgo;
mod types;

use async_trait::async_trait;

pub use duckduckgo::DuckDuckGoSearch;
pub use types::{format_search_results, SearchQuery, SearchResult};

/// A web search backend
///
/// Implementations never fail: I/O errors and malformed upstream payloads
/// are logged and reported as an empty result list. Results keep the
/// provider's relevance order.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Provider identifier for logs
    fn name(&self) -> &str;

    /// Run `query`, returning at most `limit` results
    async fn search(&self, query: &SearchQuery, limit: usize) -> Vec<SearchResult>;
}

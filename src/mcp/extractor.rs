//! LLM-assisted search query extraction
//!
//! Asks the language model which web searches a free-text message calls
//! for. The model's reply is parsed in a fixed order of attempts:
//!
//! 1. a fenced code block (```` ```json ... ``` ````) holding `{"queries": [...]}`
//! 2. the whole reply as raw JSON, only when the reply has no fenced block
//! 3. fallback: the original message as the single query
//!
//! A failed LLM call goes straight to the fallback. Extraction never fails.

use regex::Regex;
use serde_json::Value;
use std::sync::{Arc, LazyLock};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::Result;
use crate::llm::{self, CompletionRequest, LanguageModel};
use crate::search::SearchQuery;

/// Instruction sent as the system prompt
pub const EXTRACTION_PROMPT: &str = "You are a helpful assistant that identifies web search queries in user message. \
Extract any specific website or topic queries the user wants information about. \
Return results as a JSON object with a 'queries' field containing an array of strings. \
If no queries are found, return an empty array.";

const EXTRACTION_TEMPERATURE: f32 = 0.1;
const EXTRACTION_MAX_TOKENS: u32 = 1000;

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").expect("fenced block pattern is valid")
});

/// Which parse attempt produced an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionSource {
    /// JSON inside a fenced code block
    Fenced,
    /// The reply parsed as JSON as-is
    Raw,
    /// Model unavailable or reply unparsable; the message itself was used
    Fallback,
}

/// Result of extraction: an ordered, possibly empty, list of queries
///
/// An empty list means no searchable intent was found. It is not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionOutcome {
    queries: Vec<SearchQuery>,
    source: ExtractionSource,
}

impl ExtractionOutcome {
    fn new(queries: Vec<SearchQuery>, source: ExtractionSource) -> Self {
        ExtractionOutcome { queries, source }
    }

    /// Fallback outcome: `[message]`, or `[]` for a blank message
    fn fallback(message: &str) -> Self {
        Self::new(
            SearchQuery::new(message).into_iter().collect(),
            ExtractionSource::Fallback,
        )
    }

    pub fn queries(&self) -> &[SearchQuery] {
        &self.queries
    }

    pub fn source(&self) -> ExtractionSource {
        self.source
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    /// Query texts in order
    pub fn to_strings(&self) -> Vec<String> {
        self.queries.iter().map(|q| q.as_str().to_string()).collect()
    }

    pub fn into_queries(self) -> Vec<SearchQuery> {
        self.queries
    }
}

/// Parse state for a model reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    AttemptFenced,
    AttemptRaw,
    Fallback,
}

/// Run the parse attempts in order
///
/// Returns `None` once every attempt has failed; the caller owns the
/// fallback because it needs the original message.
fn parse_reply(reply: &str) -> Option<ExtractionOutcome> {
    let mut state = ParseState::AttemptFenced;

    loop {
        state = match state {
            // Raw JSON is only tried when the reply has no fence at all
            ParseState::AttemptFenced => match FENCED_BLOCK.captures(reply).and_then(|c| c.get(1)) {
                Some(block) => match parse_queries(block.as_str()) {
                    Some(queries) => {
                        return Some(ExtractionOutcome::new(queries, ExtractionSource::Fenced))
                    }
                    None => ParseState::Fallback,
                },
                None => ParseState::AttemptRaw,
            },
            ParseState::AttemptRaw => match parse_queries(reply.trim()) {
                Some(queries) => return Some(ExtractionOutcome::new(queries, ExtractionSource::Raw)),
                None => ParseState::Fallback,
            },
            ParseState::Fallback => return None,
        };
    }
}

/// Decode `{"queries": [string, ...]}`
///
/// A JSON object without a `queries` field yields an empty list. Anything
/// else that is not an object holding an array of strings is a parse
/// failure. Blank strings are dropped.
fn parse_queries(text: &str) -> Option<Vec<SearchQuery>> {
    let value: Value = serde_json::from_str(text).ok()?;
    let object = value.as_object()?;

    match object.get("queries") {
        None | Some(Value::Null) => Some(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(SearchQuery::new))
            .collect::<Option<Vec<_>>>()
            .map(|queries| queries.into_iter().flatten().collect()),
        Some(_) => None,
    }
}

/// Identifies search queries in free text with an LLM
#[derive(Clone)]
pub struct QueryExtractor {
    llm: Arc<dyn LanguageModel>,
}

impl QueryExtractor {
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        QueryExtractor { llm }
    }

    /// Build with the configured LLM backend
    ///
    /// Fails with `Error::Config` if the LLM credential is missing.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(llm::from_config(config)?))
    }

    /// Extract search queries from `message`
    pub async fn extract(&self, message: &str) -> ExtractionOutcome {
        if message.trim().is_empty() {
            return ExtractionOutcome::fallback(message);
        }

        let request = CompletionRequest::new(EXTRACTION_PROMPT, message)
            .with_temperature(EXTRACTION_TEMPERATURE)
            .with_max_tokens(EXTRACTION_MAX_TOKENS);

        let reply = match self.llm.complete(&request).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(
                    llm = self.llm.name(),
                    error = %e,
                    retryable = e.is_retryable(),
                    "Error extracting queries, using message as query"
                );
                return ExtractionOutcome::fallback(message);
            }
        };

        match parse_reply(&reply) {
            Some(outcome) => {
                debug!(
                    source = ?outcome.source(),
                    count = outcome.len(),
                    "Extracted search queries"
                );
                outcome
            }
            None => {
                debug!(reply = %reply, "Unparsable extraction reply, using message as query");
                ExtractionOutcome::fallback(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Replies with a fixed string (or error) and records what it saw
    struct StubLlm {
        reply: std::result::Result<String, fn() -> Error>,
        calls: AtomicUsize,
        last_request: Mutex<Option<CompletionRequest>>,
    }

    impl StubLlm {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(StubLlm {
                reply: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
            })
        }

        fn failing(err: fn() -> Error) -> Arc<Self> {
            Arc::new(StubLlm {
                reply: Err(err),
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl LanguageModel for StubLlm {
        fn name(&self) -> &str {
            "stub"
        }

        async fn complete(&self, request: &CompletionRequest) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request.clone());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(make) => Err(make()),
            }
        }
    }

    async fn extract_with(llm: Arc<StubLlm>, message: &str) -> ExtractionOutcome {
        QueryExtractor::new(llm).extract(message).await
    }

    #[tokio::test]
    async fn test_fenced_block_in_order() {
        let llm = StubLlm::replying(
            "Here you go:\n```json\n{\"queries\": [\"a\", \"b\"]}\n```\nAnything else?",
        );
        let outcome = extract_with(llm.clone(), "tell me about a and b").await;

        assert_eq!(outcome.to_strings(), vec!["a", "b"]);
        assert_eq!(outcome.source(), ExtractionSource::Fenced);

        let request = llm.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.system, EXTRACTION_PROMPT);
        assert_eq!(request.user, "tell me about a and b");
        assert_eq!(request.temperature, EXTRACTION_TEMPERATURE);
        assert_eq!(request.max_tokens, EXTRACTION_MAX_TOKENS);
    }

    #[tokio::test]
    async fn test_unlabelled_fence() {
        let llm = StubLlm::replying("```\n{\"queries\": [\"rust lifetimes\"]}\n```");
        let outcome = extract_with(llm, "how do lifetimes work").await;
        assert_eq!(outcome.to_strings(), vec!["rust lifetimes"]);
    }

    #[tokio::test]
    async fn test_raw_json() {
        let llm = StubLlm::replying("  {\"queries\": [\"Eiffel Tower height\"]}\n");
        let outcome = extract_with(llm, "how tall is the Eiffel Tower?").await;
        assert_eq!(outcome.to_strings(), vec!["Eiffel Tower height"]);
        assert_eq!(outcome.source(), ExtractionSource::Raw);
    }

    #[tokio::test]
    async fn test_explicit_empty_is_not_fallback() {
        let llm = StubLlm::replying("{\"queries\": []}");
        let outcome = extract_with(llm, "hello there").await;
        assert!(outcome.is_empty());
        assert_eq!(outcome.source(), ExtractionSource::Raw);
    }

    #[tokio::test]
    async fn test_object_without_queries_is_empty() {
        let llm = StubLlm::replying("{\"answer\": 42}");
        let outcome = extract_with(llm, "what is the answer").await;
        assert!(outcome.is_empty());
    }

    #[tokio::test]
    async fn test_unparsable_falls_back_to_message() {
        let llm = StubLlm::replying("no idea");
        let outcome = extract_with(llm, "best ramen in Tokyo").await;
        assert_eq!(outcome.to_strings(), vec!["best ramen in Tokyo"]);
        assert_eq!(outcome.source(), ExtractionSource::Fallback);
    }

    #[tokio::test]
    async fn test_bad_fence_then_bad_raw_falls_back() {
        let llm = StubLlm::replying("```json\n{queries: nope}\n```");
        let outcome = extract_with(llm, "original text").await;
        assert_eq!(outcome.to_strings(), vec!["original text"]);
        assert_eq!(outcome.source(), ExtractionSource::Fallback);
    }

    #[tokio::test]
    async fn test_bad_fence_skips_raw_attempt() {
        // The whole reply is valid JSON, but it contains a fence that is not
        let llm = StubLlm::replying("{\"queries\": [\"a ```b``` c\"]}");
        let outcome = extract_with(llm, "original text").await;
        assert_eq!(outcome.to_strings(), vec!["original text"]);
        assert_eq!(outcome.source(), ExtractionSource::Fallback);

        assert!(parse_reply("```json\nnot json\n```\n{\"queries\": [\"raw\"]}").is_none());
    }

    #[tokio::test]
    async fn test_wrongly_typed_queries_fall_back() {
        let llm = StubLlm::replying("{\"queries\": \"just one\"}");
        let outcome = extract_with(llm, "msg").await;
        assert_eq!(outcome.source(), ExtractionSource::Fallback);

        let llm = StubLlm::replying("{\"queries\": [1, 2]}");
        let outcome = extract_with(llm, "msg").await;
        assert_eq!(outcome.to_strings(), vec!["msg"]);
    }

    #[tokio::test]
    async fn test_blank_queries_are_dropped() {
        let llm = StubLlm::replying("{\"queries\": [\"\", \"rust\", \"   \"]}");
        let outcome = extract_with(llm, "msg").await;
        assert_eq!(outcome.to_strings(), vec!["rust"]);
    }

    #[tokio::test]
    async fn test_empty_message_yields_empty_without_llm_call() {
        let llm = StubLlm::replying("no idea");
        let outcome = extract_with(llm.clone(), "").await;
        assert!(outcome.is_empty());
        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_llm_failure_falls_back() {
        let llm = StubLlm::failing(|| Error::Unauthorized("invalid x-api-key".into()));
        let outcome = extract_with(llm.clone(), "weather in Paris").await;
        assert_eq!(outcome.to_strings(), vec!["weather in Paris"]);
        assert_eq!(outcome.source(), ExtractionSource::Fallback);
        assert_eq!(llm.calls.load(Ordering::SeqCst), 1);

        let llm = StubLlm::failing(|| Error::Timeout("llm".into()));
        let outcome = extract_with(llm, "weather in Paris").await;
        assert_eq!(outcome.to_strings(), vec!["weather in Paris"]);
    }

    #[test]
    fn test_parse_reply_state_order() {
        // A valid fence wins over valid raw JSON elsewhere in the reply
        let reply = "{\"queries\": [\"raw\"]}\n```json\n{\"queries\": [\"fenced\"]}\n```";
        let outcome = parse_reply(reply).unwrap();
        assert_eq!(outcome.to_strings(), vec!["fenced"]);

        assert!(parse_reply("[\"not\", \"an object\"]").is_none());
        assert!(parse_reply("").is_none());
    }
}

//! Tool-call wire types
//!
//! The HTTP surface speaks plain JSON: a request names a tool and carries a
//! parameter object, the response carries either `results` or `error`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::search::{SearchQuery, SearchResult};

/// Tools exposed by this server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    /// Web search by free-text query
    FetchWebContent,
}

impl ToolName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::FetchWebContent => "fetch_web_content",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ToolName::FetchWebContent => {
                "Search the web and return matching pages with title, URL, and description."
            }
        }
    }

    /// JSON Schema for the tool's parameters
    pub fn parameters_schema(&self) -> Value {
        match self {
            ToolName::FetchWebContent => serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query"
                    }
                },
                "required": ["query"]
            }),
        }
    }
}

impl FromStr for ToolName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "fetch_web_content" => Ok(ToolName::FetchWebContent),
            other => Err(Error::UnknownTool(other.to_string())),
        }
    }
}

impl std::fmt::Display for ToolName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated tool call
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallRequest {
    /// Which tool to run
    pub tool: ToolName,
    /// Raw parameters from the caller
    pub parameters: Map<String, Value>,
}

impl ToolCallRequest {
    pub fn new(tool: ToolName, parameters: Map<String, Value>) -> Self {
        ToolCallRequest { tool, parameters }
    }

    /// Build a `fetch_web_content` call for `query`
    pub fn fetch_web_content(query: impl Into<String>) -> Self {
        let mut parameters = Map::new();
        parameters.insert("query".to_string(), Value::String(query.into()));
        ToolCallRequest::new(ToolName::FetchWebContent, parameters)
    }

    /// Decode and validate an HTTP request body
    ///
    /// Fails with `Error::InvalidRequest` when the body is not a non-empty
    /// JSON object and with `Error::UnknownTool` when `name` is missing or
    /// not a tool we expose. A `parameters` value that is not an object is
    /// treated as an empty parameter set.
    pub fn from_body(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body).map_err(|_| Error::InvalidRequest)?;

        let mut object = match value {
            Value::Object(map) if !map.is_empty() => map,
            _ => return Err(Error::InvalidRequest),
        };

        let tool = match object.get("name") {
            Some(Value::String(name)) => name.parse()?,
            Some(other) => return Err(Error::UnknownTool(other.to_string())),
            None => return Err(Error::UnknownTool(String::new())),
        };

        let parameters = match object.remove("parameters") {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };

        Ok(ToolCallRequest { tool, parameters })
    }

    /// The `query` parameter, if it is a non-blank string
    ///
    /// Whitespace-only text counts as missing so the provider is never sent
    /// an empty search; any other text is passed through untrimmed.
    pub fn query(&self) -> Option<SearchQuery> {
        self.parameters
            .get("query")
            .and_then(Value::as_str)
            .and_then(SearchQuery::new)
    }

    /// Wire form: `{"name": ..., "parameters": {...}}`
    pub fn to_body(&self) -> Value {
        serde_json::json!({
            "name": self.tool.as_str(),
            "parameters": self.parameters,
        })
    }
}

/// Outcome of a tool call: exactly one of `results` or `error`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolCallResponse {
    Results { results: Vec<SearchResult> },
    Error { error: String },
}

impl ToolCallResponse {
    pub fn results(results: Vec<SearchResult>) -> Self {
        ToolCallResponse::Results { results }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ToolCallResponse::Error {
            error: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ToolCallResponse::Error { .. })
    }
}

/// HTTP 200 body of `/tool_call`: the bridge response nested under `results`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallEnvelope {
    pub results: ToolCallResponse,
}

/// One entry of the service descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

impl EndpointInfo {
    fn new(path: &str, method: &str, description: &str) -> Self {
        EndpointInfo {
            path: path.to_string(),
            method: method.to_string(),
            description: description.to_string(),
        }
    }
}

/// A tool as advertised in the service descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: ToolName,
    pub description: String,
    pub parameters: Value,
}

impl From<ToolName> for ToolDescriptor {
    fn from(tool: ToolName) -> Self {
        ToolDescriptor {
            name: tool,
            description: tool.description().to_string(),
            parameters: tool.parameters_schema(),
        }
    }
}

/// Body of `GET /`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    pub name: String,
    pub status: String,
    pub version: String,
    pub tools: Vec<ToolDescriptor>,
    pub endpoints: Vec<EndpointInfo>,
}

impl ServiceDescriptor {
    /// Descriptor for this build
    pub fn current() -> Self {
        ServiceDescriptor {
            name: "MCP server".to_string(),
            status: "running".to_string(),
            version: crate::VERSION.to_string(),
            tools: vec![ToolName::FetchWebContent.into()],
            endpoints: vec![
                EndpointInfo::new("/tool_call", "POST", "Handle tool calls from Claude"),
                EndpointInfo::new("/health", "GET", "Health check endpoint"),
                EndpointInfo::new("/", "GET", "Service descriptor"),
            ],
        }
    }
}

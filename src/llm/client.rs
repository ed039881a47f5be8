//! Anthropic Messages API client

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use secrecy::ExposeSecret;
use tracing::{debug, info, warn};

use super::types::{ApiErrorEnvelope, Message, MessageRequest, MessageResponse};
use super::{CompletionRequest, LanguageModel};
use crate::config::LlmConfig;
use crate::error::{Error, Result};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic API client
#[derive(Clone)]
pub struct AnthropicClient {
    /// HTTP client with auth headers baked in
    client: Client,
    /// Configuration
    config: LlmConfig,
}

impl AnthropicClient {
    /// Create a new Anthropic client
    pub fn new(config: LlmConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();

        let mut api_key = header::HeaderValue::from_str(config.api_key.expose_secret())
            .map_err(|e| Error::Config(format!("Invalid API key format: {}", e)))?;
        api_key.set_sensitive(true);
        headers.insert("x-api-key", api_key);
        headers.insert(
            "anthropic-version",
            header::HeaderValue::from_static(ANTHROPIC_VERSION),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()?;

        Ok(AnthropicClient { client, config })
    }

    /// Get the configured model
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Send a request to the Messages API
    async fn send_request(&self, request: &MessageRequest) -> Result<MessageResponse> {
        let url = format!("{}/v1/messages", self.config.base_url);

        debug!(model = %request.model, "Sending request to Anthropic");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout(format!(
                        "Anthropic did not respond within {}s",
                        self.config.timeout_secs
                    ))
                } else {
                    Error::Http(e)
                }
            })?;
        let status = response.status();

        if status.is_success() {
            let body = response.json::<MessageResponse>().await?;

            if let Some(ref usage) = body.usage {
                info!(
                    model = %body.model,
                    input_tokens = usage.input_tokens,
                    output_tokens = usage.output_tokens,
                    "Anthropic response"
                );
            }

            return Ok(body);
        }

        let error_text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorEnvelope>(&error_text)
            .map(|e| format!("{}: {}", e.error.error_type, e.error.message))
            .unwrap_or(error_text);

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(Error::Unauthorized(message))
            }
            StatusCode::TOO_MANY_REQUESTS => {
                warn!("Rate limit exceeded: {}", message);
                Err(Error::RateLimit(message))
            }
            _ => Err(Error::Llm(format!("API error ({}): {}", status, message))),
        }
    }
}

#[async_trait]
impl LanguageModel for AnthropicClient {
    fn name(&self) -> &str {
        "claude"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let body = MessageRequest {
            model: self.config.model.clone(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            system: (!request.system.is_empty()).then(|| request.system.clone()),
            messages: vec![Message::user(request.user.clone())],
        };

        let response = self.send_request(&body).await?;
        Ok(response.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderKind;
    use secrecy::SecretString;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: &str) -> LlmConfig {
        LlmConfig {
            provider: ProviderKind::Claude,
            api_key: SecretString::from("test-key"),
            model: "claude-3-5-sonnet-20240620".to_string(),
            base_url: base_url.to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_client_creation() {
        let client = AnthropicClient::new(test_config("https://api.anthropic.com"));
        assert!(client.is_ok());
        assert_eq!(client.unwrap().model(), "claude-3-5-sonnet-20240620");
    }

    #[test]
    fn test_invalid_key_is_config_error() {
        let mut config = test_config("https://api.anthropic.com");
        config.api_key = SecretString::from("bad\nkey");
        assert!(matches!(AnthropicClient::new(config), Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_complete_sends_headers_and_returns_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "test-key"))
            .and(header("anthropic-version", ANTHROPIC_VERSION))
            .and(body_partial_json(json!({
                "system": "find queries",
                "temperature": 0.1,
                "max_tokens": 1000,
                "messages": [{"role": "user", "content": "tell me about rust"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "msg_01",
                "model": "claude-3-5-sonnet-20240620",
                "content": [{"type": "text", "text": "{\"queries\": [\"rust\"]}"}],
                "stop_reason": "end_turn",
                "usage": {"input_tokens": 12, "output_tokens": 8}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = AnthropicClient::new(test_config(&server.uri())).unwrap();
        let request = CompletionRequest::new("find queries", "tell me about rust")
            .with_temperature(0.1)
            .with_max_tokens(1000);

        let text = client.complete(&request).await.unwrap();
        assert_eq!(text, "{\"queries\": [\"rust\"]}");
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "type": "error",
                "error": {"type": "authentication_error", "message": "invalid x-api-key"}
            })))
            .mount(&server)
            .await;

        let client = AnthropicClient::new(test_config(&server.uri())).unwrap();
        let err = client
            .complete(&CompletionRequest::new("", "hi"))
            .await
            .unwrap_err();

        match err {
            Error::Unauthorized(msg) => assert!(msg.contains("invalid x-api-key")),
            other => panic!("expected Unauthorized, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(529).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let client = AnthropicClient::new(test_config(&server.uri())).unwrap();
        let err = client
            .complete(&CompletionRequest::new("", "hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Llm(_)));
    }

    #[tokio::test]
    async fn test_slow_response_is_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"content": []}))
                    .set_delay(std::time::Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let mut config = test_config(&server.uri());
        config.timeout_secs = 1;
        let client = AnthropicClient::new(config).unwrap();
        let err = client
            .complete(&CompletionRequest::new("", "hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Timeout(_)), "got {:?}", err);
        assert!(err.is_retryable());
    }
}

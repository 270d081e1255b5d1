//! Anthropic Provider - DialogueProvider over Anthropic's Messages API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = AnthropicConfig::new(api_key)
//!     .with_model("claude-3-5-haiku-latest")
//!     .with_base_url("https://api.anthropic.com");
//!
//! let provider = AnthropicProvider::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::retry::{transport_error, with_retries};
use crate::ports::{ChatReply, ChatRequest, ChatRole, DialogueError, DialogueProvider};

/// Anthropic API version header value.
const ANTHROPIC_API_VERSION: &str = "2023-06-01";

/// Configuration for the Anthropic provider.
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    api_key: SecretString,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
    /// Used when the request carries no limit of its own.
    pub default_max_tokens: u32,
}

impl AnthropicConfig {
    pub const DEFAULT_MODEL: &'static str = "claude-3-5-haiku-latest";

    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            model: Self::DEFAULT_MODEL.to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 2,
            default_max_tokens: 1024,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

/// Anthropic API provider implementation.
pub struct AnthropicProvider {
    config: AnthropicConfig,
    client: Client,
}

impl AnthropicProvider {
    pub fn new(config: AnthropicConfig) -> Result<Self, DialogueError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DialogueError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'))
    }

    fn to_anthropic_request(&self, request: &ChatRequest) -> AnthropicRequest {
        let messages = request
            .messages
            .iter()
            .map(|msg| AnthropicMessage {
                role: match msg.role {
                    ChatRole::User => "user",
                    ChatRole::Assistant => "assistant",
                }
                .to_string(),
                content: msg.content.clone(),
            })
            .collect();

        AnthropicRequest {
            model: self.config.model.clone(),
            messages,
            system: request.system_prompt.clone(),
            max_tokens: request.max_tokens.unwrap_or(self.config.default_max_tokens),
            temperature: request.temperature,
        }
    }

    async fn attempt(&self, body: &AnthropicRequest) -> Result<ChatReply, DialogueError> {
        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", self.config.api_key.expose_secret())
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(e, self.config.timeout))?;

        let response = Self::check_status(response).await?;

        let anthropic_response: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| DialogueError::parse(format!("Failed to parse response: {}", e)))?;

        let content = anthropic_response.text();
        if content.trim().is_empty() {
            return Err(DialogueError::EmptyReply);
        }

        Ok(ChatReply::new(content, anthropic_response.model))
    }

    async fn check_status(response: Response) -> Result<Response, DialogueError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        Err(status_error(status.as_u16(), error_body))
    }
}

fn status_error(status: u16, error_body: String) -> DialogueError {
    match status {
        401 | 403 => DialogueError::AuthenticationFailed,
        429 => DialogueError::rate_limited(60),
        400 => DialogueError::InvalidRequest(error_body),
        // 529 is Anthropic's "overloaded"
        500..=599 => DialogueError::unavailable(format!("Server error {}: {}", status, error_body)),
        _ => DialogueError::network(format!("Unexpected status {}: {}", status, error_body)),
    }
}

#[async_trait]
impl DialogueProvider for AnthropicProvider {
    async fn complete(&self, request: ChatRequest) -> Result<ChatReply, DialogueError> {
        let body = self.to_anthropic_request(&request);
        with_retries(self.config.max_retries, Duration::from_secs(1), || {
            self.attempt(&body)
        })
        .await
    }

    fn provider_name(&self) -> &str {
        "anthropic"
    }
}

// ----- Anthropic API Types -----

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    messages: Vec<AnthropicMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    model: String,
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

impl AnthropicResponse {
    fn text(&self) -> String {
        self.content
            .iter()
            .filter(|block| block.block_type == "text")
            .filter_map(|block| block.text.as_deref())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ChatMessage;

    fn provider() -> AnthropicProvider {
        AnthropicProvider::new(AnthropicConfig::new("test-key")).unwrap()
    }

    #[test]
    fn config_builder_works() {
        let config = AnthropicConfig::new("test-key")
            .with_model("claude-3-opus-20240229")
            .with_base_url("https://custom.api.com")
            .with_timeout(Duration::from_secs(30))
            .with_max_retries(5);

        assert_eq!(config.model, "claude-3-opus-20240229");
        assert_eq!(config.base_url, "https://custom.api.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.api_key.expose_secret(), "test-key");
    }

    #[test]
    fn request_carries_system_prompt_separately() {
        let request = ChatRequest::new()
            .with_system_prompt("Collect quote details")
            .with_messages(vec![
                ChatMessage::user("Hello"),
                ChatMessage::assistant("Hi! Who is the shipper?"),
            ]);

        let json = serde_json::to_value(provider().to_anthropic_request(&request)).unwrap();

        assert_eq!(json["system"], "Collect quote details");
        assert_eq!(json["messages"].as_array().unwrap().len(), 2);
        assert_eq!(json["messages"][1]["role"], "assistant");
        assert_eq!(json["max_tokens"], 1024);
        assert!(json.get("temperature").is_none());
    }

    #[test]
    fn response_text_skips_non_text_blocks() {
        let body = r#"{
            "model": "claude-3-5-haiku-latest",
            "content": [
                {"type": "text", "text": "Got it. "},
                {"type": "tool_use", "id": "x"},
                {"type": "text", "text": "What is the weight?"}
            ]
        }"#;
        let response: AnthropicResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.text(), "Got it. What is the weight?");
    }

    #[test]
    fn status_mapping() {
        assert!(matches!(status_error(401, String::new()), DialogueError::AuthenticationFailed));
        assert!(matches!(
            status_error(429, String::new()),
            DialogueError::RateLimited { retry_after_secs: 60 }
        ));
        assert!(matches!(status_error(400, "bad".into()), DialogueError::InvalidRequest(_)));
        assert!(matches!(status_error(529, String::new()), DialogueError::Unavailable { .. }));
    }

    #[test]
    fn provider_name_is_anthropic() {
        assert_eq!(provider().provider_name(), "anthropic");
        assert_eq!(
            provider().messages_url(),
            "https://api.anthropic.com/v1/messages"
        );
    }
}

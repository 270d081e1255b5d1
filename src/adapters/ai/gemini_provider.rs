//! Gemini Provider - DialogueProvider over Google's Generative Language API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = GeminiConfig::new(api_key)
//!     .with_model("gemini-1.5-flash")
//!     .with_timeout(Duration::from_secs(30));
//!
//! let provider = GeminiProvider::new(config)?;
//! ```
//!
//! The API key travels in the `x-goog-api-key` header so it never appears in
//! request URLs or logs.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::retry::{transport_error, with_retries};
use crate::ports::{ChatReply, ChatRequest, ChatRole, DialogueError, DialogueProvider};

/// Configuration for the Gemini provider.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    api_key: SecretString,
    /// Model to use (e.g., "gemini-1.5-flash", "gemini-1.5-pro").
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
}

impl GeminiConfig {
    pub const DEFAULT_MODEL: &'static str = "gemini-1.5-flash";

    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            model: Self::DEFAULT_MODEL.to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 2,
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

/// Gemini API provider implementation.
pub struct GeminiProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiProvider {
    /// Creates a new Gemini provider with the given configuration.
    pub fn new(config: GeminiConfig) -> Result<Self, DialogueError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DialogueError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Converts our request to Gemini's format.
    fn to_gemini_request(request: &ChatRequest) -> GeminiRequest {
        let contents = request
            .messages
            .iter()
            .map(|msg| GeminiContent {
                role: match msg.role {
                    ChatRole::User => "user".to_string(),
                    ChatRole::Assistant => "model".to_string(),
                },
                parts: vec![GeminiPart {
                    text: msg.content.clone(),
                }],
            })
            .collect();

        let generation_config = if request.max_tokens.is_some() || request.temperature.is_some() {
            Some(GeminiGenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
            })
        } else {
            None
        };

        GeminiRequest {
            system_instruction: request.system_prompt.as_ref().map(|prompt| GeminiSystemInstruction {
                parts: vec![GeminiPart {
                    text: prompt.clone(),
                }],
            }),
            contents,
            generation_config,
        }
    }

    async fn attempt(&self, body: &GeminiRequest) -> Result<ChatReply, DialogueError> {
        let response = self
            .client
            .post(self.generate_url())
            .header("x-goog-api-key", self.config.api_key.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(e, self.config.timeout))?;

        let response = Self::check_status(response).await?;

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| DialogueError::parse(format!("Failed to parse response: {}", e)))?;

        let content = gemini_response.text().ok_or(DialogueError::EmptyReply)?;
        let model = gemini_response
            .model_version
            .unwrap_or_else(|| self.config.model.clone());

        Ok(ChatReply::new(content, model))
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

/// Maps a non-success status to a dialogue error.
fn status_error(status: u16, error_body: String) -> DialogueError {
    match status {
        // Gemini reports a bad key as 400 API_KEY_INVALID
        400 if error_body.contains("API_KEY_INVALID") => DialogueError::AuthenticationFailed,
        400 => DialogueError::InvalidRequest(error_body),
        401 | 403 => DialogueError::AuthenticationFailed,
        429 => DialogueError::rate_limited(30),
        500..=599 => DialogueError::unavailable(format!("Server error {}: {}", status, error_body)),
        _ => DialogueError::network(format!("Unexpected status {}: {}", status, error_body)),
    }
}

#[async_trait]
impl DialogueProvider for GeminiProvider {
    async fn complete(&self, request: ChatRequest) -> Result<ChatReply, DialogueError> {
        let body = Self::to_gemini_request(&request);
        let reply = with_retries(self.config.max_retries, Duration::from_secs(1), || {
            self.attempt(&body)
        })
        .await?;

        tracing::debug!(model = %reply.model, chars = reply.content.len(), "gemini reply received");
        Ok(reply)
    }

    fn provider_name(&self) -> &str {
        "gemini"
    }
}

// ----- Gemini API Types -----

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiSystemInstruction>,
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize)]
struct GeminiSystemInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

impl GeminiResponse {
    /// Text of the first candidate, or `None` when nothing usable came back.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().map(|p| p.text.as_str()).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ChatMessage;

    #[test]
    fn config_builder_works() {
        let config = GeminiConfig::new("test-key")
            .with_model("gemini-1.5-pro")
            .with_base_url("https://custom.api.com/")
            .with_timeout(Duration::from_secs(30))
            .with_max_retries(5);

        assert_eq!(config.model, "gemini-1.5-pro");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.api_key.expose_secret(), "test-key");

        let provider = GeminiProvider::new(config).unwrap();
        assert_eq!(
            provider.generate_url(),
            "https://custom.api.com/v1beta/models/gemini-1.5-pro:generateContent"
        );
    }

    #[test]
    fn default_model_is_flash() {
        assert_eq!(GeminiConfig::new("k").model, "gemini-1.5-flash");
    }

    #[test]
    fn request_maps_roles_and_system_prompt() {
        let request = ChatRequest::new()
            .with_system_prompt("You collect shipping quotes")
            .with_messages(vec![
                ChatMessage::user("Hi"),
                ChatMessage::assistant("What are you shipping?"),
                ChatMessage::user("Pallets"),
            ]);

        let json = serde_json::to_value(GeminiProvider::to_gemini_request(&request)).unwrap();

        assert_eq!(
            json["systemInstruction"]["parts"][0]["text"],
            "You collect shipping quotes"
        );
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][1]["role"], "model");
        assert_eq!(json["contents"][2]["parts"][0]["text"], "Pallets");
        assert!(json.get("generationConfig").is_none());
    }

    #[test]
    fn request_includes_generation_config_when_set() {
        let request = ChatRequest::new()
            .with_message(ChatRole::User, "Hi")
            .with_max_tokens(512);

        let json = serde_json::to_value(GeminiProvider::to_gemini_request(&request)).unwrap();

        assert_eq!(json["generationConfig"]["maxOutputTokens"], 512);
        assert!(json["generationConfig"].get("temperature").is_none());
    }

    #[test]
    fn response_text_joins_parts_of_first_candidate() {
        let body = r#"{
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "Hello, "}, {"text": "shipper!"}]}},
                {"content": {"role": "model", "parts": [{"text": "ignored"}]}}
            ],
            "modelVersion": "gemini-1.5-flash-002"
        }"#;
        let response: GeminiResponse = serde_json::from_str(body).unwrap();

        assert_eq!(response.text().as_deref(), Some("Hello, shipper!"));
        assert_eq!(response.model_version.as_deref(), Some("gemini-1.5-flash-002"));
    }

    #[test]
    fn blocked_response_has_no_text() {
        let body = r#"{"candidates": [{"finishReason": "SAFETY"}]}"#;
        let response: GeminiResponse = serde_json::from_str(body).unwrap();
        assert!(response.text().is_none());

        let empty: GeminiResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.text().is_none());
    }

    #[test]
    fn status_mapping() {
        assert!(matches!(
            status_error(400, r#"{"error":{"status":"INVALID_ARGUMENT","details":[{"reason":"API_KEY_INVALID"}]}}"#.into()),
            DialogueError::AuthenticationFailed
        ));
        assert!(matches!(status_error(400, "bad".into()), DialogueError::InvalidRequest(_)));
        assert!(matches!(status_error(403, String::new()), DialogueError::AuthenticationFailed));
        assert!(matches!(status_error(429, String::new()), DialogueError::RateLimited { .. }));
        assert!(matches!(status_error(503, String::new()), DialogueError::Unavailable { .. }));
        assert!(matches!(status_error(418, String::new()), DialogueError::Network(_)));
    }

    #[test]
    fn provider_name_is_gemini() {
        let provider = GeminiProvider::new(GeminiConfig::new("k")).unwrap();
        assert_eq!(provider.provider_name(), "gemini");
    }
}

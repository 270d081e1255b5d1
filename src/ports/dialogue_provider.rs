//! Dialogue Provider Port - Interface for the conversational model.
//!
//! This port abstracts the natural-language service that writes the
//! assistant's replies. Providers are stateless; conversational context is
//! carried in every [`ChatRequest`] by the session that owns it.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct EchoProvider;
//!
//! #[async_trait]
//! impl DialogueProvider for EchoProvider {
//!     async fn complete(&self, request: ChatRequest) -> Result<ChatReply, DialogueError> {
//!         let last = request.messages.last().map(|m| m.content.clone()).unwrap_or_default();
//!         Ok(ChatReply::new(last, "echo"))
//!     }
//!
//!     fn provider_name(&self) -> &str {
//!         "echo"
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Port for dialogue model interactions.
#[async_trait]
pub trait DialogueProvider: Send + Sync {
    /// Generates the next assistant reply for the given history.
    async fn complete(&self, request: ChatRequest) -> Result<ChatReply, DialogueError>;

    /// Short provider name for status reporting (e.g. "gemini").
    fn provider_name(&self) -> &str;
}

/// Sampling limits applied to every request a session makes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GenerationSettings {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

/// Request for the next assistant reply.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// System prompt to guide model behavior.
    pub system_prompt: Option<String>,
    /// Conversation history ending with the current user message.
    pub messages: Vec<ChatMessage>,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
    /// Temperature for response randomness.
    pub temperature: Option<f32>,
}

impl ChatRequest {
    /// Creates an empty request.
    pub fn new() -> Self {
        Self {
            system_prompt: None,
            messages: Vec::new(),
            max_tokens: None,
            temperature: None,
        }
    }

    /// Adds a message to the conversation.
    pub fn with_message(mut self, role: ChatRole, content: impl Into<String>) -> Self {
        self.messages.push(ChatMessage::new(role, content));
        self
    }

    /// Replaces the conversation history.
    pub fn with_messages(mut self, messages: Vec<ChatMessage>) -> Self {
        self.messages = messages;
        self
    }

    /// Sets the system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Sets the maximum tokens to generate.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Sets the temperature.
    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    /// Applies whichever limits are set; unset ones leave the request as is.
    pub fn with_generation(self, settings: GenerationSettings) -> Self {
        let request = match settings.max_tokens {
            Some(max) => self.with_max_tokens(max),
            None => self,
        };
        match settings.temperature {
            Some(temp) => request.with_temperature(temp),
            None => request,
        }
    }

    /// Content of the final user message, if any.
    pub fn last_user_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::User)
            .map(|m| m.content.as_str())
    }
}

impl Default for ChatRequest {
    fn default() -> Self {
        Self::new()
    }
}

/// A message in the dialogue history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    /// Creates a new message.
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }
}

/// Role of the message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// Reply from the dialogue provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    /// Generated text.
    pub content: String,
    /// Model that generated the reply.
    pub model: String,
}

impl ChatReply {
    /// Creates a new reply.
    pub fn new(content: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            model: model.into(),
        }
    }
}

/// Dialogue provider errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DialogueError {
    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Request rejected by the provider.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Provider returned no text (e.g. blocked by safety filters).
    #[error("empty reply from provider")]
    EmptyReply,

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },
}

impl DialogueError {
    /// Creates a rate limited error.
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DialogueError::RateLimited { .. }
                | DialogueError::Unavailable { .. }
                | DialogueError::Network(_)
                | DialogueError::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_builder_works() {
        let request = ChatRequest::new()
            .with_system_prompt("Be helpful")
            .with_message(ChatRole::User, "Hello")
            .with_message(ChatRole::Assistant, "Hi, what are you shipping?")
            .with_message(ChatRole::User, "Electronics")
            .with_max_tokens(256)
            .with_temperature(0.3);

        assert_eq!(request.system_prompt.as_deref(), Some("Be helpful"));
        assert_eq!(request.messages.len(), 3);
        assert_eq!(request.max_tokens, Some(256));
        assert_eq!(request.temperature, Some(0.3));
        assert_eq!(request.last_user_message(), Some("Electronics"));
    }

    #[test]
    fn last_user_message_is_none_without_user_turns() {
        let request = ChatRequest::new().with_message(ChatRole::Assistant, "Welcome");
        assert_eq!(request.last_user_message(), None);
    }

    #[test]
    fn retryable_classification() {
        assert!(DialogueError::rate_limited(30).is_retryable());
        assert!(DialogueError::unavailable("down").is_retryable());
        assert!(DialogueError::network("reset").is_retryable());
        assert!(DialogueError::Timeout { timeout_secs: 30 }.is_retryable());

        assert!(!DialogueError::AuthenticationFailed.is_retryable());
        assert!(!DialogueError::parse("bad json").is_retryable());
        assert!(!DialogueError::EmptyReply.is_retryable());
    }

    #[test]
    fn errors_display_correctly() {
        assert_eq!(
            DialogueError::rate_limited(30).to_string(),
            "rate limited: retry after 30s"
        );
        assert_eq!(
            DialogueError::Timeout { timeout_secs: 60 }.to_string(),
            "request timed out after 60s"
        );
    }

    #[test]
    fn chat_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ChatRole::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&ChatRole::Assistant).unwrap(), "\"assistant\"");
    }
}

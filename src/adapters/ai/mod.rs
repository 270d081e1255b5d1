//! Dialogue Provider Adapters.
//!
//! Implementations of the DialogueProvider port.
//!
//! ## Available Adapters
//!
//! - `GeminiProvider` - Google Gemini models (default backend)
//! - `AnthropicProvider` - Anthropic Claude models
//! - `MockDialogueProvider` - Configurable mock for testing

mod anthropic_provider;
mod gemini_provider;
mod mock_provider;
mod retry;

pub use anthropic_provider::{AnthropicConfig, AnthropicProvider};
pub use gemini_provider::{GeminiConfig, GeminiProvider};
pub use mock_provider::MockDialogueProvider;

use std::sync::Arc;

use crate::config::{AiConfig, DialogueBackend};
use crate::ports::{DialogueError, DialogueProvider};

/// Builds the provider selected by configuration.
pub fn provider_from_config(config: &AiConfig) -> Result<Arc<dyn DialogueProvider>, DialogueError> {
    match config.provider {
        DialogueBackend::Gemini => {
            let key = required_key(config.gemini_api_key.as_deref(), "GEMINI_API_KEY")?;
            let mut gemini = GeminiConfig::new(key)
                .with_timeout(config.timeout())
                .with_max_retries(config.max_retries);
            if let Some(model) = &config.model {
                gemini = gemini.with_model(model.clone());
            }
            Ok(Arc::new(GeminiProvider::new(gemini)?))
        }
        DialogueBackend::Anthropic => {
            let key = required_key(config.anthropic_api_key.as_deref(), "ANTHROPIC_API_KEY")?;
            let mut anthropic = AnthropicConfig::new(key)
                .with_timeout(config.timeout())
                .with_max_retries(config.max_retries);
            if let Some(model) = &config.model {
                anthropic = anthropic.with_model(model.clone());
            }
            Ok(Arc::new(AnthropicProvider::new(anthropic)?))
        }
    }
}

fn required_key<'a>(key: Option<&'a str>, name: &str) -> Result<&'a str, DialogueError> {
    key.filter(|k| !k.is_empty())
        .ok_or_else(|| DialogueError::InvalidRequest(format!("{} is not configured", name)))
}

//! Dialogue provider configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::ports::GenerationSettings;

/// Retries beyond this only delay the user's reply.
pub const MAX_RETRIES: u32 = 5;

/// Dialogue provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Which provider writes the assistant's replies
    #[serde(default)]
    pub provider: DialogueBackend,

    /// Google Generative Language API key
    pub gemini_api_key: Option<String>,

    /// Anthropic API key
    pub anthropic_api_key: Option<String>,

    /// Model override (provider default when unset)
    pub model: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on failure
    #[serde(default = "default_retries")]
    pub max_retries: u32,

    /// Reply length cap in tokens (provider default when unset)
    pub max_tokens: Option<u32>,

    /// Sampling temperature, 0.0 to 2.0 (provider default when unset)
    pub temperature: Option<f32>,
}

/// Dialogue provider type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DialogueBackend {
    #[default]
    Gemini,
    Anthropic,
}

impl DialogueBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            DialogueBackend::Gemini => "gemini",
            DialogueBackend::Anthropic => "anthropic",
        }
    }
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if Gemini is configured
    pub fn has_gemini(&self) -> bool {
        self.gemini_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Check if Anthropic is configured
    pub fn has_anthropic(&self) -> bool {
        self.anthropic_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    pub fn generation(&self) -> GenerationSettings {
        GenerationSettings {
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    /// Validate dialogue configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_retries > MAX_RETRIES {
            return Err(ValidationError::InvalidValue {
                field: "ai.max_retries",
                reason: format!("at most {} retries are allowed", MAX_RETRIES),
            });
        }
        if self.max_tokens == Some(0) {
            return Err(ValidationError::InvalidValue {
                field: "ai.max_tokens",
                reason: "must be positive".to_string(),
            });
        }
        if let Some(temp) = self.temperature {
            if !(0.0..=2.0).contains(&temp) {
                return Err(ValidationError::InvalidValue {
                    field: "ai.temperature",
                    reason: format!("{} is outside 0.0..=2.0", temp),
                });
            }
        }
        match self.provider {
            DialogueBackend::Gemini if !self.has_gemini() => {
                Err(ValidationError::MissingRequired("GEMINI_API_KEY"))
            }
            DialogueBackend::Anthropic if !self.has_anthropic() => {
                Err(ValidationError::MissingRequired("ANTHROPIC_API_KEY"))
            }
            _ => Ok(()),
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: DialogueBackend::default(),
            gemini_api_key: None,
            anthropic_api_key: None,
            model: None,
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
            max_tokens: None,
            temperature: None,
        }
    }
}

fn default_timeout() -> u64 {
    60
}

fn default_retries() -> u32 {
    2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert_eq!(config.provider, DialogueBackend::Gemini);
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.max_retries, 2);
        assert!(config.model.is_none());
    }

    #[test]
    fn test_timeout_duration() {
        let config = AiConfig {
            timeout_secs: 15,
            ..Default::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(15));
    }

    #[test]
    fn test_empty_key_is_not_configured() {
        let config = AiConfig {
            gemini_api_key: Some(String::new()),
            ..Default::default()
        };
        assert!(!config.has_gemini());
    }

    #[test]
    fn test_validation_missing_gemini_key() {
        assert_eq!(
            AiConfig::default().validate(),
            Err(ValidationError::MissingRequired("GEMINI_API_KEY"))
        );
    }

    #[test]
    fn test_validation_missing_anthropic_key() {
        let config = AiConfig {
            provider: DialogueBackend::Anthropic,
            gemini_api_key: Some("AIza-test".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("ANTHROPIC_API_KEY"))
        );
    }

    #[test]
    fn test_validation_valid_config() {
        let config = AiConfig {
            gemini_api_key: Some("AIza-test".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_excessive_retries() {
        let config = AiConfig {
            gemini_api_key: Some("AIza-test".to_string()),
            max_retries: 64,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidValue { field: "ai.max_retries", .. })
        ));

        let config = AiConfig {
            max_retries: MAX_RETRIES,
            ..config
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_generation_settings_follow_config() {
        let config = AiConfig {
            gemini_api_key: Some("AIza-test".to_string()),
            max_tokens: Some(400),
            temperature: Some(0.3),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(
            config.generation(),
            GenerationSettings {
                max_tokens: Some(400),
                temperature: Some(0.3),
            }
        );
        assert_eq!(AiConfig::default().generation(), GenerationSettings::default());
    }

    #[test]
    fn test_validation_rejects_bad_generation_limits() {
        let base = AiConfig {
            gemini_api_key: Some("AIza-test".to_string()),
            ..Default::default()
        };
        let zero_tokens = AiConfig {
            max_tokens: Some(0),
            ..base.clone()
        };
        let hot = AiConfig {
            temperature: Some(3.5),
            ..base
        };

        assert!(matches!(
            zero_tokens.validate(),
            Err(ValidationError::InvalidValue { field: "ai.max_tokens", .. })
        ));
        assert!(matches!(
            hot.validate(),
            Err(ValidationError::InvalidValue { field: "ai.temperature", .. })
        ));
    }

    #[test]
    fn test_backend_names() {
        assert_eq!(DialogueBackend::Gemini.as_str(), "gemini");
        assert_eq!(DialogueBackend::Anthropic.as_str(), "anthropic");
    }
}

//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `QUOTE_DESK` prefix and
//! nested values are separated by double underscores.
//!
//! The unprefixed `GOOGLE_API_KEY`, `SENDGRID_API_KEY` and
//! `SENDGRID_FROM_EMAIL` variables are honoured as fallbacks; a prefixed
//! variable always wins.
//!
//! # Example
//!
//! ```no_run
//! use quote_desk::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod email;
mod error;
mod server;

pub use ai::{AiConfig, DialogueBackend};
pub use email::{EmailConfig, SenderCredentials};
pub use error::{ConfigError, ValidationError};
pub use server::{LogFormat, ServerConfig};

use serde::Deserialize;

const ENV_PREFIX: &str = "QUOTE_DESK";

/// Unprefixed variables mapped onto their configuration keys.
const LEGACY_VARIABLES: &[(&str, &str)] = &[
    ("GOOGLE_API_KEY", "ai.gemini_api_key"),
    ("SENDGRID_API_KEY", "email.sendgrid_api_key"),
    ("SENDGRID_FROM_EMAIL", "email.from_email"),
];

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Dialogue provider configuration (Gemini/Anthropic)
    #[serde(default)]
    pub ai: AiConfig,

    /// Email configuration (SendGrid)
    #[serde(default)]
    pub email: EmailConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Seeds defaults from the unprefixed legacy variables
    /// 3. Reads environment variables with the `QUOTE_DESK` prefix
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `QUOTE_DESK__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `QUOTE_DESK__AI__PROVIDER=anthropic` -> `ai.provider = anthropic`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut builder = config::Config::builder();
        for (variable, key) in LEGACY_VARIABLES {
            if let Ok(value) = std::env::var(variable) {
                if !value.is_empty() {
                    builder = builder.set_default(*key, value)?;
                }
            }
        }

        let config = builder
            .add_source(
                config::Environment::default()
                    .prefix(ENV_PREFIX)
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Missing email credentials are not an error here; they are reported
    /// when a quote is dispatched.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        self.email.validate()?;
        Ok(())
    }
}

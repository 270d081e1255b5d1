//! Email configuration

use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::ports::DeliveryError;

/// Email configuration (SendGrid)
///
/// Both credentials are optional at load time. A missing value is reported
/// when a quote is dispatched, not at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// SendGrid API key
    pub sendgrid_api_key: Option<String>,

    /// From email address
    pub from_email: Option<String>,

    /// SendGrid API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Resolved sender credentials for one dispatch.
#[derive(Debug, Clone)]
pub struct SenderCredentials {
    pub api_key: SecretString,
    pub from_email: String,
}

impl EmailConfig {
    /// Check if the API key is configured
    pub fn has_api_key(&self) -> bool {
        self.sendgrid_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Check if the sender address is configured
    pub fn has_from_email(&self) -> bool {
        self.from_email.as_ref().is_some_and(|e| !e.is_empty())
    }

    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Resolves the credentials needed to send, API key checked first.
    pub fn credentials(&self) -> Result<SenderCredentials, DeliveryError> {
        let api_key = self
            .sendgrid_api_key
            .as_ref()
            .filter(|k| !k.is_empty())
            .ok_or(DeliveryError::MissingApiKey)?;
        let from_email = self
            .from_email
            .as_ref()
            .filter(|e| !e.is_empty())
            .ok_or(DeliveryError::MissingSender)?;

        Ok(SenderCredentials {
            api_key: SecretString::new(api_key.clone()),
            from_email: from_email.clone(),
        })
    }

    /// Validate email configuration
    ///
    /// Only rejects malformed values; absent credentials pass.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.has_from_email() && !self.from_email.as_deref().unwrap_or("").contains('@') {
            return Err(ValidationError::InvalidFromEmail);
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidEmailBaseUrl);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            sendgrid_api_key: None,
            from_email: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.sendgrid.com".to_string()
}

fn default_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn configured() -> EmailConfig {
        EmailConfig {
            sendgrid_api_key: Some("SG.test".to_string()),
            from_email: Some("quotes@example.com".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_email_config_defaults() {
        let config = EmailConfig::default();
        assert_eq!(config.base_url, "https://api.sendgrid.com");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(!config.has_api_key());
        assert!(!config.has_from_email());
    }

    #[test]
    fn test_credentials_resolve() {
        let creds = configured().credentials().unwrap();
        assert_eq!(creds.api_key.expose_secret(), "SG.test");
        assert_eq!(creds.from_email, "quotes@example.com");
    }

    #[test]
    fn test_missing_api_key_is_reported_first() {
        let config = EmailConfig::default();
        assert_eq!(config.credentials().unwrap_err(), DeliveryError::MissingApiKey);
    }

    #[test]
    fn test_missing_sender_is_reported() {
        let config = EmailConfig {
            from_email: Some(String::new()),
            ..configured()
        };
        assert_eq!(config.credentials().unwrap_err(), DeliveryError::MissingSender);
    }

    #[test]
    fn test_validation_allows_missing_credentials() {
        assert!(EmailConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_from_email() {
        let config = EmailConfig {
            from_email: Some("invalid-email".to_string()),
            ..configured()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidFromEmail));
    }

    #[test]
    fn test_validation_invalid_base_url() {
        let config = EmailConfig {
            base_url: "api.sendgrid.com".to_string(),
            ..configured()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidEmailBaseUrl));
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(configured().validate().is_ok());
    }
}

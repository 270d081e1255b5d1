//! SendGrid delivery adapter.
//!
//! Implements `DeliveryService` over SendGrid's v3 mail send endpoint.
//!
//! # Configuration
//!
//! ```ignore
//! let delivery = SendGridDelivery::new(SendGridConfig::default())?;
//! ```

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Serialize;
use std::time::Duration;

use crate::ports::{DeliveryError, DeliveryResult, DeliveryService, OutboundEmail};

/// SendGrid API configuration.
#[derive(Debug, Clone)]
pub struct SendGridConfig {
    /// Base URL for SendGrid API (default: https://api.sendgrid.com).
    pub api_base_url: String,
    pub timeout: Duration,
}

impl SendGridConfig {
    pub fn new(api_base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            timeout,
        }
    }
}

impl Default for SendGridConfig {
    fn default() -> Self {
        Self::new("https://api.sendgrid.com", Duration::from_secs(30))
    }
}

/// SendGrid delivery adapter.
///
/// The API key travels with each [`OutboundEmail`], so one adapter serves
/// any sender configuration.
pub struct SendGridDelivery {
    config: SendGridConfig,
    http_client: reqwest::Client,
}

impl SendGridDelivery {
    pub fn new(config: SendGridConfig) -> Result<Self, DeliveryError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DeliveryError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn send_url(&self) -> String {
        format!("{}/v3/mail/send", self.config.api_base_url.trim_end_matches('/'))
    }

    fn transport_error(&self, err: reqwest::Error) -> DeliveryError {
        if err.is_timeout() {
            DeliveryError::Timeout {
                timeout_secs: self.config.timeout.as_secs() as u32,
            }
        } else {
            DeliveryError::network(err.to_string())
        }
    }
}

#[async_trait]
impl DeliveryService for SendGridDelivery {
    async fn send(&self, email: &OutboundEmail) -> Result<DeliveryResult, DeliveryError> {
        if email.to.trim().is_empty() {
            return Err(DeliveryError::MissingRecipient);
        }

        let body = MailSendRequest::from_email(email);

        let response = self
            .http_client
            .post(self.send_url())
            .bearer_auth(email.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status().as_u16();
        let detail = response.text().await.unwrap_or_default();
        let result = DeliveryResult::from_status(status, detail);

        if result.ok {
            tracing::info!(status, "quote email accepted by SendGrid");
        } else {
            tracing::warn!(status, detail = %result.detail, "SendGrid rejected quote email");
        }

        Ok(result)
    }

    fn service_name(&self) -> &str {
        "sendgrid"
    }
}

// ----- SendGrid API Types -----

#[derive(Debug, Serialize)]
struct MailSendRequest<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: Address<'a>,
    subject: &'a str,
    content: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: Vec<Address<'a>>,
}

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    content_type: &'a str,
    value: &'a str,
}

impl<'a> MailSendRequest<'a> {
    fn from_email(email: &'a OutboundEmail) -> Self {
        Self {
            personalizations: vec![Personalization {
                to: vec![Address { email: &email.to }],
            }],
            from: Address { email: &email.from },
            subject: &email.subject,
            content: vec![Content {
                content_type: "text/plain",
                value: &email.body,
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn test_email(to: &str) -> OutboundEmail {
        OutboundEmail {
            api_key: SecretString::new("SG.test".to_string()),
            from: "quotes@example.com".to_string(),
            to: to.to_string(),
            subject: "Shipping Quote Request".to_string(),
            body: "Shipping Quote Request Details:\n\n".to_string(),
        }
    }

    #[test]
    fn request_body_matches_mail_send_shape() {
        let email = test_email("ops@acme.com");
        let json = serde_json::to_value(MailSendRequest::from_email(&email)).unwrap();

        assert_eq!(json["personalizations"][0]["to"][0]["email"], "ops@acme.com");
        assert_eq!(json["from"]["email"], "quotes@example.com");
        assert_eq!(json["subject"], "Shipping Quote Request");
        assert_eq!(json["content"][0]["type"], "text/plain");
        assert_eq!(json["content"][0]["value"], "Shipping Quote Request Details:\n\n");
    }

    #[test]
    fn send_url_joins_base() {
        let delivery = SendGridDelivery::new(SendGridConfig::new(
            "http://localhost:9000/",
            Duration::from_secs(5),
        ))
        .unwrap();
        assert_eq!(delivery.send_url(), "http://localhost:9000/v3/mail/send");
        assert_eq!(delivery.service_name(), "sendgrid");
    }

    #[tokio::test]
    async fn blank_recipient_is_rejected_before_request() {
        let delivery = SendGridDelivery::new(SendGridConfig::default()).unwrap();
        let result = delivery.send(&test_email("  ")).await;
        assert_eq!(result.unwrap_err(), DeliveryError::MissingRecipient);
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let delivery = SendGridDelivery::new(SendGridConfig::new(
            "http://127.0.0.1:1",
            Duration::from_secs(2),
        ))
        .unwrap();
        let result = delivery.send(&test_email("ops@acme.com")).await;
        assert!(matches!(
            result,
            Err(DeliveryError::Network(_)) | Err(DeliveryError::Timeout { .. })
        ));
    }
}

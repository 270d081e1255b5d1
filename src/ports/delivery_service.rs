//! Delivery Service Port - Interface for outbound email.
//!
//! The session hands a fully assembled message to this port; adapters
//! translate it to a concrete provider API. Any HTTP response from the
//! provider is a [`DeliveryResult`], successful or not; only failures to
//! get a response at all are [`DeliveryError`]s.

use async_trait::async_trait;
use secrecy::SecretString;

/// Port for sending the assembled quote.
#[async_trait]
pub trait DeliveryService: Send + Sync {
    /// Sends one email.
    async fn send(&self, email: &OutboundEmail) -> Result<DeliveryResult, DeliveryError>;

    /// Short service name for logs (e.g. "sendgrid").
    fn service_name(&self) -> &str;
}

/// A plain-text email ready for delivery.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    /// Provider API key.
    pub api_key: SecretString,
    /// Sender address.
    pub from: String,
    /// Recipient address.
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Outcome of one delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryResult {
    /// True when the provider accepted the message.
    pub ok: bool,
    /// HTTP status returned by the provider.
    pub status_code: u16,
    /// Human-readable detail (response body or reason).
    pub detail: String,
}

impl DeliveryResult {
    /// Status code SendGrid returns for an accepted message.
    pub const ACCEPTED: u16 = 202;

    /// Creates an accepted result.
    pub fn accepted(detail: impl Into<String>) -> Self {
        Self {
            ok: true,
            status_code: Self::ACCEPTED,
            detail: detail.into(),
        }
    }

    /// Creates a result from a raw status code.
    pub fn from_status(status_code: u16, detail: impl Into<String>) -> Self {
        Self {
            ok: status_code == Self::ACCEPTED,
            status_code,
            detail: detail.into(),
        }
    }
}

/// Delivery errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    /// No API key configured.
    #[error("SendGrid API key is missing. Please check your .env file")]
    MissingApiKey,

    /// No sender address configured.
    #[error("Sender email is missing. Please check your .env file")]
    MissingSender,

    /// No recipient given.
    #[error("Recipient email is required")]
    MissingRecipient,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },
}

impl DeliveryError {
    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Returns true for errors caused by missing settings or input rather
    /// than by the provider.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            DeliveryError::MissingApiKey
                | DeliveryError::MissingSender
                | DeliveryError::MissingRecipient
        )
    }
}

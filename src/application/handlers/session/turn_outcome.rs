//! What a single turn produced, and the text shown to the user for it.

use std::fmt;

use crate::ports::DeliveryError;

/// Prompt returned when a dispatch is requested without any known address.
pub const RECIPIENT_PROMPT: &str =
    "I don't have an email address. Please provide an email address to send the quote to.";

/// Result of one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The dialogue model answered.
    Replied(String),
    /// The dialogue model failed; the form update from this turn stands.
    DialogueFailed(String),
    /// The provider accepted the quote.
    Delivered { recipient: String },
    /// The provider answered with a non-accepting status.
    DeliveryRejected { status_code: u16 },
    /// No response from the provider.
    DeliveryFailed(String),
    /// Sender settings are missing.
    ConfigurationMissing(DeliveryError),
    /// Dispatch requested with no address.
    RecipientMissing,
}

impl TurnOutcome {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            TurnOutcome::Replied(_) => "replied",
            TurnOutcome::DialogueFailed(_) => "dialogue_failed",
            TurnOutcome::Delivered { .. } => "delivered",
            TurnOutcome::DeliveryRejected { .. } => "delivery_rejected",
            TurnOutcome::DeliveryFailed(_) => "delivery_failed",
            TurnOutcome::ConfigurationMissing(_) => "configuration_missing",
            TurnOutcome::RecipientMissing => "recipient_missing",
        }
    }

    /// True for every outcome of a dispatch request.
    pub fn is_dispatch(&self) -> bool {
        !matches!(
            self,
            TurnOutcome::Replied(_) | TurnOutcome::DialogueFailed(_)
        )
    }
}

impl fmt::Display for TurnOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnOutcome::Replied(reply) => f.write_str(reply),
            TurnOutcome::DialogueFailed(detail) => write!(f, "Error processing message: {}", detail),
            TurnOutcome::Delivered { recipient } => {
                write!(f, "✉️ Email sent successfully to {}", recipient)
            }
            TurnOutcome::DeliveryRejected { status_code } => {
                write!(f, "❌ Error sending email. Status code: {}", status_code)
            }
            TurnOutcome::DeliveryFailed(detail) => write!(f, "❌ Error sending email: {}", detail),
            TurnOutcome::ConfigurationMissing(err) => write!(f, "Error: {}", err),
            TurnOutcome::RecipientMissing => f.write_str(RECIPIENT_PROMPT),
        }
    }
}

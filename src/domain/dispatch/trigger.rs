//! Dispatch trigger detection.
//!
//! Decides whether an utterance asks for the form to be sent rather than
//! continuing the conversation, and which address it should go to.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::domain::form::{FormState, CONTACT_EMAIL_FIELD};

/// Phrases that signal dispatch intent, matched as case-insensitive
/// substrings.
pub const TRIGGER_PHRASES: &[&str] = &[
    "send email to",
    "send the form to",
    "send quote to",
    "send to",
    "email to",
    "please send",
    "send email",
    "send form",
];

static EMAIL_ADDRESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\w\.-]+@[\w\.-]+\.\w+").expect("email address pattern is valid")
});

/// Outcome of trigger detection for one utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "recipient", rename_all = "snake_case")]
pub enum DispatchDecision {
    /// Ordinary conversational input.
    NotTriggered,
    /// The user asked to send, but no address is known.
    TriggeredNoRecipient,
    /// The user asked to send, and this is where it goes.
    TriggeredWithRecipient(String),
}

impl DispatchDecision {
    /// Returns true for both triggered variants.
    pub fn is_triggered(&self) -> bool {
        !matches!(self, DispatchDecision::NotTriggered)
    }

    /// The resolved recipient, if any.
    pub fn recipient(&self) -> Option<&str> {
        match self {
            DispatchDecision::TriggeredWithRecipient(address) => Some(address),
            _ => None,
        }
    }
}

/// Returns true if the utterance contains any trigger phrase.
pub fn is_dispatch_request(utterance: &str) -> bool {
    let lowered = utterance.to_lowercase();
    TRIGGER_PHRASES.iter().any(|phrase| lowered.contains(phrase))
}

/// First address-shaped token in the utterance.
pub fn find_email_address(utterance: &str) -> Option<&str> {
    EMAIL_ADDRESS.find(utterance).map(|m| m.as_str())
}

/// Classifies an utterance against the current form.
///
/// An address written in the utterance always wins over the stored contact
/// email; with neither, the result is [`DispatchDecision::TriggeredNoRecipient`].
pub fn detect(utterance: &str, form: &FormState) -> DispatchDecision {
    if !is_dispatch_request(utterance) {
        return DispatchDecision::NotTriggered;
    }

    if let Some(address) = find_email_address(utterance) {
        return DispatchDecision::TriggeredWithRecipient(address.to_string());
    }

    let (section, field) = CONTACT_EMAIL_FIELD;
    match form.get(section, field) {
        Some(stored) if !stored.is_empty() => {
            DispatchDecision::TriggeredWithRecipient(stored.to_string())
        }
        _ => DispatchDecision::TriggeredNoRecipient,
    }
}

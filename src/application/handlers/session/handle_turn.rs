//! HandleTurnHandler - routes one utterance to either dispatch or dialogue.

use std::sync::Arc;

use crate::config::EmailConfig;
use crate::domain::conversation::system_prompt;
use crate::domain::dispatch::{assemble, detect, DispatchDecision, QUOTE_SUBJECT};
use crate::domain::form::{ExtractionEngine, FormState};
use crate::domain::foundation::SessionId;
use crate::ports::{DeliveryService, DialogueProvider, GenerationSettings, OutboundEmail};

use super::{DialogueHandle, Session, TurnOutcome};

/// Processes turns for any session it is handed.
///
/// A dispatch turn never touches the form or the dialogue context; a
/// conversational turn applies the extracted fields before the model is
/// called, so they stand even when the model fails.
pub struct HandleTurnHandler {
    engine: Arc<ExtractionEngine>,
    dialogue: Arc<dyn DialogueProvider>,
    delivery: Arc<dyn DeliveryService>,
    email: EmailConfig,
    generation: GenerationSettings,
}

impl HandleTurnHandler {
    pub fn new(
        engine: Arc<ExtractionEngine>,
        dialogue: Arc<dyn DialogueProvider>,
        delivery: Arc<dyn DeliveryService>,
        email: EmailConfig,
    ) -> Self {
        Self {
            engine,
            dialogue,
            delivery,
            email,
            generation: GenerationSettings::default(),
        }
    }

    /// Sampling limits for every session this handler creates.
    pub fn with_generation(mut self, generation: GenerationSettings) -> Self {
        self.generation = generation;
        self
    }

    /// A fresh session whose dialogue uses this handler's settings.
    pub fn new_session(&self, id: SessionId) -> Session {
        let dialogue = DialogueHandle::new(system_prompt()).with_generation(self.generation);
        Session::with_dialogue(id, dialogue)
    }

    pub fn dialogue_provider_name(&self) -> &str {
        self.dialogue.provider_name()
    }

    pub fn email_config(&self) -> &EmailConfig {
        &self.email
    }

    /// Runs one turn and records it in the session transcript.
    pub async fn handle(&self, session: &mut Session, utterance: &str) -> TurnOutcome {
        let outcome = match detect(utterance, session.form()) {
            DispatchDecision::TriggeredWithRecipient(recipient) => {
                self.dispatch(session.form(), recipient).await
            }
            DispatchDecision::TriggeredNoRecipient => TurnOutcome::RecipientMissing,
            DispatchDecision::NotTriggered => self.converse(session, utterance).await,
        };

        tracing::info!(
            session_id = %session.id(),
            outcome = outcome.kind(),
            filled = session.form().filled_count(),
            "turn handled"
        );

        session.record_exchange(utterance, &outcome.to_string());
        outcome
    }

    async fn converse(&self, session: &mut Session, utterance: &str) -> TurnOutcome {
        let updates = self.engine.extract(utterance);
        let applied = session.form_mut().apply_all(&updates);
        if applied > 0 {
            tracing::debug!(session_id = %session.id(), applied, "form fields updated");
        }

        match session
            .dialogue_mut()
            .send(self.dialogue.as_ref(), utterance)
            .await
        {
            Ok(reply) => TurnOutcome::Replied(reply),
            Err(err) => {
                tracing::warn!(
                    session_id = %session.id(),
                    provider = self.dialogue.provider_name(),
                    error = %err,
                    "dialogue provider failed"
                );
                TurnOutcome::DialogueFailed(err.to_string())
            }
        }
    }

    async fn dispatch(&self, form: &FormState, recipient: String) -> TurnOutcome {
        let credentials = match self.email.credentials() {
            Ok(credentials) => credentials,
            Err(err) => {
                tracing::warn!(error = %err, "quote dispatch skipped");
                return TurnOutcome::ConfigurationMissing(err);
            }
        };

        let email = OutboundEmail {
            api_key: credentials.api_key,
            from: credentials.from_email,
            to: recipient.clone(),
            subject: QUOTE_SUBJECT.to_string(),
            body: assemble(form),
        };

        match self.delivery.send(&email).await {
            Ok(result) if result.ok => TurnOutcome::Delivered { recipient },
            Ok(result) => TurnOutcome::DeliveryRejected {
                status_code: result.status_code,
            },
            Err(err) if err.is_configuration() => {
                tracing::warn!(
                    service = self.delivery.service_name(),
                    error = %err,
                    "quote delivery refused by adapter"
                );
                TurnOutcome::ConfigurationMissing(err)
            }
            Err(err) => {
                tracing::warn!(
                    service = self.delivery.service_name(),
                    error = %err,
                    "quote delivery failed"
                );
                TurnOutcome::DeliveryFailed(err.to_string())
            }
        }
    }
}

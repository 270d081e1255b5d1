//! Quote session state.

use std::time::{Duration, Instant};

use crate::domain::conversation::{system_prompt, Message};
use crate::domain::form::{default_form, FormState};
use crate::domain::foundation::{SessionId, Timestamp};

use super::DialogueHandle;

/// One user's conversation: the form being filled, the model's context and
/// the transcript shown back to the user.
///
/// Sessions start in the collecting state and never leave it; a dispatch
/// can be repeated and re-sends the current form.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    form: FormState,
    dialogue: DialogueHandle,
    transcript: Vec<Message>,
    created_at: Timestamp,
    last_active: Instant,
}

impl Session {
    /// Creates a session with an empty form and a fresh dialogue.
    pub fn new(id: SessionId) -> Self {
        Self::with_dialogue(id, DialogueHandle::new(system_prompt()))
    }

    /// Creates a session with an empty form around a prepared dialogue.
    pub fn with_dialogue(id: SessionId, dialogue: DialogueHandle) -> Self {
        Self {
            id,
            form: default_form(),
            dialogue,
            transcript: Vec::new(),
            created_at: Timestamp::now(),
            last_active: Instant::now(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub(crate) fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    pub fn dialogue(&self) -> &DialogueHandle {
        &self.dialogue
    }

    pub(crate) fn dialogue_mut(&mut self) -> &mut DialogueHandle {
        &mut self.dialogue
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Time since the last recorded turn, or since creation.
    pub fn idle_for(&self) -> Duration {
        self.last_active.elapsed()
    }

    /// Records one user utterance and the reply shown for it.
    pub(crate) fn record_exchange(&mut self, utterance: &str, reply: &str) {
        self.transcript.push(Message::user(utterance));
        self.transcript.push(Message::assistant(reply));
        self.last_active = Instant::now();
    }
}

//! Per-session dialogue context.

use crate::ports::{ChatMessage, ChatRequest, DialogueError, DialogueProvider, GenerationSettings};

/// Keeps the system prompt and the exchanges the model has seen, replaying
/// them on every call.
#[derive(Debug, Clone)]
pub struct DialogueHandle {
    system_prompt: String,
    history: Vec<ChatMessage>,
    generation: GenerationSettings,
}

impl DialogueHandle {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            history: Vec::new(),
            generation: GenerationSettings::default(),
        }
    }

    pub fn with_generation(mut self, generation: GenerationSettings) -> Self {
        self.generation = generation;
        self
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Builds the request for the next user message without recording it.
    pub fn request_for(&self, text: &str) -> ChatRequest {
        let mut messages = self.history.clone();
        messages.push(ChatMessage::user(text));

        ChatRequest::new()
            .with_system_prompt(self.system_prompt.clone())
            .with_messages(messages)
            .with_generation(self.generation)
    }

    /// Sends `text` to the provider. The exchange joins the history only
    /// when the provider answers.
    pub async fn send(
        &mut self,
        provider: &dyn DialogueProvider,
        text: &str,
    ) -> Result<String, DialogueError> {
        let reply = provider.complete(self.request_for(text)).await?;

        self.history.push(ChatMessage::user(text));
        self.history.push(ChatMessage::assistant(reply.content.clone()));

        Ok(reply.content)
    }
}

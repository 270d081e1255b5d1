//! Mock dialogue provider for testing.
//!
//! Lets tests drive sessions without calling a real model.
//!
//! - Pre-configured replies, consumed in order
//! - Error injection
//! - Simulated latency
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let provider = MockDialogueProvider::new()
//!     .with_reply("Who is the shipper?")
//!     .with_error(DialogueError::unavailable("down"));
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{ChatReply, ChatRequest, DialogueError, DialogueProvider};

const MOCK_MODEL: &str = "mock-model-1";

/// Mock dialogue provider.
///
/// Clones share the reply queue and call history.
#[derive(Debug, Clone)]
pub struct MockDialogueProvider {
    replies: Arc<Mutex<VecDeque<Result<String, DialogueError>>>>,
    delay: Duration,
    calls: Arc<Mutex<Vec<ChatRequest>>>,
}

impl Default for MockDialogueProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDialogueProvider {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Adds a successful reply to the queue.
    pub fn with_reply(self, content: impl Into<String>) -> Self {
        self.replies.lock().unwrap().push_back(Ok(content.into()));
        self
    }

    /// Adds an error to the queue.
    pub fn with_error(self, error: DialogueError) -> Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns all recorded requests.
    pub fn get_calls(&self) -> Vec<ChatRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// The most recent request, if any.
    pub fn last_call(&self) -> Option<ChatRequest> {
        self.calls.lock().unwrap().last().cloned()
    }

    fn next_reply(&self, request: &ChatRequest) -> Result<String, DialogueError> {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(format!(
                    "Noted: {}",
                    request.last_user_message().unwrap_or_default()
                ))
            })
    }
}

#[async_trait]
impl DialogueProvider for MockDialogueProvider {
    async fn complete(&self, request: ChatRequest) -> Result<ChatReply, DialogueError> {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let reply = self.next_reply(&request);
        self.calls.lock().unwrap().push(request);

        reply.map(|content| ChatReply::new(content, MOCK_MODEL))
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}

//! Mock delivery service for testing.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::ports::{DeliveryError, DeliveryResult, DeliveryService, OutboundEmail};

/// Records every email it is asked to send and answers with a configured
/// status or error.
#[derive(Debug, Clone)]
pub struct MockDeliveryService {
    outcome: Arc<Mutex<Result<u16, DeliveryError>>>,
    sent: Arc<Mutex<Vec<OutboundEmail>>>,
}

impl Default for MockDeliveryService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDeliveryService {
    /// Accepts everything with status 202.
    pub fn new() -> Self {
        Self {
            outcome: Arc::new(Mutex::new(Ok(DeliveryResult::ACCEPTED))),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Replies with the given HTTP status.
    pub fn with_status(self, status_code: u16) -> Self {
        *self.outcome.lock().unwrap() = Ok(status_code);
        self
    }

    /// Fails every send with the given error.
    pub fn with_error(self, error: DeliveryError) -> Self {
        *self.outcome.lock().unwrap() = Err(error);
        self
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn sent_emails(&self) -> Vec<OutboundEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last_sent(&self) -> Option<OutboundEmail> {
        self.sent.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl DeliveryService for MockDeliveryService {
    async fn send(&self, email: &OutboundEmail) -> Result<DeliveryResult, DeliveryError> {
        self.sent.lock().unwrap().push(email.clone());

        let outcome = self.outcome.lock().unwrap().clone();
        outcome.map(|status| DeliveryResult::from_status(status, ""))
    }

    fn service_name(&self) -> &str {
        "mock"
    }
}

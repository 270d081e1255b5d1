//! SessionRegistry - owns live sessions and serializes turns per session.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

use crate::domain::conversation::Message;
use crate::domain::form::FormState;
use crate::domain::foundation::SessionId;

use super::{HandleTurnHandler, Session};

/// Environment status reported to front ends. Never carries secret values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceStatus {
    pub dialogue_provider: String,
    pub sendgrid_api_key_configured: bool,
    pub sender_email_configured: bool,
    pub active_sessions: usize,
}

/// In-memory session store.
///
/// Each session sits behind its own mutex, so two turns for the same
/// session run one after the other while other sessions proceed.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, Arc<Mutex<Session>>>>,
    handler: HandleTurnHandler,
}

impl SessionRegistry {
    pub fn new(handler: HandleTurnHandler) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            handler,
        }
    }

    /// Starts a new session and returns its id.
    pub async fn create_session(&self) -> SessionId {
        let id = SessionId::new();
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(self.handler.new_session(id))));
        tracing::info!(session_id = %id, "session created");
        id
    }

    /// Runs one turn and returns the text to show the user.
    ///
    /// An id seen for the first time starts a new session.
    pub async fn handle_turn(&self, session_id: SessionId, utterance: &str) -> String {
        let session = self.get_or_create(session_id).await;
        let mut session = session.lock().await;
        self.handler.handle(&mut session, utterance).await.to_string()
    }

    /// Snapshot of the session's form.
    pub async fn form(&self, session_id: SessionId) -> Option<FormState> {
        let session = self.get(session_id).await?;
        let session = session.lock().await;
        Some(session.form().clone())
    }

    /// Snapshot of the session's transcript.
    pub async fn transcript(&self, session_id: SessionId) -> Option<Vec<Message>> {
        let session = self.get(session_id).await?;
        let session = session.lock().await;
        Some(session.transcript().to_vec())
    }

    /// Ends a session, dropping its form and history.
    ///
    /// Returns false if the id was not live.
    pub async fn remove(&self, session_id: SessionId) -> bool {
        let removed = self.sessions.write().await.remove(&session_id).is_some();
        if removed {
            tracing::info!(session_id = %session_id, "session removed");
        }
        removed
    }

    /// Drops every session idle for at least `max_idle` and returns how many
    /// went. A session with a turn in flight is busy, not idle, and stays.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| match session.try_lock() {
            Ok(session) => session.idle_for() < max_idle,
            Err(_) => true,
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!(evicted, remaining = sessions.len(), "idle sessions evicted");
        }
        evicted
    }

    pub async fn contains(&self, session_id: SessionId) -> bool {
        self.sessions.read().await.contains_key(&session_id)
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn status(&self) -> ServiceStatus {
        let email = self.handler.email_config();
        ServiceStatus {
            dialogue_provider: self.handler.dialogue_provider_name().to_string(),
            sendgrid_api_key_configured: email.has_api_key(),
            sender_email_configured: email.has_from_email(),
            active_sessions: self.session_count().await,
        }
    }

    async fn get(&self, session_id: SessionId) -> Option<Arc<Mutex<Session>>> {
        self.sessions.read().await.get(&session_id).cloned()
    }

    async fn get_or_create(&self, session_id: SessionId) -> Arc<Mutex<Session>> {
        if let Some(session) = self.get(session_id).await {
            return session;
        }

        let mut sessions = self.sessions.write().await;
        sessions
            .entry(session_id)
            .or_insert_with(|| {
                tracing::info!(session_id = %session_id, "session created on first turn");
                Arc::new(Mutex::new(self.handler.new_session(session_id)))
            })
            .clone()
    }
}

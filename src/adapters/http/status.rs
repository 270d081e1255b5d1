//! Health and environment status endpoints.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::application::{ServiceStatus, SessionRegistry};

/// Environment status. Reports whether secrets are set, never their values.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub dialogue_provider: String,
    pub sendgrid_api_key_configured: bool,
    pub sender_email_configured: bool,
    pub active_sessions: usize,
}

impl From<ServiceStatus> for StatusResponse {
    fn from(status: ServiceStatus) -> Self {
        Self {
            dialogue_provider: status.dialogue_provider,
            sendgrid_api_key_configured: status.sendgrid_api_key_configured,
            sender_email_configured: status.sender_email_configured,
            active_sessions: status.active_sessions,
        }
    }
}

/// GET /api/status
pub async fn get_status(State(registry): State<Arc<SessionRegistry>>) -> Json<StatusResponse> {
    Json(registry.status().await.into())
}

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}

pub fn status_routes(registry: Arc<SessionRegistry>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/status", get(get_status))
        .with_state(registry)
}

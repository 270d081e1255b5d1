//! HTTP handlers for session endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::application::SessionRegistry;
use crate::domain::foundation::SessionId;

use super::dto::{
    CreateSessionResponse, ErrorResponse, FormResponse, MessageResponse, TranscriptResponse,
    TurnRequest, TurnResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct SessionHandlers {
    registry: Arc<SessionRegistry>,
}

impl SessionHandlers {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum SessionApiError {
    #[error("Invalid session ID")]
    InvalidSessionId,

    #[error("Message cannot be empty")]
    EmptyMessage,

    #[error("Session not found: {0}")]
    NotFound(SessionId),
}

impl IntoResponse for SessionApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            SessionApiError::InvalidSessionId | SessionApiError::EmptyMessage => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::bad_request(self.to_string()),
            ),
            SessionApiError::NotFound(id) => (
                StatusCode::NOT_FOUND,
                ErrorResponse::not_found("Session", &id.to_string()),
            ),
        };
        (status, Json(body)).into_response()
    }
}

fn parse_session_id(raw: &str) -> Result<SessionId, SessionApiError> {
    raw.parse().map_err(|_| SessionApiError::InvalidSessionId)
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/sessions - Start a new session
pub async fn create_session(State(handlers): State<SessionHandlers>) -> Response {
    let id = handlers.registry.create_session().await;
    let response = CreateSessionResponse {
        session_id: id.to_string(),
    };
    (StatusCode::CREATED, Json(response)).into_response()
}

/// POST /api/sessions/:session_id/turns - Send one message
pub async fn post_turn(
    State(handlers): State<SessionHandlers>,
    Path(session_id): Path<String>,
    Json(req): Json<TurnRequest>,
) -> Result<Json<TurnResponse>, SessionApiError> {
    let session_id = parse_session_id(&session_id)?;
    if req.message.trim().is_empty() {
        return Err(SessionApiError::EmptyMessage);
    }

    let reply = handlers.registry.handle_turn(session_id, &req.message).await;
    Ok(Json(TurnResponse { reply }))
}

/// DELETE /api/sessions/:session_id - End a session
pub async fn delete_session(
    State(handlers): State<SessionHandlers>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, SessionApiError> {
    let session_id = parse_session_id(&session_id)?;
    if handlers.registry.remove(session_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(SessionApiError::NotFound(session_id))
    }
}

/// GET /api/sessions/:session_id/form - Current form contents
pub async fn get_form(
    State(handlers): State<SessionHandlers>,
    Path(session_id): Path<String>,
) -> Result<Json<FormResponse>, SessionApiError> {
    let session_id = parse_session_id(&session_id)?;
    let form = handlers
        .registry
        .form(session_id)
        .await
        .ok_or(SessionApiError::NotFound(session_id))?;

    Ok(Json(FormResponse::from(&form)))
}

/// GET /api/sessions/:session_id/messages - Session transcript
pub async fn get_messages(
    State(handlers): State<SessionHandlers>,
    Path(session_id): Path<String>,
) -> Result<Json<TranscriptResponse>, SessionApiError> {
    let session_id = parse_session_id(&session_id)?;
    let transcript = handlers
        .registry
        .transcript(session_id)
        .await
        .ok_or(SessionApiError::NotFound(session_id))?;

    Ok(Json(TranscriptResponse {
        messages: transcript.iter().map(MessageResponse::from).collect(),
    }))
}

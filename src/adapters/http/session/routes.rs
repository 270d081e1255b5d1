//! HTTP routes for session endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers::{
    create_session, delete_session, get_form, get_messages, post_turn, SessionHandlers,
};

/// Creates the session router, mounted under `/api/sessions`.
pub fn session_routes(handlers: SessionHandlers) -> Router {
    Router::new()
        .route("/", post(create_session))
        .route("/:session_id", delete(delete_session))
        .route("/:session_id/turns", post(post_turn))
        .route("/:session_id/form", get(get_form))
        .route("/:session_id/messages", get(get_messages))
        .with_state(handlers)
}

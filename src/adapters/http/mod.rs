//! HTTP adapters - REST API implementations.

pub mod session;
pub mod status;

use std::sync::Arc;

use axum::Router;

use crate::application::SessionRegistry;

pub use session::{session_routes, SessionHandlers};
pub use status::status_routes;

/// Full API surface, without middleware layers.
pub fn api_router(registry: Arc<SessionRegistry>) -> Router {
    Router::new()
        .nest(
            "/api/sessions",
            session_routes(SessionHandlers::new(Arc::clone(&registry))),
        )
        .merge(status_routes(registry))
}

//! HTTP adapter for quote session endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    CreateSessionResponse, ErrorResponse, FieldResponse, FormResponse, MessageResponse,
    SectionResponse, TranscriptResponse, TurnRequest, TurnResponse,
};
pub use handlers::{SessionApiError, SessionHandlers};
pub use routes::session_routes;

//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Dialogue providers (Gemini, Anthropic, mock)
//! - `email` - Quote delivery (SendGrid, mock)
//! - `http` - axum REST front end

pub mod ai;
pub mod email;
pub mod http;

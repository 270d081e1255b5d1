//! Foundation module - Shared domain primitives.
//!
//! Identifiers and timestamps shared by the form, dispatch and
//! conversation modules.

mod ids;
mod timestamp;

pub use ids::{MessageId, SessionId};
pub use timestamp::Timestamp;

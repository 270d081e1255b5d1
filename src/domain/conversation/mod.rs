//! Conversation domain module.
//!
//! Transcript entries and the system prompt that seeds every session's
//! dialogue.

mod message;
mod prompt;

pub use message::{Message, Role};
pub use prompt::system_prompt;

//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (identifiers, timestamps)
//! - `form` - Quote form schema, live state and the extraction engine
//! - `dispatch` - Send-request detection and payload rendering
//! - `conversation` - Transcript entries and the dialogue system prompt

pub mod conversation;
pub mod dispatch;
pub mod form;
pub mod foundation;

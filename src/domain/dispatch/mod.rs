//! Dispatch domain module.
//!
//! Detects requests to send the collected quote and renders the form into
//! the outbound email body.

mod payload;
mod trigger;

pub use payload::{assemble, title_case, PAYLOAD_PREAMBLE, QUOTE_SUBJECT};
pub use trigger::{
    detect, find_email_address, is_dispatch_request, DispatchDecision, TRIGGER_PHRASES,
};

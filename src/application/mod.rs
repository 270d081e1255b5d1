//! Application layer - turn handling and session ownership.
//!
//! This layer wires the form domain to the dialogue and delivery ports.

pub mod handlers;

pub use handlers::{
    DialogueHandle, HandleTurnHandler, IdleSweeper, IdleSweeperConfig, ServiceStatus, Session,
    SessionRegistry, TurnOutcome, RECIPIENT_PROMPT,
};

//! Application handlers.
//!
//! Orchestrate domain operations and coordinate between ports.

pub mod session;

pub use session::{
    DialogueHandle, HandleTurnHandler, IdleSweeper, IdleSweeperConfig, ServiceStatus, Session,
    SessionRegistry, TurnOutcome, RECIPIENT_PROMPT,
};

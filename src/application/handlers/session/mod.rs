//! Quote session handlers.

mod dialogue_handle;
mod handle_turn;
mod idle_sweeper;
mod session;
mod session_registry;
mod turn_outcome;

pub use dialogue_handle::DialogueHandle;
pub use handle_turn::HandleTurnHandler;
pub use idle_sweeper::{IdleSweeper, IdleSweeperConfig};
pub use session::Session;
pub use session_registry::{ServiceStatus, SessionRegistry};
pub use turn_outcome::{TurnOutcome, RECIPIENT_PROMPT};

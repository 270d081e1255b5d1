//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `DialogueProvider` - Conversational model that writes assistant replies
//! - `DeliveryService` - Outbound email for dispatched quotes

mod delivery_service;
mod dialogue_provider;

pub use delivery_service::{DeliveryError, DeliveryResult, DeliveryService, OutboundEmail};
pub use dialogue_provider::{
    ChatMessage, ChatReply, ChatRequest, ChatRole, DialogueError, DialogueProvider,
    GenerationSettings,
};

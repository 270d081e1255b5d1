//! Email delivery adapters.
//!
//! - `SendGridDelivery` - SendGrid v3 mail send
//! - `MockDeliveryService` - Recording mock for testing

mod mock_delivery;
mod sendgrid_adapter;

pub use mock_delivery::MockDeliveryService;
pub use sendgrid_adapter::{SendGridConfig, SendGridDelivery};

//! Quote Desk - Conversational shipping quote intake.
//!
//! A user chats with an assistant while a rule-driven extractor fills a
//! fixed shipping-quote form from what they say. Asking for the form to be
//! sent assembles it as plain text and emails it through SendGrid.
//!
//! Layout follows a ports-and-adapters split:
//! - `domain` - form schema, extraction rules, dispatch detection, payload
//! - `ports` - dialogue provider and delivery service contracts
//! - `application` - turn handling and the session registry
//! - `adapters` - Gemini/Anthropic, SendGrid, axum HTTP
//! - `config` - environment-driven configuration

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

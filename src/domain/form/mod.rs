//! Quote form domain module.
//!
//! Holds the fixed form schema, the live per-session form state, and the
//! rule-driven extraction engine that turns utterances into field updates.

pub mod schema;
mod state;
mod rules;
mod extractor;

pub use schema::{default_form, SectionSpec, CONTACT_EMAIL_FIELD, SCHEMA};
pub use state::{FieldUpdate, FieldValue, FormState, SectionValues};
pub use rules::{
    ExtractionError, ExtractionPolicy, ExtractionRule, RuleFault, RuleSet, RuleSpec,
    MAX_FIELD_LENGTH, PRESENCE_SENTINEL, QUOTE_RULES,
};
pub use extractor::ExtractionEngine;

//! Instructions given to the dialogue model when a session starts.

use crate::domain::dispatch::title_case;
use crate::domain::form::SCHEMA;

const INTRO: &str = "You are a helpful shipping quote assistant. Help users fill out their \
shipping quote form by asking relevant questions and collecting information.";

const GUIDANCE: &str = "Ask questions one at a time and keep track of which sections are \
completed. When all information is collected, offer to send the form via email.\n\n\
When you receive information, respond with a confirmation and then ask for the next piece \
of information.";

/// Builds the system prompt, listing the form sections in order.
pub fn system_prompt() -> String {
    let sections = SCHEMA
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {}", i + 1, title_case(s.name)))
        .collect::<Vec<_>>()
        .join("\n");

    format!("{INTRO}\nThe form has the following sections:\n{sections}\n\n{GUIDANCE}")
}

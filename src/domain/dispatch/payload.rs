//! Renders a form into the plain-text body of the quote email.

use crate::domain::form::FormState;

/// Subject line of every dispatched quote.
pub const QUOTE_SUBJECT: &str = "Shipping Quote Request";

/// First line of every payload.
pub const PAYLOAD_PREAMBLE: &str = "Shipping Quote Request Details:";

/// Turns a snake-case key into a title: `hs_code` -> `Hs Code`.
pub fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Assembles the delivery payload.
///
/// Every section gets a header line in schema order; fields appear only
/// when they hold a value. Identical forms produce identical text.
pub fn assemble(form: &FormState) -> String {
    let mut body = format!("{PAYLOAD_PREAMBLE}\n\n");
    for section in form.sections() {
        body.push_str(&format!("\n{}:\n", title_case(section.name)));
        for field in section.fields.iter().filter(|f| f.is_set()) {
            body.push_str(&format!("{}: {}\n", title_case(field.name), field.value));
        }
    }
    body
}

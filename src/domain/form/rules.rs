//! Declarative extraction rules for the quote form.
//!
//! Each rule binds one `(section, field)` slot to a case-insensitive pattern
//! and a policy deciding what value a match produces. Rules are independent
//! of one another; the table order only fixes the order of emitted updates.

use regex::{Regex, RegexBuilder};
use thiserror::Error;

use super::schema;

/// Value assigned by presence-only rules.
pub const PRESENCE_SENTINEL: &str = "Yes";

/// Maximum length for an individual extracted value (10KB).
pub const MAX_FIELD_LENGTH: usize = 10_000;

/// What a successful match writes into the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionPolicy {
    /// Capture group 1, trimmed. An empty capture produces nothing.
    Capture,
    /// Any match writes [`PRESENCE_SENTINEL`].
    Presence,
}

/// Static description of one rule, before compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSpec {
    pub section: &'static str,
    pub field: &'static str,
    pub pattern: &'static str,
    pub policy: ExtractionPolicy,
}

const fn capture(section: &'static str, field: &'static str, pattern: &'static str) -> RuleSpec {
    RuleSpec {
        section,
        field,
        pattern,
        policy: ExtractionPolicy::Capture,
    }
}

const fn presence(section: &'static str, field: &'static str, pattern: &'static str) -> RuleSpec {
    RuleSpec {
        section,
        field,
        pattern,
        policy: ExtractionPolicy::Presence,
    }
}

use schema::{
    ADDITIONAL_INFO, ORIGIN_DESTINATION, SHIPMENT_DETAILS, SHIPPER_CONSIGNEE,
    TRANSPORTATION_SERVICES,
};

/// The quote form's rule table, one rule per field, in schema order.
///
/// Terminators are non-capturing groups rather than lookaheads; group 1 is
/// unaffected. End-of-input terminators accept one trailing newline.
/// Some patterns overlap (see [`RuleSet::overlapping_patterns`]).
pub const QUOTE_RULES: &[RuleSpec] = &[
    capture(SHIPPER_CONSIGNEE, "company_name", r"company name is (.*?)(?:\s+and\s+I'm|\n?\z)"),
    capture(SHIPPER_CONSIGNEE, "contact_person", r"I'm\s+(.*?)(?:\s+and|\n?\z)"),
    capture(SHIPPER_CONSIGNEE, "email", r"email is\s+(.*?)(?:\s+and|\n?\z)"),
    capture(SHIPPER_CONSIGNEE, "phone_number", r"phone is\s+([+\d-]+)"),
    capture(SHIPPER_CONSIGNEE, "pickup_address", r"pickup address is\s+(.*?)(?:\.\s+The|\n?\z)"),
    capture(SHIPPER_CONSIGNEE, "delivery_address", r"delivery address is\s+(.*?)(?:\.\s+The|\n?\z)"),
    capture(SHIPPER_CONSIGNEE, "consignee_name_address", r"consignee is\s+(.*?)(?:\.\s+|\n?\z)"),
    capture(SHIPMENT_DETAILS, "type_of_shipment", r"ship (\d+) (\d+)' containers"),
    capture(SHIPMENT_DETAILS, "container_type", r"(\d+)' containers"),
    capture(SHIPMENT_DETAILS, "number_of_containers", r"(\d+) containers"),
    capture(SHIPMENT_DETAILS, "cargo_type", r"cargo type is ([^,]+)"),
    capture(SHIPMENT_DETAILS, "hs_code", r"HS code is ([^,]+)"),
    capture(SHIPMENT_DETAILS, "weight", r"weight is ([^,]+)"),
    capture(SHIPMENT_DETAILS, "volume", r"volume is ([^,]+)"),
    capture(SHIPMENT_DETAILS, "number_of_packages", r"(\d+) pallets"),
    capture(SHIPMENT_DETAILS, "packaging_type", r"(\d+) pallets"),
    capture(ORIGIN_DESTINATION, "port_of_loading", r"Port of loading is ([^,]+)"),
    capture(ORIGIN_DESTINATION, "port_of_discharge", r"port of discharge is ([^,]+)"),
    presence(ORIGIN_DESTINATION, "customs_clearance_required", r"customs clearance"),
    capture(ORIGIN_DESTINATION, "special_handling", r"special handling for ([^,]+)"),
    presence(TRANSPORTATION_SERVICES, "door_to_door", r"door-to-door service"),
    presence(TRANSPORTATION_SERVICES, "port_to_port", r"port-to-port"),
    presence(TRANSPORTATION_SERVICES, "customs_brokerage", r"customs brokerage"),
    presence(TRANSPORTATION_SERVICES, "inland_transportation", r"inland transportation"),
    presence(TRANSPORTATION_SERVICES, "warehousing", r"warehousing"),
    capture(ADDITIONAL_INFO, "expected_date", r"ship this on ([^,]+)"),
    capture(ADDITIONAL_INFO, "incoterms", r"using ([^,]+) terms"),
    presence(ADDITIONAL_INFO, "insurance_required", r"need insurance"),
    capture(ADDITIONAL_INFO, "preferred_carrier", r"prefer ([^,]+) as our carrier"),
    capture(ADDITIONAL_INFO, "special_instructions", r"Please handle with care as ([^,]+)"),
];

/// Errors raised while loading a rule table. These are configuration
/// errors and abort startup.
#[derive(Debug, Clone, Error)]
pub enum ExtractionError {
    #[error("Invalid pattern for {section}.{field}: {source}")]
    InvalidPattern {
        section: &'static str,
        field: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("Rule targets unknown field {section}.{field}")]
    UnknownField {
        section: &'static str,
        field: &'static str,
    },

    #[error("More than one rule for {section}.{field}")]
    DuplicateRule {
        section: &'static str,
        field: &'static str,
    },
}

/// A single rule failing to evaluate against one utterance.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RuleFault {
    #[error("Extracted value too long: {actual} bytes exceeds maximum of {max} bytes")]
    ValueTooLong { max: usize, actual: usize },
}

/// A compiled rule.
#[derive(Debug, Clone)]
pub struct ExtractionRule {
    section: &'static str,
    field: &'static str,
    policy: ExtractionPolicy,
    regex: Regex,
}

impl ExtractionRule {
    /// Compiles a rule spec, case-insensitively.
    pub fn compile(spec: &RuleSpec) -> Result<Self, ExtractionError> {
        if !schema::contains(spec.section, spec.field) {
            return Err(ExtractionError::UnknownField {
                section: spec.section,
                field: spec.field,
            });
        }

        let regex = RegexBuilder::new(spec.pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| ExtractionError::InvalidPattern {
                section: spec.section,
                field: spec.field,
                source,
            })?;

        Ok(Self {
            section: spec.section,
            field: spec.field,
            policy: spec.policy,
            regex,
        })
    }

    pub fn section(&self) -> &'static str {
        self.section
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn policy(&self) -> ExtractionPolicy {
        self.policy
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Evaluates the rule against a whole utterance.
    ///
    /// `Ok(None)` means no value: no match, or an empty capture.
    pub fn evaluate(&self, utterance: &str) -> Result<Option<String>, RuleFault> {
        let Some(captures) = self.regex.captures(utterance) else {
            return Ok(None);
        };

        let value = match self.policy {
            ExtractionPolicy::Presence => PRESENCE_SENTINEL.to_string(),
            ExtractionPolicy::Capture => {
                let captured = captures.get(1).map(|m| m.as_str().trim()).unwrap_or("");
                if captured.is_empty() {
                    return Ok(None);
                }
                captured.to_string()
            }
        };

        if value.len() > MAX_FIELD_LENGTH {
            return Err(RuleFault::ValueTooLong {
                max: MAX_FIELD_LENGTH,
                actual: value.len(),
            });
        }

        Ok(Some(value))
    }
}

/// An ordered, validated collection of compiled rules.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<ExtractionRule>,
}

impl RuleSet {
    /// Compiles every spec, failing on the first bad one.
    ///
    /// The resulting rules are ordered by schema position regardless of the
    /// order of `specs`.
    pub fn compile(specs: &[RuleSpec]) -> Result<Self, ExtractionError> {
        let mut rules: Vec<ExtractionRule> = Vec::with_capacity(specs.len());
        for spec in specs {
            if rules
                .iter()
                .any(|r| r.section == spec.section && r.field == spec.field)
            {
                return Err(ExtractionError::DuplicateRule {
                    section: spec.section,
                    field: spec.field,
                });
            }
            rules.push(ExtractionRule::compile(spec)?);
        }

        rules.sort_by_key(|r| schema_position(r.section, r.field));
        Ok(Self { rules })
    }

    /// The built-in quote form rules.
    pub fn quote_form() -> Result<Self, ExtractionError> {
        Self::compile(QUOTE_RULES)
    }

    pub fn rules(&self) -> &[ExtractionRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Pairs of rules sharing an identical pattern, as
    /// `("section.field", "section.field")`. Both fields of a pair receive
    /// the same value from one utterance.
    pub fn overlapping_patterns(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (i, a) in self.rules.iter().enumerate() {
            for b in &self.rules[i + 1..] {
                if a.pattern().eq_ignore_ascii_case(b.pattern()) {
                    pairs.push((
                        format!("{}.{}", a.section, a.field),
                        format!("{}.{}", b.section, b.field),
                    ));
                }
            }
        }
        pairs
    }
}

fn schema_position(section: &str, field: &str) -> (usize, usize) {
    schema::SCHEMA
        .iter()
        .enumerate()
        .find(|(_, s)| s.name == section)
        .and_then(|(si, s)| s.fields.iter().position(|f| *f == field).map(|fi| (si, fi)))
        .unwrap_or((usize::MAX, usize::MAX))
}

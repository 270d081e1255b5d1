//! Extraction engine: one utterance in, candidate field updates out.

use super::rules::{ExtractionError, RuleSet, RuleSpec};
use super::state::FieldUpdate;

/// Maps free text to form updates using a compiled [`RuleSet`].
#[derive(Debug, Clone)]
pub struct ExtractionEngine {
    rules: RuleSet,
}

impl ExtractionEngine {
    /// Creates an engine with the built-in quote form rules.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError` if any built-in pattern fails to compile.
    pub fn new() -> Result<Self, ExtractionError> {
        Ok(Self::with_rules(RuleSet::quote_form()?))
    }

    /// Creates an engine from custom rule specs.
    pub fn from_rules(specs: &[RuleSpec]) -> Result<Self, ExtractionError> {
        Ok(Self::with_rules(RuleSet::compile(specs)?))
    }

    /// Creates an engine around an already compiled rule set.
    pub fn with_rules(rules: RuleSet) -> Self {
        for (a, b) in rules.overlapping_patterns() {
            tracing::warn!(first = %a, second = %b, "Extraction rules share a pattern");
        }
        Self { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Extracts every update the utterance satisfies, in schema order.
    ///
    /// Never fails: a rule that faults is logged and skipped, and the
    /// remaining rules are still evaluated.
    pub fn extract(&self, utterance: &str) -> Vec<FieldUpdate> {
        self.rules
            .rules()
            .iter()
            .filter_map(|rule| match rule.evaluate(utterance) {
                Ok(Some(value)) => Some(FieldUpdate::new(rule.section(), rule.field(), value)),
                Ok(None) => None,
                Err(fault) => {
                    tracing::warn!(
                        rule = %format!("{}.{}", rule.section(), rule.field()),
                        error = %fault,
                        "Extraction rule skipped"
                    );
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::form::rules::{ExtractionPolicy, MAX_FIELD_LENGTH, PRESENCE_SENTINEL};
    use crate::domain::form::schema;
    use crate::domain::form::FormState;
    use proptest::prelude::*;

    fn engine() -> ExtractionEngine {
        ExtractionEngine::new().unwrap()
    }

    fn value_of<'a>(updates: &'a [FieldUpdate], field: &str) -> Option<&'a str> {
        updates
            .iter()
            .find(|u| u.field == field)
            .map(|u| u.value.as_str())
    }

    mod shipper {
        use super::*;

        #[test]
        fn extracts_company_and_contact() {
            let updates = engine().extract("Our company name is Global Traders Ltd and I'm John Smith");
            assert_eq!(value_of(&updates, "company_name"), Some("Global Traders Ltd"));
            assert_eq!(value_of(&updates, "contact_person"), Some("John Smith"));
        }

        #[test]
        fn extracts_email_and_phone() {
            let updates = engine().extract("My email is john@globaltraders.com and phone is +1-555-0100");
            assert_eq!(value_of(&updates, "email"), Some("john@globaltraders.com"));
            assert_eq!(value_of(&updates, "phone_number"), Some("+1-555-0100"));
        }

        #[test]
        fn extracts_addresses_up_to_next_sentence() {
            let updates = engine().extract(
                "The pickup address is 12 Dock Road, Hamburg. The delivery address is 4 Bay St, Sydney",
            );
            assert_eq!(value_of(&updates, "pickup_address"), Some("12 Dock Road, Hamburg"));
            assert_eq!(value_of(&updates, "delivery_address"), Some("4 Bay St, Sydney"));
        }
    }

    mod shipment {
        use super::*;

        #[test]
        fn extracts_containers() {
            let updates = engine().extract("We need to ship 2 40' containers");
            assert_eq!(value_of(&updates, "type_of_shipment"), Some("2"));
            assert_eq!(value_of(&updates, "container_type"), Some("40"));
            assert_eq!(value_of(&updates, "number_of_containers"), None);
        }

        #[test]
        fn shared_pallets_pattern_fills_both_fields() {
            let updates = engine().extract("It is packed on 12 pallets");
            assert_eq!(value_of(&updates, "number_of_packages"), Some("12"));
            assert_eq!(value_of(&updates, "packaging_type"), Some("12"));
        }

        #[test]
        fn extracts_comma_separated_details() {
            let updates = engine().extract(
                "The cargo type is electronics, HS code is 8471.30, weight is 5000 kg, volume is 60 cbm",
            );
            assert_eq!(value_of(&updates, "cargo_type"), Some("electronics"));
            assert_eq!(value_of(&updates, "hs_code"), Some("8471.30"));
            assert_eq!(value_of(&updates, "weight"), Some("5000 kg"));
            assert_eq!(value_of(&updates, "volume"), Some("60 cbm"));
        }
    }

    mod services {
        use super::*;

        #[test]
        fn presence_rules_emit_sentinel() {
            let updates = engine().extract(
                "We want door-to-door service with customs brokerage and inland transportation",
            );
            assert_eq!(value_of(&updates, "door_to_door"), Some(PRESENCE_SENTINEL));
            assert_eq!(value_of(&updates, "customs_brokerage"), Some(PRESENCE_SENTINEL));
            assert_eq!(value_of(&updates, "inland_transportation"), Some(PRESENCE_SENTINEL));
            assert_eq!(value_of(&updates, "customs_clearance_required"), None);
        }

        #[test]
        fn extracts_additional_info() {
            let updates = engine().extract(
                "We plan to ship this on March 15, using FOB terms, we need insurance, we prefer Maersk as our carrier",
            );
            assert_eq!(value_of(&updates, "expected_date"), Some("March 15"));
            assert_eq!(value_of(&updates, "incoterms"), Some("FOB"));
            assert_eq!(value_of(&updates, "insurance_required"), Some(PRESENCE_SENTINEL));
            assert_eq!(value_of(&updates, "preferred_carrier"), Some("Maersk"));
        }
    }

    #[test]
    fn unrelated_text_yields_nothing() {
        assert!(engine().extract("Hello there, how does this work?").is_empty());
    }

    #[test]
    fn updates_come_out_in_schema_order() {
        let updates = engine().extract("We need insurance. Our company name is Acme");
        let fields: Vec<_> = updates.iter().map(|u| u.field.as_str()).collect();
        assert_eq!(fields, vec!["company_name", "insurance_required"]);
    }

    #[test]
    fn faulting_rule_does_not_stop_others() {
        let utterance = format!(
            "cargo type is {}, we need insurance",
            "x".repeat(MAX_FIELD_LENGTH + 1)
        );
        let updates = engine().extract(&utterance);
        assert_eq!(value_of(&updates, "cargo_type"), None);
        assert_eq!(value_of(&updates, "insurance_required"), Some(PRESENCE_SENTINEL));
    }

    #[test]
    fn custom_rules_are_supported() {
        let specs = [RuleSpec {
            section: schema::SHIPPER_CONSIGNEE,
            field: "company_name",
            pattern: r"we are (\w+)",
            policy: ExtractionPolicy::Capture,
        }];
        let engine = ExtractionEngine::from_rules(&specs).unwrap();
        let updates = engine.extract("Hi, we are Initech");
        assert_eq!(updates, vec![FieldUpdate::new("shipper_consignee", "company_name", "Initech")]);
    }

    #[test]
    fn batch_round_trip_is_last_write_wins() {
        let engine = engine();
        let mut form = FormState::new();
        for utterance in [
            "The weight is 1000 kg",
            "Port of loading is Rotterdam",
            "Sorry, the weight is 1500 kg",
        ] {
            form.apply_all(&engine.extract(utterance));
        }
        assert_eq!(form.get("shipment_details", "weight"), Some("1500 kg"));
        assert_eq!(form.get("origin_destination", "port_of_loading"), Some("Rotterdam"));
        assert_eq!(form.filled_count(), 2);
    }

    proptest! {
        #[test]
        fn extract_only_targets_schema_fields(utterance in ".{0,200}") {
            for update in engine().extract(&utterance) {
                prop_assert!(schema::contains(&update.section, &update.field));
                prop_assert!(!update.value.is_empty());
            }
        }

        #[test]
        fn extract_is_deterministic(utterance in "[a-zA-Z0-9 ,.'@-]{0,120}") {
            let engine = engine();
            prop_assert_eq!(engine.extract(&utterance), engine.extract(&utterance));
        }
    }
}

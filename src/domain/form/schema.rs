//! Shipping quote form layout.
//!
//! The schema is fixed for the process lifetime: five sections in a fixed
//! order, each with a fixed ordered list of fields whose empty state is `""`.

use super::state::FormState;

/// One section of the quote form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSpec {
    /// Snake-case section key (e.g. `shipper_consignee`).
    pub name: &'static str,
    /// Field keys in declaration order.
    pub fields: &'static [&'static str],
}

impl SectionSpec {
    /// Returns true if this section declares `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains(&field)
    }
}

pub const SHIPPER_CONSIGNEE: &str = "shipper_consignee";
pub const SHIPMENT_DETAILS: &str = "shipment_details";
pub const ORIGIN_DESTINATION: &str = "origin_destination";
pub const TRANSPORTATION_SERVICES: &str = "transportation_services";
pub const ADDITIONAL_INFO: &str = "additional_info";

/// Field holding the shipper's contact address, used as the fallback
/// dispatch recipient.
pub const CONTACT_EMAIL_FIELD: (&str, &str) = (SHIPPER_CONSIGNEE, "email");

/// The quote form, in rendering and extraction order.
pub const SCHEMA: &[SectionSpec] = &[
    SectionSpec {
        name: SHIPPER_CONSIGNEE,
        fields: &[
            "company_name",
            "contact_person",
            "email",
            "phone_number",
            "pickup_address",
            "delivery_address",
            "consignee_name_address",
        ],
    },
    SectionSpec {
        name: SHIPMENT_DETAILS,
        fields: &[
            "type_of_shipment",
            "container_type",
            "number_of_containers",
            "cargo_type",
            "hs_code",
            "weight",
            "volume",
            "number_of_packages",
            "packaging_type",
        ],
    },
    SectionSpec {
        name: ORIGIN_DESTINATION,
        fields: &[
            "port_of_loading",
            "port_of_discharge",
            "customs_clearance_required",
            "special_handling",
        ],
    },
    SectionSpec {
        name: TRANSPORTATION_SERVICES,
        fields: &[
            "door_to_door",
            "port_to_port",
            "customs_brokerage",
            "inland_transportation",
            "warehousing",
        ],
    },
    SectionSpec {
        name: ADDITIONAL_INFO,
        fields: &[
            "expected_date",
            "incoterms",
            "insurance_required",
            "preferred_carrier",
            "special_instructions",
        ],
    },
];

/// Looks up a section by key.
pub fn section(name: &str) -> Option<&'static SectionSpec> {
    SCHEMA.iter().find(|s| s.name == name)
}

/// Returns true if `(section, field)` names a slot in the schema.
pub fn contains(section_name: &str, field: &str) -> bool {
    section(section_name).is_some_and(|s| s.has_field(field))
}

/// Total number of fields across all sections.
pub fn field_count() -> usize {
    SCHEMA.iter().map(|s| s.fields.len()).sum()
}

/// Returns a fresh form with every field empty.
pub fn default_form() -> FormState {
    FormState::from_schema(SCHEMA)
}

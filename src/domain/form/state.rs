//! Live form values for one session.

use serde::Serialize;

use super::schema::SectionSpec;

/// A single candidate field write produced by extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldUpdate {
    pub section: String,
    pub field: String,
    pub value: String,
}

impl FieldUpdate {
    /// Creates a new update.
    pub fn new(
        section: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            section: section.into(),
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Current value of one field. An empty value means "unset".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldValue {
    pub name: &'static str,
    pub value: String,
}

impl FieldValue {
    /// Returns true if the field has been filled.
    pub fn is_set(&self) -> bool {
        !self.value.is_empty()
    }
}

/// Current values of one section, fields in schema order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionValues {
    pub name: &'static str,
    pub fields: Vec<FieldValue>,
}

impl SectionValues {
    /// Returns true when every field of the section is filled.
    pub fn is_complete(&self) -> bool {
        self.fields.iter().all(FieldValue::is_set)
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut FieldValue> {
        self.fields.iter_mut().find(|f| f.name == name)
    }
}

/// A live instance of the quote schema.
///
/// The set of sections and fields is fixed at construction; only values
/// change, and only through [`FormState::apply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormState {
    sections: Vec<SectionValues>,
}

impl FormState {
    /// Creates an empty form with the default quote layout.
    pub fn new() -> Self {
        super::schema::default_form()
    }

    pub(super) fn from_schema(schema: &[SectionSpec]) -> Self {
        let sections = schema
            .iter()
            .map(|spec| SectionValues {
                name: spec.name,
                fields: spec
                    .fields
                    .iter()
                    .map(|name| FieldValue {
                        name: *name,
                        value: String::new(),
                    })
                    .collect(),
            })
            .collect();
        Self { sections }
    }

    /// Writes the update's value if its `(section, field)` exists.
    ///
    /// Returns false and leaves the form untouched for unknown slots.
    /// Later writes to the same slot overwrite earlier ones.
    pub fn apply(&mut self, update: &FieldUpdate) -> bool {
        let Some(slot) = self
            .sections
            .iter_mut()
            .find(|s| s.name == update.section)
            .and_then(|s| s.field_mut(&update.field))
        else {
            return false;
        };
        slot.value.clone_from(&update.value);
        true
    }

    /// Applies every update, returning how many landed.
    pub fn apply_all<'a>(&mut self, updates: impl IntoIterator<Item = &'a FieldUpdate>) -> usize {
        updates.into_iter().filter(|u| self.apply(u)).count()
    }

    /// Current value of a field, `None` if the slot does not exist.
    pub fn get(&self, section: &str, field: &str) -> Option<&str> {
        self.section(section)?
            .fields
            .iter()
            .find(|f| f.name == field)
            .map(|f| f.value.as_str())
    }

    /// Looks up one section.
    pub fn section(&self, name: &str) -> Option<&SectionValues> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Sections in schema order.
    pub fn sections(&self) -> impl Iterator<Item = &SectionValues> {
        self.sections.iter()
    }

    /// Number of fields holding a value.
    pub fn filled_count(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|s| s.fields.iter())
            .filter(|f| f.is_set())
            .count()
    }

    /// Returns true if every field of `section` is filled.
    pub fn is_section_complete(&self, section: &str) -> bool {
        self.section(section).is_some_and(SectionValues::is_complete)
    }

    /// Names of fully filled sections, in schema order.
    pub fn completed_sections(&self) -> Vec<&'static str> {
        self.sections
            .iter()
            .filter(|s| s.is_complete())
            .map(|s| s.name)
            .collect()
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

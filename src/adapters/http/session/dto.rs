//! HTTP DTOs for session endpoints.
//!
//! These types decouple the HTTP API from domain types.

use serde::{Deserialize, Serialize};

use crate::domain::conversation::{Message, Role};
use crate::domain::dispatch::title_case;
use crate::domain::form::{FormState, SectionValues};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// One user utterance.
#[derive(Debug, Clone, Deserialize)]
pub struct TurnRequest {
    pub message: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionResponse {
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TurnResponse {
    pub reply: String,
}

/// Current form contents, sections in schema order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormResponse {
    pub sections: Vec<SectionResponse>,
    pub completed_sections: Vec<String>,
    pub filled_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionResponse {
    pub name: String,
    pub title: String,
    pub complete: bool,
    pub fields: Vec<FieldResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldResponse {
    pub name: String,
    pub label: String,
    pub value: String,
}

impl From<&SectionValues> for SectionResponse {
    fn from(section: &SectionValues) -> Self {
        Self {
            name: section.name.to_string(),
            title: title_case(section.name),
            complete: section.is_complete(),
            fields: section
                .fields
                .iter()
                .map(|f| FieldResponse {
                    name: f.name.to_string(),
                    label: title_case(f.name),
                    value: f.value.clone(),
                })
                .collect(),
        }
    }
}

impl From<&FormState> for FormResponse {
    fn from(form: &FormState) -> Self {
        Self {
            sections: form.sections().map(SectionResponse::from).collect(),
            completed_sections: form
                .completed_sections()
                .into_iter()
                .map(str::to_string)
                .collect(),
            filled_count: form.filled_count(),
        }
    }
}

/// Transcript entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub created_at: String,
}

impl From<&Message> for MessageResponse {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id().to_string(),
            role: message.role(),
            content: message.content().to_string(),
            created_at: message.created_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TranscriptResponse {
    pub messages: Vec<MessageResponse>,
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: format!("{} not found: {}", resource_type, id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::form::{default_form, FieldUpdate};

    #[test]
    fn turn_request_deserializes() {
        let req: TurnRequest = serde_json::from_str(r#"{"message": "hello"}"#).unwrap();
        assert_eq!(req.message, "hello");
    }

    #[test]
    fn create_session_response_uses_camel_case() {
        let json = serde_json::to_value(CreateSessionResponse {
            session_id: "abc".to_string(),
        })
        .unwrap();
        assert_eq!(json["sessionId"], "abc");
    }

    #[test]
    fn form_response_mirrors_form() {
        let mut form = default_form();
        form.apply(&FieldUpdate::new("shipper_consignee", "company_name", "Acme"));

        let json = serde_json::to_value(FormResponse::from(&form)).unwrap();

        assert_eq!(json["filledCount"], 1);
        assert_eq!(json["sections"][0]["name"], "shipper_consignee");
        assert_eq!(json["sections"][0]["title"], "Shipper Consignee");
        assert_eq!(json["sections"][0]["fields"][0]["label"], "Company Name");
        assert_eq!(json["sections"][0]["fields"][0]["value"], "Acme");
        assert_eq!(json["completedSections"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn message_response_carries_role_and_timestamp() {
        let message = Message::assistant("hi");
        let json = serde_json::to_value(MessageResponse::from(&message)).unwrap();

        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "hi");
        assert!(json["createdAt"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn error_response_not_found_creates_correctly() {
        let error = ErrorResponse::not_found("Session", "abc-123");
        assert_eq!(error.code, "NOT_FOUND");
        assert_eq!(error.message, "Session not found: abc-123");
    }
}

//! Typed schema for Slack interaction callbacks.
//!
//! Slack delivers the envelope either as a JSON body or as a form field named `payload`
//! holding the JSON string. Both end up here.

use std::collections::HashMap;

use serde::Deserialize;

use crate::base::error::{RelayError, RelayResult};

/// Form-encoded wrapper Slack uses for interaction callbacks.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InteractionForm {
    pub payload: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractionPayload {
    /// Endpoint ownership handshake.
    UrlVerification { challenge: String },
    /// A modal was submitted.
    ViewSubmission { user: InteractionUser, view: SubmittedView },
    /// Anything else (block actions, shortcuts, view closed, ...).
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InteractionUser {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SubmittedView {
    pub callback_id: String,
    pub private_metadata: String,
    pub state: ViewState,
}

/// Submitted input values, keyed by block ID and then action ID.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewState {
    pub values: HashMap<String, HashMap<String, FieldValue>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FieldValue {
    pub value: Option<String>,
    pub selected_option: Option<SelectedOption>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SelectedOption {
    pub value: String,
}

impl InteractionPayload {
    pub fn from_json(value: serde_json::Value) -> RelayResult<Self> {
        serde_json::from_value(value).map_err(|e| RelayError::validation(format!("Payload de interação inválido: {e}")))
    }

    pub fn from_form_field(payload: &str) -> RelayResult<Self> {
        serde_json::from_str(payload).map_err(|e| RelayError::validation(format!("Payload de interação inválido: {e}")))
    }
}

impl ViewState {
    fn field(&self, block_id: &str, action_id: &str) -> Option<&FieldValue> {
        self.values.get(block_id).and_then(|actions| actions.get(action_id))
    }

    /// Trimmed text input value, if present and non-blank.
    pub fn text(&self, block_id: &str, action_id: &str) -> Option<&str> {
        self.field(block_id, action_id).and_then(|f| f.value.as_deref()).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Selected option value of a select input.
    pub fn selected(&self, block_id: &str, action_id: &str) -> Option<&str> {
        self.field(block_id, action_id)
            .and_then(|f| f.selected_option.as_ref())
            .map(|o| o.value.as_str())
            .filter(|v| !v.is_empty())
    }
}

// Tests.

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_view_submission() {
        let payload = InteractionPayload::from_json(json!({
            "type": "view_submission",
            "user": { "id": "U1", "username": "ana" },
            "view": {
                "callback_id": "create_ticket_modal",
                "private_metadata": "C9",
                "state": { "values": {
                    "summary_block": { "summary_input": { "type": "plain_text_input", "value": "  Disk full " } },
                    "priority_block": { "priority_input": { "type": "static_select", "selected_option": { "value": "High", "text": {} } } },
                    "description_block": { "description_input": { "type": "plain_text_input", "value": null } }
                } }
            }
        }))
        .unwrap();

        let InteractionPayload::ViewSubmission { user, view } = payload else {
            panic!("expected a view submission");
        };

        assert_eq!(user.id, "U1");
        assert_eq!(view.callback_id, "create_ticket_modal");
        assert_eq!(view.private_metadata, "C9");
        assert_eq!(view.state.text("summary_block", "summary_input"), Some("Disk full"));
        assert_eq!(view.state.text("description_block", "description_input"), None);
        assert_eq!(view.state.selected("priority_block", "priority_input"), Some("High"));
        assert_eq!(view.state.selected("issuetype_block", "issuetype_input"), None);
    }

    #[test]
    fn decodes_form_field_string() {
        let payload = InteractionPayload::from_form_field(r#"{"type":"url_verification","challenge":"abc"}"#).unwrap();
        assert_eq!(payload, InteractionPayload::UrlVerification { challenge: "abc".to_string() });
    }

    #[test]
    fn unknown_types_are_unsupported() {
        let payload = InteractionPayload::from_json(json!({ "type": "block_actions", "actions": [] })).unwrap();
        assert_eq!(payload, InteractionPayload::Unsupported);
    }

    #[test]
    fn missing_nested_keys_are_validation_errors() {
        let err = InteractionPayload::from_json(json!({ "type": "view_submission", "view": {} })).unwrap_err();
        assert!(matches!(err, RelayError::Validation(_)));

        let err = InteractionPayload::from_form_field("not json").unwrap_err();
        assert!(matches!(err, RelayError::Validation(_)));
    }

    #[test]
    fn view_without_state_has_no_values() {
        let payload = InteractionPayload::from_json(json!({ "type": "view_submission", "user": { "id": "U1" }, "view": { "callback_id": "x" } })).unwrap();

        let InteractionPayload::ViewSubmission { view, .. } = payload else {
            panic!("expected a view submission");
        };

        assert!(view.state.values.is_empty());
    }
}

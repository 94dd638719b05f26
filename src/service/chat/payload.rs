//! Message and view payloads sent to Slack.
//!
//! These are the JSON shapes Slack expects for slash-command responses, channel
//! messages (legacy attachments), and the ticket modal.

use serde::{Deserialize, Serialize};

/// Callback identifier carried by the ticket modal and echoed back on submission.
pub const TICKET_MODAL_CALLBACK_ID: &str = "create_ticket_modal";

pub const SUMMARY_BLOCK: &str = "summary_block";
pub const SUMMARY_ACTION: &str = "summary_input";
pub const DESCRIPTION_BLOCK: &str = "description_block";
pub const DESCRIPTION_ACTION: &str = "description_input";
pub const ISSUE_TYPE_BLOCK: &str = "issuetype_block";
pub const ISSUE_TYPE_ACTION: &str = "issuetype_input";
pub const PRIORITY_BLOCK: &str = "priority_block";
pub const PRIORITY_ACTION: &str = "priority_input";

const ISSUE_TYPES: [&str; 3] = ["Solicitação", "Bug", "Incidente"];
const PRIORITIES: [&str; 5] = ["Lowest", "Low", "Medium", "High", "Highest"];

// Messages.

/// Who sees a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    /// Broadcast to the whole channel.
    InChannel,
    /// Only visible to the user who ran the command.
    Ephemeral,
}

/// A response to a slash command, or the body of a channel message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response_type: ResponseType,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub color: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_link: Option<String>,
    pub text: String,
    #[serde(default)]
    pub fields: Vec<AttachmentField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentField {
    pub title: String,
    pub value: String,
    pub short: bool,
}

impl AttachmentField {
    fn short(title: &str, value: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            value: value.into(),
            short: true,
        }
    }
}

impl ChatResponse {
    /// Plain private notice with no card.
    pub fn ephemeral(text: impl Into<String>) -> Self {
        Self {
            response_type: ResponseType::Ephemeral,
            text: text.into(),
            attachments: Vec::new(),
        }
    }

    /// Broadcast card announcing a newly created ticket.
    pub fn success_card(issue_key: &str, summary: &str, issue_url: &str) -> Self {
        Self {
            response_type: ResponseType::InChannel,
            text: "✅ Ticket criado com sucesso!".to_string(),
            attachments: vec![Attachment {
                color: "good".to_string(),
                title: format!("{issue_key}: {summary}"),
                title_link: Some(issue_url.to_string()),
                text: "Clique no título para visualizar o ticket no Jira".to_string(),
                fields: vec![AttachmentField::short("Ticket", issue_key), AttachmentField::short("Status", "Criado")],
            }],
        }
    }

    /// Private card carrying the raw error text; never shown to other channel members.
    pub fn error_card(message: &str) -> Self {
        Self {
            response_type: ResponseType::Ephemeral,
            text: format!("❌ Erro ao criar ticket: {message}"),
            attachments: vec![Attachment {
                color: "danger".to_string(),
                title: "Erro".to_string(),
                title_link: None,
                text: message.to_string(),
                fields: Vec::new(),
            }],
        }
    }
}

// Views.

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlainText {
    #[serde(rename = "type")]
    kind: &'static str,
    pub text: String,
}

impl PlainText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            kind: "plain_text",
            text: text.into(),
        }
    }
}

/// A modal form description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModalView {
    #[serde(rename = "type")]
    kind: &'static str,
    pub callback_id: String,
    pub title: PlainText,
    pub submit: PlainText,
    pub close: PlainText,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_metadata: Option<String>,
    pub blocks: Vec<InputBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputBlock {
    #[serde(rename = "type")]
    kind: &'static str,
    pub block_id: String,
    pub label: PlainText,
    pub element: InputElement,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputElement {
    PlainTextInput { action_id: String, placeholder: PlainText, multiline: bool },
    StaticSelect { action_id: String, placeholder: PlainText, options: Vec<SelectOption> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectOption {
    pub text: PlainText,
    pub value: String,
}

impl InputBlock {
    fn new(block_id: &str, label: &str, element: InputElement, optional: bool) -> Self {
        Self {
            kind: "input",
            block_id: block_id.to_string(),
            label: PlainText::new(label),
            element,
            optional,
        }
    }

    fn text(block_id: &str, action_id: &str, label: &str, placeholder: &str, multiline: bool) -> Self {
        let element = InputElement::PlainTextInput {
            action_id: action_id.to_string(),
            placeholder: PlainText::new(placeholder),
            multiline,
        };

        Self::new(block_id, label, element, false)
    }

    fn select(block_id: &str, action_id: &str, label: &str, placeholder: &str, values: &[&str]) -> Self {
        let options = values
            .iter()
            .map(|value| SelectOption {
                text: PlainText::new(*value),
                value: value.to_string(),
            })
            .collect();

        let element = InputElement::StaticSelect {
            action_id: action_id.to_string(),
            placeholder: PlainText::new(placeholder),
            options,
        };

        Self::new(block_id, label, element, true)
    }
}

impl ModalView {
    /// The ticket form: title, description, issue type, and priority.
    ///
    /// `origin_channel` rides along as private metadata so the confirmation can be
    /// posted back where the command was run.
    pub fn ticket_modal(origin_channel: Option<&str>) -> Self {
        Self {
            kind: "modal",
            callback_id: TICKET_MODAL_CALLBACK_ID.to_string(),
            title: PlainText::new("Criar Ticket no Jira"),
            submit: PlainText::new("Criar Ticket"),
            close: PlainText::new("Cancelar"),
            private_metadata: origin_channel.filter(|c| !c.is_empty()).map(str::to_string),
            blocks: vec![
                InputBlock::text(SUMMARY_BLOCK, SUMMARY_ACTION, "Título do Ticket", "Digite o título do ticket", false),
                InputBlock::text(DESCRIPTION_BLOCK, DESCRIPTION_ACTION, "Descrição", "Digite a descrição do ticket", true),
                InputBlock::select(ISSUE_TYPE_BLOCK, ISSUE_TYPE_ACTION, "Tipo de Issue", "Selecione o tipo", &ISSUE_TYPES),
                InputBlock::select(PRIORITY_BLOCK, PRIORITY_ACTION, "Prioridade", "Selecione a prioridade", &PRIORITIES),
            ],
        }
    }
}

// Interaction acknowledgements.

/// Reply to a view submission: either close the modal or show inline field errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "response_action", rename_all = "snake_case")]
pub enum ViewSubmissionResponse {
    Clear,
    Errors { errors: std::collections::BTreeMap<String, String> },
}

impl ViewSubmissionResponse {
    pub fn field_error(block_id: &str, message: impl Into<String>) -> Self {
        Self::Errors {
            errors: [(block_id.to_string(), message.into())].into_iter().collect(),
        }
    }
}

// Tests.

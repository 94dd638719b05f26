//! Slash command handling.
//!
//! In [`CommandMode::Modal`] the command opens the ticket form and creation happens when
//! the form is submitted. In [`CommandMode::Direct`] the command text is parsed and the
//! ticket is filed within the same request.

use serde::Deserialize;
use tracing::{info, instrument};

use crate::{
    base::{
        config::{CommandMode, Config},
        error::{RelayError, RelayResult},
    },
    interaction::parser::{self, TicketDraft},
    service::{
        chat::{
            ChatClient,
            payload::{ChatResponse, ModalView},
        },
        tracker::{self, Description, NewIssue, TrackerClient},
    },
};

/// Inbound slash command, as Slack form-encodes it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Command {
    pub command: String,
    pub text: String,
    pub user_id: String,
    pub user_name: String,
    pub channel_id: String,
    pub channel_name: String,
    pub team_id: String,
    pub team_domain: String,
    pub response_url: String,
    pub trigger_id: String,
}

/// Handle one slash command and build the synchronous reply.
#[instrument(skip_all, fields(command = %command.command, user = %command.user_id, channel = %command.channel_id))]
pub async fn handle_command(command: &Command, config: &Config, tracker: &TrackerClient, chat: &ChatClient) -> RelayResult<ChatResponse> {
    if command.command != config.command_name {
        return Err(RelayError::UnknownCommand(command.command.clone()));
    }

    // The empty-input policy gates both modes.
    let draft = parser::parse(&command.text, config.empty_command_policy)?;

    match config.command_mode {
        CommandMode::Modal => open_ticket_modal(command, chat).await,
        CommandMode::Direct => create_ticket_directly(draft, config, tracker).await,
    }
}

async fn open_ticket_modal(command: &Command, chat: &ChatClient) -> RelayResult<ChatResponse> {
    if command.trigger_id.trim().is_empty() {
        return Err(RelayError::validation("O comando não trouxe um trigger_id para abrir o formulário."));
    }

    let view = ModalView::ticket_modal(Some(&command.channel_id));
    chat.open_modal(&command.trigger_id, &view).await?;

    info!("Ticket modal opened.");

    Ok(ChatResponse::ephemeral("Modal aberto! Preencha os dados do ticket."))
}

async fn create_ticket_directly(draft: TicketDraft, config: &Config, tracker: &TrackerClient) -> RelayResult<ChatResponse> {
    let issue = NewIssue {
        summary: draft.summary,
        description: Description::document(draft.description),
        issue_type: config.default_issue_type.clone(),
        assignee_email: None,
        priority: draft.priority.map(|p| p.tracker_priority().to_string()),
    };

    let created = tracker.create_issue(&issue).await?;
    let url = tracker::issue_url(&config.jira_base_url, &created.key);

    info!("Ticket `{}` created from command.", created.key);

    Ok(ChatResponse::success_card(&created.key, &issue.summary, &url))
}

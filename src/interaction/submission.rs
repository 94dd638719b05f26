//! Handling of the ticket modal submission.

use std::collections::BTreeMap;

use tracing::{info, instrument, warn};

use crate::{
    base::{
        config::Config,
        error::{RelayError, RelayResult},
    },
    interaction::envelope::InteractionPayload,
    service::{
        chat::{
            ChatClient,
            payload::{
                ChatResponse, DESCRIPTION_ACTION, DESCRIPTION_BLOCK, ISSUE_TYPE_ACTION, ISSUE_TYPE_BLOCK, PRIORITY_ACTION, PRIORITY_BLOCK, SUMMARY_ACTION, SUMMARY_BLOCK,
                TICKET_MODAL_CALLBACK_ID, ViewSubmissionResponse,
            },
        },
        tracker::{self, Description, NewIssue, TrackerClient},
    },
};

/// What the interactions endpoint answers with on success.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionReply {
    /// Echo of the `url_verification` challenge.
    Challenge(String),
    /// Answer to a view submission.
    Submission(ViewSubmissionResponse),
}

/// Handle one decoded interaction callback.
///
/// The confirmation goes to the origin channel, falling back to the submitting user when
/// that post fails. The ticket is created before the confirmation is posted, so a failed
/// post still leaves the ticket behind; that failure is reported as an error all the same.
#[instrument(skip_all)]
pub async fn handle_interaction(payload: InteractionPayload, config: &Config, tracker: &TrackerClient, chat: &ChatClient) -> RelayResult<InteractionReply> {
    let (user, view) = match payload {
        InteractionPayload::UrlVerification { challenge } => return Ok(InteractionReply::Challenge(challenge)),
        InteractionPayload::ViewSubmission { user, view } => (user, view),
        InteractionPayload::Unsupported => return Err(RelayError::UnsupportedInteraction("payload".to_string())),
    };

    if view.callback_id != TICKET_MODAL_CALLBACK_ID {
        return Err(RelayError::UnsupportedInteraction(format!("callback `{}`", view.callback_id)));
    }

    let state = &view.state;
    let summary = state.text(SUMMARY_BLOCK, SUMMARY_ACTION);
    let description = state.text(DESCRIPTION_BLOCK, DESCRIPTION_ACTION);

    let (Some(summary), Some(description)) = (summary, description) else {
        let mut errors = BTreeMap::new();

        if summary.is_none() {
            errors.insert(SUMMARY_BLOCK.to_string(), "Título é obrigatório".to_string());
        }

        if description.is_none() {
            errors.insert(DESCRIPTION_BLOCK.to_string(), "Descrição é obrigatória".to_string());
        }

        warn!("Rejected submission with missing fields: {:?}", errors.keys());

        return Ok(InteractionReply::Submission(ViewSubmissionResponse::Errors { errors }));
    };

    let issue = NewIssue {
        summary: summary.to_string(),
        description: Description::document(description),
        issue_type: config.tracker_issue_type(state.selected(ISSUE_TYPE_BLOCK, ISSUE_TYPE_ACTION)).to_string(),
        assignee_email: None,
        priority: state.selected(PRIORITY_BLOCK, PRIORITY_ACTION).map(str::to_string),
    };

    let created = tracker.create_issue(&issue).await?;
    let url = tracker::issue_url(&config.jira_base_url, &created.key);

    info!("Ticket `{}` created from modal submission.", created.key);

    let message = ChatResponse::success_card(&created.key, &issue.summary, &url);

    if view.private_metadata.is_empty() {
        chat.post_message(&user.id, &message).await?;
    } else if let Err(err) = chat.post_message(&view.private_metadata, &message).await {
        // e.g. `not_in_channel`; a direct message to the submitter needs no membership.
        warn!("Confirmation for `{}` not delivered to `{}`, sending to `{}`: {}", created.key, view.private_metadata, user.id, err);
        chat.post_message(&user.id, &message).await?;
    }

    Ok(InteractionReply::Submission(ViewSubmissionResponse::Clear))
}

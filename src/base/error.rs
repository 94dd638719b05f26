//! Error taxonomy shared by the clients and the webhook handlers.

use thiserror::Error;

pub type RelayResult<T> = Result<T, RelayError>;

/// Errors surfaced while relaying a command or interaction.
///
/// Each variant maps onto one controlled HTTP status at the handler boundary, and the
/// message text is passed through to the chat platform for operator visibility.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Missing or malformed command input.
    #[error("{0}")]
    Validation(String),
    /// The issue tracker answered with a non-2xx status, or could not be reached.
    #[error("Jira request failed: {0}")]
    Tracker(String),
    /// The chat platform rejected a call, or could not be reached.
    #[error("Slack request failed: {0}")]
    ChatDelivery(String),
    /// A slash command other than the one this relay answers to.
    #[error("Comando não reconhecido: {0}")]
    UnknownCommand(String),
    /// An interaction payload this relay does not handle.
    #[error("Tipo de interação não suportado: {0}")]
    UnsupportedInteraction(String),
}

impl RelayError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn tracker(message: impl Into<String>) -> Self {
        Self::Tracker(message.into())
    }

    pub fn chat_delivery(message: impl Into<String>) -> Self {
        Self::ChatDelivery(message.into())
    }
}

pub mod payload;
pub mod slack;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::error::RelayResult;

use payload::{ChatResponse, ModalView};

// Traits.

/// Generic "chat" trait that clients must implement.
///
/// This trait defines the outbound calls the relay makes against a chat platform
/// like Slack. Neither call is retried; the caller decides whether a delivery
/// failure is fatal to the request it is serving.
#[async_trait]
pub trait GenericChatClient: Send + Sync + 'static {
    /// Open a modal view.
    ///
    /// The trigger ID is single-use and short-lived; an expired one makes the
    /// call fail with a delivery error.
    async fn open_modal(&self, trigger_id: &str, view: &ModalView) -> RelayResult<()>;

    /// Post a message to a channel, or to a user's direct-message channel.
    async fn post_message(&self, channel_id: &str, message: &ChatResponse) -> RelayResult<()>;
}

// Structs.

/// Chat client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct ChatClient {
    inner: Arc<dyn GenericChatClient>,
}

impl Deref for ChatClient {
    type Target = dyn GenericChatClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl ChatClient {
    pub fn new(inner: Arc<dyn GenericChatClient>) -> Self {
        Self { inner }
    }
}

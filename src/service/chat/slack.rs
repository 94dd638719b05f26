//! Slack Web API implementation of the chat client.
//!
//! Calls `views.open` and `chat.postMessage` with the bot token. Slack reports most
//! failures as HTTP 200 with `"ok": false`, so both the status and the envelope are checked.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::base::{
    config::Config,
    error::{RelayError, RelayResult},
    types::Res,
};

use super::{
    ChatClient, GenericChatClient,
    payload::{ChatResponse, ModalView},
};

// Extra methods on `ChatClient` applied by the slack implementation.

impl ChatClient {
    /// Creates a new Slack chat client.
    pub fn slack(config: &Config) -> Res<Self> {
        let client = SlackChatClient::new(config)?;
        Ok(Self { inner: Arc::new(client) })
    }
}

// Wire types.

#[derive(Serialize)]
struct ViewsOpenRequest<'a> {
    trigger_id: &'a str,
    view: &'a ModalView,
}

#[derive(Serialize)]
struct PostMessageRequest<'a> {
    channel: &'a str,
    #[serde(flatten)]
    message: &'a ChatResponse,
}

/// The `{"ok": ..., "error": ...}` envelope every Web API method answers with.
#[derive(Deserialize)]
struct ApiEnvelope {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

// Structs.

/// Slack client implementation.
#[derive(Clone)]
pub struct SlackChatClient {
    client: Client,
    api_base_url: String,
    bot_token: String,
}

impl SlackChatClient {
    /// Create a new Slack chat client.
    #[instrument(name = "SlackChatClient::new", skip_all)]
    pub fn new(config: &Config) -> Res<Self> {
        let client = Client::builder().timeout(config.http_timeout()).build()?;

        Ok(Self {
            client,
            api_base_url: config.slack_api_base_url.trim_end_matches('/').to_string(),
            bot_token: config.slack_bot_token.clone(),
        })
    }

    /// Call a Web API method with a JSON body and check both the status and the envelope.
    async fn call<B: Serialize + Sync>(&self, method: &str, body: &B) -> RelayResult<()> {
        let url = format!("{}/{}", self.api_base_url, method);

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.bot_token)
            .json(body)
            .send()
            .await
            .map_err(|e| RelayError::chat_delivery(format!("{method}: {e}")))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| RelayError::chat_delivery(format!("{method}: {e}")))?;

        if !status.is_success() {
            warn!("Slack `{}` answered {}: {}", method, status, text);
            return Err(RelayError::chat_delivery(format!("{method} returned {status}: {text}")));
        }

        let envelope: ApiEnvelope = serde_json::from_str(&text).map_err(|e| RelayError::chat_delivery(format!("{method} returned an unreadable body: {e}")))?;

        if !envelope.ok {
            let error = envelope.error.unwrap_or_else(|| "unknown_error".to_string());
            warn!("Slack `{}` failed: {}", method, error);
            return Err(RelayError::chat_delivery(format!("{method} failed: {error}")));
        }

        Ok(())
    }
}

#[async_trait]
impl GenericChatClient for SlackChatClient {
    #[instrument(skip(self, view))]
    async fn open_modal(&self, trigger_id: &str, view: &ModalView) -> RelayResult<()> {
        self.call("views.open", &ViewsOpenRequest { trigger_id, view }).await?;

        info!("Opened modal `{}`.", view.callback_id);

        Ok(())
    }

    #[instrument(skip(self, message))]
    async fn post_message(&self, channel_id: &str, message: &ChatResponse) -> RelayResult<()> {
        self.call("chat.postMessage", &PostMessageRequest { channel: channel_id, message }).await
    }
}

// Tests.

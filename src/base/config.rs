//! Load configuration via `config` crate with env-override support.

use std::{collections::BTreeMap, ops::Deref, sync::Arc, time::Duration};

use serde::Deserialize;

use super::types::{Res, Void};

/// Default socket address for the webhook listener.
fn default_bind_address() -> String {
    "0.0.0.0:3000".to_string()
}

/// Default Slack Web API base URL.
fn default_slack_api_base_url() -> String {
    "https://slack.com/api".to_string()
}

/// Default slash command accepted by the command endpoint.
fn default_command_name() -> String {
    "/criar-ticket".to_string()
}

/// Default issue type used when a submission does not pick one.
fn default_issue_type() -> String {
    "Task".to_string()
}

/// Default timeout for outbound HTTP calls, in seconds.
fn default_http_timeout_secs() -> u64 {
    10
}

/// How the command endpoint reacts to a valid slash command.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CommandMode {
    /// Open the ticket form and defer creation to the interaction endpoint.
    #[default]
    Modal,
    /// Parse the command text and create the ticket in the same request.
    Direct,
}

/// What the command parser does with empty command text.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmptyCommandPolicy {
    /// Fall back to the placeholder summary and description.
    #[default]
    Default,
    /// Report a validation error to the caller.
    Reject,
}

/// Configuration for the ticket relay.
#[derive(Debug, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl From<ConfigInner> for Config {
    fn from(inner: ConfigInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ConfigInner {
    /// Jira site base URL, e.g. `https://acme.atlassian.net` (`TICKET_RELAY_JIRA_BASE_URL`).
    pub jira_base_url: String,
    /// Jira account email used for basic auth (`TICKET_RELAY_JIRA_EMAIL`).
    pub jira_email: String,
    /// Jira API token used for basic auth (`TICKET_RELAY_JIRA_API_TOKEN`).
    pub jira_api_token: String,
    /// Project every ticket is filed under (`TICKET_RELAY_JIRA_PROJECT_KEY`).
    pub jira_project_key: String,
    /// Slack bot token (`TICKET_RELAY_SLACK_BOT_TOKEN`).
    pub slack_bot_token: String,
    /// Address the webhook listener binds to (`TICKET_RELAY_BIND_ADDRESS`).
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Slack Web API base URL (`TICKET_RELAY_SLACK_API_BASE_URL`).
    #[serde(default = "default_slack_api_base_url")]
    pub slack_api_base_url: String,
    /// Slash command name the relay answers to (`TICKET_RELAY_COMMAND_NAME`).
    #[serde(default = "default_command_name")]
    pub command_name: String,
    /// Modal or direct ticket creation (`TICKET_RELAY_COMMAND_MODE`).
    #[serde(default)]
    pub command_mode: CommandMode,
    /// Handling of empty command text, in either mode (`TICKET_RELAY_EMPTY_COMMAND_POLICY`).
    #[serde(default)]
    pub empty_command_policy: EmptyCommandPolicy,
    /// Issue type used when none is selected (`TICKET_RELAY_DEFAULT_ISSUE_TYPE`).
    #[serde(default = "default_issue_type")]
    pub default_issue_type: String,
    /// Jira issue type filed for each modal issue-type choice (`[issue_types]` table).
    /// Choices without an entry file as `default_issue_type`.
    #[serde(default)]
    pub issue_types: BTreeMap<String, String>,
    /// Timeout applied to every outbound HTTP request (`TICKET_RELAY_HTTP_TIMEOUT_SECS`).
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

impl ConfigInner {
    /// The outbound HTTP timeout as a [`Duration`].
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Jira issue type for a modal choice; keys match case-insensitively.
    pub fn tracker_issue_type(&self, choice: Option<&str>) -> &str {
        let Some(choice) = choice.map(str::to_lowercase) else {
            return &self.default_issue_type;
        };

        self.issue_types
            .iter()
            .find(|(label, _)| label.to_lowercase() == choice)
            .map(|(_, issue_type)| issue_type.as_str())
            .unwrap_or(&self.default_issue_type)
    }
}

impl Config {
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder().add_source(config::Environment::default().prefix("TICKET_RELAY"));

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        result.validate()?;

        Ok(result)
    }

    /// Rejects blank secrets and out-of-range values so a bad deployment fails at startup.
    pub fn validate(&self) -> Void {
        let required = [
            ("jira_base_url", &self.jira_base_url),
            ("jira_email", &self.jira_email),
            ("jira_api_token", &self.jira_api_token),
            ("jira_project_key", &self.jira_project_key),
            ("slack_bot_token", &self.slack_bot_token),
        ];

        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(anyhow::anyhow!("Configuration value `{name}` is required."));
            }
        }

        if let Some((label, _)) = self.issue_types.iter().find(|(_, issue_type)| issue_type.trim().is_empty()) {
            return Err(anyhow::anyhow!("Issue type mapped from `{label}` must not be blank."));
        }

        if !self.command_name.starts_with('/') {
            return Err(anyhow::anyhow!("Command name must start with `/`."));
        }

        if self.http_timeout_secs < 1 || self.http_timeout_secs > 120 {
            return Err(anyhow::anyhow!("HTTP timeout must be between 1 and 120 seconds."));
        }

        Ok(())
    }
}

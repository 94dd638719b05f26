//! Library root for `ticket-relay`.
//!
//! Ticket-relay turns a Slack slash command into a Jira ticket:
//! - Opens a ticket form (or parses the command text directly)
//! - Files the ticket under the configured Jira project
//! - Confirms back in Slack with a link to the new ticket
//!
//! The relay is stateless; every request is handled on its own against the
//! outbound clients, which sit behind traits so they can be swapped or mocked.

pub mod base;
pub mod interaction;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up the outbound clients and serves the webhook routes.
pub async fn start(config: Config) -> Void {
    info!("Starting ticket-relay ...");

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config)?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}

//! Runtime services and shared state for the ticket relay.

use tokio::net::TcpListener;
use tracing::{error, info, instrument};

use crate::{
    base::{
        config::Config,
        types::{Res, Void},
    },
    interaction::routes,
    service::{chat::ChatClient, tracker::TrackerClient},
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the configuration and the outbound clients. It is designed
/// to be trivially cloneable, so it serves directly as the router state.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The issue tracker client instance.
    pub tracker: TrackerClient,
    /// The chat client instance.
    pub chat: ChatClient,
}

impl Runtime {
    /// Create a new runtime instance.
    #[instrument(skip_all)]
    pub fn new(config: Config) -> Res<Self> {
        // Initialize the tracker client.
        let tracker = TrackerClient::jira(&config)?;

        // Initialize the chat client.
        let chat = ChatClient::slack(&config)?;

        Ok(Self { config, tracker, chat })
    }

    /// Bind the listener and serve the webhooks until Ctrl-C.
    pub async fn start(&self) -> Void {
        let listener = TcpListener::bind(&self.config.bind_address).await?;

        info!("Listening on {} ...", listener.local_addr()?);

        axum::serve(listener, routes::router(self.clone()))
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

/// Resolves on Ctrl-C. If the handler cannot be installed, the server keeps running.
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Unable to listen for Ctrl-C, graceful shutdown disabled: {}", err);
        std::future::pending::<()>().await;
    }

    info!("Shutting down ...");
}

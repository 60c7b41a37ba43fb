//! Runtime services and shared state for chat-hvac.

use tracing::{error, info, instrument};

use crate::{
    base::{
        config::{AdapterKind, Config},
        types::{Res, Void},
    },
    interaction::dispatcher::Dispatcher,
    service::{chat::ChatClient, health, hvac::HvacClient},
};

/// Runtime service context.
///
/// Holds the configuration and the services, and owns the dispatcher that ties
/// them together.
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The chat client instance.
    pub chat: ChatClient,
    /// The device client instance.
    pub hvac: HvacClient,
    /// The command dispatcher.
    pub dispatcher: Dispatcher,
}

impl Runtime {
    /// Create a new runtime instance.
    #[instrument(skip_all)]
    pub async fn new(config: Config) -> Res<Self> {
        // Initialize the device client.
        let hvac = HvacClient::intesis(&config);

        // Initialize the chat client.
        let chat = match config.adapter {
            AdapterKind::Console => ChatClient::console(),
            AdapterKind::Slack => ChatClient::slack(&config).await?,
        };

        Self::with_services(config, chat, hvac)
    }

    /// Create a runtime around already constructed services.
    pub fn with_services(config: Config, chat: ChatClient, hvac: HvacClient) -> Res<Self> {
        let dispatcher = Dispatcher::new(chat.clone(), hvac.clone())?.with_threaded_replies(config.threaded_replies);

        Ok(Self { config, chat, hvac, dispatcher })
    }

    /// Serves the health endpoint and dispatches chat events until shutdown.
    ///
    /// Ctrl-C requests a shutdown, just like the `shutdown` chat command.
    pub async fn start(&self) -> Void {
        health::start(&self.config.health_listen).await?;

        let shutdown = self.dispatcher.shutdown_handle();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Received Ctrl-C.");
                    shutdown.trigger();
                }
                Err(err) => error!("Unable to listen for Ctrl-C: {}", err),
            }
        });

        self.dispatcher.run().await
    }
}

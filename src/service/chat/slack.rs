//! Slack chat service integration for chat-hvac.
//!
//! This module connects to Slack in socket mode:
//! - Receiving `app_mention` events and forwarding them to the dispatcher
//! - Posting replies, optionally threaded under the mention
//!
//! The listener environment carries the event channel as its user state, so the
//! free-standing socket mode callbacks never need global state.

use crate::base::{
    config::Config,
    types::{Event, Message, Res, Void},
};
use anyhow::anyhow;
use async_trait::async_trait;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use slack_morphism::prelude::*;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, instrument, warn};

use std::sync::Arc;

use super::{ChatClient, GenericChatClient};

// Type aliases.

type FullClient = slack_morphism::SlackClient<SlackClientHyperConnector<HttpsConnector<HttpConnector>>>;
type Listener = SlackClientSocketModeListener<SlackClientHyperConnector<HttpsConnector<HttpConnector>>>;

// Extra methods on `ChatClient` applied by the slack implementation.

impl ChatClient {
    /// Creates a new Slack chat client.
    pub async fn slack(config: &Config) -> Res<Self> {
        let client = SlackChatClient::new(config).await?;
        Ok(Self { inner: Arc::new(client) })
    }
}

impl From<SlackChatClient> for ChatClient {
    fn from(client: SlackChatClient) -> Self {
        Self { inner: Arc::new(client) }
    }
}

// Structs.

/// User state for the slack socket client.
struct SlackUserState {
    output: mpsc::Sender<Event>,
}

/// Slack client implementation.
pub struct SlackChatClient {
    app_token: SlackApiToken,
    bot_token: SlackApiToken,
    client: Arc<FullClient>,
    listener: Mutex<Option<Arc<Listener>>>,
}

impl SlackChatClient {
    /// Create a new Slack chat client.
    ///
    /// Verifies the bot token against the Slack API, so a bad token fails here
    /// rather than on the first reply.
    #[instrument(name = "SlackChatClient::new", skip_all)]
    pub async fn new(config: &Config) -> Res<Self> {
        // Initialize tokens.

        let app_token = SlackApiToken::new(SlackApiTokenValue(config.slack_app_token.clone()));
        let bot_token = SlackApiToken::new(SlackApiTokenValue(config.slack_bot_token.clone()));

        // Initialize the Slack client.

        let https_connector = HttpsConnector::<HttpConnector>::builder().with_native_roots()?.https_only().enable_all_versions().build();
        let connector = SlackClientHyperConnector::with_connector(https_connector);
        let client = Arc::new(slack_morphism::SlackClient::new(connector));

        // Check the bot token.

        let session = client.open_session(&bot_token);
        let bot_user = session.auth_test().await?;

        info!("Slack bot user ID: {}", bot_user.user_id.0);

        Ok(Self {
            app_token,
            bot_token,
            client,
            listener: Mutex::new(None),
        })
    }
}

#[async_trait]
impl GenericChatClient for SlackChatClient {
    async fn listen(&self, output: mpsc::Sender<Event>) -> Void {
        let mut listener = self.listener.lock().await;

        if listener.is_some() {
            return Err(anyhow!("Slack client is already listening."));
        }

        // Initialize the socket mode listener.

        let socket_mode_callbacks = SlackSocketModeListenerCallbacks::new().with_push_events(handle_push_event);

        let listener_environment = Arc::new(SlackClientEventsListenerEnvironment::new(self.client.clone()).with_user_state(SlackUserState { output }));

        let socket_mode_listener = Arc::new(SlackClientSocketModeListener::new(
            &SlackClientSocketModeConfig::new(),
            listener_environment,
            socket_mode_callbacks,
        ));

        // Register an app token to listen for events, then open the WS connections
        // in the background; `shutdown` closes them.
        socket_mode_listener.listen_for(&self.app_token).await?;
        socket_mode_listener.start().await;

        info!("Slack socket mode listener started.");

        *listener = Some(socket_mode_listener);

        Ok(())
    }

    #[instrument(skip(self))]
    async fn say(&self, message: &Message) -> Void {
        let content = SlackMessageContent::new().with_text(message.text.clone());

        let mut request = SlackApiChatPostMessageRequest::new(SlackChannelId(message.channel.clone()), content);

        if message.threaded {
            request = request.with_thread_ts(SlackTs(message.timestamp.clone()));
        }

        let session = self.client.open_session(&self.bot_token);

        let _ = session.chat_post_message(&request).await.map_err(|e| anyhow!("Failed to send message: {}", e))?;

        Ok(())
    }

    async fn shutdown(&self) {
        info!("Shutting down slack adapter ...");

        if let Some(listener) = self.listener.lock().await.take() {
            listener.shutdown().await;
        }
    }
}

// Socket mode listener callbacks for Slack.

/// Converts an app mention into a chat event.
fn mention_event(event: SlackAppMentionEvent) -> Event {
    Event::mention(event.user.0, event.content.text.unwrap_or_default(), event.channel.0, event.origin.ts.0)
}

/// Handles push events from Slack.
#[instrument(skip_all)]
async fn handle_push_event(event_callback: SlackPushEventCallback, _client: Arc<SlackHyperClient>, states: SlackClientEventsUserState) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let output = {
        let states = states.read().await;
        let user_state = states.get_user_state::<SlackUserState>().ok_or(anyhow!("Failed to get user state"))?;
        user_state.output.clone()
    };

    match event_callback.event {
        SlackEventCallbackBody::AppMention(slack_app_mention_event) => {
            info!("Received app mention event ...");

            if output.send(mention_event(slack_app_mention_event)).await.is_err() {
                warn!("Dropping app mention because the dispatcher has stopped.");
            }
        }
        _ => {
            debug!("Received unhandled push event.")
        }
    }

    Ok(())
}

//! Routes inbound mentions to command handlers.
//!
//! The dispatcher owns an ordered list of [`Signature`]s. For every event it
//! scans the list front to back and runs the first handler whose pattern
//! matches, so more general patterns must be registered after the specific
//! ones they would otherwise swallow.

use std::{future::Future, sync::Arc};

use futures::{FutureExt, future::BoxFuture};
use regex::Regex;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    base::{
        shutdown::ShutdownHandle,
        types::{Event, Message, Res, Void},
    },
    service::{chat::ChatClient, hvac::HvacClient},
};

use super::handlers;

/// Capacity of the channel between the chat adapter and the dispatcher.
const EVENT_BUFFER: usize = 64;

// Types.

/// A boxed command handler.
pub type Handler = Arc<dyn Fn(HandlerContext, Event, Captures) -> BoxFuture<'static, Void> + Send + Sync>;

/// Capture groups of a matched pattern. Group `0` is the whole match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captures(Vec<String>);

impl Captures {
    /// Returns group `index`, or `""` if the group did not participate.
    pub fn get(&self, index: usize) -> &str {
        self.0.get(index).map(String::as_str).unwrap_or_default()
    }
}

impl From<regex::Captures<'_>> for Captures {
    fn from(caps: regex::Captures<'_>) -> Self {
        Self(caps.iter().map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default()).collect())
    }
}

/// A pattern and the handler to run when it matches.
#[derive(Clone)]
pub struct Signature {
    pattern: Regex,
    handler: Handler,
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signature").field("pattern", &self.pattern.as_str()).finish_non_exhaustive()
    }
}

impl Signature {
    /// Compiles `pattern` and pairs it with `handler`.
    pub fn new<F, Fut>(pattern: &str, handler: F) -> Res<Self>
    where
        F: Fn(HandlerContext, Event, Captures) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Void> + Send + 'static,
    {
        let pattern = Regex::new(pattern)?;
        let handler: Handler = Arc::new(move |context, event, captures| handler(context, event, captures).boxed());

        Ok(Self { pattern, handler })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Matches `text` anywhere (the pattern is not anchored).
    pub fn captures(&self, text: &str) -> Option<Captures> {
        self.pattern.captures(text).map(Captures::from)
    }
}

/// Everything a handler may touch.
#[derive(Clone)]
pub struct HandlerContext {
    pub chat: ChatClient,
    pub hvac: HvacClient,
    pub shutdown: ShutdownHandle,
    /// Whether replies are threaded under the mention.
    pub threaded: bool,
}

impl HandlerContext {
    /// Sends `text` back to the channel `event` came from.
    pub async fn reply(&self, event: &Event, text: String) -> Void {
        let message = Message::reply(event, text, self.threaded);
        self.chat.say(&message).await
    }
}

// Structs.

/// The command dispatcher.
///
/// Registration takes `&mut self` and `run` takes `&self`, so the signature
/// list cannot change once dispatching has started.
pub struct Dispatcher {
    context: HandlerContext,
    signatures: Vec<Signature>,
}

impl Dispatcher {
    /// Creates a dispatcher with the default command table.
    pub fn new(chat: ChatClient, hvac: HvacClient) -> Res<Self> {
        let mut dispatcher = Self::empty(chat, hvac);

        for signature in handlers::default_signatures()? {
            dispatcher.register(signature);
        }

        Ok(dispatcher)
    }

    /// Creates a dispatcher with no signatures.
    pub fn empty(chat: ChatClient, hvac: HvacClient) -> Self {
        Self {
            context: HandlerContext {
                chat,
                hvac,
                shutdown: ShutdownHandle::new(),
                threaded: false,
            },
            signatures: Vec::new(),
        }
    }

    /// Sets whether replies are threaded under the mention.
    pub fn with_threaded_replies(mut self, threaded: bool) -> Self {
        self.context.threaded = threaded;
        self
    }

    /// Appends `signature`; it is tried after every signature registered before it.
    pub fn register(&mut self, signature: Signature) {
        info!("Registering signature: {}", signature.pattern());
        self.signatures.push(signature);
    }

    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    /// A handle that stops `run` when triggered.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.context.shutdown.clone()
    }

    /// Requests the run loop to stop. Idempotent.
    pub fn shutdown(&self) {
        info!("Shutdown requested.");
        self.context.shutdown.trigger();
    }

    /// Finds the first signature matching `text`, with its captures.
    pub fn find(&self, text: &str) -> Option<(&Signature, Captures)> {
        self.signatures.iter().find_map(|signature| signature.captures(text).map(|captures| (signature, captures)))
    }

    /// Starts the chat adapter and dispatches its events until shutdown.
    ///
    /// Events are handled one at a time, in arrival order. Once a shutdown has
    /// been requested no further events are dispatched, even ones already
    /// queued. The adapter closing its stream counts as a shutdown request.
    #[instrument(name = "Dispatcher::run", skip_all)]
    pub async fn run(&self) -> Void {
        info!("Launching event listener ...");

        let (tx, mut rx) = mpsc::channel(EVENT_BUFFER);
        self.context.chat.listen(tx).await?;

        let shutdown = self.context.shutdown.clone();

        info!("Awaiting events ...");

        loop {
            tokio::select! {
                biased;
                _ = shutdown.wait() => break,
                event = rx.recv() => match event {
                    Some(event) => self.dispatch(event).await,
                    None => {
                        warn!("Event stream closed.");
                        shutdown.trigger();
                        break;
                    }
                }
            }
        }

        info!("Shutting down ...");
        self.context.chat.shutdown().await;

        Ok(())
    }

    /// Runs the first matching handler for `event`.
    ///
    /// Handler errors are logged; they never stop the dispatcher.
    #[instrument(skip_all, fields(channel = %event.channel, user = %event.user))]
    pub async fn dispatch(&self, event: Event) {
        debug!("Received event: {:?}", event);

        let Some((signature, captures)) = self.find(&event.text) else {
            warn!("Ignored unhandled event: {:?}", event);
            return;
        };

        debug!("Matched signature: {}", signature.pattern());

        if let Err(err) = (signature.handler)(self.context.clone(), event, captures).await {
            error!("Error while handling: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::service::{
        chat::GenericChatClient,
        hvac::{GenericHvacClient, status::HvacStatus},
    };

    struct NullChat;

    #[async_trait]
    impl GenericChatClient for NullChat {
        async fn listen(&self, _output: mpsc::Sender<Event>) -> Void {
            Ok(())
        }

        async fn say(&self, _message: &Message) -> Void {
            Ok(())
        }

        async fn shutdown(&self) {}
    }

    struct NullHvac;

    #[async_trait]
    impl GenericHvacClient for NullHvac {
        async fn status(&self) -> Res<HvacStatus> {
            Ok(HvacStatus::default())
        }

        async fn set(&self, _param: &str, _value: &str) -> Res<String> {
            Ok(String::new())
        }
    }

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(ChatClient::new(Arc::new(NullChat)), HvacClient::new(Arc::new(NullHvac))).unwrap()
    }

    fn matched(dispatcher: &Dispatcher, text: &str) -> Option<(String, Captures)> {
        dispatcher.find(text).map(|(signature, captures)| (signature.pattern().to_string(), captures))
    }

    #[test]
    fn default_table_order() {
        let patterns = dispatcher().signatures().iter().map(|s| s.pattern().to_string()).collect::<Vec<_>>();

        assert_eq!(
            patterns,
            vec![
                handlers::SET_PATTERN,
                handlers::STATUS_PATTERN,
                handlers::HELP_PATTERN,
                handlers::PING_PATTERN,
                handlers::SHUTDOWN_PATTERN,
                handlers::DEFAULT_PATTERN,
            ]
        );
    }

    #[test]
    fn set_captures_key_and_value() {
        let (pattern, captures) = matched(&dispatcher(), "<@U123> set power on").unwrap();

        assert_eq!(pattern, handlers::SET_PATTERN);
        assert_eq!(captures.get(1), "<@U123>");
        assert_eq!(captures.get(2), "power");
        assert_eq!(captures.get(3), "on");
    }

    #[test]
    fn routes_each_command() {
        let dispatcher = dispatcher();

        assert_eq!(matched(&dispatcher, "@hvac status").unwrap().0, handlers::STATUS_PATTERN);
        assert_eq!(matched(&dispatcher, "@hvac state").unwrap().0, handlers::STATUS_PATTERN);
        assert_eq!(matched(&dispatcher, "@hvac help").unwrap().0, handlers::HELP_PATTERN);
        assert_eq!(matched(&dispatcher, "@hvac hello").unwrap().0, handlers::PING_PATTERN);
        assert_eq!(matched(&dispatcher, "@hvac shutdown").unwrap().0, handlers::SHUTDOWN_PATTERN);
        assert_eq!(matched(&dispatcher, "@hvac make it warmer").unwrap().0, handlers::DEFAULT_PATTERN);
    }

    #[test]
    fn set_wins_over_later_patterns() {
        // Also matches the status pattern, but set is registered first.
        let (pattern, captures) = matched(&dispatcher(), "@hvac set mode status").unwrap();

        assert_eq!(pattern, handlers::SET_PATTERN);
        assert_eq!(captures.get(3), "status");
    }

    #[test]
    fn commands_are_case_sensitive() {
        assert_eq!(matched(&dispatcher(), "@hvac STATUS").unwrap().0, handlers::DEFAULT_PATTERN);
    }

    #[test]
    fn bare_mention_matches_nothing() {
        assert!(matched(&dispatcher(), "@hvac").is_none());
    }

    #[test]
    fn missing_group_reads_empty() {
        let captures = Captures(vec!["all".to_string()]);

        assert_eq!(captures.get(0), "all");
        assert_eq!(captures.get(5), "");
    }
}

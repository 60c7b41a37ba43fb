pub mod console;
pub mod slack;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::base::types::{Event, Message, Void};

// Traits.

/// Generic "chat" trait that clients must implement.
///
/// This trait defines the core functionality for interacting with chat platforms
/// like Slack. Implementing this trait allows different chat services to be used
/// with chat-hvac.
#[async_trait]
pub trait GenericChatClient: Send + Sync + 'static {
    /// Start producing mention events onto `output`.
    ///
    /// Returns once the listener is up; events keep arriving in the background
    /// until `shutdown` is called or the underlying source is exhausted, at
    /// which point `output` is dropped.
    async fn listen(&self, output: mpsc::Sender<Event>) -> Void;

    /// Deliver a reply.
    ///
    /// When `message.threaded` is set, the reply is anchored to
    /// `message.timestamp`.
    async fn say(&self, message: &Message) -> Void;

    /// Stop producing events and release the underlying connection.
    async fn shutdown(&self);
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

//! Shared result aliases and the chat event types.

use serde::{Deserialize, Serialize};

/// The error type used throughout the crate.
pub type Err = anyhow::Error;
/// Result alias over [`Err`].
pub type Res<T> = Result<T, Err>;
/// Result of an operation with no value.
pub type Void = Res<()>;

/// The kinds of inbound chat events the bot reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// The bot was @-mentioned.
    AppMention,
}

/// An inbound chat event, as produced by a chat adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// The user that sent the message.
    pub user: String,
    /// The raw message text, including the @-mention.
    pub text: String,
    /// What kind of event this is.
    pub kind: EventKind,
    /// The channel the message was sent in.
    pub channel: String,
    /// Platform timestamp of the message (opaque, used for threading).
    pub timestamp: String,
}

impl Event {
    /// Creates a new app mention event.
    pub fn mention(user: impl Into<String>, text: impl Into<String>, channel: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            text: text.into(),
            kind: EventKind::AppMention,
            channel: channel.into(),
            timestamp: timestamp.into(),
        }
    }
}

/// An outbound reply, delivered through a chat adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The reply text.
    pub text: String,
    /// The channel to reply in.
    pub channel: String,
    /// Timestamp of the message to thread against.
    pub timestamp: String,
    /// Whether the reply should be anchored to `timestamp` as a thread reply.
    pub threaded: bool,
}

impl Message {
    /// Builds a reply to `event` in the same channel.
    pub fn reply(event: &Event, text: impl Into<String>, threaded: bool) -> Self {
        Self {
            text: text.into(),
            channel: event.channel.clone(),
            timestamp: event.timestamp.clone(),
            threaded,
        }
    }
}

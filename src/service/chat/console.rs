//! Interactive console chat client.
//!
//! Every line read from the input is treated as an @-mention of the bot, and
//! replies are printed to stdout. Useful for poking at the bot without a Slack
//! workspace.

use std::{
    io::BufRead,
    sync::{Arc, Mutex},
};

use anyhow::anyhow;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{Span, debug, error, info, instrument};

use crate::base::{
    shutdown::ShutdownHandle,
    types::{Event, Message, Void},
};

use super::{ChatClient, GenericChatClient};

/// Channel name reported for console events.
pub const CONSOLE_CHANNEL: &str = "stdin";

// Type aliases.

type Input = Box<dyn BufRead + Send>;

// Extra methods on `ChatClient` applied by the console implementation.

impl ChatClient {
    /// Creates a new console chat client reading from stdin.
    pub fn console() -> Self {
        Self::from(ConsoleChatClient::stdin())
    }
}

impl From<ConsoleChatClient> for ChatClient {
    fn from(client: ConsoleChatClient) -> Self {
        Self { inner: Arc::new(client) }
    }
}

// Structs.

/// Console client implementation.
///
/// Input is read on a dedicated OS thread. A blocked read cannot be cancelled,
/// and the thread must not keep the process alive once the bot has stopped.
pub struct ConsoleChatClient {
    input: Mutex<Option<Input>>,
    shutdown: ShutdownHandle,
}

impl ConsoleChatClient {
    /// Create a console client reading from stdin.
    pub fn stdin() -> Self {
        Self::with_input(std::io::BufReader::new(std::io::stdin()))
    }

    /// Create a console client reading from an arbitrary line source.
    pub fn with_input(input: impl BufRead + Send + 'static) -> Self {
        info!("Using console adapter.");

        Self {
            input: Mutex::new(Some(Box::new(input))),
            shutdown: ShutdownHandle::new(),
        }
    }
}

/// Builds the event for one line of console input.
fn console_event(line: String) -> Event {
    let user = std::env::var("USER").unwrap_or_default();
    let timestamp = chrono::Utc::now().timestamp().to_string();

    Event::mention(user, line, CONSOLE_CHANNEL, timestamp)
}

/// Formats a reply for the terminal.
pub fn render(message: &Message) -> String {
    format!(">> ({}) {}", message.channel, message.text)
}

/// Forwards input lines until the input ends, the receiver goes away, or a
/// shutdown is requested.
fn read_lines(input: Input, output: mpsc::Sender<Event>, shutdown: ShutdownHandle) {
    info!("Setting up console listener loop ...");

    for line in input.lines() {
        if shutdown.is_triggered() {
            info!("Received close, shutting down.");
            break;
        }

        match line {
            Ok(line) if line.trim().is_empty() => debug!("Skipping empty line."),
            Ok(line) => {
                if output.blocking_send(console_event(line)).is_err() {
                    break;
                }
            }
            Err(err) => {
                error!("Error reading from console input: {}", err);
                break;
            }
        }
    }

    info!("Console listener ending.");
}

#[async_trait]
impl GenericChatClient for ConsoleChatClient {
    #[instrument(skip_all)]
    async fn listen(&self, output: mpsc::Sender<Event>) -> Void {
        let input = self
            .input
            .lock()
            .map_err(|_| anyhow!("Console input lock poisoned."))?
            .take()
            .ok_or_else(|| anyhow!("Console is already listening."))?;

        let shutdown = self.shutdown.clone();
        let span = Span::current();

        // Detached: the process may exit while this thread is still blocked on a read.
        std::thread::Builder::new()
            .name("console-input".to_string())
            .spawn(move || {
                let _entered = span.enter();
                read_lines(input, output, shutdown);
            })
            .map_err(|e| anyhow!("Unable to start console listener: {}", e))?;

        Ok(())
    }

    async fn say(&self, message: &Message) -> Void {
        println!("{}", render(message));
        Ok(())
    }

    async fn shutdown(&self) {
        info!("Shutting down console adapter ...");
        self.shutdown.trigger();
    }
}

//! Library root for `chat-hvac`.
//!
//! Chat-hvac is a chat bot that controls a single HVAC unit:
//! - Listens for @-mentions on Slack (or lines typed into a console)
//! - Matches them against an ordered table of commands
//! - Reads or changes the unit's state through its HTTP control API
//! - Replies with the result in the same channel
//!
//! The architecture is built around small traits for the chat platform and the
//! device API, so either side can be swapped or mocked.

#[deny(missing_docs)]
pub mod base;
pub mod interaction;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use rustls::crypto;
use tracing::{info, warn};

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the chat-hvac runtime:
/// - Initializes the crypto provider
/// - Creates the runtime context with the chat and device clients
/// - Runs the dispatcher until a shutdown is requested
pub async fn start(config: Config) -> Void {
    info!("Starting chat-hvac with the {} adapter ...", config.adapter);

    // Start the crypto provider.
    if crypto::ring::default_provider().install_default().is_err() {
        warn!("A crypto provider was already installed.");
    }

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config).await?;

    // Start the runtime.
    runtime.start().await?;

    info!("Stopped.");

    Ok(())
}

//! The built-in chat commands.

use tracing::{info, instrument, warn};

use crate::base::types::{Err, Event, Res, Void};

use super::dispatcher::{Captures, HandlerContext, Signature};

pub const SET_PATTERN: &str = "(.+) set (.+) (.+)";
pub const STATUS_PATTERN: &str = "(.+) (status|state)";
pub const HELP_PATTERN: &str = "(.+) help";
pub const PING_PATTERN: &str = "(.+) (ping|hi|hello)";
pub const SHUTDOWN_PATTERN: &str = "(.+) shutdown";
pub const DEFAULT_PATTERN: &str = "(.+) .*";

/// Prefix of every reply that reports a failure.
pub const ERROR_MARKER: &str = ":x:";

pub const HELP_REPLY: &str = "I'm expecting something like\n`@hvac (help|status|set|ping|shutdown) [key] [value]`";
pub const SHUTDOWN_REPLY: &str = "Shutdown command received. Going to sleep now, bye ...";
pub const UNRECOGNIZED_REPLY: &str = "I'm not sure what you are after. :shrug:";

/// The default command table, in match order. The catch-all must stay last.
pub fn default_signatures() -> Res<Vec<Signature>> {
    Ok(vec![
        Signature::new(SET_PATTERN, set)?,
        Signature::new(STATUS_PATTERN, status)?,
        Signature::new(HELP_PATTERN, help)?,
        Signature::new(PING_PATTERN, ping)?,
        Signature::new(SHUTDOWN_PATTERN, shutdown)?,
        Signature::new(DEFAULT_PATTERN, unrecognized)?,
    ])
}

/// Formats a failure as a chat reply.
pub fn error_reply(err: &Err) -> String {
    format!("{ERROR_MARKER} {err:#}")
}

/// `@hvac set <key> <value>`: applies a setting on the device.
#[instrument(skip_all)]
pub async fn set(context: HandlerContext, event: Event, captures: Captures) -> Void {
    let (param, value) = (captures.get(2), captures.get(3));

    info!("Setting {} to {} ...", param, value);

    let reply = match context.hvac.set(param, value).await {
        Ok(body) => format!(":+1: `{body}`"),
        Err(err) => {
            warn!("Set failed: {}", err);
            error_reply(&err)
        }
    };

    context.reply(&event, reply).await
}

/// `@hvac status`: replies with the full device snapshot.
#[instrument(skip_all)]
pub async fn status(context: HandlerContext, event: Event, _captures: Captures) -> Void {
    let reply = match context.hvac.status().await {
        Ok(status) => status.to_string(),
        Err(err) => {
            warn!("Status failed: {}", err);
            error_reply(&err)
        }
    };

    context.reply(&event, reply).await
}

pub async fn help(context: HandlerContext, event: Event, _captures: Captures) -> Void {
    context.reply(&event, HELP_REPLY.to_string()).await
}

/// `@hvac ping|hi|hello`: are you there?
pub async fn ping(context: HandlerContext, event: Event, captures: Captures) -> Void {
    let reply = match captures.get(2) {
        "ping" => "pong",
        "hi" => ":wave:",
        "hello" => "Yes, I'm listening ...",
        _ => "Err, not sure how I ended up here in the ping handler to be honest ... :confused:",
    };

    context.reply(&event, reply.to_string()).await
}

/// `@hvac shutdown`: says goodbye, then stops the dispatcher.
#[instrument(skip_all)]
pub async fn shutdown(context: HandlerContext, event: Event, _captures: Captures) -> Void {
    info!("Shutdown command received from {}.", event.user);

    let result = context.reply(&event, SHUTDOWN_REPLY.to_string()).await;
    context.shutdown.trigger();

    result
}

/// Catch-all for mentions no other command understood.
pub async fn unrecognized(context: HandlerContext, event: Event, _captures: Captures) -> Void {
    context.reply(&event, format!("{UNRECOGNIZED_REPLY}\n{HELP_REPLY}")).await
}

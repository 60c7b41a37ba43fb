//! Cooperative shutdown signal.

use std::sync::Arc;

use tokio::sync::watch;

/// A one-way "please stop" flag shared between a run loop and whoever may ask
/// it to stop.
///
/// Triggering is idempotent and never blocks, so it is safe to call from a
/// command handler running inside the loop it stops. Cloning yields another
/// handle on the same flag.
#[derive(Clone, Debug)]
pub struct ShutdownHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for ShutdownHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownHandle {
    /// Creates a new, untriggered handle.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Raise the flag. Calling this more than once has no further effect.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    /// Whether the flag has been raised.
    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once the flag has been raised (immediately if it already is).
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        let _ = rx.wait_for(|triggered| *triggered).await;
    }
}

pub mod intesis;
pub mod status;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::Res;

use status::HvacStatus;

// Traits.

/// Generic device client trait that clients must implement.
///
/// This trait defines the two operations the bot performs against the
/// climate-control device. Implementing this trait allows different device
/// APIs to be used with chat-hvac.
#[async_trait]
pub trait GenericHvacClient: Send + Sync + 'static {
    /// Fetch a fresh snapshot of the device.
    ///
    /// Fails on transport errors, non-success responses, or a body that does
    /// not decode as a status document (the error carries the raw body).
    async fn status(&self) -> Res<HvacStatus>;

    /// Set `param` to `value` on the device.
    ///
    /// Neither side is validated locally; the device API decides what is
    /// acceptable. Returns the raw response body on success.
    async fn set(&self, param: &str, value: &str) -> Res<String>;
}

// Structs.

/// Device client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct HvacClient {
    inner: Arc<dyn GenericHvacClient>,
}

impl Deref for HvacClient {
    type Target = dyn GenericHvacClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl HvacClient {
    pub fn new(inner: Arc<dyn GenericHvacClient>) -> Self {
        Self { inner }
    }
}

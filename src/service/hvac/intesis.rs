//! HTTP device client for an IntesisHome-style bridge.
//!
//! The bridge exposes a single resource per device at `{api}/hvac/{device}`:
//! `GET` returns the status document, `POST` with `{"param", "value"}` applies
//! a setting.

use std::sync::Arc;

use anyhow::{anyhow, bail};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use tracing::{debug, info, instrument, warn};

use crate::base::{config::Config, types::Res};

use super::{
    GenericHvacClient, HvacClient,
    status::{HvacSet, HvacStatus},
};

// Extra methods on `HvacClient` applied by the intesis implementation.

impl HvacClient {
    /// Creates a new device client from the configuration.
    pub fn intesis(config: &Config) -> Self {
        Self::from(IntesisHvacClient::new(&config.intesis_api, &config.intesis_device))
    }
}

impl From<IntesisHvacClient> for HvacClient {
    fn from(client: IntesisHvacClient) -> Self {
        Self::new(Arc::new(client))
    }
}

// Structs.

/// Device client speaking to the bridge over HTTP.
#[derive(Clone)]
pub struct IntesisHvacClient {
    client: Client,
    endpoint: String,
}

impl IntesisHvacClient {
    /// Create a new client for `device` behind the bridge at `api`.
    pub fn new(api: &str, device: &str) -> Self {
        let endpoint = format!("{}/hvac/{}", api.trim_end_matches('/'), device);

        info!("Using device endpoint: {}", endpoint);

        Self { client: Client::new(), endpoint }
    }

    /// The full URL of the device resource.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send `request` and return the body of a successful response.
    async fn call(&self, method: &str, request: RequestBuilder) -> Res<String> {
        let response = request
            .send()
            .await
            .map_err(|e| anyhow!("http {} failed. url: {} cause: {}", method, self.endpoint, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| anyhow!("cannot read response body from: {} cause: {}", self.endpoint, e))?;

        if !status.is_success() {
            warn!("Device returned {} for {} {}", status, method, self.endpoint);
            bail!("invalid status code: {} url: {} body: {}", status.as_u16(), self.endpoint, body);
        }

        debug!("Device responded: {}", body);

        Ok(body)
    }
}

#[async_trait]
impl GenericHvacClient for IntesisHvacClient {
    #[instrument(skip(self))]
    async fn status(&self) -> Res<HvacStatus> {
        let body = self.call("get", self.client.get(&self.endpoint)).await?;

        serde_json::from_str(&body).map_err(|e| {
            warn!("Unable to decode device status: {}", e);
            anyhow!("unable to decode: `{}`", body)
        })
    }

    #[instrument(skip(self))]
    async fn set(&self, param: &str, value: &str) -> Res<String> {
        let payload = HvacSet {
            param: param.to_string(),
            value: value.to_string(),
        };

        self.call("post", self.client.post(&self.endpoint).json(&payload)).await
    }
}

//! Load configuration via `config` crate with env-override support.

use std::{fmt, ops::Deref, sync::Arc};

use serde::Deserialize;

use super::types::{Res, Void};

/// Default device API endpoint.
fn default_intesis_api() -> String {
    "http://127.0.0.1:2112".to_string()
}

/// Default device identifier.
fn default_intesis_device() -> String {
    "127934703953".to_string()
}

/// Default health listener address.
fn default_health_listen() -> String {
    "0.0.0.0:8080".to_string()
}

/// The chat adapter used to receive mentions and send replies.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AdapterKind {
    /// Read mentions from stdin, print replies to stdout.
    #[default]
    Console,
    /// Slack socket mode.
    Slack,
}

impl AdapterKind {
    /// The name used in configuration and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            AdapterKind::Console => "console",
            AdapterKind::Slack => "slack",
        }
    }
}

impl fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for the chat-hvac application.
///
/// It is designed to be trivially cloneable.
#[derive(Debug, Clone)]
pub struct Config {
    /// The shared configuration values.
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl From<ConfigInner> for Config {
    fn from(inner: ConfigInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

/// The configuration values.
#[derive(Debug, Deserialize, Clone)]
pub struct ConfigInner {
    /// Chat adapter to use (`ADAPTER`).
    #[serde(default)]
    pub adapter: AdapterKind,
    /// Slack app token (`SLACK_APP_TOKEN`).
    #[serde(default)]
    pub slack_app_token: String,
    /// Slack bot token (`SLACK_BOT_TOKEN`).
    #[serde(default)]
    pub slack_bot_token: String,
    /// Base URL of the device API (`INTESIS_API`).
    #[serde(default = "default_intesis_api")]
    pub intesis_api: String,
    /// Identifier of the device to control (`INTESIS_DEVICE`).
    #[serde(default = "default_intesis_device")]
    pub intesis_device: String,
    /// Address the health endpoint listens on (`HEALTH_LISTEN`).
    #[serde(default = "default_health_listen")]
    pub health_listen: String,
    /// Whether replies are threaded under the mention (`THREADED_REPLIES`).
    #[serde(default)]
    pub threaded_replies: bool,
}

impl Default for ConfigInner {
    fn default() -> Self {
        Self {
            adapter: AdapterKind::default(),
            slack_app_token: String::new(),
            slack_bot_token: String::new(),
            intesis_api: default_intesis_api(),
            intesis_device: default_intesis_device(),
            health_listen: default_health_listen(),
            threaded_replies: false,
        }
    }
}

impl Config {
    /// Loads the configuration from the environment and an optional file.
    ///
    /// An explicit `adapter` (usually from the command line) overrides whatever
    /// the sources say.
    pub fn load(explicit_path: Option<&std::path::Path>, adapter: Option<AdapterKind>) -> Res<Self> {
        let mut cfg = config::Config::builder().add_source(config::Environment::default().prefix("CHAT_HVAC"));

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else {
            cfg = cfg.add_source(config::File::with_name(".hidden/config").required(false));
        }

        if let Some(adapter) = adapter {
            cfg = cfg.set_override("adapter", adapter.as_str())?;
        }

        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        result.validate()?;

        Ok(result)
    }

    /// Checks the loaded values for consistency.
    pub fn validate(&self) -> Void {
        if self.adapter == AdapterKind::Slack && (self.slack_app_token.is_empty() || self.slack_bot_token.is_empty()) {
            return Err(anyhow::anyhow!("Slack app and bot tokens are required for the slack adapter."));
        }

        let api = reqwest::Url::parse(&self.intesis_api).map_err(|e| anyhow::anyhow!("Invalid device API url `{}`: {}", self.intesis_api, e))?;
        if api.scheme() != "http" && api.scheme() != "https" {
            return Err(anyhow::anyhow!("Device API url must be http or https, got `{}`.", api.scheme()));
        }

        if self.intesis_device.is_empty() {
            return Err(anyhow::anyhow!("Device identifier must not be empty."));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn write_config(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "config.yaml", "adapter: console\nintesis_api: http://10.0.0.5:2112\nintesis_device: \"42\"\n");

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.adapter, AdapterKind::Console);
        assert_eq!(config.intesis_api, "http://10.0.0.5:2112");
        assert_eq!(config.intesis_device, "42");
        assert_eq!(config.health_listen, "0.0.0.0:8080");
    }

    #[test]
    fn loads_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "config.toml", "adapter = \"slack\"\nslack_app_token = \"xapp-test\"\nslack_bot_token = \"xoxb-test\"\n");

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.adapter, AdapterKind::Slack);
        assert_eq!(config.slack_bot_token, "xoxb-test");
    }

    #[test]
    fn environment_is_read_with_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "config.yaml", "intesis_device: \"7\"\n");

        // SAFETY: no other test depends on this variable.
        unsafe { std::env::set_var("CHAT_HVAC_THREADED_REPLIES", "true") };
        let config = Config::load(Some(&path), None);
        unsafe { std::env::remove_var("CHAT_HVAC_THREADED_REPLIES") };

        let config = config.unwrap();
        assert!(config.threaded_replies);
        assert_eq!(config.intesis_device, "7");
    }

    #[test]
    fn explicit_adapter_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "config.yaml", "adapter: console\n");

        assert_eq!(Config::load(Some(&path), None).unwrap().adapter, AdapterKind::Console);

        let err = Config::load(Some(&path), Some(AdapterKind::Slack)).unwrap_err();
        assert!(err.to_string().contains("tokens are required"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();

        assert!(Config::load(Some(&dir.path().join("absent.yaml")), None).is_err());
    }

    #[test]
    fn defaults_are_valid() {
        let config = Config::from(ConfigInner::default());

        assert_eq!(config.adapter, AdapterKind::Console);
        assert_eq!(config.intesis_api, "http://127.0.0.1:2112");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn slack_requires_tokens() {
        let config = Config::from(ConfigInner {
            adapter: AdapterKind::Slack,
            slack_app_token: "xapp-test".to_string(),
            ..Default::default()
        });

        assert!(config.validate().is_err());

        let config = Config::from(ConfigInner {
            adapter: AdapterKind::Slack,
            slack_app_token: "xapp-test".to_string(),
            slack_bot_token: "xoxb-test".to_string(),
            ..Default::default()
        });

        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_device_api() {
        let config = Config::from(ConfigInner {
            intesis_api: "not a url".to_string(),
            ..Default::default()
        });
        assert!(config.validate().is_err());

        let config = Config::from(ConfigInner {
            intesis_api: "ftp://127.0.0.1".to_string(),
            ..Default::default()
        });
        assert!(config.validate().is_err());
    }
}

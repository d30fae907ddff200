use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Runtime configuration, loaded from a JSON file. Every field has a
/// default so a config file only needs to override what it cares about,
/// in practice at least the URLs, identity, and token.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Streaming endpoint for the long-lived GET.
    pub stream_url: String,
    /// Endpoint for publishing a public status.
    pub publish_url: String,
    /// Endpoint for sending a private message.
    pub notify_url: String,
    /// Fixed client-identifying label sent on every request.
    pub user_agent: String,
    /// The bot's own screen name.
    pub screen_name: String,
    /// The bot's own user id; messages from this sender are suppressed.
    pub self_user_id: i64,
    /// Access token handed to the bearer signer.
    pub access_token: SecretString,
    /// Optional extra trust anchor (PEM) for the streaming endpoint.
    pub ca_cert_path: Option<PathBuf>,
    /// Audit database location.
    pub audit_db_path: PathBuf,
    /// Reconnect budget: consecutive failures tolerated before aborting.
    pub max_attempts: u32,
    /// Fixed delay between reconnect attempts, in seconds.
    pub retry_interval_secs: u64,
    /// Declare the stream dead after this many seconds without bytes.
    pub idle_timeout_secs: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            stream_url: "https://stream.example.com/1.1/user.json".to_string(),
            publish_url: "https://api.example.com/1/statuses/update.json".to_string(),
            notify_url: "https://api.example.com/1/direct_messages/new.json".to_string(),
            user_agent: "bridgebot/0.1".to_string(),
            screen_name: String::new(),
            self_user_id: 0,
            access_token: SecretString::from(""),
            ca_cert_path: None,
            audit_db_path: PathBuf::from("posts.db"),
            max_attempts: 10,
            retry_interval_secs: 30,
            idle_timeout_secs: 90,
        }
    }
}

impl std::fmt::Debug for BridgeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeConfig")
            .field("stream_url", &self.stream_url)
            .field("publish_url", &self.publish_url)
            .field("notify_url", &self.notify_url)
            .field("user_agent", &self.user_agent)
            .field("screen_name", &self.screen_name)
            .field("self_user_id", &self.self_user_id)
            .field("access_token", &"[REDACTED]")
            .field("ca_cert_path", &self.ca_cert_path)
            .field("audit_db_path", &self.audit_db_path)
            .field("max_attempts", &self.max_attempts)
            .field("retry_interval_secs", &self.retry_interval_secs)
            .field("idle_timeout_secs", &self.idle_timeout_secs)
            .finish()
    }
}

impl BridgeConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

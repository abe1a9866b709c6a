//! Configuration data model.
//!
//! Struct/enum definitions plus their defaults. Source resolution and
//! precedence live in `loader`, `sources`, and `env`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::defaults::{
    DEFAULT_CHAT_TIMEOUT_SECS, DEFAULT_GENERATE_TIMEOUT_SECS, DEFAULT_LOCAL_PORT,
    DEFAULT_MODEL_ID, DEFAULT_OLLAMA_PORT, DEFAULT_PROBE_TIMEOUT_SECS, DEFAULT_SETTLE_SECS,
    DEFAULT_SSH_PORT, DEFAULT_SYSTEM_PROMPT,
};
use crate::error::ConfigError;

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub endpoint: EndpointConfig,
    pub session: SessionSettings,
}

/// Where to reach the remote inference service.
///
/// Produced once by `tunnelchat setup`, read at every session start, and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub ssh_host: String,
    pub ssh_user: String,
    pub ssh_port: u16,
    /// Identity file passed to ssh with `-i`; ssh defaults apply when unset.
    pub ssh_key_path: Option<PathBuf>,
    /// Port Ollama listens on, on the remote host.
    pub ollama_port: u16,
    /// Local end of the port-forward.
    pub local_port: u16,
    /// Remote model identifier.
    pub model: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            ssh_host: String::new(),
            ssh_user: String::new(),
            ssh_port: DEFAULT_SSH_PORT,
            ssh_key_path: None,
            ollama_port: DEFAULT_OLLAMA_PORT,
            local_port: DEFAULT_LOCAL_PORT,
            model: DEFAULT_MODEL_ID.to_string(),
        }
    }
}

impl EndpointConfig {
    /// `user@host` target handed to ssh.
    pub fn ssh_target(&self) -> String {
        format!("{}@{}", self.ssh_user, self.ssh_host)
    }

    /// Base URL of the forwarded service on this machine.
    pub fn local_base_url(&self) -> String {
        format!("http://localhost:{}", self.local_port)
    }

    /// Reject settings that cannot produce a working tunnel.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ssh_host.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "ssh_host is empty; run `tunnelchat setup` or set TUNNELCHAT_SSH_HOST".into(),
            ));
        }
        if self.ssh_user.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "ssh_user is empty; run `tunnelchat setup` or set TUNNELCHAT_SSH_USER".into(),
            ));
        }
        for (name, port) in [
            ("ssh_port", self.ssh_port),
            ("ollama_port", self.ollama_port),
            ("local_port", self.local_port),
        ] {
            if port == 0 {
                return Err(ConfigError::Invalid(format!("{name} must be non-zero")));
            }
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid("model must not be empty".into()));
        }
        Ok(())
    }
}

/// Session behavior knobs that are not part of the endpoint artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    /// Content of the seed system message.
    pub system_prompt: String,
    pub settle: Duration,
    pub probe_timeout: Duration,
    pub chat_timeout: Duration,
    pub generate_timeout: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            settle: Duration::from_secs(DEFAULT_SETTLE_SECS),
            probe_timeout: Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS),
            chat_timeout: Duration::from_secs(DEFAULT_CHAT_TIMEOUT_SECS),
            generate_timeout: Duration::from_secs(DEFAULT_GENERATE_TIMEOUT_SECS),
        }
    }
}

/// On-disk shape of `tunnelchat.toml`.
///
/// The six endpoint keys are what `tunnelchat setup` writes; the rest are
/// optional hand-edited overrides.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct FileConfig {
    pub ssh_host: String,
    pub ssh_user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_key_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ollama_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settle_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probe_timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generate_timeout_secs: Option<u64>,
}

/// Which source the effective config text came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    Local(PathBuf),
    Global(PathBuf),
    BuiltInDefaults,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Explicit(path) | Self::Local(path) | Self::Global(path) => Some(path),
            Self::BuiltInDefaults => None,
        }
    }
}

/// Loaded config plus the source it was read from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub source: ConfigSource,
}

//! Environment-variable overrides applied after file resolution.

use std::path::PathBuf;

use crate::error::ConfigError;

use super::init::expand_home_with;
use super::resolve::normalized_string;
use super::Config;

pub(super) const ENV_SSH_HOST: &str = "TUNNELCHAT_SSH_HOST";
pub(super) const ENV_SSH_USER: &str = "TUNNELCHAT_SSH_USER";
pub(super) const ENV_SSH_PORT: &str = "TUNNELCHAT_SSH_PORT";
pub(super) const ENV_SSH_KEY_PATH: &str = "TUNNELCHAT_SSH_KEY_PATH";
pub(super) const ENV_OLLAMA_PORT: &str = "TUNNELCHAT_OLLAMA_PORT";
pub(super) const ENV_LOCAL_PORT: &str = "TUNNELCHAT_LOCAL_PORT";
pub(super) const ENV_MODEL: &str = "TUNNELCHAT_MODEL";

pub(super) fn apply_runtime_env_overrides<FEnv>(
    config: &mut Config,
    env_lookup: &FEnv,
    home: Option<PathBuf>,
) -> Result<(), ConfigError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    let endpoint = &mut config.endpoint;
    if let Some(host) = env_string(env_lookup, ENV_SSH_HOST) {
        endpoint.ssh_host = host;
    }
    if let Some(user) = env_string(env_lookup, ENV_SSH_USER) {
        endpoint.ssh_user = user;
    }
    if let Some(port) = env_port(env_lookup, ENV_SSH_PORT)? {
        endpoint.ssh_port = port;
    }
    if let Some(path) = env_string(env_lookup, ENV_SSH_KEY_PATH) {
        endpoint.ssh_key_path = Some(expand_home_with(&path, home));
    }
    if let Some(port) = env_port(env_lookup, ENV_OLLAMA_PORT)? {
        endpoint.ollama_port = port;
    }
    if let Some(port) = env_port(env_lookup, ENV_LOCAL_PORT)? {
        endpoint.local_port = port;
    }
    if let Some(model) = env_string(env_lookup, ENV_MODEL) {
        endpoint.model = model;
    }
    Ok(())
}

fn env_string<FEnv>(env_lookup: &FEnv, name: &str) -> Option<String>
where
    FEnv: Fn(&str) -> Option<String>,
{
    env_lookup(name).as_deref().and_then(normalized_string)
}

fn env_port<FEnv>(env_lookup: &FEnv, name: &str) -> Result<Option<u16>, ConfigError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    let Some(raw) = env_string(env_lookup, name) else {
        return Ok(None);
    };
    match raw.parse::<u16>() {
        Ok(port) if port > 0 => Ok(Some(port)),
        _ => Err(ConfigError::Invalid(format!(
            "invalid {name} value `{raw}`: expected a port between 1 and 65535"
        ))),
    }
}

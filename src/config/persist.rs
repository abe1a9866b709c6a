//! Endpoint artifact persistence used by `tunnelchat setup`.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

use super::init::default_global_config_path;
use super::{EndpointConfig, FileConfig};

const ARTIFACT_HEADER: &str = "# ssh tunnel settings for the remote gpu host (written by `tunnelchat setup`)\n";

/// Write `endpoint` to `path_override` or the global default path and return
/// the path written.
pub fn persist_endpoint_config(
    path_override: Option<&Path>,
    endpoint: &EndpointConfig,
) -> Result<PathBuf, ConfigError> {
    endpoint.validate()?;
    let path = match path_override {
        Some(path) => path.to_path_buf(),
        None => default_global_config_path().ok_or_else(|| {
            ConfigError::Invalid("unable to resolve default config path".to_string())
        })?,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, render_endpoint_artifact(endpoint)?)?;
    tracing::info!(path = %path.display(), "wrote endpoint config");
    Ok(path)
}

/// Render the artifact text: the six endpoint keys plus the model id.
pub fn render_endpoint_artifact(endpoint: &EndpointConfig) -> Result<String, ConfigError> {
    let file = FileConfig {
        ssh_host: endpoint.ssh_host.clone(),
        ssh_user: endpoint.ssh_user.clone(),
        ssh_port: Some(endpoint.ssh_port),
        ssh_key_path: endpoint
            .ssh_key_path
            .as_ref()
            .map(|path| path.display().to_string()),
        ollama_port: Some(endpoint.ollama_port),
        local_port: Some(endpoint.local_port),
        model: Some(endpoint.model.clone()),
        ..FileConfig::default()
    };
    let body = toml::to_string(&file)?;
    Ok(format!("{ARTIFACT_HEADER}{body}"))
}

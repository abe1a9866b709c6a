//! Resolve parsed file config into runtime config.

use std::path::PathBuf;
use std::time::Duration;

use super::init::expand_home_with;
use super::{Config, EndpointConfig, FileConfig, SessionSettings};

pub(super) fn resolve_config_from_file_config(
    parsed: FileConfig,
    home: Option<PathBuf>,
) -> Config {
    let endpoint_defaults = EndpointConfig::default();
    let session_defaults = SessionSettings::default();

    let endpoint = EndpointConfig {
        ssh_host: parsed.ssh_host.trim().to_string(),
        ssh_user: parsed.ssh_user.trim().to_string(),
        ssh_port: parsed.ssh_port.unwrap_or(endpoint_defaults.ssh_port),
        ssh_key_path: normalized_option(&parsed.ssh_key_path)
            .map(|path| expand_home_with(&path, home.clone())),
        ollama_port: parsed.ollama_port.unwrap_or(endpoint_defaults.ollama_port),
        local_port: parsed.local_port.unwrap_or(endpoint_defaults.local_port),
        model: normalized_option(&parsed.model).unwrap_or(endpoint_defaults.model),
    };

    let session = SessionSettings {
        system_prompt: normalized_option(&parsed.system_prompt)
            .unwrap_or(session_defaults.system_prompt),
        settle: secs_or(parsed.settle_secs, session_defaults.settle),
        probe_timeout: secs_or(parsed.probe_timeout_secs, session_defaults.probe_timeout),
        chat_timeout: secs_or(parsed.chat_timeout_secs, session_defaults.chat_timeout),
        generate_timeout: secs_or(
            parsed.generate_timeout_secs,
            session_defaults.generate_timeout,
        ),
    };

    Config { endpoint, session }
}

// Zero-second values are clamped to one second.
fn secs_or(value: Option<u64>, default: Duration) -> Duration {
    value
        .map(|secs| Duration::from_secs(secs.max(1)))
        .unwrap_or(default)
}

pub(super) fn normalized_option(value: &Option<String>) -> Option<String> {
    value.as_deref().and_then(normalized_string)
}

pub(super) fn normalized_string(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

//! Configuration loading from TOML files and environment variables.
//!
//! Config is loaded in this order of precedence (highest wins):
//! 1. Environment variables (`TUNNELCHAT_SSH_HOST`, `TUNNELCHAT_SSH_USER`,
//!    `TUNNELCHAT_SSH_PORT`, `TUNNELCHAT_SSH_KEY_PATH`, `TUNNELCHAT_OLLAMA_PORT`,
//!    `TUNNELCHAT_LOCAL_PORT`, `TUNNELCHAT_MODEL`)
//! 2. TOML file specified via --config CLI flag
//! 3. ./tunnelchat.toml in the current directory
//! 4. $XDG_CONFIG_HOME/tunnelchat/tunnelchat.toml (or
//!    ~/.config/tunnelchat/tunnelchat.toml)
//! 5. Built-in defaults

pub mod defaults;
mod env;
mod init;
mod loader;
mod persist;
mod resolve;
mod sources;
mod types;

pub use init::{config_root_dir, default_global_config_path, expand_home};
pub use loader::{load_config, load_config_with_source};
pub use persist::{persist_endpoint_config, render_endpoint_artifact};
pub use types::{
    Config, ConfigSource, EndpointConfig, FileConfig, LoadedConfig, SessionSettings,
};

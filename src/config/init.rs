//! Config-path helpers.

use std::path::{Path, PathBuf};

use super::defaults::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};

/// Return the default per-user config path (`~/.config/tunnelchat/tunnelchat.toml`).
pub fn default_global_config_path() -> Option<PathBuf> {
    config_root_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Resolve the base config directory from env/home conventions.
pub fn config_root_dir() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("XDG_CONFIG_HOME") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    dirs::home_dir()
        .map(|home| home.join(".config"))
        .or_else(dirs::config_dir)
}

/// Expand a leading `~/` against the current user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    expand_home_with(path, dirs::home_dir())
}

pub(super) fn expand_home_with(path: &str, home: Option<PathBuf>) -> PathBuf {
    let trimmed = path.trim();
    if trimmed == "~" {
        if let Some(home) = home {
            return home;
        }
    } else if let Some(rest) = trimmed.strip_prefix("~/") {
        if let Some(home) = home {
            return home.join(rest);
        }
    }
    Path::new(trimmed).to_path_buf()
}

//! Config source discovery.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

use super::defaults::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};
use super::ConfigSource;

/// Read the highest-precedence config file.
///
/// An explicit path must exist; the local and global candidates are skipped
/// silently when absent, falling back to built-in defaults.
pub(super) fn read_config_text_with_sources<FRead, FRoot>(
    path_override: Option<&str>,
    read_file: &FRead,
    config_root: &FRoot,
) -> Result<(String, ConfigSource), ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FRoot: Fn() -> Option<PathBuf>,
{
    if let Some(p) = path_override {
        let path = PathBuf::from(p);
        let text = read_file(&path)?;
        return Ok((text, ConfigSource::Explicit(path)));
    }

    let local = PathBuf::from(CONFIG_FILE_NAME);
    if let Ok(text) = read_file(&local) {
        return Ok((text, ConfigSource::Local(local)));
    }
    if let Some(dir) = config_root() {
        let global = dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME);
        if let Ok(text) = read_file(&global) {
            return Ok((text, ConfigSource::Global(global)));
        }
    }

    Ok((String::new(), ConfigSource::BuiltInDefaults))
}

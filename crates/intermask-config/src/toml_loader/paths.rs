//! Where the config file lives, and writing the first one.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use intermask_common::ConfigError;
use tracing::info;

use super::template::default_config_toml;

const APP_DIR: &str = "intermask";
const FILE_NAME: &str = "config.toml";

/// Config file location under a platform config directory.
pub fn config_path_in(config_dir: &Path) -> PathBuf {
    config_dir.join(APP_DIR).join(FILE_NAME)
}

/// `<config_dir>/intermask/config.toml`, e.g. `~/.config/intermask/config.toml`
/// on Linux.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| config_path_in(&dir))
        .ok_or_else(|| ConfigError::ParseError("could not determine config directory".into()))
}

/// Write the commented template to `path`, creating parent directories.
///
/// An existing file is never overwritten.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    let io_err = |what: &str, e: std::io::Error| {
        ConfigError::ParseError(format!("failed to {what} {}: {e}", path.display()))
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err("create directory for", e))?;
    }

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| io_err("create", e))?;
    file.write_all(default_config_toml().as_bytes())
        .map_err(|e| io_err("write", e))?;

    info!(path = %path.display(), "created default config");
    Ok(())
}

//! Where configuration lives.
//!
//! - **User config**: `~/.config/cadence/` (Linux), `~/Library/Application Support/cadence/` (macOS), `%APPDATA%\cadence\` (Windows)

use std::path::{Path, PathBuf};

/// Application name used for directory paths.
const APP_NAME: &str = "cadence";

/// File name looked up inside the user config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Returns the user-specific configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// `<user config dir>/config.toml`, whether or not it exists.
pub fn default_config_path() -> PathBuf {
    user_config_dir().join(CONFIG_FILE_NAME)
}

/// Pick the configuration file for a run.
///
/// An explicit path always wins, even if it does not exist (loading it then
/// fails). Otherwise the default path is used only if it exists; `None`
/// means built-in defaults.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    resolve_in(explicit, &default_config_path())
}

fn resolve_in(explicit: Option<&Path>, fallback: &Path) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None if fallback.is_file() => Some(fallback.to_path_buf()),
        None => None,
    }
}

//! User configuration location for livemark.
//!
//! User config location: $XDG_CONFIG_HOME/livemark/livemark.toml
//! Fallback: the platform config directory from `dirs::config_dir()`.

use std::path::PathBuf;

const APP_DIR: &str = "livemark";
const CONFIG_FILE: &str = "livemark.toml";

/// Returns the path to the user configuration file.
///
/// The path is determined by:
/// 1. If $XDG_CONFIG_HOME is set: $XDG_CONFIG_HOME/livemark/livemark.toml
/// 2. Otherwise: `<platform config dir>/livemark/livemark.toml`
///
/// Returns None if no config directory can be determined.
pub fn user_config_path() -> Option<PathBuf> {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
        && !xdg_config.is_empty()
    {
        return Some(PathBuf::from(xdg_config).join(APP_DIR).join(CONFIG_FILE));
    }

    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

pub mod defaults;
pub mod settings;
pub mod user;

pub use settings::{
    ColumnSettings, ContentFlavor, DiagramSettings, EmojiSettings, ImageSettings,
    MentionSettings, OverlaySettings, UploadSettings,
};
pub use user::user_config_path;

use arc_swap::ArcSwap;
use std::path::Path;
use std::sync::Arc;

use crate::error::OverlayResult;

/// Parse settings from TOML text. Missing keys take their defaults.
pub fn parse_settings(text: &str) -> OverlayResult<OverlaySettings> {
    Ok(toml::from_str(text)?)
}

/// Load settings from a TOML file.
pub fn load_settings(path: &Path) -> OverlayResult<OverlaySettings> {
    let text = std::fs::read_to_string(path)?;
    parse_settings(&text)
}

/// Load the user configuration if it exists, otherwise defaults.
///
/// A malformed user config is reported and ignored rather than aborting startup.
pub fn load_user_settings() -> OverlaySettings {
    let Some(path) = user_config_path() else {
        return OverlaySettings::default();
    };
    if !path.exists() {
        return OverlaySettings::default();
    }
    match load_settings(&path) {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!(
                target: "livemark::config",
                "Ignoring user config at {}: {}",
                path.display(),
                e
            );
            OverlaySettings::default()
        }
    }
}

/// Merge two TOML documents, preferring values from `primary` over `fallback`.
///
/// Tables merge key by key so a primary file that only sets
/// `diagram.endpoint` keeps the fallback's `diagram.languages`.
pub fn merge_settings(fallback: &str, primary: &str) -> OverlayResult<OverlaySettings> {
    let fallback: toml::Table = toml::from_str(fallback)?;
    let primary: toml::Table = toml::from_str(primary)?;
    let merged = merge_tables(fallback, primary);
    Ok(toml::Value::Table(merged).try_into()?)
}

/// Load `primary` layered over the `user` config.
///
/// A missing user file contributes nothing; a missing primary file is an error.
pub fn load_layered_settings(
    user: Option<&Path>,
    primary: &Path,
) -> OverlayResult<OverlaySettings> {
    let primary = std::fs::read_to_string(primary)?;
    let fallback = match user {
        Some(path) if path.exists() => std::fs::read_to_string(path)?,
        _ => String::new(),
    };
    merge_settings(&fallback, &primary)
}

fn merge_tables(mut fallback: toml::Table, primary: toml::Table) -> toml::Table {
    for (key, value) in primary {
        let merged = match (fallback.remove(&key), value) {
            (Some(toml::Value::Table(base)), toml::Value::Table(over)) => {
                toml::Value::Table(merge_tables(base, over))
            }
            (_, value) => value,
        };
        fallback.insert(key, merged);
    }
    fallback
}

/// Live settings shared between the engine and the host.
///
/// Readers take a cheap snapshot per rebuild; `replace` swaps atomically so a
/// rebuild never observes half-applied settings.
#[derive(Debug)]
pub struct SettingsStore {
    settings: ArcSwap<OverlaySettings>,
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(OverlaySettings::default())
    }
}

impl SettingsStore {
    pub fn new(settings: OverlaySettings) -> Self {
        Self {
            settings: ArcSwap::new(Arc::new(settings)),
        }
    }

    pub fn load(&self) -> Arc<OverlaySettings> {
        self.settings.load_full()
    }

    pub fn replace(&self, settings: OverlaySettings) {
        self.settings.store(Arc::new(settings));
    }
}

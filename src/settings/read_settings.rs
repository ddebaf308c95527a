use std::fs;
use std::path::{Path, PathBuf};

use super::{config_dirs, Settings, SettingsError};

/// Settings together with the file they came from, if any.
#[derive(Debug, Clone)]
pub struct LoadedSettings {
    pub settings: Settings,
    pub source: Option<PathBuf>,
}

/// Load settings.
///
/// Lookup order: `explicit` (must exist), `polyglot-tools.toml` in `cwd`,
/// the per-user config file, then built-in defaults.
pub fn load_settings(explicit: Option<&Path>, cwd: &Path) -> Result<LoadedSettings, SettingsError> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(SettingsError::Missing(path.to_path_buf()));
        }
        return read_file(path);
    }

    let candidates = std::iter::once(config_dirs::local_settings_path(cwd))
        .chain(config_dirs::user_settings_path());
    for candidate in candidates {
        if candidate.is_file() {
            return read_file(&candidate);
        }
    }

    tracing::debug!("no settings file found, using defaults");
    Ok(LoadedSettings {
        settings: Settings::default(),
        source: None,
    })
}

fn read_file(path: &Path) -> Result<LoadedSettings, SettingsError> {
    let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let settings = toml::from_str(&text).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!("loaded settings from {}", path.display());
    Ok(LoadedSettings {
        settings,
        source: Some(path.to_path_buf()),
    })
}

use std::path::Path;

use super::{Settings, SettingsError};
use crate::fs_op::helpers::atomic_write;

/// Write `settings` as TOML to `path`, creating parent directories.
pub fn save_settings(settings: &Settings, path: &Path) -> Result<(), SettingsError> {
    let text = toml::to_string_pretty(settings)?;
    let io_err = |source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    atomic_write(path, text.as_bytes()).map_err(io_err)
}

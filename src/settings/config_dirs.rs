use std::path::{Path, PathBuf};

use directories_next::ProjectDirs;

use super::LOCAL_SETTINGS_FILE;

/// Per-user configuration directory, e.g. `~/.config/polyglot-tools`.
pub fn project_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "polyglot-connect", "polyglot-tools")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// `config.toml` inside the per-user configuration directory.
pub fn user_settings_path() -> Option<PathBuf> {
    project_config_dir().map(|d| d.join("config.toml"))
}

/// Settings file next to the project being worked on.
pub fn local_settings_path(cwd: &Path) -> PathBuf {
    cwd.join(LOCAL_SETTINGS_FILE)
}

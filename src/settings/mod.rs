//! Settings record passed explicitly into every utility.
//!
//! Every field has a default so an empty or partial TOML file is valid.

pub mod config_dirs;
pub mod read_settings;
pub mod write_settings;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::relocate::ConflictPolicy;

pub use config_dirs::{local_settings_path, project_config_dir, user_settings_path};
pub use read_settings::{load_settings, LoadedSettings};
pub use write_settings::save_settings;

/// File name looked up in the working directory.
pub const LOCAL_SETTINGS_FILE: &str = "polyglot-tools.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file `{0}` does not exist")]
    Missing(PathBuf),

    #[error("could not access settings file `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings in `{path}`: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("could not serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub backup: BackupSettings,
    pub scaffold: ScaffoldSettings,
    pub relocate: RelocateSettings,
    pub seed: SeedSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupSettings {
    /// Directory to snapshot. Defaults to the working directory.
    pub source: Option<PathBuf>,
    /// Where `<name>_old` is created. Defaults to the source's parent.
    pub backup_parent: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaffoldSettings {
    pub root: PathBuf,
    /// Remove `clean_dirs` and `clean_files` before generating.
    pub clean: bool,
    pub clean_dirs: Vec<String>,
    pub clean_files: Vec<String>,
    /// JSON template replacing the built-in layout.
    pub template: Option<PathBuf>,
}

impl Default for ScaffoldSettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            clean: false,
            clean_dirs: ["css", "data", "images", "js"].map(String::from).to_vec(),
            clean_files: vec!["index.html".to_string()],
            template: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveItem {
    pub source: String,
    pub target: String,
}

impl MoveItem {
    pub fn same(name: &str) -> Self {
        Self {
            source: name.to_string(),
            target: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelocateSettings {
    /// Defaults to the working directory.
    pub project_root: Option<PathBuf>,
    pub public_dir: String,
    pub index_file: String,
    /// Attribute prefixes to make root-absolute. Defaults to
    /// [`crate::relocate::DEFAULT_REWRITE_PREFIXES`].
    pub rewrite_prefixes: Option<Vec<String>>,
    pub on_conflict: ConflictPolicy,
    pub directories: Vec<MoveItem>,
}

impl Default for RelocateSettings {
    fn default() -> Self {
        Self {
            project_root: None,
            public_dir: "public".to_string(),
            index_file: "index.html".to_string(),
            rewrite_prefixes: None,
            on_conflict: ConflictPolicy::default(),
            directories: ["js", "data", "css", "images"]
                .iter()
                .map(|n| MoveItem::same(n))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedSettings {
    /// Service-account key downloaded from the Firebase console.
    pub credentials: PathBuf,
    pub groups_file: PathBuf,
    /// Overrides the project id found in the credentials.
    pub project_id: Option<String>,
    /// `host:port` of a Firestore emulator; no credentials needed when set.
    pub emulator_host: Option<String>,
}

impl Default for SeedSettings {
    fn default() -> Self {
        Self {
            credentials: PathBuf::from("./polyglot-connect-firebase-adminsdk.json"),
            groups_file: PathBuf::from("./groups_data.json"),
            project_id: None,
            emulator_host: None,
        }
    }
}

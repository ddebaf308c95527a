//! Move top-level asset directories under a public root and point the
//! HTML entry file at their new root-absolute locations.

pub mod rewrite;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::fs_op::create::{create_dir_all, CreateError};
use crate::fs_op::mv::{move_path, MvError};
use crate::fs_op::remove::{remove_dir_if_empty, remove_path, RemoveError};
use crate::fs_op::stat::{self, EntryKind};
use crate::settings::{MoveItem, RelocateSettings};

pub use rewrite::{normalize_prefix, rewrite_asset_paths, rewrite_index_file, PathChange, Rewrite};

/// Prefixes rewritten when none are configured. Top-level `js/*.js` files
/// (the bundler entry) and `js/config/` stay relative.
pub const DEFAULT_REWRITE_PREFIXES: [&str; 8] = [
    "js/utils/",
    "js/services/",
    "js/core/",
    "js/sessions/",
    "js/ui/",
    "data/",
    "css/",
    "images/",
];

#[derive(Debug, Error)]
pub enum RelocateError {
    #[error("could not create public directory `{path}`: {source}")]
    PublicDir {
        path: PathBuf,
        #[source]
        source: CreateError,
    },

    #[error("could not list `{path}`: {source}")]
    List {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not move `{src}` to `{dst}`: {source}")]
    Move {
        src: PathBuf,
        dst: PathBuf,
        #[source]
        source: MvError,
    },

    #[error("could not remove `{path}`: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: RemoveError,
    },

    #[error("`{0}` exists but is not a directory")]
    NotADirectory(PathBuf),

    #[error("could not read `{path}`: {source}")]
    ReadIndex {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write `{path}`: {source}")]
    WriteIndex {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What to do when a subdirectory being merged already exists in the target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Delete the existing target subdirectory, then move the source's in.
    #[default]
    Replace,
    /// Leave the target untouched and the source subdirectory where it is.
    Keep,
}

#[derive(Debug, Clone)]
pub struct RelocateConfig {
    pub project_root: PathBuf,
    pub public_dir: String,
    pub index_file: String,
    pub plan: Vec<MoveItem>,
    /// Normalized (`dir/`) attribute prefixes.
    pub rewrite_prefixes: Vec<String>,
    pub on_conflict: ConflictPolicy,
}

impl RelocateConfig {
    /// Defaults for a project rooted at `project_root`.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self::from_settings(&RelocateSettings::default(), project_root)
    }

    pub fn from_settings(settings: &RelocateSettings, project_root: impl Into<PathBuf>) -> Self {
        let prefixes = match &settings.rewrite_prefixes {
            Some(list) => list.iter().map(|p| normalize_prefix(p)).collect(),
            None => DEFAULT_REWRITE_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        };
        Self {
            project_root: project_root.into(),
            public_dir: settings.public_dir.clone(),
            index_file: settings.index_file.clone(),
            plan: settings.directories.clone(),
            rewrite_prefixes: prefixes,
            on_conflict: settings.on_conflict,
        }
    }

    pub fn public_path(&self) -> PathBuf {
        self.project_root.join(&self.public_dir)
    }

    pub fn index_path(&self) -> PathBuf {
        self.project_root.join(&self.index_file)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveResult {
    /// Target did not exist; the whole directory was moved.
    Moved,
    /// Target existed; children were moved one by one.
    Merged {
        moved: usize,
        /// Source children left in place under [`ConflictPolicy::Keep`].
        kept: Vec<PathBuf>,
        replaced: Vec<PathBuf>,
        source_removed: bool,
    },
    /// Source directory not found.
    Missing,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct DirOutcome {
    pub source: PathBuf,
    pub target: PathBuf,
    pub result: MoveResult,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteResult {
    Updated(Vec<PathChange>),
    Unchanged,
    MissingIndex,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct MigrationReport {
    pub public_created: bool,
    pub dirs: Vec<DirOutcome>,
    pub rewrite: RewriteResult,
}

impl MigrationReport {
    pub fn failures(&self) -> usize {
        let dir_failures = self
            .dirs
            .iter()
            .filter(|d| matches!(d.result, MoveResult::Failed(_)))
            .count();
        dir_failures + usize::from(matches!(self.rewrite, RewriteResult::Failed(_)))
    }
}

/// Create the public directory if needed. Returns whether it was created.
pub fn ensure_public_dir(config: &RelocateConfig) -> Result<bool, RelocateError> {
    let public = config.public_path();
    if public.is_dir() {
        info!("directory already exists: {}", public.display());
        return Ok(false);
    }
    create_dir_all(&public).map_err(|source| RelocateError::PublicDir {
        path: public.clone(),
        source,
    })?;
    info!("created directory: {}", public.display());
    Ok(true)
}

/// Move every planned directory under the public directory.
///
/// Each directory is handled independently: a failure is recorded in its
/// outcome and the next directory is still processed.
pub fn relocate_assets(config: &RelocateConfig) -> Vec<DirOutcome> {
    let public = config.public_path();
    config
        .plan
        .iter()
        .map(|item| {
            let source = config.project_root.join(&item.source);
            let target = public.join(&item.target);
            let result = match relocate_one(&source, &target, config.on_conflict) {
                Ok(result) => result,
                Err(e) => {
                    error!("{}; skipping {}, please check manually", e, item.source);
                    MoveResult::Failed(e.to_string())
                }
            };
            DirOutcome {
                source,
                target,
                result,
            }
        })
        .collect()
}

fn relocate_one(
    source: &Path,
    target: &Path,
    policy: ConflictPolicy,
) -> Result<MoveResult, RelocateError> {
    match EntryKind::at(source) {
        EntryKind::Missing => {
            info!("source directory not found, skipping: {}", source.display());
            return Ok(MoveResult::Missing);
        }
        EntryKind::Dir => {}
        _ => return Err(RelocateError::NotADirectory(source.to_path_buf())),
    }

    if !stat::occupied(target) {
        move_path(source, target).map_err(|e| RelocateError::Move {
            src: source.to_path_buf(),
            dst: target.to_path_buf(),
            source: e,
        })?;
        info!("moved {} to {}", source.display(), target.display());
        return Ok(MoveResult::Moved);
    }
    if !stat::is_real_dir(target) {
        return Err(RelocateError::NotADirectory(target.to_path_buf()));
    }

    info!(
        "{} already exists, merging contents of {}",
        target.display(),
        source.display()
    );
    merge_into(source, target, policy)
}

fn merge_into(
    source: &Path,
    target: &Path,
    policy: ConflictPolicy,
) -> Result<MoveResult, RelocateError> {
    let list_err = |e| RelocateError::List {
        path: source.to_path_buf(),
        source: e,
    };
    let mut children = fs::read_dir(source)
        .map_err(list_err)?
        .map(|entry| entry.map(|e| e.file_name()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(list_err)?;
    children.sort();

    let mut moved = 0;
    let mut kept = Vec::new();
    let mut replaced = Vec::new();

    for name in children {
        let from = source.join(&name);
        let to = target.join(&name);

        if stat::is_real_dir(&from) && stat::occupied(&to) {
            match policy {
                ConflictPolicy::Replace => {
                    warn!("replacing existing {} with {}", to.display(), from.display());
                    remove_path(&to).map_err(|e| RelocateError::Remove {
                        path: to.clone(),
                        source: e,
                    })?;
                    replaced.push(to.clone());
                }
                ConflictPolicy::Keep => {
                    warn!(
                        "{} already exists, leaving {} in place",
                        to.display(),
                        from.display()
                    );
                    kept.push(from);
                    continue;
                }
            }
        }

        move_path(&from, &to).map_err(|e| RelocateError::Move {
            src: from.clone(),
            dst: to.clone(),
            source: e,
        })?;
        moved += 1;
    }

    let source_removed = remove_dir_if_empty(source).map_err(|e| RelocateError::Remove {
        path: source.to_path_buf(),
        source: e,
    })?;
    if source_removed {
        info!("moved contents of {} and removed it", source.display());
    } else {
        warn!("{} is not empty after merge, left in place", source.display());
    }

    Ok(MoveResult::Merged {
        moved,
        kept,
        replaced,
        source_removed,
    })
}

/// Rewrite the index file, recording the outcome instead of failing.
pub fn rewrite_index(config: &RelocateConfig) -> RewriteResult {
    let index = config.index_path();
    if !index.is_file() {
        info!("file not found, skipping update: {}", index.display());
        return RewriteResult::MissingIndex;
    }
    match rewrite_index_file(&index, &config.rewrite_prefixes) {
        Ok(r) if r.changed() => {
            info!("updated paths in {}", index.display());
            RewriteResult::Updated(r.changes)
        }
        Ok(_) => {
            info!("no path changes needed in {}", index.display());
            RewriteResult::Unchanged
        }
        Err(e) => {
            error!("error processing {}: {}", index.display(), e);
            RewriteResult::Failed(e.to_string())
        }
    }
}

/// Both phases: ensure the public dir, move the assets, rewrite the index.
///
/// Only a failure to create the public directory aborts the run.
pub fn migrate_to_public(config: &RelocateConfig) -> Result<MigrationReport, RelocateError> {
    info!("project root: {}", config.project_root.display());
    let public_created = ensure_public_dir(config)?;
    let dirs = relocate_assets(config);
    let rewrite = rewrite_index(config);
    Ok(MigrationReport {
        public_created,
        dirs,
        rewrite,
    })
}

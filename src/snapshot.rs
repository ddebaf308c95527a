//! Directory snapshots: copy a project tree to a sibling `<name>_old`
//! directory, moving any previous snapshot aside first.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use thiserror::Error;
use tracing::{info, warn};

use crate::fs_op::mv::{rename_path, MvError};
use crate::fs_op::{copy_tree, stat, CopyStats, FsOpError};

pub const BACKUP_SUFFIX: &str = "_old";
pub const ARCHIVE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("source directory `{0}` does not exist")]
    SourceMissing(PathBuf),

    #[error("cannot derive a backup name from `{0}`")]
    SourceUnnamed(PathBuf),

    #[error("could not move existing backup `{path}` aside: {source}; remove or rename it manually and try again")]
    Archive {
        path: PathBuf,
        #[source]
        source: MvError,
    },

    #[error("backup into `{path}` failed: {source}")]
    Copy {
        path: PathBuf,
        #[source]
        source: FsOpError,
    },
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupOutcome {
    pub backup_path: PathBuf,
    /// Where the previous backup was moved, if there was one.
    pub archived: Option<PathBuf>,
    pub stats: CopyStats,
}

/// A source directory and the parent under which its backup lives.
#[derive(Debug, Clone)]
pub struct BackupJob {
    source: PathBuf,
    backup_parent: PathBuf,
}

impl BackupJob {
    pub fn new(source: impl Into<PathBuf>, backup_parent: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            backup_parent: backup_parent.into(),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn backup_parent(&self) -> &Path {
        &self.backup_parent
    }

    /// `<basename(source)>_old`.
    pub fn backup_name(&self) -> Result<String, SnapshotError> {
        let name = match self.source.file_name() {
            Some(n) => n.to_os_string(),
            // `.` or `..`: name the backup after the resolved directory.
            None => self
                .source
                .canonicalize()
                .ok()
                .and_then(|p| p.file_name().map(|n| n.to_os_string()))
                .ok_or_else(|| SnapshotError::SourceUnnamed(self.source.clone()))?,
        };
        Ok(format!("{}{}", name.to_string_lossy(), BACKUP_SUFFIX))
    }

    pub fn backup_path(&self) -> Result<PathBuf, SnapshotError> {
        Ok(self.backup_parent.join(self.backup_name()?))
    }

    pub fn run(&self, now: NaiveDateTime) -> Result<BackupOutcome, SnapshotError> {
        self.run_with_progress(now, |_| {})
    }

    /// Archive any existing backup, then copy the source tree.
    ///
    /// Nothing is touched when the source is missing or the archive rename
    /// fails. A failed copy leaves the partial backup in place.
    pub fn run_with_progress(
        &self,
        now: NaiveDateTime,
        on_entry: impl FnMut(&Path),
    ) -> Result<BackupOutcome, SnapshotError> {
        if !self.source.is_dir() {
            return Err(SnapshotError::SourceMissing(self.source.clone()));
        }
        let backup_name = self.backup_name()?;
        let backup_path = self.backup_parent.join(&backup_name);

        let archived = if stat::occupied(&backup_path) {
            warn!("backup directory {} already exists", backup_path.display());
            let archive_name = self.archive_name(&backup_name, now);
            let moved = rename_path(&backup_path, &archive_name).map_err(|source| {
                SnapshotError::Archive {
                    path: backup_path.clone(),
                    source,
                }
            })?;
            info!("existing backup moved to {}", moved.display());
            Some(moved)
        } else {
            None
        };

        info!(
            "starting backup of {} to {}",
            self.source.display(),
            backup_path.display()
        );
        let stats = copy_tree(&self.source, &backup_path, on_entry).map_err(|source| {
            SnapshotError::Copy {
                path: backup_path.clone(),
                source,
            }
        })?;
        info!(
            "backup completed: {} ({} files, {} directories, {} links)",
            backup_path.display(),
            stats.files,
            stats.dirs,
            stats.symlinks
        );

        Ok(BackupOutcome {
            backup_path,
            archived,
            stats,
        })
    }

    /// `<backup>_<timestamp>`, with `_1`, `_2`, ... appended while taken.
    fn archive_name(&self, backup_name: &str, now: NaiveDateTime) -> String {
        let base = format!("{}_{}", backup_name, now.format(ARCHIVE_TIMESTAMP_FORMAT));
        let mut candidate = base.clone();
        let mut n = 1;
        while stat::occupied(self.backup_parent.join(&candidate)) {
            candidate = format!("{}_{}", base, n);
            n += 1;
        }
        candidate
    }
}

/// Only an explicit "yes" (any case, surrounding whitespace ignored) confirms.
pub fn is_confirmed(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::tempdir;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 17)
            .and_then(|d| d.and_hms_opt(h, m, s))
            .unwrap()
    }

    #[test]
    fn backup_path_is_sibling_with_suffix() {
        let job = BackupJob::new("/work/polyglot_connect", "/work");
        assert_eq!(
            job.backup_path().unwrap(),
            PathBuf::from("/work/polyglot_connect_old")
        );
    }

    #[test]
    fn confirmation_requires_yes() {
        assert!(is_confirmed("yes"));
        assert!(is_confirmed("  YES \n"));
        assert!(!is_confirmed("y"));
        assert!(!is_confirmed("no"));
        assert!(!is_confirmed(""));
    }

    #[test]
    fn missing_source_touches_nothing() {
        let td = tempdir().unwrap();
        let job = BackupJob::new(td.path().join("nope"), td.path());
        let err = job.run(at(1, 2, 3)).unwrap_err();
        assert!(matches!(err, SnapshotError::SourceMissing(_)));
        assert_eq!(fs::read_dir(td.path()).unwrap().count(), 0);
    }

    #[test]
    fn second_run_archives_first_backup() {
        let td = tempdir().unwrap();
        let src = td.path().join("proj");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("a.txt"), "v1").unwrap();
        let job = BackupJob::new(&src, td.path());

        let first = job.run(at(10, 0, 0)).unwrap();
        assert!(first.archived.is_none());

        fs::write(src.join("a.txt"), "v2").unwrap();
        let second = job.run(at(10, 0, 5)).unwrap();

        let archived = second.archived.unwrap();
        assert_eq!(archived, td.path().join("proj_old_20240517_100005"));
        assert_eq!(fs::read_to_string(archived.join("a.txt")).unwrap(), "v1");
        assert_eq!(
            fs::read_to_string(second.backup_path.join("a.txt")).unwrap(),
            "v2"
        );
    }

    #[test]
    fn archive_name_collision_gets_counter() {
        let td = tempdir().unwrap();
        let src = td.path().join("proj");
        fs::create_dir_all(&src).unwrap();
        let job = BackupJob::new(&src, td.path());
        let now = at(9, 30, 0);

        job.run(now).unwrap();
        job.run(now).unwrap();
        let third = job.run(now).unwrap();

        assert_eq!(
            third.archived.unwrap(),
            td.path().join("proj_old_20240517_093000_1")
        );
        assert!(td.path().join("proj_old_20240517_093000").is_dir());
        assert!(td.path().join("proj_old").is_dir());
    }
}

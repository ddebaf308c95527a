use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use fs_extra::dir::{move_dir, CopyOptions as DirOptions};
use fs_extra::file::{move_file, CopyOptions as FileOptions};

/// Errors returned by move/rename helpers.
#[derive(Debug)]
pub enum MvError {
    Io(std::io::Error),
    Fallback(fs_extra::error::Error),
    MissingFilename,
}

impl fmt::Display for MvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MvError::Io(e) => write!(f, "IO error: {}", e),
            MvError::Fallback(e) => write!(f, "copy fallback failed: {}", e),
            MvError::MissingFilename => write!(f, "path has no filename"),
        }
    }
}

impl std::error::Error for MvError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MvError::Io(e) => Some(e),
            MvError::Fallback(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MvError {
    fn from(e: std::io::Error) -> Self {
        MvError::Io(e)
    }
}

/// Rename a path within the same parent directory and return the new path.
///
/// No copy fallback: a failed rename leaves everything as it was.
pub fn rename_path<P: AsRef<Path>>(path: P, new_name: &str) -> Result<PathBuf, MvError> {
    let p = path.as_ref();
    let parent = p.parent().ok_or(MvError::MissingFilename)?;
    let dest = parent.join(new_name);
    fs::rename(p, &dest)?;
    Ok(dest)
}

/// Move `src` to exactly `dest` (never "into" `dest`).
///
/// Tries a rename first; if that fails (typically across filesystems) the
/// entry is copied with `fs_extra` and the source removed. An existing file
/// at `dest` is replaced. Directories must not already exist at `dest`.
pub fn move_path<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dest: Q) -> Result<(), MvError> {
    let s = src.as_ref();
    let d = dest.as_ref();

    let rename_err = match fs::rename(s, d) {
        Ok(()) => return Ok(()),
        Err(e) => e,
    };
    tracing::debug!(
        "rename {} -> {} failed ({}), falling back to copy",
        s.display(),
        d.display(),
        rename_err
    );

    let meta = fs::symlink_metadata(s)?;
    if meta.is_dir() {
        if d.exists() {
            return Err(MvError::Io(rename_err));
        }
        let mut options = DirOptions::new();
        // Contents of `s` land directly in `d` rather than `d/<name>`.
        options.copy_inside = true;
        move_dir(s, d, &options).map_err(MvError::Fallback)?;
    } else {
        let mut options = FileOptions::new();
        options.overwrite = true;
        move_file(s, d, &options).map_err(MvError::Fallback)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn rename_keeps_parent() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path().join("backup_old");
        fs::create_dir(&dir).unwrap();
        let renamed = rename_path(&dir, "backup_old_20240101_000000").unwrap();
        assert_eq!(renamed, tmp.path().join("backup_old_20240101_000000"));
        assert!(renamed.is_dir());
        assert!(!dir.exists());
    }

    #[test]
    fn move_directory_to_new_name() {
        let tmp = tempdir().unwrap();
        let src = tmp.path().join("js");
        fs::create_dir_all(src.join("ui")).unwrap();
        fs::write(src.join("ui/a.js"), "a").unwrap();
        let dst = tmp.path().join("public/js");
        fs::create_dir_all(dst.parent().unwrap()).unwrap();

        move_path(&src, &dst).unwrap();

        assert!(!src.exists());
        assert_eq!(fs::read_to_string(dst.join("ui/a.js")).unwrap(), "a");
    }

    #[test]
    fn move_file_replaces_existing() {
        let tmp = tempdir().unwrap();
        let src = tmp.path().join("a.txt");
        let dst = tmp.path().join("b.txt");
        fs::write(&src, "new").unwrap();
        fs::write(&dst, "old").unwrap();
        move_path(&src, &dst).unwrap();
        assert_eq!(fs::read_to_string(&dst).unwrap(), "new");
        assert!(!src.exists());
    }
}

//! Preserve permissions and timestamps when copying trees.
//!
//! File metadata failures are propagated; directory timestamps are best
//! effort because writing children into a directory bumps its mtime and the
//! caller has to re-apply them after the walk anyway.

use std::fs;
use std::io;
use std::path::Path;

use filetime::{set_file_times, FileTime};

/// Copy permission bits from `src` to `dst`.
pub(crate) fn copy_permissions(src: &Path, dst: &Path) -> io::Result<()> {
    let perms = fs::metadata(src)?.permissions();
    fs::set_permissions(dst, perms)
}

/// Copy access/modification times from `src` to `dst`.
pub(crate) fn copy_times(src: &Path, dst: &Path) -> io::Result<()> {
    let meta = fs::metadata(src)?;
    let atime = FileTime::from_last_access_time(&meta);
    let mtime = FileTime::from_last_modification_time(&meta);
    set_file_times(dst, atime, mtime)
}

/// Permissions then timestamps for a regular file.
pub(crate) fn preserve_file_metadata(src: &Path, dst: &Path) -> io::Result<()> {
    copy_permissions(src, dst)?;
    copy_times(src, dst)
}

/// Best-effort permissions and timestamps for a directory.
pub(crate) fn preserve_dir_metadata(src: &Path, dst: &Path) {
    if let Err(e) = copy_permissions(src, dst) {
        tracing::debug!("could not copy permissions to {}: {}", dst.display(), e);
    }
    if let Err(e) = copy_times(src, dst) {
        tracing::debug!("could not copy timestamps to {}: {}", dst.display(), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_mtime_is_preserved() {
        let tmp = tempdir().unwrap();
        let src = tmp.path().join("a.txt");
        let dst = tmp.path().join("b.txt");
        fs::write(&src, "a").unwrap();
        fs::write(&dst, "a").unwrap();
        let old = FileTime::from_unix_time(1_000_000_000, 0);
        set_file_times(&src, old, old).unwrap();

        preserve_file_metadata(&src, &dst).unwrap();

        let meta = fs::metadata(&dst).unwrap();
        assert_eq!(FileTime::from_last_modification_time(&meta), old);
    }
}

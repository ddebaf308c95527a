use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::fs_op::error::FsOpError;
use crate::fs_op::{metadata, symlink};

/// Counts of what a tree copy produced.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CopyStats {
    pub dirs: usize,
    pub files: usize,
    pub symlinks: usize,
}

/// Recursively copy the directory `src` to `dst`, which must not exist yet.
///
/// Symbolic links are recreated as links (never followed), regular files are
/// copied with their permissions and timestamps, and directory timestamps
/// are re-applied once the tree is complete. Other file types (sockets,
/// FIFOs, devices) are skipped with a warning.
///
/// `on_entry` is called with each path as it is copied so callers can drive a
/// progress indicator. On error the destination is left partially populated.
pub fn copy_tree(
    src: &Path,
    dst: &Path,
    mut on_entry: impl FnMut(&Path),
) -> Result<CopyStats, FsOpError> {
    if dst.symlink_metadata().is_ok() {
        return Err(FsOpError::between(src, dst, "destination already exists"));
    }

    let mut stats = CopyStats::default();
    let mut dirs: Vec<(PathBuf, PathBuf)> = Vec::new();

    for entry in WalkDir::new(src).follow_links(false).sort_by_file_name() {
        let entry = entry?;
        let from = entry.path();
        let rel = from
            .strip_prefix(src)
            .map_err(|e| FsOpError::between(src, from, e))?;
        let to = dst.join(rel);
        let ft = entry.file_type();

        if ft.is_symlink() {
            symlink::copy_symlink(from, &to).map_err(|e| FsOpError::at(&to, e))?;
            stats.symlinks += 1;
        } else if ft.is_dir() {
            fs::create_dir(&to).map_err(|e| FsOpError::at(&to, e))?;
            dirs.push((from.to_path_buf(), to));
            stats.dirs += 1;
        } else if ft.is_file() {
            fs::copy(from, &to).map_err(|e| FsOpError::at(&to, e))?;
            metadata::preserve_file_metadata(from, &to).map_err(|e| FsOpError::at(&to, e))?;
            stats.files += 1;
        } else {
            tracing::warn!("skipping special file {}", from.display());
            continue;
        }
        on_entry(from);
    }

    // Deepest first so a child's timestamp fix does not disturb its parent.
    for (from, to) in dirs.iter().rev() {
        metadata::preserve_dir_metadata(from, to);
    }

    Ok(stats)
}

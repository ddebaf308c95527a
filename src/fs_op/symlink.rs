//! Small utilities for working with symbolic links.
//!
//! These helpers centralize symlink-specific behavior so callers don't need to
//! duplicate platform distinctions. They return `io::Result` and propagate
//! underlying OS errors so callers decide how to report them.

use std::fs;
use std::io;
use std::path::Path;

/// Create a symbolic link at `dst` that points to `target`.
///
/// On Windows this chooses `symlink_dir` or `symlink_file` depending on
/// whether `target` resolves to a directory. Relative targets are resolved
/// against the directory that will contain the link.
pub(crate) fn create_symlink(target: &Path, dst: &Path) -> io::Result<()> {
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(target, dst)
    }

    #[cfg(windows)]
    {
        use std::os::windows::fs::{symlink_dir, symlink_file};

        let resolved = match dst.parent() {
            Some(parent) if target.is_relative() => parent.join(target),
            _ => target.to_path_buf(),
        };
        if resolved.metadata().map(|m| m.is_dir()).unwrap_or(false) {
            symlink_dir(target, dst)
        } else {
            symlink_file(target, dst)
        }
    }
}

/// Returns `true` when `path` itself is a symbolic link.
///
/// This checks the *link* metadata (does not follow the link).
pub fn is_symlink(path: &Path) -> io::Result<bool> {
    Ok(path.symlink_metadata()?.file_type().is_symlink())
}

/// Recreate the link at `link` as a new link at `dst` with the same target
/// text. The target is copied verbatim, so relative links stay relative and
/// dangling links stay dangling.
pub(crate) fn copy_symlink(link: &Path, dst: &Path) -> io::Result<()> {
    let target = fs::read_link(link)?;
    create_symlink(&target, dst)
}

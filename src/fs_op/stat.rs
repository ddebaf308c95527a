use std::fmt;
use std::path::Path;

/// What sits at a path, looked at without following a final symlink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Missing,
    Dir,
    File,
    Link,
    /// Socket, FIFO or device node.
    Special,
}

impl EntryKind {
    pub fn at(path: impl AsRef<Path>) -> Self {
        let Ok(meta) = std::fs::symlink_metadata(path.as_ref()) else {
            return EntryKind::Missing;
        };
        let ft = meta.file_type();
        if ft.is_symlink() {
            EntryKind::Link
        } else if ft.is_dir() {
            EntryKind::Dir
        } else if ft.is_file() {
            EntryKind::File
        } else {
            EntryKind::Special
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntryKind::Missing => "missing",
            EntryKind::Dir => "directory",
            EntryKind::File => "file",
            EntryKind::Link => "symbolic link",
            EntryKind::Special => "special file",
        })
    }
}

/// Something is at `path`, even if only a dangling link.
pub fn occupied(path: impl AsRef<Path>) -> bool {
    EntryKind::at(path) != EntryKind::Missing
}

/// A directory proper; a link to one does not count.
pub fn is_real_dir(path: impl AsRef<Path>) -> bool {
    EntryKind::at(path) == EntryKind::Dir
}

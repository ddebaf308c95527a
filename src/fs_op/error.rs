use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors produced by the filesystem helpers shared by every utility.
#[derive(Error, Debug)]
pub enum FsOpError {
    /// Wrapper for underlying IO errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error raised while walking a directory tree.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Error tied to a single path.
    #[error("`{path}`: {source}")]
    AtPath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Contextual error that includes source and destination paths.
    #[error("Operation failed from `{src}` to `{dst}`: {msg}")]
    PathContext {
        src: PathBuf,
        dst: PathBuf,
        msg: String,
    },
}

impl FsOpError {
    pub fn at(path: &Path, source: std::io::Error) -> Self {
        FsOpError::AtPath {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn between(src: &Path, dst: &Path, msg: impl std::fmt::Display) -> Self {
        FsOpError::PathContext {
            src: src.to_path_buf(),
            dst: dst.to_path_buf(),
            msg: msg.to_string(),
        }
    }
}

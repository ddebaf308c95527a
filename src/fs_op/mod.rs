//! Filesystem primitives shared by the utilities.
//!
//! Higher-level modules (`snapshot`, `scaffold`, `relocate`) decide what to
//! do with a failure; the helpers here only perform one operation and report
//! what went wrong with enough path context to print.

pub mod copy;
pub mod create;
pub mod error;
pub mod helpers;
pub(crate) mod metadata;
pub mod mv;
pub mod remove;
pub mod stat;
pub mod symlink;

pub use copy::{copy_tree, CopyStats};
pub use error::FsOpError;

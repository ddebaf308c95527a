use std::fmt;
use std::path::{Path, PathBuf};

use super::stat::EntryKind;

#[derive(Debug)]
pub enum CreateError {
    Io(std::io::Error),
    /// Something other than a directory already occupies the path.
    NotADirectory(PathBuf, EntryKind),
}

impl fmt::Display for CreateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreateError::Io(e) => write!(f, "create failed: {}", e),
            CreateError::NotADirectory(p, kind) => {
                write!(f, "{} is a {}, expected a directory", p.display(), kind)
            }
        }
    }
}

impl std::error::Error for CreateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CreateError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CreateError {
    fn from(e: std::io::Error) -> Self {
        CreateError::Io(e)
    }
}

/// `mkdir -p`. An existing directory is fine; anything else in the way is
/// reported with what it is.
pub fn create_dir_all(dir: impl AsRef<Path>) -> Result<(), CreateError> {
    let dir = dir.as_ref();
    match EntryKind::at(dir) {
        EntryKind::Dir => Ok(()),
        EntryKind::Link if dir.is_dir() => Ok(()),
        EntryKind::Missing => Ok(std::fs::create_dir_all(dir)?),
        other => Err(CreateError::NotADirectory(dir.to_path_buf(), other)),
    }
}

/// Write `contents` to `path` as UTF-8, creating or truncating the file.
pub fn write_text_file(path: impl AsRef<Path>, contents: &str) -> Result<(), CreateError> {
    std::fs::write(path.as_ref(), contents.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn nested_dirs_can_be_created_again() {
        let td = tempdir().unwrap();
        let dir = td.path().join("js/ui");
        create_dir_all(&dir).unwrap();
        create_dir_all(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn file_in_the_way_is_reported() {
        let td = tempdir().unwrap();
        let p = td.path().join("css");
        std::fs::write(&p, "").unwrap();
        assert!(matches!(create_dir_all(&p), Err(CreateError::NotADirectory(_, EntryKind::File))));
    }

    #[test]
    fn unicode_contents_round_trip() {
        let td = tempdir().unwrap();
        let p = td.path().join("note.txt");
        write_text_file(&p, "Olá, こんにちは").unwrap();
        assert_eq!(std::fs::read_to_string(&p).unwrap(), "Olá, こんにちは");
    }
}

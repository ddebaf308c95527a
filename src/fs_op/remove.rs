use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("remove failed: {0}")]
pub struct RemoveError(#[from] pub io::Error);

/// Delete whatever is at `path`: a directory tree, a file, or a link (never
/// its target). Nothing there is success.
pub fn remove_path(path: impl AsRef<Path>) -> Result<(), RemoveError> {
    let path = path.as_ref();
    match fs::symlink_metadata(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
        Ok(meta) if meta.is_dir() => Ok(fs::remove_dir_all(path)?),
        Ok(_) => Ok(fs::remove_file(path)?),
    }
}

/// Remove `dir` only if it has no entries. Returns whether it was removed.
pub fn remove_dir_if_empty(dir: impl AsRef<Path>) -> Result<bool, RemoveError> {
    let dir = dir.as_ref();
    if fs::read_dir(dir)?.next().is_some() {
        return Ok(false);
    }
    fs::remove_dir(dir)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn tree_and_file_are_removed() {
        let td = tempdir().unwrap();
        let images = td.path().join("images/flags");
        fs::create_dir_all(&images).unwrap();
        fs::write(images.join("fr.png"), b"png").unwrap();
        let index = td.path().join("index.html");
        fs::write(&index, "<html>").unwrap();

        remove_path(td.path().join("images")).unwrap();
        remove_path(&index).unwrap();

        assert!(!td.path().join("images").exists());
        assert!(!index.exists());
    }

    #[test]
    fn absent_path_is_fine() {
        let td = tempdir().unwrap();
        remove_path(td.path().join("never_there")).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn link_goes_target_stays() {
        let td = tempdir().unwrap();
        let real = td.path().join("real");
        fs::create_dir(&real).unwrap();
        fs::write(real.join("keep.txt"), "k").unwrap();
        let link = td.path().join("alias");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        remove_path(&link).unwrap();

        assert!(fs::symlink_metadata(&link).is_err());
        assert!(real.join("keep.txt").exists());
    }

    #[test]
    fn non_empty_dir_is_kept() {
        let td = tempdir().unwrap();
        let dir = td.path().join("css");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("left.css"), "").unwrap();
        assert!(!remove_dir_if_empty(&dir).unwrap());
        assert!(dir.exists());

        fs::remove_file(dir.join("left.css")).unwrap();
        assert!(remove_dir_if_empty(&dir).unwrap());
        assert!(!dir.exists());
    }
}

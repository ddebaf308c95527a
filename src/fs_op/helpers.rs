use std::fs;
use std::io;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Write `data` to `target` atomically by writing to a temporary file in the
/// same directory and then renaming into place. Readers never observe a
/// half-written file.
pub fn atomic_write(target: &Path, data: &[u8]) -> io::Result<()> {
    let dir = match target.parent() {
        Some(d) if !d.as_os_str().is_empty() => d,
        _ => return fs::write(target, data),
    };

    // time+pid suffix; unique enough for a single-threaded tool.
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let tmp = dir.join(format!(
        ".tmp_atomic_write.{:x}{:x}",
        std::process::id(),
        nanos & 0xffff_ffff
    ));

    if let Err(e) = fs::write(&tmp, data) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    // Keep the permissions of the file we are replacing.
    if let Ok(meta) = fs::metadata(target) {
        let _ = fs::set_permissions(&tmp, meta.permissions());
    }
    fs::rename(&tmp, target).inspect_err(|_| {
        let _ = fs::remove_file(&tmp);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn replaces_content_without_leftovers() {
        let td = tempdir().unwrap();
        let p = td.path().join("index.html");
        fs::write(&p, "old").unwrap();
        atomic_write(&p, b"new").unwrap();
        assert_eq!(fs::read_to_string(&p).unwrap(), "new");

        let leftovers = fs::read_dir(td.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().starts_with(".tmp_atomic_write."))
            .count();
        assert_eq!(leftovers, 0, "found leftover atomic temp files");
    }
}

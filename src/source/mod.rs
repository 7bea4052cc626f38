//! Source file I/O
//!
//! Lines are read with their terminators attached so a rewrite can put every
//! original byte back. Writes go through a sibling temporary file that is
//! renamed over the target, so a failed write never leaves a truncated file.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{NoteError, Result};

/// Split text into lines, each keeping its `\n` or `\r\n`
pub fn split_lines(content: &str) -> Vec<String> {
    content.split_inclusive('\n').map(String::from).collect()
}

/// Read a UTF-8 file as lines
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let bytes = fs::read(path).map_err(|source| NoteError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let content = String::from_utf8(bytes).map_err(|e| NoteError::Read {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })?;
    Ok(split_lines(&content))
}

/// Replace a file's content with `lines`, all or nothing
pub fn write_lines<S: AsRef<str>>(path: &Path, lines: &[S]) -> Result<()> {
    let wrap = |source: std::io::Error| NoteError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(wrap)?;
    for line in lines {
        tmp.write_all(line.as_ref().as_bytes()).map_err(wrap)?;
    }
    tmp.as_file().sync_all().map_err(wrap)?;

    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(tmp.path(), metadata.permissions()).map_err(wrap)?;
    }

    tmp.persist(path).map_err(|e| wrap(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_split_keeps_terminators() {
        assert_eq!(
            split_lines("a\r\nb\n\nc"),
            vec!["a\r\n", "b\n", "\n", "c"]
        );
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_round_trip_preserves_bytes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.js");
        let content = "function a() {\r\n}\n\n  // tail";
        fs::write(&path, content).unwrap();

        let lines = read_lines(&path).unwrap();
        write_lines(&path, &lines).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), content);
    }

    #[test]
    fn test_invalid_utf8_is_read_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.js");
        fs::write(&path, b"f\xff\xfe\n").unwrap();

        match read_lines(&path) {
            Err(NoteError::Read { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected read error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            read_lines(&dir.path().join("missing.js")),
            Err(NoteError::Read { .. })
        ));
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope").join("x.js");
        assert!(matches!(
            write_lines(&path, &["x\n"]),
            Err(NoteError::Write { .. })
        ));
    }
}

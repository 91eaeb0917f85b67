//! Reading and writing the backing JSON document.
//!
//! The document is a pretty-printed JSON array of records. It is always
//! rewritten whole: the new content goes to a uniquely named sibling
//! temporary file which is then persisted over the document.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::record::StudentRecord;

/// Read the whole collection from `path`.
///
/// A missing, empty or whitespace-only document is an empty collection.
///
/// # Errors
///
/// Returns [`Error::StorageRead`] if the file exists but cannot be read, and
/// [`Error::StorageDecode`] if it is not a JSON array of records.
pub fn read(path: &Path) -> Result<Vec<StudentRecord>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(source) if source.kind() == ErrorKind::NotFound => {
            trace!("No document at {}, treating as empty", path.display());
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(Error::StorageRead {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_str(&content).map_err(|source| Error::StorageDecode {
        path: path.to_path_buf(),
        source,
    })
}

/// Overwrite the document at `path` with `records`.
///
/// Creates the parent directories if they don't exist.
///
/// # Errors
///
/// Returns [`Error::DirectoryCreate`] or [`Error::StorageWrite`] on I/O failure.
pub fn write(path: &Path, records: &[StudentRecord]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !parent.exists() {
        fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut content = serde_json::to_string_pretty(records)?;
    content.push('\n');

    let write_err = |source| Error::StorageWrite {
        path: path.to_path_buf(),
        source,
    };
    let mut staging = NamedTempFile::new_in(parent).map_err(write_err)?;
    staging.write_all(content.as_bytes()).map_err(write_err)?;
    staging.flush().map_err(write_err)?;
    staging.as_file().sync_all().map_err(write_err)?;
    staging.persist(path).map_err(|e| write_err(e.error))?;

    debug!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Gender;

    fn student(id: &str) -> StudentRecord {
        StudentRecord {
            id: id.to_string(),
            full_name: format!("Student {id}"),
            gender: Gender::Male,
            email: format!("{id}@example.edu"),
            program: "CS".to_string(),
            year_level: "1st Year".to_string(),
            university: "State University".to_string(),
        }
    }

    #[test]
    fn test_read_missing_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let records = read(&dir.path().join("students.json")).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_read_blank_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.json");
        fs::write(&path, "  \n").unwrap();
        assert!(read(&path).unwrap().is_empty());
    }

    #[test]
    fn test_read_malformed_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.json");
        fs::write(&path, "{\"not\": \"an array\"}").unwrap();
        let err = read(&path).unwrap_err();
        assert!(matches!(err, Error::StorageDecode { .. }));
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.json");
        let records = vec![student("S1"), student("S2")];

        write(&path, &records).unwrap();
        assert_eq!(read(&path).unwrap(), records);
    }

    #[test]
    fn test_write_is_pretty_printed_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.json");
        write(&path, &[student("S1")]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("[\n"));
        assert!(content.contains("  {\n"));
        assert!(content.contains("\"fullName\": \"Student S1\""));
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("students.json");
        write(&path, &[]).unwrap();
        assert!(path.exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]\n");
    }

    #[test]
    fn test_write_leaves_no_staging_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.json");
        write(&path, &[student("S1")]).unwrap();
        write(&path, &[student("S1"), student("S2")]).unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("students.json")]);
    }

    #[test]
    fn test_concurrent_writers_never_fail_or_tear() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.json");

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let path = path.clone();
                std::thread::spawn(move || {
                    for i in 0..50 {
                        let records: Vec<_> =
                            (0..=i).map(|n| student(&format!("T{t}-{n}"))).collect();
                        write(&path, &records).unwrap();
                        read(&path).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(read(&path).unwrap().len(), 50);
    }
}

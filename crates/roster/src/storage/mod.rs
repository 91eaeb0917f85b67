//! Storage layer for roster.
//!
//! Persists the student collection as a single JSON document and enforces
//! the uniqueness of `id` and `email`.
//!
//! Every mutation reads the whole document, changes the in-memory copy and
//! overwrites the whole document. Mutations made through one [`Storage`] are
//! serialized by an internal write lock; separate processes writing the same
//! file are not coordinated and the last writer wins.

pub mod document;

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::record::StudentRecord;
use crate::stats::Summary;

/// Storage engine for student records.
#[derive(Debug)]
pub struct Storage {
    /// Path to the JSON document.
    path: PathBuf,
    /// Held for the whole read-modify-write cycle of a mutation.
    write_lock: Mutex<()>,
}

impl Storage {
    /// Open the store backed by the document at `path`.
    ///
    /// Nothing is created on disk until the first mutation; a missing document
    /// reads as an empty collection.
    #[must_use]
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        debug!("Using student data at {}", path.display());
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    /// Get the path to the backing document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the full collection, in stored order.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read or decoded.
    pub fn list(&self) -> Result<Vec<StudentRecord>> {
        document::read(&self.path)
    }

    /// Get the record with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no record has `id`, or a storage error.
    pub fn get(&self, id: &str) -> Result<StudentRecord> {
        self.list()?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| Error::not_found(id))
    }

    /// Count the stored records.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read or decoded.
    pub fn count(&self) -> Result<usize> {
        Ok(self.list()?.len())
    }

    /// Compute aggregate counts over the stored records.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read or decoded.
    pub fn summary(&self) -> Result<Summary> {
        Ok(Summary::of(&self.list()?))
    }

    /// Append a new record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conflict`] if the id or email is already taken, in which
    /// case nothing is written, or a storage error.
    pub fn add(&self, record: StudentRecord) -> Result<StudentRecord> {
        let stored = self.mutate(|records| {
            if records.iter().any(|r| r.id == record.id) {
                return Err(Error::conflict(format!(
                    "student with id '{}' already exists",
                    record.id
                )));
            }
            ensure_email_free(records, &record.email, None)?;
            records.push(record.clone());
            Ok(record)
        })?;

        info!(id = %stored.id, "Added student");
        Ok(stored)
    }

    /// Replace the record with `id`, keeping its position.
    ///
    /// The replacement's id is forced to `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no record has `id`, [`Error::Conflict`] if
    /// the new email belongs to another record, or a storage error.
    pub fn update(&self, id: &str, mut record: StudentRecord) -> Result<StudentRecord> {
        record.id = id.to_string();
        let stored = self.mutate(|records| {
            let index = records
                .iter()
                .position(|r| r.id == id)
                .ok_or_else(|| Error::not_found(id))?;
            ensure_email_free(records, &record.email, Some(id))?;
            records[index] = record.clone();
            Ok(record)
        })?;

        info!(id = %stored.id, "Updated student");
        Ok(stored)
    }

    /// Remove the record with `id` and return it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no record has `id`, or a storage error.
    pub fn remove(&self, id: &str) -> Result<StudentRecord> {
        let removed = self.mutate(|records| {
            let index = records
                .iter()
                .position(|r| r.id == id)
                .ok_or_else(|| Error::not_found(id))?;
            Ok(records.remove(index))
        })?;

        info!(id = %removed.id, "Removed student");
        Ok(removed)
    }

    /// Run one read-modify-write cycle under the write lock.
    ///
    /// The document is only rewritten if `op` succeeds.
    fn mutate<T>(
        &self,
        op: impl FnOnce(&mut Vec<StudentRecord>) -> Result<T>,
    ) -> Result<T> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut records = document::read(&self.path)?;
        let out = op(&mut records)?;
        document::write(&self.path, &records)?;
        Ok(out)
    }
}

/// Fail if `email` belongs to a record other than `except`.
fn ensure_email_free(records: &[StudentRecord], email: &str, except: Option<&str>) -> Result<()> {
    let taken = records
        .iter()
        .any(|r| r.email == email && Some(r.id.as_str()) != except);
    if taken {
        return Err(Error::conflict(format!(
            "student with email '{email}' already exists"
        )));
    }
    Ok(())
}

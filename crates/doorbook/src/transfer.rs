//! Import and export of the full record set.
//!
//! The export document has the same shape as the durable one (a JSON array
//! of complete records, stable field order, empty strings for unset
//! optional fields) but is pretty-printed for people to read.
//!
//! Import is destructive and all-or-nothing: the whole text is decoded and
//! validated first, and only a fully valid document replaces the store.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::info;

use crate::building::{decode_document, encode_document};
use crate::error::{Error, Result};
use crate::storage::KeyValueStore;
use crate::store::RecordStore;

/// Default prefix of export file names.
pub const DEFAULT_EXPORT_PREFIX: &str = "doorbook_export";

/// File name for an export taken on `date`: `<prefix>_<YYYY-MM-DD>.json`.
#[must_use]
pub fn export_file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{prefix}_{}.json", date.format("%Y-%m-%d"))
}

impl<B: KeyValueStore> RecordStore<B> {
    /// Serialize every building as a human-readable JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn export_all(&self) -> Result<String> {
        encode_document(self.records(), true)
    }

    /// Replace every building with the ones described by `text`.
    ///
    /// This discards all existing buildings. Returns the number imported.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if the text is malformed or any record is
    /// invalid, leaving the store untouched, or a persistence error if the
    /// write fails.
    pub fn import_all(&mut self, text: &str) -> Result<usize> {
        let records = decode_document(text)?;
        let count = records.len();
        self.replace_all(records)?;
        info!("Imported {} buildings", count);
        Ok(count)
    }

    /// Write the export document to a dated file inside `dir`.
    ///
    /// The directory is created if needed. Returns the path written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NothingToExport`] if the store is empty, or an I/O
    /// error if the file cannot be written.
    pub fn export_to_dir(&self, dir: &Path, prefix: &str, date: NaiveDate) -> Result<PathBuf> {
        if self.is_empty() {
            return Err(Error::NothingToExport);
        }

        std::fs::create_dir_all(dir).map_err(|source| Error::DirectoryCreate {
            path: dir.to_path_buf(),
            source,
        })?;

        let path = dir.join(export_file_name(prefix, date));
        std::fs::write(&path, self.export_all()?)?;
        info!("Exported {} buildings to {}", self.len(), path.display());
        Ok(path)
    }

    /// Read `path` and import it with [`import_all`](Self::import_all).
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, [`Error::Parse`] if
    /// it is not UTF-8 text, otherwise whatever `import_all` returns.
    pub fn import_from_file(&mut self, path: &Path) -> Result<usize> {
        let bytes = std::fs::read(path)?;
        let text = String::from_utf8(bytes)
            .map_err(|e| Error::parse(format!("{} is not UTF-8 text: {e}", path.display())))?;
        self.import_all(&text)
    }
}

//! Durable key-value storage for doorbook.
//!
//! The record store persists its whole record set as one document under one
//! key. This module provides the [`KeyValueStore`] seam it writes through:
//!
//! - [`SqliteKv`]: the on-device backend, one `SQLite` row per key
//! - [`MemoryKv`]: an in-memory backend for tests, with write counting and
//!   failure injection

pub mod migrations;
pub mod schema;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// A named-slot persistence backend.
///
/// Writes replace the whole value of a slot; there is no partial update.
pub trait KeyValueStore: std::fmt::Debug {
    /// Short backend name for logging.
    fn backend_name(&self) -> &'static str;

    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// Either the whole value is written or the previous value remains.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove the slot. Returns `true` if a value was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&mut self, key: &str) -> Result<bool>;
}

/// `SQLite`-backed key-value storage.
#[derive(Debug)]
pub struct SqliteKv {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl SqliteKv {
    /// Open or create a database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        // Every mutation is one small write; favour durability over throughput.
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=FULL;")?;

        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory database, mostly for tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size of the database file in bytes (0 for in-memory databases).
    #[must_use]
    pub fn size_bytes(&self) -> u64 {
        if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map_or(0, |m| m.len())
        }
    }
}

impl KeyValueStore for SqliteKv {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_slots WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let updated_at = Utc::now().to_rfc3339();
        self.conn
            .execute(
                r"
                INSERT INTO kv_slots (key, value, updated_at) VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
                ",
                params![key, value, updated_at],
            )
            .map_err(|e| Error::persistence(key, e.to_string()))?;

        debug!("Wrote {} bytes to slot {}", value.len(), key);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM kv_slots WHERE key = ?1", [key])
            .map_err(|e| Error::persistence(key, e.to_string()))?;
        Ok(affected > 0)
    }
}

/// In-memory key-value storage.
///
/// Counts successful writes and can be told to refuse writes, which makes
/// it the backend of choice for exercising the store's failure paths.
#[derive(Debug, Default, Clone)]
pub struct MemoryKv {
    slots: HashMap<String, String>,
    fail_writes: bool,
    writes: usize,
}

impl MemoryKv {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with one slot already filled.
    #[must_use]
    pub fn with_slot(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut slots = HashMap::new();
        slots.insert(key.into(), value.into());
        Self {
            slots,
            ..Self::default()
        }
    }

    /// Make every subsequent write fail (or succeed again).
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Number of successful writes so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl KeyValueStore for MemoryKv {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes {
            return Err(Error::persistence(key, "writes are disabled"));
        }
        self.slots.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool> {
        if self.fail_writes {
            return Err(Error::persistence(key, "writes are disabled"));
        }
        self.writes += 1;
        Ok(self.slots.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let kv = SqliteKv::open_in_memory();
        assert!(kv.is_ok());
    }

    #[test]
    fn test_sqlite_get_missing() {
        let kv = SqliteKv::open_in_memory().unwrap();
        assert_eq!(kv.get("absent").unwrap(), None);
    }

    #[test]
    fn test_sqlite_set_and_get() {
        let mut kv = SqliteKv::open_in_memory().unwrap();
        kv.set("slot", "[]").unwrap();
        assert_eq!(kv.get("slot").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_sqlite_set_overwrites() {
        let mut kv = SqliteKv::open_in_memory().unwrap();
        kv.set("slot", "first").unwrap();
        kv.set("slot", "second").unwrap();
        assert_eq!(kv.get("slot").unwrap().as_deref(), Some("second"));

        let rows: i64 = kv
            .conn
            .query_row("SELECT COUNT(*) FROM kv_slots", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_sqlite_remove() {
        let mut kv = SqliteKv::open_in_memory().unwrap();
        kv.set("slot", "value").unwrap();
        assert!(kv.remove("slot").unwrap());
        assert!(!kv.remove("slot").unwrap());
        assert_eq!(kv.get("slot").unwrap(), None);
    }

    #[test]
    fn test_sqlite_unicode_value() {
        let mut kv = SqliteKv::open_in_memory().unwrap();
        kv.set("slot", "Çiçek Apt. / kapı 1234").unwrap();
        assert_eq!(
            kv.get("slot").unwrap().as_deref(),
            Some("Çiçek Apt. / kapı 1234")
        );
    }

    #[test]
    fn test_path_in_memory() {
        let kv = SqliteKv::open_in_memory().unwrap();
        assert_eq!(kv.path().to_string_lossy(), ":memory:");
        assert_eq!(kv.size_bytes(), 0);
    }

    #[test]
    fn test_open_file_based_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("doorbook.db");

        {
            let mut kv = SqliteKv::open(&db_path).unwrap();
            kv.set("slot", "persisted").unwrap();
            assert_eq!(kv.path(), db_path);
            assert!(kv.size_bytes() > 0);
        }

        let kv = SqliteKv::open(&db_path).unwrap();
        assert_eq!(kv.get("slot").unwrap().as_deref(), Some("persisted"));
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let nested_path = dir.path().join("nested/deeper/doorbook.db");

        let _kv = SqliteKv::open(&nested_path).unwrap();
        assert!(nested_path.exists());
    }

    #[test]
    fn test_memory_kv_counts_writes() {
        let mut kv = MemoryKv::new();
        kv.set("a", "1").unwrap();
        kv.set("a", "2").unwrap();
        assert_eq!(kv.write_count(), 2);
        assert_eq!(kv.get("a").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_memory_kv_fail_writes_keeps_value() {
        let mut kv = MemoryKv::with_slot("a", "1");
        kv.set_fail_writes(true);

        let err = kv.set("a", "2").unwrap_err();
        assert!(err.is_persistence());
        assert_eq!(kv.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(kv.write_count(), 0);

        kv.set_fail_writes(false);
        kv.set("a", "2").unwrap();
        assert_eq!(kv.get("a").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_backend_names() {
        assert_eq!(MemoryKv::new().backend_name(), "memory");
        assert_eq!(SqliteKv::open_in_memory().unwrap().backend_name(), "sqlite");
    }
}

//! Error types for doorbook.
//!
//! This module defines all error types used throughout the doorbook crate.
//! Every variant is recoverable: a failed operation leaves the record set in
//! the state it had before the call.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for doorbook operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Record Errors ===
    /// The caller supplied an invalid record (e.g. an empty name).
    #[error("invalid {field}: {message}")]
    Validation {
        /// Name of the offending field.
        field: &'static str,
        /// Description of the validation failure.
        message: String,
    },

    /// An operation referenced an id that is not in the record set.
    #[error("building not found: {id}")]
    NotFound {
        /// The id that was looked up.
        id: String,
    },

    /// Import text is not a well-formed building document.
    #[error("failed to parse building document: {message}")]
    Parse {
        /// Description of what went wrong.
        message: String,
    },

    /// The durable slot holds data that is not a valid building document.
    #[error("stored data under '{key}' is corrupt: {message}")]
    CorruptState {
        /// The storage key that was read.
        key: &'static str,
        /// Description of what went wrong.
        message: String,
    },

    /// An export was requested while the store holds no buildings.
    #[error("there are no buildings to export")]
    NothingToExport,

    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// A durable write or read was refused by the storage backend.
    #[error("failed to persist '{key}': {message}")]
    Persistence {
        /// The storage key being written or read.
        key: String,
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for doorbook operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new validation error.
    #[must_use]
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Create a new not-found error.
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create a new parse error.
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a new persistence error for the given storage key.
    #[must_use]
    pub fn persistence(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Persistence {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Check if this error was caused by invalid caller input.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this error indicates a missing building.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error came from decoding a building document,
    /// either import text or the durable slot.
    #[must_use]
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::CorruptState { .. })
    }

    /// Check if this error came from the durable storage layer.
    #[must_use]
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            Self::DatabaseOpen { .. }
                | Self::DatabaseQuery(_)
                | Self::DatabaseMigration { .. }
                | Self::Persistence { .. }
                | Self::Io(_)
                | Self::DirectoryCreate { .. }
        )
    }
}

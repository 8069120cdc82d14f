//! `SQLite` schema definitions for doorbook.
//!
//! The database is a plain key-value container: each named slot is one row
//! in `kv_slots`.

/// SQL statement to create the key-value slot table.
pub const CREATE_KV_SLOTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS kv_slots (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_KV_SLOTS_TABLE, CREATE_METADATA_TABLE];

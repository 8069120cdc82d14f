//! Read-only views derived from a record snapshot.
//!
//! Both views are pure functions of their input slice. They never touch
//! storage and always return cloned records.

pub mod recency;
pub mod search;

pub use recency::{recent, DEFAULT_RECENT_LIMIT};
pub use search::{matches, search};

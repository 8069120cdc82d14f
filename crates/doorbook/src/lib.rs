//! `doorbook` - A local directory of buildings and their door codes
//!
//! This library keeps a courier's personal list of buildings (name, address,
//! neighborhood, entry codes and notes) in a single on-device record store,
//! and derives the recently-viewed and search views from it. The whole set
//! can be exported to, and restored from, a JSON document.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod building;
pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod storage;
pub mod store;
pub mod transfer;
pub mod views;

pub use building::{BuildingDraft, BuildingRecord};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use storage::{KeyValueStore, MemoryKv, SqliteKv};
pub use store::{RecordStore, Snapshot, StoreStats, STORAGE_KEY};
pub use transfer::{export_file_name, DEFAULT_EXPORT_PREFIX};
pub use views::{recent, search, DEFAULT_RECENT_LIMIT};

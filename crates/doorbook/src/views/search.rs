//! Case-insensitive substring search.
//!
//! A query matches a record when its trimmed, lowercased form occurs in the
//! lowercased name, address, neighborhood or notes. Door codes are never
//! searched. An empty query matches nothing: "no query typed" is shown as an
//! empty result, not as the full list.

use crate::building::BuildingRecord;

/// Records matching `query`, in input order.
#[must_use]
pub fn search(records: &[BuildingRecord], query: &str) -> Vec<BuildingRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    records
        .iter()
        .filter(|record| matches_needle(record, &needle))
        .cloned()
        .collect()
}

/// Whether a single record matches `query`.
#[must_use]
pub fn matches(record: &BuildingRecord, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    !needle.is_empty() && matches_needle(record, &needle)
}

fn matches_needle(record: &BuildingRecord, needle: &str) -> bool {
    std::iter::once(Some(record.name.as_str()))
        .chain([
            record.address.as_deref(),
            record.neighborhood.as_deref(),
            record.notes.as_deref(),
        ])
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
}

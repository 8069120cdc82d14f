//! Most-recently-viewed ordering.

use crate::building::BuildingRecord;

/// Number of records the recency view returns when no limit is given.
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Up to `limit` records, most recently viewed first.
///
/// The sort is stable, so records with equal `last_viewed` keep their
/// relative input order.
#[must_use]
pub fn recent(records: &[BuildingRecord], limit: usize) -> Vec<BuildingRecord> {
    let mut ordered: Vec<&BuildingRecord> = records.iter().collect();
    ordered.sort_by(|a, b| b.last_viewed.cmp(&a.last_viewed));
    ordered.into_iter().take(limit).cloned().collect()
}

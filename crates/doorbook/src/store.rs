//! The building record store.
//!
//! [`RecordStore`] owns the authoritative, ordered record set and its
//! durable copy. Every mutation builds the next set aside, writes the whole
//! set to the backend under [`STORAGE_KEY`], and only then publishes it. A
//! failed write therefore leaves memory exactly as it was, matching what the
//! backend still holds.
//!
//! Readers get [`Snapshot`]s: cheap shared handles to an immutable set,
//! tagged with the revision that produced them.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::building::{decode_document, encode_document, BuildingDraft, BuildingRecord};
use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::storage::KeyValueStore;
use crate::views;

/// The single storage key holding the whole record document.
pub const STORAGE_KEY: &str = "doorbook_buildings";

/// An immutable view of the record set at one revision.
#[derive(Debug, Clone)]
pub struct Snapshot {
    revision: u64,
    records: Arc<Vec<BuildingRecord>>,
}

impl Snapshot {
    /// Revision of the store when this snapshot was taken.
    ///
    /// Every successful mutation bumps the revision, so it can key caches
    /// of derived views.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// All records in stored order.
    #[must_use]
    pub fn records(&self) -> &[BuildingRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the snapshot holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&BuildingRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// The recency view of this snapshot.
    #[must_use]
    pub fn recent(&self, limit: usize) -> Vec<BuildingRecord> {
        views::recent(&self.records, limit)
    }

    /// The search view of this snapshot.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<BuildingRecord> {
        views::search(&self.records, query)
    }
}

/// Summary figures about the record set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    /// Total number of buildings stored.
    pub total_buildings: usize,
    /// Creation time of the oldest building.
    pub oldest_created: Option<DateTime<Utc>>,
    /// Creation time of the newest building.
    pub newest_created: Option<DateTime<Utc>>,
    /// Most recent view of any building.
    pub last_viewed: Option<DateTime<Utc>>,
    /// Current store revision.
    pub revision: u64,
}

/// The authoritative building record store.
#[derive(Debug)]
pub struct RecordStore<B> {
    backend: B,
    clock: Arc<dyn Clock>,
    records: Arc<Vec<BuildingRecord>>,
    revision: u64,
}

impl<B: KeyValueStore> RecordStore<B> {
    /// Create an empty store over `backend`.
    ///
    /// Nothing is read until [`load`](Self::load) is called.
    pub fn new(backend: B, clock: Arc<dyn Clock>) -> Self {
        Self {
            backend,
            clock,
            records: Arc::new(Vec::new()),
            revision: 0,
        }
    }

    /// Read the durable record set into memory.
    ///
    /// An absent slot loads as an empty set. Returns the number of records
    /// loaded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorruptState`] if the slot holds an invalid
    /// document. The in-memory set is left unchanged and the slot is not
    /// touched; the caller decides whether to reset it with
    /// [`replace_all`](Self::replace_all). Backend read failures are
    /// returned as-is.
    pub fn load(&mut self) -> Result<usize> {
        let loaded = match self.backend.get(STORAGE_KEY)? {
            None => {
                debug!("No stored buildings under {}, starting empty", STORAGE_KEY);
                Vec::new()
            }
            Some(text) => decode_document(&text).map_err(|err| match err {
                Error::Parse { message } => {
                    warn!("Stored building data is corrupt: {}", message);
                    Error::CorruptState {
                        key: STORAGE_KEY,
                        message,
                    }
                }
                other => other,
            })?,
        };

        let count = loaded.len();
        self.records = Arc::new(loaded);
        self.revision += 1;
        info!(
            "Loaded {} buildings from {} storage",
            count,
            self.backend.backend_name()
        );
        Ok(count)
    }

    /// Create a building from `draft` and persist it.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the name is blank, or a persistence
    /// error if the write fails (in which case nothing is added).
    pub fn add(&mut self, draft: BuildingDraft) -> Result<BuildingRecord> {
        let draft = draft.normalized()?;
        let now = self.clock.now();
        let record = BuildingRecord::from_draft(self.next_id(now), draft, now);

        let mut next = self.records.as_ref().clone();
        next.push(record);
        let index = next.len() - 1;
        self.commit(next)?;

        let added = self.published(index)?;
        info!("Added building {} ({})", added.id, added.name);
        Ok(added)
    }

    /// Replace the editable fields of an existing building.
    ///
    /// `id`, `created_at` and `last_viewed` are kept from the stored record
    /// whatever `record` carries. Returns the stored result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no building has `record.id`, a
    /// validation error if the new name is blank, or a persistence error if
    /// the write fails.
    pub fn update(&mut self, record: &BuildingRecord) -> Result<BuildingRecord> {
        let index = self
            .position(&record.id)
            .ok_or_else(|| Error::not_found(&record.id))?;
        let draft = record.draft().normalized()?;

        let mut next = self.records.as_ref().clone();
        let stored = next
            .get_mut(index)
            .ok_or_else(|| Error::not_found(&record.id))?;
        stored.apply(draft);
        self.commit(next)?;

        let updated = self.published(index)?;
        debug!("Updated building {}", updated.id);
        Ok(updated)
    }

    /// Remove a building. Removing an unknown id is not an error.
    ///
    /// Returns `true` if a building was removed.
    ///
    /// # Errors
    ///
    /// Returns a persistence error if the write fails.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let mut next = self.records.as_ref().clone();
        next.retain(|record| record.id != id);
        let removed = next.len() != self.records.len();
        self.commit(next)?;

        if removed {
            info!("Deleted building {}", id);
        } else {
            debug!("Delete of unknown building {} ignored", id);
        }
        Ok(removed)
    }

    /// Look up a building by id. Never touches storage.
    #[must_use]
    pub fn get_by_id(&self, id: &str) -> Option<&BuildingRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Mark a building as viewed now.
    ///
    /// `last_viewed` never moves before `created_at`, even if the clock
    /// reads earlier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the id is unknown, or a persistence
    /// error if the write fails.
    pub fn touch(&mut self, id: &str) -> Result<BuildingRecord> {
        let index = self.position(id).ok_or_else(|| Error::not_found(id))?;
        let now = self.clock.now();

        let mut next = self.records.as_ref().clone();
        let stored = next.get_mut(index).ok_or_else(|| Error::not_found(id))?;
        stored.last_viewed = now.max(stored.created_at);
        self.commit(next)?;

        debug!("Touched building {}", id);
        self.published(index)
    }

    /// Overwrite the whole record set.
    ///
    /// Used by import and by [`clear_all`](Self::clear_all). Records are
    /// stored in their document form: text is trimmed, empty optional
    /// fields become `None` and timestamps are cut to milliseconds.
    ///
    /// # Errors
    ///
    /// Returns a validation error if any record could not be loaded back
    /// (blank id or name, `last_viewed` before `created_at`, duplicate ids),
    /// or a persistence error if the write fails. Either way nothing
    /// changes.
    pub fn replace_all(&mut self, records: Vec<BuildingRecord>) -> Result<()> {
        let count = records.len();
        self.commit(records)?;
        info!("Replaced record set with {} buildings", count);
        Ok(())
    }

    /// Delete every building.
    ///
    /// # Errors
    ///
    /// Returns a persistence error if the write fails.
    pub fn clear_all(&mut self) -> Result<()> {
        self.replace_all(Vec::new())
    }

    /// All records in stored order.
    #[must_use]
    pub fn records(&self) -> &[BuildingRecord] {
        &self.records
    }

    /// A shared, immutable view of the current set.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            revision: self.revision,
            records: Arc::clone(&self.records),
        }
    }

    /// Current revision. Bumped by `load` and every successful mutation.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of buildings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no buildings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Up to `limit` buildings, most recently viewed first.
    #[must_use]
    pub fn recent(&self, limit: usize) -> Vec<BuildingRecord> {
        views::recent(&self.records, limit)
    }

    /// Buildings matching `query`, in stored order.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<BuildingRecord> {
        views::search(&self.records, query)
    }

    /// Summary figures about the record set.
    #[must_use]
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            total_buildings: self.records.len(),
            oldest_created: self.records.iter().map(|r| r.created_at).min(),
            newest_created: self.records.iter().map(|r| r.created_at).max(),
            last_viewed: self.records.iter().map(|r| r.last_viewed).max(),
            revision: self.revision,
        }
    }

    /// The storage backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the storage backend.
    ///
    /// Writing to [`STORAGE_KEY`] through this handle bypasses the store;
    /// call [`load`](Self::load) afterwards to resynchronise.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Give the backend back, dropping the in-memory set.
    pub fn into_backend(self) -> B {
        self.backend
    }

    /// The record at `index` as it was stored by the last commit.
    fn published(&self, index: usize) -> Result<BuildingRecord> {
        self.records
            .get(index)
            .cloned()
            .ok_or_else(|| Error::persistence(STORAGE_KEY, "committed record is missing"))
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|record| record.id == id)
    }

    /// Millisecond timestamp ids, bumped until unique in the live set.
    fn next_id(&self, now: DateTime<Utc>) -> String {
        let mut candidate = now.timestamp_millis();
        loop {
            let id = candidate.to_string();
            if self.get_by_id(&id).is_none() {
                return id;
            }
            candidate = candidate.saturating_add(1);
        }
    }

    /// Persist `next` and publish it. On failure nothing changes.
    ///
    /// What gets published is the decoded payload, so memory always equals
    /// what a later `load` reads back.
    fn commit(&mut self, next: Vec<BuildingRecord>) -> Result<()> {
        let payload = encode_document(&next, false)?;
        let next = decode_document(&payload).map_err(|err| match err {
            Error::Parse { message } => Error::validation("records", message),
            other => other,
        })?;
        if let Err(err) = self.backend.set(STORAGE_KEY, &payload) {
            warn!("Failed to persist buildings, keeping previous state: {}", err);
            return Err(err);
        }
        self.records = Arc::new(next);
        self.revision += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::MemoryKv;
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }

    fn create_test_store() -> (RecordStore<MemoryKv>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(start()));
        let mut store = RecordStore::new(MemoryKv::new(), clock.clone());
        store.load().unwrap();
        (store, clock)
    }

    fn reloaded(store: RecordStore<MemoryKv>) -> Vec<BuildingRecord> {
        let clock = Arc::new(ManualClock::new(start()));
        let mut fresh = RecordStore::new(store.into_backend(), clock);
        fresh.load().unwrap();
        fresh.records().to_vec()
    }

    #[test]
    fn test_load_empty_backend() {
        let (store, _) = create_test_store();
        assert!(store.is_empty());
        assert_eq!(store.revision(), 1);
        assert_eq!(store.backend().write_count(), 0);
    }

    #[test]
    fn test_add_sets_identity_and_timestamps() {
        let (mut store, _) = create_test_store();
        let record = store.add(BuildingDraft::new("Acacia House")).unwrap();

        assert_eq!(record.name, "Acacia House");
        assert!(!record.id.is_empty());
        assert_eq!(record.created_at, start());
        assert_eq!(record.created_at, record.last_viewed);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_add_rejects_blank_name_without_writing() {
        let (mut store, _) = create_test_store();
        let err = store.add(BuildingDraft::new("  ")).unwrap_err();

        assert!(err.is_validation());
        assert!(store.is_empty());
        assert_eq!(store.backend().write_count(), 0);
    }

    #[test]
    fn test_add_ids_unique_within_same_millisecond() {
        let (mut store, _) = create_test_store();
        let a = store.add(BuildingDraft::new("A")).unwrap();
        let b = store.add(BuildingDraft::new("B")).unwrap();
        let c = store.add(BuildingDraft::new("C")).unwrap();

        assert_ne!(a.id, b.id);
        assert_ne!(b.id, c.id);
        assert_ne!(a.id, c.id);
        assert_eq!(a.id, start().timestamp_millis().to_string());
    }

    #[test]
    fn test_update_replaces_editable_fields_only() {
        let (mut store, clock) = create_test_store();
        let original = store
            .add(BuildingDraft::new("Oak Court").with_address("1 Oak St"))
            .unwrap();
        clock.advance(Duration::hours(1));

        let mut edited = original.clone();
        edited.name = "Oak Court East".to_string();
        edited.address = None;
        edited.inner_door_code = Some("77".to_string());
        edited.created_at = start() + Duration::days(3);
        edited.last_viewed = start() + Duration::days(3);

        let stored = store.update(&edited).unwrap();
        assert_eq!(stored.id, original.id);
        assert_eq!(stored.created_at, original.created_at);
        assert_eq!(stored.last_viewed, original.last_viewed);
        assert_eq!(stored.name, "Oak Court East");
        assert_eq!(stored.address, None);
        assert_eq!(stored.inner_door_code.as_deref(), Some("77"));
        assert_eq!(store.get_by_id(&original.id), Some(&stored));
    }

    #[test]
    fn test_update_unknown_id() {
        let (mut store, _) = create_test_store();
        let mut ghost = store.add(BuildingDraft::new("Ghost")).unwrap();
        ghost.id = "missing".to_string();

        let err = store.update(&ghost).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(store.backend().write_count(), 1);
    }

    #[test]
    fn test_update_rejects_blank_name() {
        let (mut store, _) = create_test_store();
        let mut record = store.add(BuildingDraft::new("Named")).unwrap();
        record.name = " ".to_string();

        assert!(store.update(&record).unwrap_err().is_validation());
        assert_eq!(store.records()[0].name, "Named");
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (mut store, _) = create_test_store();
        let a = store.add(BuildingDraft::new("A")).unwrap();
        store.add(BuildingDraft::new("B")).unwrap();

        assert!(store.delete(&a.id).unwrap());
        let once = store.records().to_vec();
        assert!(!store.delete(&a.id).unwrap());
        assert_eq!(store.records(), once.as_slice());
    }

    #[test]
    fn test_get_by_id_has_no_side_effects() {
        let (mut store, _) = create_test_store();
        let a = store.add(BuildingDraft::new("A")).unwrap();
        let writes = store.backend().write_count();
        let revision = store.revision();

        assert_eq!(store.get_by_id(&a.id), Some(&a));
        assert_eq!(store.get_by_id("nope"), None);
        assert_eq!(store.backend().write_count(), writes);
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_touch_updates_last_viewed_only() {
        let (mut store, clock) = create_test_store();
        let a = store.add(BuildingDraft::new("A")).unwrap();
        clock.advance(Duration::minutes(10));

        let touched = store.touch(&a.id).unwrap();
        assert_eq!(touched.last_viewed, start() + Duration::minutes(10));
        assert_eq!(touched.created_at, a.created_at);
        assert_eq!(touched.name, a.name);
    }

    #[test]
    fn test_touch_never_precedes_creation() {
        let (mut store, clock) = create_test_store();
        let a = store.add(BuildingDraft::new("A")).unwrap();
        clock.set(start() - Duration::days(1));

        let touched = store.touch(&a.id).unwrap();
        assert_eq!(touched.last_viewed, touched.created_at);
    }

    #[test]
    fn test_touch_unknown_id() {
        let (mut store, _) = create_test_store();
        assert!(store.touch("missing").unwrap_err().is_not_found());
    }

    #[test]
    fn test_each_mutation_writes_once() {
        let (mut store, _) = create_test_store();
        let a = store.add(BuildingDraft::new("A")).unwrap();
        assert_eq!(store.backend().write_count(), 1);
        store.update(&a).unwrap();
        assert_eq!(store.backend().write_count(), 2);
        store.touch(&a.id).unwrap();
        assert_eq!(store.backend().write_count(), 3);
        store.delete("missing").unwrap();
        assert_eq!(store.backend().write_count(), 4);
        store.clear_all().unwrap();
        assert_eq!(store.backend().write_count(), 5);
    }

    #[test]
    fn test_memory_matches_durable_after_every_mutation() {
        let (mut store, clock) = create_test_store();
        let a = store
            .add(BuildingDraft::new("A").with_neighborhood("Moda"))
            .unwrap();
        clock.advance(Duration::seconds(1));
        let b = store.add(BuildingDraft::new("B")).unwrap();
        clock.advance(Duration::seconds(1));
        store.touch(&a.id).unwrap();
        let mut edited = b.clone();
        edited.notes = Some("gate is stiff".to_string());
        store.update(&edited).unwrap();
        store.delete(&a.id).unwrap();

        let expected = store.records().to_vec();
        assert_eq!(reloaded(store), expected);
    }

    #[test]
    fn test_failed_write_rolls_back_every_mutation() {
        let (mut store, clock) = create_test_store();
        let a = store.add(BuildingDraft::new("A")).unwrap();
        let before = store.records().to_vec();
        let revision = store.revision();
        clock.advance(Duration::minutes(1));
        store.backend_mut().set_fail_writes(true);

        assert!(store.add(BuildingDraft::new("B")).unwrap_err().is_persistence());
        let mut edited = a.clone();
        edited.name = "Renamed".to_string();
        assert!(store.update(&edited).unwrap_err().is_persistence());
        assert!(store.touch(&a.id).unwrap_err().is_persistence());
        assert!(store.delete(&a.id).unwrap_err().is_persistence());
        assert!(store.clear_all().unwrap_err().is_persistence());

        assert_eq!(store.records(), before.as_slice());
        assert_eq!(store.revision(), revision);

        store.backend_mut().set_fail_writes(false);
        assert_eq!(reloaded(store), before);
    }

    #[test]
    fn test_load_corrupt_slot_is_reported_and_kept() {
        let clock = Arc::new(ManualClock::new(start()));
        let backend = MemoryKv::with_slot(STORAGE_KEY, "{not json");
        let mut store = RecordStore::new(backend, clock);

        let err = store.load().unwrap_err();
        assert!(matches!(err, Error::CorruptState { .. }));
        assert!(err.is_parse());
        assert!(store.is_empty());
        assert_eq!(
            store.backend().get(STORAGE_KEY).unwrap().as_deref(),
            Some("{not json")
        );

        store.clear_all().unwrap();
        assert_eq!(store.backend().get(STORAGE_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_load_rejects_record_missing_name() {
        let clock = Arc::new(ManualClock::new(start()));
        let doc = r#"[{"id":"1","createdAt":"2024-05-01T09:00:00.000Z","lastViewed":"2024-05-01T09:00:00.000Z"}]"#;
        let mut store = RecordStore::new(MemoryKv::with_slot(STORAGE_KEY, doc), clock);

        let err = store.load().unwrap_err();
        assert!(err.to_string().contains("`name`"));
    }

    #[test]
    fn test_snapshot_is_unaffected_by_later_mutations() {
        let (mut store, _) = create_test_store();
        store.add(BuildingDraft::new("A")).unwrap();
        let snapshot = store.snapshot();

        store.add(BuildingDraft::new("B")).unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(store.len(), 2);
        assert!(store.snapshot().revision() > snapshot.revision());
    }

    #[test]
    fn test_snapshot_views() {
        let (mut store, clock) = create_test_store();
        let a = store.add(BuildingDraft::new("Acacia House")).unwrap();
        clock.advance(Duration::seconds(5));
        let b = store.add(BuildingDraft::new("Birch Block")).unwrap();

        let snapshot = store.snapshot();
        assert_eq!(snapshot.recent(1), vec![b.clone()]);
        assert_eq!(snapshot.search("acacia"), vec![a.clone()]);
        assert_eq!(snapshot.get(&b.id), Some(&b));
        assert_eq!(store.recent(5), vec![b, a]);
    }

    #[test]
    fn test_stats() {
        let (mut store, clock) = create_test_store();
        assert_eq!(store.stats().total_buildings, 0);
        assert!(store.stats().oldest_created.is_none());

        let a = store.add(BuildingDraft::new("A")).unwrap();
        clock.advance(Duration::hours(2));
        store.add(BuildingDraft::new("B")).unwrap();
        clock.advance(Duration::hours(1));
        store.touch(&a.id).unwrap();

        let stats = store.stats();
        assert_eq!(stats.total_buildings, 2);
        assert_eq!(stats.oldest_created, Some(start()));
        assert_eq!(stats.newest_created, Some(start() + Duration::hours(2)));
        assert_eq!(stats.last_viewed, Some(start() + Duration::hours(3)));
        assert_eq!(stats.revision, store.revision());
    }

    #[test]
    fn test_replace_all_overwrites_and_persists() {
        let (mut store, clock) = create_test_store();
        store.add(BuildingDraft::new("Old")).unwrap();
        clock.advance(Duration::minutes(1));

        let fresh = BuildingRecord::from_draft(
            "fresh-1".to_string(),
            BuildingDraft::new("Fresh").with_notes("gate on the left"),
            clock.now(),
        );
        store.replace_all(vec![fresh.clone()]).unwrap();

        assert_eq!(store.records(), [fresh.clone()].as_slice());
        assert_eq!(reloaded(store), vec![fresh]);
    }

    #[test]
    fn test_clear_all_empties_durable_state() {
        let (mut store, _) = create_test_store();
        store.add(BuildingDraft::new("A")).unwrap();
        store.clear_all().unwrap();

        assert!(store.is_empty());
        assert!(reloaded(store).is_empty());
    }

    #[test]
    fn test_replace_all_stores_canonical_form() {
        let (mut store, _) = create_test_store();
        let created = start() + Duration::nanoseconds(608_480_076);
        let padded = BuildingRecord {
            id: " pad-1 ".to_string(),
            name: "  Padded  ".to_string(),
            address: Some("  3 Quay St ".to_string()),
            neighborhood: None,
            outer_door_code: Some(String::new()),
            inner_door_code: None,
            notes: Some(String::new()),
            created_at: created,
            last_viewed: created,
        };

        store.replace_all(vec![padded]).unwrap();

        let stored = store.records()[0].clone();
        assert_eq!(stored.id, "pad-1");
        assert_eq!(stored.name, "Padded");
        assert_eq!(stored.address.as_deref(), Some("3 Quay St"));
        assert_eq!(stored.outer_door_code, None);
        assert_eq!(stored.notes, None);
        assert_eq!(stored.created_at, start() + Duration::milliseconds(608));
        assert_eq!(reloaded(store), vec![stored]);
    }

    #[test]
    fn test_replace_all_rejects_records_load_would_refuse() {
        let (mut store, _) = create_test_store();
        let kept = store.add(BuildingDraft::new("Kept")).unwrap();
        let writes = store.backend().write_count();
        let revision = store.revision();

        let mut backwards = kept.clone();
        backwards.id = "backwards".to_string();
        backwards.last_viewed = backwards.created_at - Duration::days(1);
        let mut blank = kept.clone();
        blank.id = "blank".to_string();
        blank.name = "   ".to_string();
        let duplicate = vec![kept.clone(), kept.clone()];

        for bad in [vec![backwards], vec![blank], duplicate] {
            let err = store.replace_all(bad).unwrap_err();
            assert!(err.is_validation());
        }

        assert_eq!(store.records(), [kept.clone()].as_slice());
        assert_eq!(store.revision(), revision);
        assert_eq!(store.backend().write_count(), writes);
        assert_eq!(reloaded(store), vec![kept]);
    }
}

//! Bounded, newest-first history of saved specs.
//!
//! Storage failures never propagate out of this module: reads degrade to an
//! empty history and failed writes leave the previous list in effect.

use crate::data::{SpecDraft, SpecRecord, Storage, StorageError};
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub const STORAGE_KEY: &str = "taskGeneratorSpecs";
pub const MAX_SPECS: usize = 5;

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub struct HistoryStore<S: Storage> {
    storage: S,
    capacity: usize,
    clock: Clock,
}

impl<S: Storage> HistoryStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_clock(storage, Arc::new(Utc::now))
    }

    pub fn with_clock(storage: S, clock: Clock) -> Self {
        Self {
            storage,
            capacity: MAX_SPECS,
            clock,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Stored specs, newest first. Unreadable or corrupt storage reads as empty.
    pub fn list(&self) -> Vec<SpecRecord> {
        match self.read() {
            Ok(specs) => specs,
            Err(e) => {
                tracing::warn!(error = %e, "reading spec history failed; treating it as empty");
                Vec::new()
            }
        }
    }

    pub fn get(&self, id: i64) -> Option<SpecRecord> {
        self.list().into_iter().find(|spec| spec.id == id)
    }

    /// Persists a draft as a new record and returns the updated history.
    pub fn save(&self, draft: SpecDraft) -> Vec<SpecRecord> {
        self.save_record(draft).1
    }

    /// Like [`save`](Self::save), also returning the record that was created.
    pub fn save_record(&self, draft: SpecDraft) -> (SpecRecord, Vec<SpecRecord>) {
        let existing = self.list();
        let now = (self.clock)();
        let record = SpecRecord {
            id: next_id(&existing, now),
            spec: draft,
            created_at: now,
            updated_at: None,
        };

        let mut updated = Vec::with_capacity(existing.len() + 1);
        updated.push(record.clone());
        updated.extend(existing.iter().cloned());
        updated.truncate(self.capacity);

        (record, self.persist(existing, updated))
    }

    /// Removes the record with `id`. Unknown ids leave the history unchanged.
    pub fn delete(&self, id: i64) -> Vec<SpecRecord> {
        let existing = self.list();
        if !existing.iter().any(|spec| spec.id == id) {
            return existing;
        }

        let updated = existing.iter().filter(|spec| spec.id != id).cloned().collect();
        self.persist(existing, updated)
    }

    /// Writes an edited record back.
    ///
    /// A record already in the history is replaced where it stands and gets
    /// `updated_at` stamped. A record whose id is no longer present (evicted
    /// or deleted meanwhile) is prepended with its identity intact.
    pub fn update(&self, record: SpecRecord) -> Vec<SpecRecord> {
        let existing = self.list();
        let mut record = record;
        record.updated_at = Some((self.clock)());

        let mut updated = existing.clone();
        match updated.iter_mut().find(|spec| spec.id == record.id) {
            Some(slot) => *slot = record,
            None => {
                updated.insert(0, record);
                updated.truncate(self.capacity);
            }
        }

        self.persist(existing, updated)
    }

    fn read(&self) -> Result<Vec<SpecRecord>, StorageError> {
        match self.storage.get(STORAGE_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn write(&self, specs: &[SpecRecord]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(specs)?;
        self.storage.set(STORAGE_KEY, &raw)
    }

    /// Writes `updated`, falling back to `previous` if the write fails.
    fn persist(&self, previous: Vec<SpecRecord>, updated: Vec<SpecRecord>) -> Vec<SpecRecord> {
        match self.write(&updated) {
            Ok(()) => updated,
            Err(e) => {
                tracing::warn!(error = %e, "writing spec history failed; change discarded");
                previous
            }
        }
    }
}

/// Millisecond creation time, bumped past every id already stored.
///
/// When the largest stored id cannot be bumped, the creation time is used,
/// stepped down past any id it collides with.
fn next_id(existing: &[SpecRecord], now: DateTime<Utc>) -> i64 {
    let candidate = now.timestamp_millis();
    let max = match existing.iter().map(|spec| spec.id).max() {
        Some(max) if max >= candidate => max,
        _ => return candidate,
    };

    max.checked_add(1).unwrap_or_else(|| {
        tracing::warn!(max, "stored spec id is at its limit; using creation time instead");
        (i64::MIN..=candidate)
            .rev()
            .find(|id| !existing.iter().any(|spec| spec.id == *id))
            .unwrap_or(candidate)
    })
}

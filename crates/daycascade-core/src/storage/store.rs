//! The schedule store seam.
//!
//! The store owns the authoritative schedule. It hands out day snapshots
//! and applies batches produced by the placement coordinator, each one
//! entirely or not at all, then returns the refreshed day.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::placement::{
    BatchUpdate, DaySnapshot, PlacementKind, ResizeRequest, SnapshotEntry, UnscheduleRequest,
};

/// Persistence collaborator for day schedules.
pub trait ScheduleStore {
    /// Consistent read of every row of a day.
    fn day_snapshot(&self, date_key: &str) -> Result<DaySnapshot>;

    /// Upsert the active placement and every cascading update atomically.
    fn apply_batch(&mut self, batch: &BatchUpdate) -> Result<DaySnapshot>;

    /// Change the duration of one row. Neighbours are not touched.
    fn apply_resize(&mut self, request: &ResizeRequest) -> Result<DaySnapshot>;

    /// Remove one row from the day.
    fn unschedule(&mut self, request: &UnscheduleRequest) -> Result<DaySnapshot>;
}

fn not_found(date_key: &str, entry_id: &str) -> StorageError {
    StorageError::EntryNotFound {
        date_key: date_key.to_string(),
        entry_id: entry_id.to_string(),
    }
}

/// Apply a batch to a copy of a day's rows.
///
/// Every addressed row is looked up before anything changes, so an error
/// leaves the caller's rows as they were.
pub(crate) fn apply_batch_to_day(
    entries: &[SnapshotEntry],
    batch: &BatchUpdate,
) -> Result<Vec<SnapshotEntry>, StorageError> {
    let index_of = |entry_id: &str| {
        entries
            .iter()
            .position(|e| e.schedule_entry_id == entry_id)
            .ok_or_else(|| not_found(&batch.date_key, entry_id))
    };

    let active = &batch.active_placement;
    let moved = match (batch.kind, active.schedule_entry_id.as_deref()) {
        (PlacementKind::Move, Some(entry_id)) => Some(index_of(entry_id)?),
        (PlacementKind::Move, None) => {
            return Err(StorageError::InvalidBatch(format!(
                "move of task '{}' without a schedule entry id",
                active.task_ref
            )))
        }
        (PlacementKind::New, _) => None,
    };
    let cascaded = batch
        .cascading_updates
        .iter()
        .map(|update| index_of(&update.schedule_entry_id).map(|idx| (idx, update)))
        .collect::<Result<Vec<_>, _>>()?;

    let mut day = entries.to_vec();
    match moved {
        Some(idx) => {
            day[idx].start_time = Some(active.start_time.clone());
            day[idx].duration_minutes = Some(active.duration_minutes);
        }
        None => day.push(SnapshotEntry::new(
            Uuid::new_v4().to_string(),
            active.task_ref.clone(),
            Some(active.start_time.as_str()),
            Some(active.duration_minutes),
        )),
    }
    for (idx, update) in cascaded {
        day[idx].start_time = Some(update.start_time.clone());
    }
    Ok(day)
}

pub(crate) fn apply_resize_to_day(
    entries: &mut [SnapshotEntry],
    request: &ResizeRequest,
) -> Result<(), StorageError> {
    let entry = entries
        .iter_mut()
        .find(|e| e.schedule_entry_id == request.schedule_entry_id)
        .ok_or_else(|| not_found(&request.date_key, &request.schedule_entry_id))?;
    entry.duration_minutes = Some(request.duration_minutes);
    Ok(())
}

pub(crate) fn unschedule_from_day(
    entries: &mut Vec<SnapshotEntry>,
    request: &UnscheduleRequest,
) -> Result<(), StorageError> {
    let before = entries.len();
    entries.retain(|e| e.schedule_entry_id != request.schedule_entry_id);
    if entries.len() == before {
        return Err(not_found(&request.date_key, &request.schedule_entry_id));
    }
    Ok(())
}

/// In-process store, one row list per date key.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    days: BTreeMap<String, Vec<SnapshotEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a day with rows.
    pub fn with_day(mut self, snapshot: DaySnapshot) -> Self {
        self.days.insert(snapshot.date_key, snapshot.entries);
        self
    }
}

impl ScheduleStore for MemoryStore {
    fn day_snapshot(&self, date_key: &str) -> Result<DaySnapshot> {
        let entries = self.days.get(date_key).cloned().unwrap_or_default();
        Ok(DaySnapshot::new(date_key, entries))
    }

    fn apply_batch(&mut self, batch: &BatchUpdate) -> Result<DaySnapshot> {
        let current = self.days.get(&batch.date_key).map(Vec::as_slice).unwrap_or(&[]);
        let updated = apply_batch_to_day(current, batch)?;
        self.days.insert(batch.date_key.clone(), updated);
        self.day_snapshot(&batch.date_key)
    }

    fn apply_resize(&mut self, request: &ResizeRequest) -> Result<DaySnapshot> {
        let day = self.days.entry(request.date_key.clone()).or_default();
        apply_resize_to_day(day, request)?;
        self.day_snapshot(&request.date_key)
    }

    fn unschedule(&mut self, request: &UnscheduleRequest) -> Result<DaySnapshot> {
        let day = self.days.entry(request.date_key.clone()).or_default();
        unschedule_from_day(day, request)?;
        self.day_snapshot(&request.date_key)
    }
}

//! JSON file backed schedule store.
//!
//! The whole schedule is one JSON document keyed by date. Every change is
//! written to a sibling temp file and renamed over the original, so a
//! reader sees either the previous document or the new one.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::store::{apply_batch_to_day, apply_resize_to_day, unschedule_from_day, ScheduleStore};
use crate::error::{Result, StorageError};
use crate::placement::{BatchUpdate, DaySnapshot, ResizeRequest, SnapshotEntry, UnscheduleRequest};

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    days: BTreeMap<String, Vec<SnapshotEntry>>,
}

/// Schedule store persisted to a single JSON file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    doc: StoreDocument,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty schedule.
    ///
    /// # Errors
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let doc = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => StoreDocument::default(),
            Ok(content) => serde_json::from_str(&content).map_err(|e| StorageError::File {
                path: path.clone(),
                message: e.to_string(),
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoreDocument::default(),
            Err(e) => {
                return Err(StorageError::File {
                    path,
                    message: e.to_string(),
                }
                .into())
            }
        };
        Ok(Self { path, doc })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace a whole day, as an import would.
    ///
    /// # Errors
    /// Returns an error when the file cannot be written.
    pub fn put_day(&mut self, snapshot: DaySnapshot) -> Result<()> {
        let mut days = self.doc.days.clone();
        days.insert(snapshot.date_key, snapshot.entries);
        self.commit(days)
    }

    /// Write `days` to disk, then adopt it as the in-memory state.
    fn commit(&mut self, days: BTreeMap<String, Vec<SnapshotEntry>>) -> Result<()> {
        let doc = StoreDocument { days };
        let file_err = |message: String| StorageError::File {
            path: self.path.clone(),
            message,
        };

        let content = serde_json::to_string_pretty(&doc)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content).map_err(|e| file_err(e.to_string()))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| file_err(e.to_string()))?;

        tracing::debug!(path = %self.path.display(), days = doc.days.len(), "schedule store written");
        self.doc = doc;
        Ok(())
    }

    fn day(&self, date_key: &str) -> Vec<SnapshotEntry> {
        self.doc.days.get(date_key).cloned().unwrap_or_default()
    }
}

impl ScheduleStore for JsonFileStore {
    fn day_snapshot(&self, date_key: &str) -> Result<DaySnapshot> {
        Ok(DaySnapshot::new(date_key, self.day(date_key)))
    }

    fn apply_batch(&mut self, batch: &BatchUpdate) -> Result<DaySnapshot> {
        let updated = apply_batch_to_day(&self.day(&batch.date_key), batch)?;
        let mut days = self.doc.days.clone();
        days.insert(batch.date_key.clone(), updated);
        self.commit(days)?;
        self.day_snapshot(&batch.date_key)
    }

    fn apply_resize(&mut self, request: &ResizeRequest) -> Result<DaySnapshot> {
        let mut day = self.day(&request.date_key);
        apply_resize_to_day(&mut day, request)?;
        let mut days = self.doc.days.clone();
        days.insert(request.date_key.clone(), day);
        self.commit(days)?;
        self.day_snapshot(&request.date_key)
    }

    fn unschedule(&mut self, request: &UnscheduleRequest) -> Result<DaySnapshot> {
        let mut day = self.day(&request.date_key);
        unschedule_from_day(&mut day, request)?;
        let mut days = self.doc.days.clone();
        days.insert(request.date_key.clone(), day);
        self.commit(days)?;
        self.day_snapshot(&request.date_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::{PlacementCoordinator, PlacementRequest};

    #[test]
    fn missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("schedule.json")).unwrap();
        assert!(store.day_snapshot("2025-03-01").unwrap().entries.is_empty());
    }

    #[test]
    fn batches_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        store
            .put_day(DaySnapshot::new(
                "2025-03-01",
                vec![SnapshotEntry::new("e1", "t1", Some("09:00"), Some(30))],
            ))
            .unwrap();

        let snapshot = store.day_snapshot("2025-03-01").unwrap();
        let outcome = PlacementCoordinator::default()
            .place(&snapshot, &PlacementRequest::new_task("t2", 0.0))
            .unwrap();
        store.apply_batch(outcome.batch().unwrap()).unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        let day = reopened.day_snapshot("2025-03-01").unwrap();
        assert_eq!(day.entries.len(), 2);
        assert_eq!(day.entry("e1").unwrap().start_time.as_deref(), Some("09:30"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(JsonFileStore::open(&path).is_err());
    }
}

//! Day snapshot as delivered by the schedule store.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::time::{normalize_duration, parse_time_string, Minute};
use crate::timeline::ScheduledInterval;

/// One placement row of a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotEntry {
    pub schedule_entry_id: String,
    pub task_ref: String,
    /// `HH:MM`, or `None` for a task still in the pool.
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<Minute>,
}

impl SnapshotEntry {
    pub fn new(
        schedule_entry_id: impl Into<String>,
        task_ref: impl Into<String>,
        start_time: Option<&str>,
        duration_minutes: Option<Minute>,
    ) -> Self {
        Self {
            schedule_entry_id: schedule_entry_id.into(),
            task_ref: task_ref.into(),
            start_time: start_time.map(str::to_string),
            duration_minutes,
        }
    }

    /// Start minute, `None` for pool entries and blank start times.
    ///
    /// Unparsable times are also `None`; [`DaySnapshot::validate`] reports them.
    pub fn start_minute(&self) -> Option<Minute> {
        let text = self.start_time.as_deref()?.trim();
        if text.is_empty() {
            return None;
        }
        parse_time_string(text).ok()
    }

    /// Duration with missing and non-positive values replaced by the default.
    pub fn effective_duration(&self) -> Minute {
        normalize_duration(self.duration_minutes.unwrap_or_default())
    }

    /// The entry as a committed interval, if it is on the timeline.
    pub fn to_interval(&self) -> Option<ScheduledInterval> {
        self.start_minute().map(|start| {
            ScheduledInterval::committed(
                self.schedule_entry_id.clone(),
                self.task_ref.clone(),
                start,
                self.effective_duration(),
            )
        })
    }
}

/// All placement rows of one day, read in one consistent pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySnapshot {
    pub date_key: String,
    #[serde(default)]
    pub entries: Vec<SnapshotEntry>,
}

impl DaySnapshot {
    pub fn new(date_key: impl Into<String>, entries: Vec<SnapshotEntry>) -> Self {
        Self {
            date_key: date_key.into(),
            entries,
        }
    }

    /// Check the preconditions the resolver relies on.
    ///
    /// # Errors
    /// - [`ValidationError::DuplicateEntry`] when a row id repeats.
    /// - [`ValidationError::InvalidTime`] when a non-blank start time does not parse.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut seen = HashSet::new();
        for entry in &self.entries {
            if !seen.insert(entry.schedule_entry_id.as_str()) {
                return Err(ValidationError::DuplicateEntry(
                    entry.schedule_entry_id.clone(),
                ));
            }
            if let Some(text) = entry.start_time.as_deref() {
                if !text.trim().is_empty() {
                    parse_time_string(text)?;
                }
            }
        }
        Ok(())
    }

    pub fn entry(&self, schedule_entry_id: &str) -> Option<&SnapshotEntry> {
        self.entries
            .iter()
            .find(|e| e.schedule_entry_id == schedule_entry_id)
    }

    /// The row holding `task_ref` on this day, scheduled or not.
    pub fn entry_for_task(&self, task_ref: &str) -> Option<&SnapshotEntry> {
        self.entries.iter().find(|e| e.task_ref == task_ref)
    }

    /// Entries on the timeline as intervals, sorted by start.
    pub fn committed_intervals(&self) -> Vec<ScheduledInterval> {
        let mut intervals: Vec<_> = self
            .entries
            .iter()
            .filter_map(SnapshotEntry::to_interval)
            .collect();
        intervals.sort_by_key(|i| i.start_minute);
        intervals
    }

    /// Committed intervals minus any earlier placement of `active`.
    pub fn existing_for(&self, active: &ScheduledInterval) -> Vec<ScheduledInterval> {
        self.committed_intervals()
            .into_iter()
            .filter(|interval| !interval.same_placement(active))
            .collect()
    }
}

//! Scheduled interval type.

use serde::{Deserialize, Serialize};

use crate::time::{normalize_duration, Minute};

/// A task occupying a contiguous block of one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledInterval {
    /// The underlying task; stable across moves.
    pub task_ref: String,
    /// Placement row id, `None` until the placement is persisted.
    #[serde(default)]
    pub schedule_entry_id: Option<String>,
    pub start_minute: Minute,
    pub duration_minutes: Minute,
    /// Set only on the interval being placed. Never persisted.
    #[serde(skip)]
    pub is_active: bool,
}

impl ScheduledInterval {
    /// A committed interval, addressed by its placement row.
    pub fn committed(
        entry_id: impl Into<String>,
        task_ref: impl Into<String>,
        start_minute: Minute,
        duration_minutes: Minute,
    ) -> Self {
        Self {
            task_ref: task_ref.into(),
            schedule_entry_id: Some(entry_id.into()),
            start_minute,
            duration_minutes,
            is_active: false,
        }
    }

    /// The candidate placement of a task.
    pub fn active(task_ref: impl Into<String>, start_minute: Minute, duration_minutes: Minute) -> Self {
        Self {
            task_ref: task_ref.into(),
            schedule_entry_id: None,
            start_minute,
            duration_minutes,
            is_active: true,
        }
    }

    /// Attach the row id of an already-scheduled task being moved.
    pub fn with_entry_id(mut self, entry_id: impl Into<String>) -> Self {
        self.schedule_entry_id = Some(entry_id.into());
        self
    }

    /// Duration with non-positive values replaced by the default.
    pub fn effective_duration(&self) -> Minute {
        normalize_duration(self.duration_minutes)
    }

    /// Exclusive end minute.
    pub fn end_minute(&self) -> Minute {
        self.start_minute + self.effective_duration()
    }

    /// Half-open overlap test.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start_minute < other.end_minute() && other.start_minute < self.end_minute()
    }

    /// Whether this interval is the same placement as `other`: same row when
    /// both have one, otherwise the same task.
    pub fn same_placement(&self, other: &Self) -> bool {
        match (&self.schedule_entry_id, &other.schedule_entry_id) {
            (Some(a), Some(b)) => a == b,
            _ => self.task_ref == other.task_ref,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_uses_normalized_duration() {
        let interval = ScheduledInterval::committed("e1", "t1", 540, 0);
        assert_eq!(interval.end_minute(), 570);
    }

    #[test]
    fn touching_intervals_do_not_overlap() {
        let a = ScheduledInterval::committed("e1", "t1", 540, 30);
        let b = ScheduledInterval::committed("e2", "t2", 570, 30);
        let c = ScheduledInterval::committed("e3", "t3", 560, 30);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }

    #[test]
    fn active_flag_is_not_serialized() {
        let active = ScheduledInterval::active("t1", 600, 45);
        let json = serde_json::to_value(&active).unwrap();
        assert!(json.get("isActive").is_none());
        assert_eq!(json["startMinute"], 600);

        let back: ScheduledInterval = serde_json::from_value(json).unwrap();
        assert!(!back.is_active);
    }

    #[test]
    fn same_placement_matches_row_or_task() {
        let row = ScheduledInterval::committed("e1", "t1", 540, 30);
        let moved = ScheduledInterval::active("t1", 600, 30).with_entry_id("e1");
        let fresh = ScheduledInterval::active("t1", 600, 30);
        let other = ScheduledInterval::active("t2", 600, 30);
        let second_row = ScheduledInterval::committed("e2", "t1", 660, 30);
        assert!(row.same_placement(&moved));
        assert!(row.same_placement(&fresh));
        assert!(!row.same_placement(&other));
        assert!(!second_row.same_placement(&moved));
    }
}

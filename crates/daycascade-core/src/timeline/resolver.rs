//! Cascading conflict resolution for a single day.
//!
//! Given the committed intervals of a day and one active interval, the
//! resolver pushes later intervals forward in start order until nothing
//! overlaps. It never moves anything earlier, never deletes, and never
//! touches the caller's slice; all mutation happens on a private copy.

use serde::{Deserialize, Serialize};

use super::interval::ScheduledInterval;
use crate::time::{Minute, MINUTES_PER_DAY};

/// A committed interval that has to move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub schedule_entry_id: String,
    pub new_start_minute: Minute,
}

/// Result of [`resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    /// Committed intervals that moved, in timeline order.
    pub shifts: Vec<Shift>,
    /// Final start of the active interval.
    pub resolved_active_start: Minute,
    /// Latest exclusive end across the whole resolved day.
    pub latest_end: Minute,
}

impl Resolution {
    /// Whether the resolved day runs past midnight.
    pub fn overflows_day(&self) -> bool {
        self.latest_end > MINUTES_PER_DAY
    }

    /// Latest start across the active interval and every shift.
    ///
    /// Starts past [`crate::time::LAST_MINUTE`] cannot be written as `HH:MM`.
    pub fn last_start(&self) -> Minute {
        self.shifts
            .iter()
            .map(|shift| shift.new_start_minute)
            .fold(self.resolved_active_start, Minute::max)
    }

    /// Apply this resolution to the snapshot it was computed from.
    ///
    /// Returns the committed intervals with shifts applied plus the active
    /// interval at its resolved start, sorted by start.
    pub fn apply(
        &self,
        existing: &[ScheduledInterval],
        active: &ScheduledInterval,
    ) -> Vec<ScheduledInterval> {
        let mut day: Vec<ScheduledInterval> = existing
            .iter()
            .map(|interval| {
                let mut interval = interval.clone();
                if let Some(shift) = self.shifts.iter().find(|s| {
                    interval.schedule_entry_id.as_deref() == Some(s.schedule_entry_id.as_str())
                }) {
                    interval.start_minute = shift.new_start_minute;
                }
                interval
            })
            .collect();

        let mut placed = active.clone();
        placed.start_minute = self.resolved_active_start;
        placed.is_active = false;
        day.push(placed);
        day.sort_by_key(|i| i.start_minute);
        day
    }
}

/// Resolve overlaps introduced by placing `active` among `existing`.
///
/// `existing` must not contain a previous placement of the active task;
/// callers filter it out first. Durations that are zero or negative are
/// treated as the default duration.
pub fn resolve(existing: &[ScheduledInterval], active: &ScheduledInterval) -> Resolution {
    let mut working: Vec<ScheduledInterval> = Vec::with_capacity(existing.len() + 1);
    working.extend(existing.iter().cloned().map(|mut interval| {
        interval.is_active = false;
        interval.duration_minutes = interval.effective_duration();
        interval
    }));

    let mut candidate = active.clone();
    candidate.is_active = true;
    candidate.duration_minutes = candidate.effective_duration();
    working.push(candidate);

    // On equal starts the active interval goes first so the occupant is displaced.
    working.sort_by_key(|i| (i.start_minute, !i.is_active));

    let mut shifts = Vec::new();
    let mut resolved_active_start = active.start_minute;

    for idx in 1..working.len() {
        let current_end = working[idx - 1].end_minute();
        let next = &mut working[idx];
        if current_end <= next.start_minute {
            continue;
        }

        next.start_minute = current_end;
        if next.is_active {
            resolved_active_start = current_end;
        } else if let Some(entry_id) = &next.schedule_entry_id {
            shifts.push(Shift {
                schedule_entry_id: entry_id.clone(),
                new_start_minute: current_end,
            });
        } else {
            tracing::warn!(
                task_ref = %next.task_ref,
                "shifted interval has no schedule entry id; shift not reported"
            );
        }
    }

    let latest_end = working
        .iter()
        .map(ScheduledInterval::end_minute)
        .max()
        .unwrap_or(resolved_active_start);

    tracing::debug!(
        requested = active.start_minute,
        resolved = resolved_active_start,
        shifted = shifts.len(),
        latest_end,
        "resolved placement"
    );

    Resolution {
        shifts,
        resolved_active_start,
        latest_end,
    }
}

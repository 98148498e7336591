//! Request and update messages exchanged with the gesture layer and the store.

use serde::{Deserialize, Serialize};

use crate::time::Minute;

/// Whether a placement creates a row or moves an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementKind {
    /// A pool task placed on the timeline for the first time
    New,
    /// An already-scheduled task dragged to another time
    Move,
}

impl PlacementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Move => "move",
        }
    }
}

/// A drop reported by the gesture layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementRequest {
    pub kind: PlacementKind,
    pub task_ref: String,
    #[serde(default)]
    pub schedule_entry_id: Option<String>,
    /// Vertical offset inside the timeline viewport.
    pub raw_offset_pixels: f64,
    #[serde(default)]
    pub duration_minutes: Option<Minute>,
}

impl PlacementRequest {
    /// Drop of a pool task.
    pub fn new_task(task_ref: impl Into<String>, raw_offset_pixels: f64) -> Self {
        Self {
            kind: PlacementKind::New,
            task_ref: task_ref.into(),
            schedule_entry_id: None,
            raw_offset_pixels,
            duration_minutes: None,
        }
    }

    /// Drop of an already-scheduled block.
    pub fn move_entry(
        task_ref: impl Into<String>,
        schedule_entry_id: impl Into<String>,
        raw_offset_pixels: f64,
    ) -> Self {
        Self {
            kind: PlacementKind::Move,
            task_ref: task_ref.into(),
            schedule_entry_id: Some(schedule_entry_id.into()),
            raw_offset_pixels,
            duration_minutes: None,
        }
    }

    pub fn with_duration(mut self, minutes: Minute) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }
}

/// The placed interval inside a [`BatchUpdate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivePlacement {
    pub task_ref: String,
    /// Absent when the store has to create the row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_entry_id: Option<String>,
    pub start_time: String,
    pub duration_minutes: Minute,
}

/// Start time change for a row pushed by the cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadingUpdate {
    pub schedule_entry_id: String,
    pub start_time: String,
}

/// One placement plus every row it displaced. The store applies all of it
/// in one transaction or none of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdate {
    pub date_key: String,
    pub kind: PlacementKind,
    pub active_placement: ActivePlacement,
    #[serde(default)]
    pub cascading_updates: Vec<CascadingUpdate>,
}

/// Duration change from a resize handle. Applied to one row, no cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeRequest {
    pub date_key: String,
    pub schedule_entry_id: String,
    pub duration_minutes: Minute,
}

/// Explicit removal of a row from the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnscheduleRequest {
    pub date_key: String,
    pub schedule_entry_id: String,
}

//! Placement coordinator.
//!
//! Turns a drop coordinate into a snapped start minute, runs the resolver
//! against the day snapshot and packages the result as a single
//! [`BatchUpdate`] for the schedule store.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::request::{
    ActivePlacement, BatchUpdate, CascadingUpdate, PlacementKind, PlacementRequest, ResizeRequest,
};
use super::snapshot::DaySnapshot;
use crate::error::{ConfigError, ValidationError};
use crate::storage::Config;
use crate::time::{
    minute_to_time_string, pixel_to_minute, snap_to_grid, time_string_to_minute, Minute,
    DEFAULT_DURATION_MINUTES, LAST_MINUTE, MINUTES_PER_DAY, SNAP_MINUTES,
};
use crate::timeline::{next_available_start, resolve, Resolution, ScheduledInterval};

/// What to do when a cascade pushes the day past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Let the last block run past midnight; the view clips it.
    ///
    /// A cascade that would move any start past 23:59 is still refused,
    /// since such a start has no `HH:MM` form.
    #[default]
    Allow,
    /// Refuse any placement that ends the day after midnight.
    Reject,
}

/// Visible hours of the timeline viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewRange {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl ViewRange {
    /// # Errors
    /// Returns an error unless `start_hour < end_hour <= 24`.
    pub fn new(start_hour: u32, end_hour: u32) -> Result<Self, ConfigError> {
        if end_hour > 24 || start_hour >= end_hour {
            return Err(ConfigError::InvalidValue {
                key: "timeline".into(),
                message: format!(
                    "view hours must satisfy start < end <= 24, got {start_hour}..{end_hour}"
                ),
            });
        }
        Ok(Self {
            start_hour,
            end_hour,
        })
    }

    /// Latest grid line a drop can land on: one snap step before the end hour.
    pub fn last_slot(&self) -> Minute {
        (self.end_hour * 60) as Minute - SNAP_MINUTES
    }

    pub fn is_visible(&self, minute: Minute) -> bool {
        let start = (self.start_hour * 60) as Minute;
        let end = (self.end_hour * 60) as Minute;
        (start..end).contains(&minute)
    }
}

impl Default for ViewRange {
    fn default() -> Self {
        Self {
            start_hour: 9,
            end_hour: 24,
        }
    }
}

/// Why a gesture produced no update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The drop snapped to a minute before the start of the day.
    AboveTimeline { minute: Minute },
    /// The cascade would end the day after midnight, or push a start past 23:59.
    DayOverflow { latest_end: Minute },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AboveTimeline { minute } => {
                write!(f, "drop above the timeline (minute {minute})")
            }
            Self::DayOverflow { latest_end } => write!(
                f,
                "cascade runs past midnight (day would end at minute {latest_end})"
            ),
        }
    }
}

/// Result of a placement gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementOutcome {
    Apply(BatchUpdate),
    Rejected(RejectReason),
}

impl PlacementOutcome {
    pub fn batch(&self) -> Option<&BatchUpdate> {
        match self {
            Self::Apply(batch) => Some(batch),
            Self::Rejected(_) => None,
        }
    }
}

/// Converts gestures into batch updates.
#[derive(Debug, Clone)]
pub struct PlacementCoordinator {
    view: ViewRange,
    top_padding_px: f64,
    default_duration: Minute,
    overflow: OverflowPolicy,
}

impl PlacementCoordinator {
    pub fn new(view: ViewRange) -> Self {
        Self {
            view,
            top_padding_px: 0.0,
            default_duration: DEFAULT_DURATION_MINUTES,
            overflow: OverflowPolicy::Allow,
        }
    }

    /// Build from the `[timeline]` and `[placement]` config sections.
    ///
    /// # Errors
    /// Returns an error when the configured view hours are invalid.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let view = ViewRange::new(config.timeline.view_start_hour, config.timeline.view_end_hour)?;
        Ok(Self::new(view)
            .with_top_padding(f64::from(config.timeline.top_padding_px))
            .with_default_duration(config.placement.default_duration_minutes)
            .with_overflow_policy(config.placement.overflow))
    }

    pub fn with_top_padding(mut self, pixels: f64) -> Self {
        self.top_padding_px = pixels;
        self
    }

    pub fn with_default_duration(mut self, minutes: Minute) -> Self {
        if minutes > 0 {
            self.default_duration = minutes;
        }
        self
    }

    pub fn with_overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.overflow = policy;
        self
    }

    pub fn view(&self) -> ViewRange {
        self.view
    }

    /// Handle a drop on the timeline.
    ///
    /// Drops below the visible range land on its last grid slot.
    ///
    /// # Errors
    /// Returns [`ValidationError::MissingEntryId`] for a move without a row id
    /// and [`ValidationError::InvalidValue`] for a non-finite offset.
    pub fn place(
        &self,
        snapshot: &DaySnapshot,
        request: &PlacementRequest,
    ) -> Result<PlacementOutcome, ValidationError> {
        if !request.raw_offset_pixels.is_finite() {
            return Err(ValidationError::InvalidValue {
                field: "rawOffsetPixels".into(),
                message: format!("expected a finite offset, got {}", request.raw_offset_pixels),
            });
        }

        let minute = pixel_to_minute(
            request.raw_offset_pixels - self.top_padding_px,
            self.view.start_hour,
        );
        if minute < 0 {
            tracing::debug!(
                task_ref = %request.task_ref,
                offset = request.raw_offset_pixels,
                minute,
                "drop above timeline ignored"
            );
            return Ok(PlacementOutcome::Rejected(RejectReason::AboveTimeline {
                minute,
            }));
        }

        let minute = minute.min(self.view.last_slot());
        // Round trip through the wire format clamps to the day.
        let start = time_string_to_minute(&minute_to_time_string(minute));
        self.place_at(
            snapshot,
            request.kind,
            &request.task_ref,
            request.schedule_entry_id.as_deref(),
            start,
            request.duration_minutes,
        )
    }

    /// Schedule a pool task at the next free start of the day.
    ///
    /// # Errors
    /// Never fails for new placements; the signature matches [`Self::place`].
    pub fn schedule_next(
        &self,
        snapshot: &DaySnapshot,
        task_ref: &str,
        duration_minutes: Option<Minute>,
    ) -> Result<PlacementOutcome, ValidationError> {
        let start = next_available_start(&snapshot.committed_intervals());
        self.place_at(
            snapshot,
            PlacementKind::New,
            task_ref,
            None,
            start,
            duration_minutes,
        )
    }

    fn place_at(
        &self,
        snapshot: &DaySnapshot,
        kind: PlacementKind,
        task_ref: &str,
        schedule_entry_id: Option<&str>,
        start: Minute,
        duration_minutes: Option<Minute>,
    ) -> Result<PlacementOutcome, ValidationError> {
        if kind == PlacementKind::Move && schedule_entry_id.is_none() {
            return Err(ValidationError::MissingEntryId {
                task_ref: task_ref.to_string(),
            });
        }

        // A task holds one row per day; placing it again moves that row.
        let (kind, schedule_entry_id) = match kind {
            PlacementKind::New => match snapshot.entry_for_task(task_ref) {
                Some(entry) => {
                    tracing::debug!(
                        task_ref,
                        entry_id = %entry.schedule_entry_id,
                        "task already on the day; placing as a move"
                    );
                    (PlacementKind::Move, Some(entry.schedule_entry_id.as_str()))
                }
                None => (PlacementKind::New, None),
            },
            PlacementKind::Move => (kind, schedule_entry_id),
        };

        let previous = schedule_entry_id.and_then(|id| snapshot.entry(id));

        let duration = duration_minutes
            .or_else(|| previous.and_then(|entry| entry.duration_minutes))
            .filter(|minutes| *minutes > 0)
            .unwrap_or(self.default_duration);

        let mut active = ScheduledInterval::active(task_ref, start, duration);
        if kind == PlacementKind::Move {
            active.schedule_entry_id = schedule_entry_id.map(str::to_string);
        }

        let existing = snapshot.existing_for(&active);
        let resolution = resolve(&existing, &active);

        let unrepresentable = resolution.last_start() > LAST_MINUTE;
        let refused = self.overflow == OverflowPolicy::Reject && resolution.overflows_day();
        if unrepresentable || refused {
            tracing::info!(
                task_ref,
                latest_end = resolution.latest_end,
                "placement rejected: day overflow"
            );
            return Ok(PlacementOutcome::Rejected(RejectReason::DayOverflow {
                latest_end: resolution.latest_end,
            }));
        }

        let batch = build_placement_request(kind, &snapshot.date_key, &active, &resolution)?;
        tracing::debug!(
            date_key = %batch.date_key,
            kind = kind.as_str(),
            start = %batch.active_placement.start_time,
            cascaded = batch.cascading_updates.len(),
            "placement batch built"
        );
        Ok(PlacementOutcome::Apply(batch))
    }
}

impl Default for PlacementCoordinator {
    fn default() -> Self {
        Self::new(ViewRange::default())
    }
}

/// Package a resolution as the one batch the store applies.
///
/// New placements carry no row id so the store creates one; moves address
/// the moved row. Every shift becomes a cascading update in timeline order.
///
/// # Errors
/// Returns [`ValidationError::MissingEntryId`] for a move without a row id.
pub fn build_placement_request(
    kind: PlacementKind,
    date_key: &str,
    active: &ScheduledInterval,
    resolution: &Resolution,
) -> Result<BatchUpdate, ValidationError> {
    let schedule_entry_id = match kind {
        PlacementKind::New => None,
        PlacementKind::Move => Some(active.schedule_entry_id.clone().ok_or_else(|| {
            ValidationError::MissingEntryId {
                task_ref: active.task_ref.clone(),
            }
        })?),
    };

    let cascading_updates = resolution
        .shifts
        .iter()
        .map(|shift| CascadingUpdate {
            schedule_entry_id: shift.schedule_entry_id.clone(),
            start_time: minute_to_time_string(shift.new_start_minute),
        })
        .collect();

    Ok(BatchUpdate {
        date_key: date_key.to_string(),
        kind,
        active_placement: ActivePlacement {
            task_ref: active.task_ref.clone(),
            schedule_entry_id,
            start_time: minute_to_time_string(resolution.resolved_active_start),
            duration_minutes: active.effective_duration(),
        },
        cascading_updates,
    })
}

/// Resize handle release: height snapped to the grid, between one grid step
/// and a whole day.
///
/// # Errors
/// Returns [`ValidationError::InvalidValue`] for a non-finite height.
pub fn build_resize_request(
    date_key: &str,
    schedule_entry_id: &str,
    raw_height_px: f64,
) -> Result<ResizeRequest, ValidationError> {
    if !raw_height_px.is_finite() {
        return Err(ValidationError::InvalidValue {
            field: "heightPx".into(),
            message: format!("expected a finite height, got {raw_height_px}"),
        });
    }
    let duration_minutes = snap_to_grid(raw_height_px).clamp(SNAP_MINUTES, MINUTES_PER_DAY);
    Ok(ResizeRequest {
        date_key: date_key.to_string(),
        schedule_entry_id: schedule_entry_id.to_string(),
        duration_minutes,
    })
}

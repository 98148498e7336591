//! Minute-of-day arithmetic shared by the resolver and the coordinator.
//!
//! Inside the core a time of day is a [`Minute`] counted from local
//! midnight. At the boundary it is always a zero-padded 24-hour `HH:MM`
//! string; [`format_display_12h`] exists for display only and its output
//! is never stored or compared.

use chrono::{NaiveTime, Timelike};

use crate::error::ValidationError;

/// Minutes since local midnight.
pub type Minute = i32;

/// Minutes in one day.
pub const MINUTES_PER_DAY: Minute = 24 * 60;

/// Last addressable start minute (23:59).
pub const LAST_MINUTE: Minute = MINUTES_PER_DAY - 1;

/// Drop positions and resize heights are quantized to this grid.
pub const SNAP_MINUTES: Minute = 15;

/// Duration used when none (or a non-positive one) is given.
pub const DEFAULT_DURATION_MINUTES: Minute = 30;

/// Clamp a minute into `[0, LAST_MINUTE]`.
pub fn clamp_minute(minute: Minute) -> Minute {
    minute.clamp(0, LAST_MINUTE)
}

/// Replace a zero or negative duration with [`DEFAULT_DURATION_MINUTES`].
pub fn normalize_duration(duration_minutes: Minute) -> Minute {
    if duration_minutes <= 0 {
        DEFAULT_DURATION_MINUTES
    } else {
        duration_minutes
    }
}

/// Round to the nearest grid line. Halves round up, towards later times.
///
/// Values too large for a [`Minute`] saturate at the last representable grid
/// line. NaN maps to 0; callers taking gesture input check finiteness first.
pub fn snap_to_grid(raw: f64) -> Minute {
    let limit = f64::from(Minute::MAX / SNAP_MINUTES);
    let steps = (raw / f64::from(SNAP_MINUTES) + 0.5).floor().clamp(-limit, limit);
    steps as Minute * SNAP_MINUTES
}

/// Convert a vertical offset inside the timeline viewport to a snapped minute.
///
/// One pixel is one minute and the viewport starts at `view_start_hour`.
/// The result is not clamped; a negative value means the drop landed above
/// the timeline.
pub fn pixel_to_minute(offset_px: f64, view_start_hour: u32) -> Minute {
    let raw = offset_px + f64::from(view_start_hour * 60);
    snap_to_grid(raw)
}

/// Canonical `HH:MM` form of a minute, clamped to the day.
pub fn minute_to_time_string(minute: Minute) -> String {
    let minute = clamp_minute(minute);
    format!("{:02}:{:02}", minute / 60, minute % 60)
}

/// Strict parse of a 24-hour `HH:MM` string.
///
/// # Errors
/// Returns [`ValidationError::InvalidTime`] when `text` is not a valid time.
pub fn parse_time_string(text: &str) -> Result<Minute, ValidationError> {
    let trimmed = text.trim();
    let time = NaiveTime::parse_from_str(trimmed, "%H:%M")
        .map_err(|_| ValidationError::InvalidTime(text.to_string()))?;
    Ok((time.hour() * 60 + time.minute()) as Minute)
}

/// Lenient inverse of [`minute_to_time_string`].
///
/// An empty string means "no start yet" and maps to 0. Malformed text also
/// maps to 0; use [`parse_time_string`] where bad input must be reported.
pub fn time_string_to_minute(text: &str) -> Minute {
    if text.trim().is_empty() {
        return 0;
    }
    match parse_time_string(text) {
        Ok(minute) => minute,
        Err(err) => {
            tracing::warn!(%err, "treating unparsable start time as 00:00");
            0
        }
    }
}

/// 12-hour display form, e.g. `9:05 AM`. Never use for storage.
pub fn format_display_12h(minute: Minute) -> String {
    let minute = clamp_minute(minute);
    NaiveTime::from_hms_opt((minute / 60) as u32, (minute % 60) as u32, 0)
        .map(|t| t.format("%-I:%M %p").to_string())
        .unwrap_or_default()
}

/// Human readable duration: `45 min`, `1 hr`, `1 hr 30 min`.
pub fn format_duration(minutes: Minute) -> String {
    if minutes <= 0 {
        return "0 min".to_string();
    }
    let hours = minutes / 60;
    let rest = minutes % 60;
    match (hours, rest) {
        (0, m) => format!("{m} min"),
        (h, 0) => format!("{h} hr"),
        (h, m) => format!("{h} hr {m} min"),
    }
}

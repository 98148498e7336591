//! Next free start on a day, used when a task is scheduled without a drop position.

use super::interval::ScheduledInterval;
use crate::time::{Minute, MINUTES_PER_DAY};

/// Start used for an empty day (09:00).
pub const DEFAULT_DAY_START: Minute = 9 * 60;

/// Returned when the day is already full past midnight (23:45).
pub const LATEST_SLOT_START: Minute = 23 * 60 + 45;

/// The end of the latest interval, but never before [`DEFAULT_DAY_START`].
///
/// Days that already end at or after midnight yield [`LATEST_SLOT_START`].
pub fn next_available_start<'a, I>(intervals: I) -> Minute
where
    I: IntoIterator<Item = &'a ScheduledInterval>,
{
    let latest_end = intervals
        .into_iter()
        .map(ScheduledInterval::end_minute)
        .fold(DEFAULT_DAY_START, Minute::max);

    if latest_end >= MINUTES_PER_DAY {
        LATEST_SLOT_START
    } else {
        latest_end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_day_starts_at_nine() {
        assert_eq!(next_available_start(std::iter::empty()), 540);
    }

    #[test]
    fn morning_only_schedule_still_starts_at_nine() {
        let day = vec![ScheduledInterval::committed("e1", "t1", 420, 60)];
        assert_eq!(next_available_start(&day), 540);
    }

    #[test]
    fn follows_latest_end_not_last_in_list() {
        let day = vec![
            ScheduledInterval::committed("e1", "t1", 780, 90),
            ScheduledInterval::committed("e2", "t2", 600, 30),
        ];
        assert_eq!(next_available_start(&day), 870);
    }

    #[test]
    fn full_day_caps_at_quarter_to_midnight() {
        let day = vec![ScheduledInterval::committed("e1", "t1", 1410, 30)];
        assert_eq!(next_available_start(&day), LATEST_SLOT_START);
    }
}

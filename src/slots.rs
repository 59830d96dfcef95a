use crate::{
    error::SchedulingError,
    types::{AvailabilityWindow, TimeOfDay},
};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

/// Turns an availability window into the start times of the fixed-duration
/// slots that fit inside it. Slots are contiguous and emitted in ascending
/// order; the last slot ends at or before the window's end.
///
/// Fails when the window is too short to hold even a single slot.
pub fn generate_slots(
    day: NaiveDate,
    start: TimeOfDay,
    end: TimeOfDay,
    duration_minutes: i64,
) -> Result<Vec<DateTime<Utc>>, SchedulingError> {
    let midnight = Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN));
    let duration = Duration::minutes(duration_minutes);
    let window_end = midnight + Duration::minutes(end.minutes_from_midnight());

    let mut slot = midnight + Duration::minutes(start.minutes_from_midnight());
    if slot + duration > window_end {
        return Err(SchedulingError::InsufficientAvailability);
    }

    let mut slots = Vec::new();
    while slot + duration <= window_end {
        slots.push(slot);
        slot = slot + duration;
    }
    Ok(slots)
}

pub fn generate_window_slots(
    window: &AvailabilityWindow,
    duration_minutes: i64,
) -> Result<Vec<DateTime<Utc>>, SchedulingError> {
    generate_slots(window.date, window.start, window.end, duration_minutes)
}

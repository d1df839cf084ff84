use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::error::BookingError;
use crate::models::{Role, SlotTime};

/// Past-time rule for picking a start time. Admins may book any offered
/// time; everyone else needs a start strictly after now.
pub fn check_start(
    slot: SlotTime,
    date: NaiveDate,
    now: NaiveDateTime,
    role: Role,
) -> Result<(), BookingError> {
    if role.is_admin() {
        return Ok(());
    }
    let today = now.date();
    if date < today || (date == today && !slot.is_after(now.time())) {
        return Err(BookingError::SlotInPast);
    }
    Ok(())
}

/// True when the slot starts at least `lead_hours` after now.
pub fn respects_lead_time(slot: SlotTime, date: NaiveDate, now: NaiveDateTime, lead_hours: u32) -> bool {
    let starts_at = date.and_time(slot.to_naive_time());
    starts_at >= now + Duration::hours(i64::from(lead_hours))
}

/// Times worth showing. Clients only see times they may pick and that
/// respect the lead time; the backend still has the final word.
pub fn presentable(
    slots: &[SlotTime],
    date: NaiveDate,
    now: NaiveDateTime,
    role: Role,
    lead_hours: u32,
) -> Vec<SlotTime> {
    if role.is_admin() {
        return slots.to_vec();
    }
    slots
        .iter()
        .copied()
        .filter(|slot| check_start(*slot, date, now, role).is_ok())
        .filter(|slot| respects_lead_time(*slot, date, now, lead_hours))
        .collect()
}

//! Explicit timezone handling.
//!
//! Slot times are local wall-clock times. Nothing in the engine reads the host
//! clock or the host zone: callers pass the IANA zone of the clinic and, where
//! "now" matters, a UTC instant.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{Result, SlotError};
use crate::interval::CandidateSlot;

/// Parse an IANA timezone name such as `"America/Santiago"`.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| SlotError::InvalidTimezone(name.to_string()))
}

/// Parse an ISO 8601 calendar date (`YYYY-MM-DD`).
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| SlotError::InvalidDate(format!("'{}': {}", s, e)))
}

/// Parse an RFC 3339 instant into UTC.
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| SlotError::InvalidDate(format!("'{}': {}", s, e)))
}

/// The local calendar date in `tz` at instant `now`.
pub fn local_date(now: DateTime<Utc>, tz: Tz) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

/// Resolve a local wall-clock datetime in `tz` to a UTC instant.
///
/// Ambiguous times (DST fall-back) take the earlier instant. Times inside a
/// DST gap (spring-forward) are shifted forward by the length of the gap.
fn resolve_local(naive: NaiveDateTime, tz: Tz) -> DateTime<Utc> {
    if let Some(dt) = tz.from_local_datetime(&naive).earliest() {
        return dt.with_timezone(&Utc);
    }
    let shifted = naive + Duration::hours(1);
    match tz.from_local_datetime(&shifted).earliest() {
        Some(dt) => dt.with_timezone(&Utc),
        None => naive.and_utc(),
    }
}

/// UTC instant at which `slot` starts, given the clinic zone.
pub fn slot_start_instant(slot: &CandidateSlot, tz: Tz) -> DateTime<Utc> {
    resolve_local(slot.date.and_time(slot.start.to_naive_time()), tz)
}

/// Drop slots that start at or before `now`.
///
/// This is a caller-level filter. The availability resolver itself computes
/// slots for past dates too.
pub fn discard_started(slots: Vec<CandidateSlot>, now: DateTime<Utc>, tz: Tz) -> Vec<CandidateSlot> {
    slots
        .into_iter()
        .filter(|slot| slot_start_instant(slot, tz) > now)
        .collect()
}

//! Weekly recurrence -- the concrete dates a weekly working interval applies to.
//!
//! Builds an RFC 5545 `FREQ=WEEKLY;BYDAY=..` rule anchored in the clinic zone
//! and expands it with the `rrule` crate.

use chrono::{Datelike, NaiveDate, Weekday};
use chrono_tz::Tz;
use rrule::RRuleSet;

use crate::error::{Result, SlotError};

/// Upper bound on expanded dates; one year of a weekly rule fits comfortably.
pub const MAX_OCCURRENCES: u16 = 366;

fn byday(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}

/// Every date in `[from, until]` that falls on `day`, in ascending order.
///
/// Returns an empty list when `until` is before `from`.
///
/// # Errors
/// Returns `SlotError::InvalidRule` if the generated rule is rejected by the
/// `rrule` crate (e.g. dates outside its supported range).
pub fn occurrences(day: Weekday, from: NaiveDate, until: NaiveDate, tz: Tz) -> Result<Vec<NaiveDate>> {
    if until < from {
        return Ok(Vec::new());
    }

    // Anchor at noon so the anchor never lands inside a midnight DST gap.
    let dtstart = from.format("%Y%m%dT120000");
    let mut until_ical = until.format("%Y%m%dT235959").to_string();
    // The rrule crate requires UNTIL in UTC form when DTSTART is UTC.
    if tz == Tz::UTC {
        until_ical.push('Z');
    }

    let rrule_text = format!(
        "DTSTART;TZID={}:{}\nRRULE:FREQ=WEEKLY;BYDAY={};UNTIL={}",
        tz.name(),
        dtstart,
        byday(day),
        until_ical
    );

    let rrule_set: RRuleSet = rrule_text
        .parse()
        .map_err(|e| SlotError::InvalidRule(format!("{}", e)))?;

    // DTSTART is not guaranteed to fall on `day`; filter it out if it slipped in.
    let mut dates: Vec<NaiveDate> = rrule_set
        .all(MAX_OCCURRENCES)
        .dates
        .into_iter()
        .map(|dt| dt.date_naive())
        .filter(|date| date.weekday() == day && *date >= from && *date <= until)
        .collect();
    dates.dedup();

    Ok(dates)
}

//! Bookable slots for an owner in a room on a date.
//!
//! Generates candidate slots from the owner's working intervals for the date's
//! weekday, then removes every slot that intersects a booked interval in the
//! same room. Working intervals for other owners, rooms, or days are ignored.
//!
//! The resolver is a pure function of its inputs: callers fetch a snapshot of
//! working and booked intervals from their store and pass it in. Guarding
//! against double booking between that read and a later write is the store's
//! job (e.g. a unique key on room, date, and start time).

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::interval::{
    weekday_serde, BookedInterval, CandidateSlot, OwnerId, RoomId, WorkingInterval,
};
use crate::overlap::overlaps_time;
use crate::recurrence;
use crate::slots::{generate_slots, SlotDuration};
use crate::zone;

/// Inputs for a single-date availability query.
#[derive(Debug, Clone, Copy)]
pub struct AvailabilityRequest<'a> {
    pub owner: OwnerId,
    pub room: RoomId,
    pub date: NaiveDate,
    /// The owner's configured intervals. May include other days or rooms.
    pub working: &'a [WorkingInterval],
    /// Intervals already booked on `date`. May include other rooms.
    pub booked: &'a [BookedInterval],
    pub duration: SlotDuration,
}

/// Availability for one date, echoing the query keys alongside the slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Availability {
    pub owner: OwnerId,
    pub room: RoomId,
    pub date: NaiveDate,
    #[serde(with = "weekday_serde")]
    pub day: Weekday,
    pub slots: Vec<CandidateSlot>,
}

fn is_booked(slot: &CandidateSlot, day: Weekday, booked: &[BookedInterval]) -> bool {
    booked.iter().map(BookedInterval::interval).any(|b| {
        b.day() == day
            && b.room() == slot.room
            && overlaps_time(slot.start, slot.end, b.start(), b.end())
    })
}

/// Bookable slots for the request, sorted by start time.
///
/// An owner with no working interval on that weekday in that room has no
/// availability; the result is empty, not an error. Overlapping working
/// intervals yield each distinct slot once.
pub fn resolve(req: &AvailabilityRequest<'_>) -> Vec<CandidateSlot> {
    let day = req.date.weekday();

    let mut slots: Vec<CandidateSlot> = req
        .working
        .iter()
        .filter(|w| w.owner() == req.owner && w.room() == req.room && w.day() == day)
        .flat_map(|w| generate_slots(w, req.duration, req.date))
        .filter(|slot| !is_booked(slot, day, req.booked))
        .collect();

    slots.sort();
    slots.dedup();
    slots
}

/// Like [`resolve`], wrapped with the query keys.
pub fn resolve_availability(req: &AvailabilityRequest<'_>) -> Availability {
    Availability {
        owner: req.owner,
        room: req.room,
        date: req.date,
        day: req.date.weekday(),
        slots: resolve(req),
    }
}

/// Like [`resolve`], with the date given as an ISO 8601 string.
///
/// # Errors
/// Returns `SlotError::InvalidDate` if `date` is not `YYYY-MM-DD`.
pub fn resolve_str(
    owner: OwnerId,
    room: RoomId,
    date: &str,
    working: &[WorkingInterval],
    booked: &[BookedInterval],
    duration: SlotDuration,
) -> Result<Vec<CandidateSlot>> {
    let date = zone::parse_date(date)?;
    Ok(resolve(&AvailabilityRequest {
        owner,
        room,
        date,
        working,
        booked,
        duration,
    }))
}

/// Availability for every date in `[from, until]` on which the owner works in
/// `room`, in date order.
///
/// `booked` maps each date to the intervals booked on it; dates missing from
/// the map have no bookings.
#[allow(clippy::too_many_arguments)]
pub fn resolve_range(
    owner: OwnerId,
    room: RoomId,
    from: NaiveDate,
    until: NaiveDate,
    working: &[WorkingInterval],
    booked: &BTreeMap<NaiveDate, Vec<BookedInterval>>,
    duration: SlotDuration,
    tz: Tz,
) -> Result<Vec<Availability>> {
    let mut days: Vec<Weekday> = working
        .iter()
        .filter(|w| w.owner() == owner && w.room() == room)
        .map(WorkingInterval::day)
        .collect();
    days.sort_by_key(|d| d.num_days_from_monday());
    days.dedup();

    let mut dates = Vec::new();
    for day in days {
        dates.extend(recurrence::occurrences(day, from, until, tz)?);
    }
    dates.sort();

    Ok(dates
        .into_iter()
        .map(|date| {
            let booked_on_date = booked.get(&date).map(Vec::as_slice).unwrap_or(&[]);
            resolve_availability(&AvailabilityRequest {
                owner,
                room,
                date,
                working,
                booked: booked_on_date,
                duration,
            })
        })
        .collect())
}

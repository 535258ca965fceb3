//! Fixed-duration slot generation inside a working interval.
//!
//! Slots are laid back to back from the interval start. A trailing remainder
//! shorter than the slot duration is dropped, so every slot fits entirely
//! inside the interval.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::interval::{CandidateSlot, TimeOfDay, WorkingInterval, MINUTES_PER_DAY};

/// Length of a generated slot in minutes. Always in `1..=1440`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct SlotDuration(u16);

impl SlotDuration {
    pub fn minutes(minutes: u16) -> Result<Self> {
        if minutes == 0 || minutes > MINUTES_PER_DAY {
            return Err(SlotError::InvalidDuration(format!(
                "{} minutes (expected 1..={})",
                minutes, MINUTES_PER_DAY
            )));
        }
        Ok(Self(minutes))
    }

    pub fn get(self) -> u16 {
        self.0
    }
}

impl Default for SlotDuration {
    fn default() -> Self {
        Self(15)
    }
}

impl TryFrom<u16> for SlotDuration {
    type Error = SlotError;

    fn try_from(value: u16) -> Result<Self> {
        SlotDuration::minutes(value)
    }
}

impl From<SlotDuration> for u16 {
    fn from(value: SlotDuration) -> Self {
        value.0
    }
}

/// Split `interval` into contiguous slots of `duration` on `date`.
///
/// The result is sorted by start time. If the interval is shorter than one
/// slot the result is empty.
pub fn generate_slots(
    interval: &WorkingInterval,
    duration: SlotDuration,
    date: NaiveDate,
) -> Vec<CandidateSlot> {
    let step = duration.get();
    let start = interval.start().minutes();
    let count = interval.duration_minutes() / step;

    (0..count)
        .map(|i| {
            let slot_start = start + i * step;
            CandidateSlot {
                date,
                // Both bounds are <= interval.end(), which is < MINUTES_PER_DAY.
                start: TimeOfDay::new_unchecked(slot_start),
                end: TimeOfDay::new_unchecked(slot_start + step),
                room: interval.room(),
            }
        })
        .collect()
}

/// Coarse part of the day a slot starts in, as shown to patients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayPeriod {
    /// 08:00 to 12:00.
    Morning,
    /// 12:00 to 17:00.
    Afternoon,
    /// 17:00 to 20:00.
    Evening,
}

impl DayPeriod {
    /// The period `time` falls in, or `None` outside clinic hours.
    pub fn of(time: TimeOfDay) -> Option<Self> {
        match time.hour() {
            8..=11 => Some(DayPeriod::Morning),
            12..=16 => Some(DayPeriod::Afternoon),
            17..=19 => Some(DayPeriod::Evening),
            _ => None,
        }
    }
}

/// Slots bucketed by [`DayPeriod`], preserving input order inside each bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodGroups {
    pub morning: Vec<CandidateSlot>,
    pub afternoon: Vec<CandidateSlot>,
    pub evening: Vec<CandidateSlot>,
}

/// Group slots by the period their start time falls in. Slots starting
/// outside every period are left out.
pub fn group_by_period(slots: &[CandidateSlot]) -> PeriodGroups {
    let mut groups = PeriodGroups::default();
    for slot in slots {
        match DayPeriod::of(slot.start) {
            Some(DayPeriod::Morning) => groups.morning.push(*slot),
            Some(DayPeriod::Afternoon) => groups.afternoon.push(*slot),
            Some(DayPeriod::Evening) => groups.evening.push(*slot),
            None => {}
        }
    }
    groups
}


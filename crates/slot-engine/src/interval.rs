//! Interval model -- weekly working intervals, booked intervals, and the
//! candidate slots generated from them.
//!
//! Times are minutes since midnight in the clinic's local zone. Every interval
//! is half-open, `[start, end)`, and is validated at construction: a value of
//! [`WorkingInterval`] or [`BookedInterval`] always satisfies
//! `start < end` with both ends inside `[0, 1440)`.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};

/// Number of minutes in a day; the exclusive upper bound for [`TimeOfDay`].
pub const MINUTES_PER_DAY: u16 = 1440;

/// A wall-clock time of day with minute precision.
///
/// Serialized as `"HH:MM"`. Parsing also accepts `"HH:MM:SS"` as long as the
/// seconds are zero, since that is how the backend stores schedule times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Build from minutes since midnight. Fails outside `[0, 1440)`.
    pub fn from_minutes(minutes: u16) -> Result<Self> {
        if minutes >= MINUTES_PER_DAY {
            return Err(SlotError::InvalidTime(format!(
                "{} minutes is outside a single day",
                minutes
            )));
        }
        Ok(Self(minutes))
    }

    /// Build from an hour/minute pair.
    pub fn from_hm(hour: u16, minute: u16) -> Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(SlotError::InvalidTime(format!(
                "{:02}:{:02}",
                hour, minute
            )));
        }
        Self::from_minutes(hour * 60 + minute)
    }

    /// Callers must guarantee `minutes < MINUTES_PER_DAY`.
    pub(crate) const fn new_unchecked(minutes: u16) -> Self {
        Self(minutes)
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }

    pub fn to_naive_time(self) -> chrono::NaiveTime {
        // Always in range because of the construction invariant.
        chrono::NaiveTime::from_num_seconds_from_midnight_opt(u32::from(self.0) * 60, 0)
            .unwrap_or_default()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || SlotError::InvalidTime(s.to_string());
        let mut parts = s.trim().split(':');

        let hour = parts.next().ok_or_else(invalid)?;
        let minute = parts.next().ok_or_else(invalid)?;
        if let Some(seconds) = parts.next() {
            if seconds.parse::<u16>().map_err(|_| invalid())? != 0 {
                return Err(invalid());
            }
        }
        if parts.next().is_some() || hour.is_empty() || minute.len() != 2 {
            return Err(invalid());
        }

        let hour: u16 = hour.parse().map_err(|_| invalid())?;
        let minute: u16 = minute.parse().map_err(|_| invalid())?;
        Self::from_hm(hour, minute)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = SlotError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// A physical consulting room (box).
    RoomId
);
id_type!(
    /// A doctor/specialty pairing that owns a set of working intervals.
    OwnerId
);
id_type!(
    /// The appointment a booked interval belongs to.
    BookingId
);

/// Parse a day-of-week name.
///
/// Accepts English names and abbreviations (`Mon`, `Monday`, `MO`) and the
/// Spanish names used by the clinic backend (`Lunes` .. `Domingo`, with or
/// without accents), case-insensitively.
pub fn parse_weekday(s: &str) -> Result<Weekday> {
    let normalized: String = s
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            _ => c,
        })
        .collect();

    let day = match normalized.as_str() {
        "mo" | "mon" | "monday" | "lunes" => Weekday::Mon,
        "tu" | "tue" | "tuesday" | "martes" => Weekday::Tue,
        "we" | "wed" | "wednesday" | "miercoles" => Weekday::Wed,
        "th" | "thu" | "thursday" | "jueves" => Weekday::Thu,
        "fr" | "fri" | "friday" | "viernes" => Weekday::Fri,
        "sa" | "sat" | "saturday" | "sabado" => Weekday::Sat,
        "su" | "sun" | "sunday" | "domingo" => Weekday::Sun,
        _ => return Err(SlotError::InvalidDay(s.to_string())),
    };
    Ok(day)
}

/// Full English name of a weekday, the canonical serialized form.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub(crate) mod weekday_serde {
    use chrono::Weekday;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(day: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(super::weekday_name(*day))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Weekday, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_weekday(&raw).map_err(serde::de::Error::custom)
    }
}

/// A weekly window during which an owner sees patients in a given room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "IntervalRecord")]
pub struct WorkingInterval {
    #[serde(serialize_with = "weekday_serde::serialize")]
    day: Weekday,
    start: TimeOfDay,
    end: TimeOfDay,
    room: RoomId,
    owner: OwnerId,
}

impl WorkingInterval {
    /// Validate and build an interval. Fails unless `start < end`.
    pub fn new(
        day: Weekday,
        start: TimeOfDay,
        end: TimeOfDay,
        room: RoomId,
        owner: OwnerId,
    ) -> Result<Self> {
        if start >= end {
            return Err(SlotError::InvalidInterval(format!(
                "start {} must be before end {}",
                start, end
            )));
        }
        Ok(Self {
            day,
            start,
            end,
            room,
            owner,
        })
    }

    /// Convenience constructor from `"HH:MM"` strings.
    pub fn parse(day: Weekday, start: &str, end: &str, room: RoomId, owner: OwnerId) -> Result<Self> {
        Self::new(day, start.parse()?, end.parse()?, room, owner)
    }

    pub fn day(&self) -> Weekday {
        self.day
    }

    pub fn start(&self) -> TimeOfDay {
        self.start
    }

    pub fn end(&self) -> TimeOfDay {
        self.end
    }

    pub fn room(&self) -> RoomId {
        self.room
    }

    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    pub fn duration_minutes(&self) -> u16 {
        self.end.minutes() - self.start.minutes()
    }
}

impl fmt::Display for WorkingInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{} room {} owner {}",
            weekday_name(self.day),
            self.start,
            self.end,
            self.room,
            self.owner
        )
    }
}

/// Wire shape of a working interval before validation. Field aliases match the
/// names the clinic backend uses for schedule records.
#[derive(Deserialize)]
struct IntervalRecord {
    #[serde(alias = "dia", deserialize_with = "weekday_serde::deserialize")]
    day: Weekday,
    #[serde(alias = "horaInicio")]
    start: TimeOfDay,
    #[serde(alias = "horaFin")]
    end: TimeOfDay,
    #[serde(alias = "box")]
    room: RoomId,
    #[serde(alias = "medico_especialidad")]
    owner: OwnerId,
}

impl TryFrom<IntervalRecord> for WorkingInterval {
    type Error = SlotError;

    fn try_from(r: IntervalRecord) -> Result<Self> {
        WorkingInterval::new(r.day, r.start, r.end, r.room, r.owner)
    }
}

/// A confirmed appointment occupying part of a room's day.
///
/// Lives only as long as the appointment: cancelling or rescheduling the
/// booking removes or supersedes it in the caller's store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "BookingRecord")]
pub struct BookedInterval {
    #[serde(flatten)]
    interval: WorkingInterval,
    booking: BookingId,
}

impl BookedInterval {
    pub fn new(interval: WorkingInterval, booking: BookingId) -> Self {
        Self { interval, booking }
    }

    pub fn interval(&self) -> &WorkingInterval {
        &self.interval
    }

    pub fn booking(&self) -> BookingId {
        self.booking
    }
}

#[derive(Deserialize)]
struct BookingRecord {
    #[serde(alias = "dia", deserialize_with = "weekday_serde::deserialize")]
    day: Weekday,
    #[serde(alias = "horaInicio")]
    start: TimeOfDay,
    #[serde(alias = "horaFin")]
    end: TimeOfDay,
    #[serde(alias = "box")]
    room: RoomId,
    #[serde(alias = "medico_especialidad")]
    owner: OwnerId,
    #[serde(alias = "cita")]
    booking: BookingId,
}

impl TryFrom<BookingRecord> for BookedInterval {
    type Error = SlotError;

    fn try_from(r: BookingRecord) -> Result<Self> {
        let interval = WorkingInterval::new(r.day, r.start, r.end, r.room, r.owner)?;
        Ok(BookedInterval::new(interval, r.booking))
    }
}

/// A bookable window on a concrete date. Generated on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CandidateSlot {
    pub date: NaiveDate,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub room: RoomId,
}

impl CandidateSlot {
    pub fn duration_minutes(&self) -> u16 {
        self.end.minutes() - self.start.minutes()
    }
}

impl fmt::Display for CandidateSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}-{} room {}", self.date, self.start, self.end, self.room)
    }
}

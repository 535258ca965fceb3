//! Admin-side validation of a proposed weekly schedule entry.
//!
//! A draft arrives as loosely typed form data. [`validate_rule`] checks it
//! against a [`RulePolicy`] (time grid and opening hours) and either returns a
//! validated [`WorkingInterval`] or every violation found, so a form can show
//! all problems at once.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{Result, SlotError};
use crate::interval::{parse_weekday, OwnerId, RoomId, TimeOfDay, WorkingInterval, MINUTES_PER_DAY};

/// Grid and opening hours a schedule entry must respect.
///
/// Deserialization goes through [`RulePolicy::new`], so a decoded policy always
/// has a grid of 1..=1440 minutes and `opening <= closing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PolicyRecord")]
pub struct RulePolicy {
    /// Start and end times must fall on multiples of this many minutes.
    pub granularity_minutes: u16,
    /// Earliest allowed start or end time.
    pub opening: TimeOfDay,
    /// Latest allowed start or end time (inclusive).
    pub closing: TimeOfDay,
}

impl Default for RulePolicy {
    fn default() -> Self {
        Self {
            granularity_minutes: 15,
            opening: TimeOfDay::new_unchecked(8 * 60),
            closing: TimeOfDay::new_unchecked(20 * 60),
        }
    }
}

impl RulePolicy {
    /// # Errors
    /// Returns `SlotError::InvalidConfig` when the grid is outside 1..=1440
    /// minutes or opening is after closing.
    pub fn new(granularity_minutes: u16, opening: TimeOfDay, closing: TimeOfDay) -> Result<Self> {
        if granularity_minutes == 0 || granularity_minutes > MINUTES_PER_DAY {
            return Err(SlotError::InvalidConfig(format!(
                "granularity must be 1..={} minutes, got {}",
                MINUTES_PER_DAY, granularity_minutes
            )));
        }
        if opening > closing {
            return Err(SlotError::InvalidConfig(format!(
                "opening {} is after closing {}",
                opening, closing
            )));
        }
        Ok(Self {
            granularity_minutes,
            opening,
            closing,
        })
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct PolicyRecord {
    granularity_minutes: u16,
    opening: TimeOfDay,
    closing: TimeOfDay,
}

impl Default for PolicyRecord {
    fn default() -> Self {
        let policy = RulePolicy::default();
        Self {
            granularity_minutes: policy.granularity_minutes,
            opening: policy.opening,
            closing: policy.closing,
        }
    }
}

impl TryFrom<PolicyRecord> for RulePolicy {
    type Error = SlotError;

    fn try_from(r: PolicyRecord) -> Result<Self> {
        RulePolicy::new(r.granularity_minutes, r.opening, r.closing)
    }
}

/// Unvalidated schedule entry as submitted by the admin form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDraft {
    #[serde(default, alias = "medico_especialidad")]
    pub owner: Option<OwnerId>,
    #[serde(default, alias = "box")]
    pub room: Option<RoomId>,
    #[serde(default, alias = "dia")]
    pub day: Option<String>,
    #[serde(default, alias = "horaInicio")]
    pub start: Option<String>,
    #[serde(default, alias = "horaFin")]
    pub end: Option<String>,
}

/// Which end of the draft a violation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Start,
    End,
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Start => f.write_str("start time"),
            Bound::End => f.write_str("end time"),
        }
    }
}

/// A single reason a draft was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("an owner (doctor specialty) is required")]
    MissingOwner,
    #[error("a room is required")]
    MissingRoom,
    #[error("a day of the week is required")]
    MissingDay,
    #[error("both start and end times are required")]
    MissingTimes,
    #[error("unknown day of the week '{0}'")]
    UnknownDay(String),
    #[error("{bound} '{value}' is not a valid HH:MM time")]
    Unparseable { bound: Bound, value: String },
    #[error("{bound} {time} is not on the {granularity}-minute grid")]
    OffGrid {
        bound: Bound,
        time: TimeOfDay,
        granularity: u16,
    },
    #[error("{bound} {time} is outside opening hours {opening}-{closing}")]
    OutsideHours {
        bound: Bound,
        time: TimeOfDay,
        opening: TimeOfDay,
        closing: TimeOfDay,
    },
    #[error("start time {start} must be before end time {end}")]
    StartNotBeforeEnd { start: TimeOfDay, end: TimeOfDay },
}

/// Every violation found in a rejected draft.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("schedule entry rejected: {}", join(.0))]
pub struct RuleViolations(pub Vec<Violation>);

fn join(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl RuleViolations {
    pub fn violations(&self) -> &[Violation] {
        &self.0
    }
}

fn check_time(
    raw: &str,
    bound: Bound,
    policy: &RulePolicy,
    violations: &mut Vec<Violation>,
) -> Option<TimeOfDay> {
    let time = match raw.parse::<TimeOfDay>() {
        Ok(t) => t,
        Err(_) => {
            violations.push(Violation::Unparseable {
                bound,
                value: raw.to_string(),
            });
            return None;
        }
    };

    let granularity = policy.granularity_minutes.max(1);
    if time.minutes() % granularity != 0 {
        violations.push(Violation::OffGrid {
            bound,
            time,
            granularity,
        });
    }
    if time < policy.opening || time > policy.closing {
        violations.push(Violation::OutsideHours {
            bound,
            time,
            opening: policy.opening,
            closing: policy.closing,
        });
    }
    Some(time)
}

/// Validate a draft, collecting every violation.
pub fn validate_rule(
    draft: &RuleDraft,
    policy: &RulePolicy,
) -> std::result::Result<WorkingInterval, RuleViolations> {
    let mut violations = Vec::new();

    if draft.owner.is_none() {
        violations.push(Violation::MissingOwner);
    }
    if draft.room.is_none() {
        violations.push(Violation::MissingRoom);
    }

    let day = match draft.day.as_deref().map(str::trim) {
        None | Some("") => {
            violations.push(Violation::MissingDay);
            None
        }
        Some(raw) => match parse_weekday(raw) {
            Ok(day) => Some(day),
            Err(_) => {
                violations.push(Violation::UnknownDay(raw.to_string()));
                None
            }
        },
    };

    let start_raw = draft.start.as_deref().filter(|s| !s.trim().is_empty());
    let end_raw = draft.end.as_deref().filter(|s| !s.trim().is_empty());
    if start_raw.is_none() || end_raw.is_none() {
        violations.push(Violation::MissingTimes);
    }

    let start = start_raw.and_then(|s| check_time(s, Bound::Start, policy, &mut violations));
    let end = end_raw.and_then(|s| check_time(s, Bound::End, policy, &mut violations));

    if let (Some(start), Some(end)) = (start, end) {
        if start >= end {
            violations.push(Violation::StartNotBeforeEnd { start, end });
        }
    }

    match (draft.owner, draft.room, day, start, end) {
        (Some(owner), Some(room), Some(day), Some(start), Some(end)) if violations.is_empty() => {
            WorkingInterval::new(day, start, end, room, owner).map_err(|_| {
                RuleViolations(vec![Violation::StartNotBeforeEnd { start, end }])
            })
        }
        _ => Err(RuleViolations(violations)),
    }
}

/// Selectable start/end times on the policy grid, from opening through
/// closing inclusive. Empty when opening is after closing.
pub fn time_options(policy: &RulePolicy) -> Vec<TimeOfDay> {
    let step = usize::from(policy.granularity_minutes.max(1));
    (policy.opening.minutes()..=policy.closing.minutes())
        .step_by(step)
        .map(TimeOfDay::new_unchecked)
        .collect()
}

//! Detect overlapping working intervals.
//!
//! All checks go through one pairwise predicate, [`overlaps`]: two intervals
//! conflict only when they share day and room and their half-open time ranges
//! intersect. Adjacent intervals (one ends exactly when the other starts) are
//! NOT conflicts.
//!
//! Two passes are offered on top of the predicate:
//!
//! - [`find_room_conflicts`] -- the candidate against everything booked into
//!   the same room, whoever owns it.
//! - [`find_owner_conflicts`] -- the candidate against every room assignment
//!   of the same owner, room check included. Callers run this explicitly when
//!   a doctor's specialties must not collide; it is never implied by the room
//!   pass.
//!
//! [`find_conflicts`] runs the passes selected by a [`CheckScope`] and reports
//! each existing interval once.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::interval::{TimeOfDay, WorkingInterval};

/// A detected conflict between a candidate and an existing interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub candidate: WorkingInterval,
    pub existing: WorkingInterval,
    pub overlap_minutes: u16,
}

/// Which passes [`find_conflicts`] and [`validate_against`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckScope {
    /// Same-room pass only.
    #[default]
    Room,
    /// Same-room pass followed by the cross-specialty pass.
    RoomAndOwner,
}

/// Half-open time range intersection: `a_start < b_end && b_start < a_end`.
pub fn overlaps_time(a_start: TimeOfDay, a_end: TimeOfDay, b_start: TimeOfDay, b_end: TimeOfDay) -> bool {
    a_start < b_end && b_start < a_end
}

/// Whether two intervals conflict: same day, same room, intersecting times.
pub fn overlaps(a: &WorkingInterval, b: &WorkingInterval) -> bool {
    a.day() == b.day()
        && a.room() == b.room()
        && overlaps_time(a.start(), a.end(), b.start(), b.end())
}

/// Minutes shared by two intervals, `0` when they do not conflict.
pub fn overlap_minutes(a: &WorkingInterval, b: &WorkingInterval) -> u16 {
    if !overlaps(a, b) {
        return 0;
    }
    let start = a.start().max(b.start());
    let end = a.end().min(b.end());
    end.minutes() - start.minutes()
}

fn collect_conflicts<'a>(
    candidate: &WorkingInterval,
    existing: impl Iterator<Item = &'a WorkingInterval>,
) -> Vec<Conflict> {
    existing
        .filter(|e| overlaps(candidate, e))
        .map(|e| Conflict {
            candidate: candidate.clone(),
            existing: e.clone(),
            overlap_minutes: overlap_minutes(candidate, e),
        })
        .collect()
}

/// Every existing interval in the candidate's room and day that intersects it.
///
/// Intervals in other rooms are never reported, even when they belong to the
/// same owner at the same time.
pub fn find_room_conflicts(candidate: &WorkingInterval, existing: &[WorkingInterval]) -> Vec<Conflict> {
    collect_conflicts(
        candidate,
        existing.iter().filter(|e| e.room() == candidate.room()),
    )
}

/// Boolean form of [`find_room_conflicts`].
pub fn has_room_conflict(candidate: &WorkingInterval, existing: &[WorkingInterval]) -> bool {
    existing.iter().any(|e| overlaps(candidate, e))
}

/// Cross-specialty pass: the candidate against each room assignment owned by
/// the candidate's owner.
///
/// Uses the same predicate as the room pass, so assignments in a different
/// room never conflict; an identical assignment does.
pub fn find_owner_conflicts(candidate: &WorkingInterval, existing: &[WorkingInterval]) -> Vec<Conflict> {
    collect_conflicts(
        candidate,
        existing.iter().filter(|e| e.owner() == candidate.owner()),
    )
}

/// Conflicts found by the passes in `scope`, each existing interval reported
/// once.
///
/// Room-pass conflicts come first; the owner pass only adds intervals the room
/// pass has not already reported.
pub fn find_conflicts(
    candidate: &WorkingInterval,
    existing: &[WorkingInterval],
    scope: CheckScope,
) -> Vec<Conflict> {
    let mut conflicts = find_room_conflicts(candidate, existing);
    if scope == CheckScope::RoomAndOwner {
        for conflict in find_owner_conflicts(candidate, existing) {
            if !conflicts.iter().any(|c| c.existing == conflict.existing) {
                conflicts.push(conflict);
            }
        }
    }
    conflicts
}

/// Fail with [`SlotError::Conflict`] on the first conflict found by the
/// passes in `scope`.
pub fn validate_against(
    candidate: &WorkingInterval,
    existing: &[WorkingInterval],
    scope: CheckScope,
) -> Result<()> {
    match find_conflicts(candidate, existing, scope).into_iter().next() {
        Some(c) => Err(SlotError::Conflict(format!(
            "{} overlaps {} by {} minutes",
            c.candidate, c.existing, c.overlap_minutes
        ))),
        None => Ok(()),
    }
}

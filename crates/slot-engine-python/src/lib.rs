//! # slot-engine-python
//!
//! Python bindings for slot-engine, built with PyO3, so the Django backend can
//! compute availability with the same rules as the front-end.
//!
//! Exposes the following functions to Python as the `clinic_slots` module:
//!
//! - `generate_slots(interval_json, date, duration_minutes)` -- JSON array of slots
//! - `resolve_availability(owner, room, date, working_json, booked_json, duration_minutes)`
//! - `find_room_conflicts(candidate_json, existing_json)` -- same-room pass
//! - `find_owner_conflicts(candidate_json, existing_json)` -- cross-specialty pass
//! - `validate_rule(draft_json, policy_json=None)` -- normalized interval JSON

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use slot_engine::zone::parse_date;
use slot_engine::{
    BookedInterval, OwnerId, RoomId, RuleDraft, RulePolicy, SlotDuration, WorkingInterval,
};

fn value_err(e: impl std::fmt::Display) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn parse_json<T: serde::de::DeserializeOwned>(json: &str) -> PyResult<T> {
    serde_json::from_str(json).map_err(value_err)
}

fn to_json<T: serde::Serialize>(value: &T) -> PyResult<String> {
    serde_json::to_string(value).map_err(value_err)
}

/// Split a working interval into fixed-length slots.
///
/// Args:
///     interval_json: A working interval object, e.g.
///         `{"dia": "Lunes", "horaInicio": "08:00", "horaFin": "12:00", "box": 1, "medico_especialidad": 3}`.
///     date: ISO date the slots are for (e.g., "2026-03-16").
///     duration_minutes: Slot length in minutes.
///
/// Returns:
///     A JSON array of `{date, start, end, room}` objects.
///
/// Raises:
///     ValueError: If the interval, date, or duration is invalid.
#[pyfunction]
fn generate_slots(interval_json: &str, date: &str, duration_minutes: u16) -> PyResult<String> {
    let interval: WorkingInterval = parse_json(interval_json)?;
    let date = parse_date(date).map_err(value_err)?;
    let duration = SlotDuration::minutes(duration_minutes).map_err(value_err)?;
    to_json(&slot_engine::generate_slots(&interval, duration, date))
}

/// Bookable slots for an owner in a room on a date.
///
/// Args:
///     owner: Doctor-specialty id.
///     room: Box id.
///     date: ISO date (e.g., "2026-03-16").
///     working_json: JSON array of the owner's working intervals.
///     booked_json: JSON array of booked intervals on that date.
///     duration_minutes: Slot length in minutes.
///
/// Returns:
///     A JSON array of `{date, start, end, room}` objects, sorted by start.
///
/// Raises:
///     ValueError: If any input is malformed.
#[pyfunction]
fn resolve_availability(
    owner: u64,
    room: u64,
    date: &str,
    working_json: &str,
    booked_json: &str,
    duration_minutes: u16,
) -> PyResult<String> {
    let working: Vec<WorkingInterval> = parse_json(working_json)?;
    let booked: Vec<BookedInterval> = parse_json(booked_json)?;
    let duration = SlotDuration::minutes(duration_minutes).map_err(value_err)?;

    let slots = slot_engine::resolve_str(
        OwnerId(owner),
        RoomId(room),
        date,
        &working,
        &booked,
        duration,
    )
    .map_err(value_err)?;
    to_json(&slots)
}

/// Conflicts between a candidate and existing intervals in the same room.
///
/// Returns:
///     A JSON array of `{candidate, existing, overlap_minutes}` objects.
#[pyfunction]
fn find_room_conflicts(candidate_json: &str, existing_json: &str) -> PyResult<String> {
    let candidate: WorkingInterval = parse_json(candidate_json)?;
    let existing: Vec<WorkingInterval> = parse_json(existing_json)?;
    to_json(&slot_engine::find_room_conflicts(&candidate, &existing))
}

/// Conflicts between a candidate and the other assignments of its owner.
///
/// Returns:
///     A JSON array of `{candidate, existing, overlap_minutes}` objects.
#[pyfunction]
fn find_owner_conflicts(candidate_json: &str, existing_json: &str) -> PyResult<String> {
    let candidate: WorkingInterval = parse_json(candidate_json)?;
    let existing: Vec<WorkingInterval> = parse_json(existing_json)?;
    to_json(&slot_engine::find_owner_conflicts(&candidate, &existing))
}

/// Validate a schedule entry draft.
///
/// Args:
///     draft_json: Draft with optional `owner`, `room`, `day`, `start`, `end`
///         (backend field names are accepted too).
///     policy_json: Optional `{granularity_minutes, opening, closing}`.
///
/// Returns:
///     The normalized working interval as JSON.
///
/// Raises:
///     ValueError: Listing every violation when the draft is rejected.
#[pyfunction]
#[pyo3(signature = (draft_json, policy_json=None))]
fn validate_rule(draft_json: &str, policy_json: Option<&str>) -> PyResult<String> {
    let draft: RuleDraft = parse_json(draft_json)?;
    let policy: RulePolicy = match policy_json {
        Some(json) => parse_json(json)?,
        None => RulePolicy::default(),
    };
    let interval = slot_engine::validate_rule(&draft, &policy).map_err(value_err)?;
    to_json(&interval)
}

/// The `clinic_slots` Python module, implemented in Rust via PyO3.
#[pymodule]
fn clinic_slots(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(generate_slots, m)?)?;
    m.add_function(wrap_pyfunction!(resolve_availability, m)?)?;
    m.add_function(wrap_pyfunction!(find_room_conflicts, m)?)?;
    m.add_function(wrap_pyfunction!(find_owner_conflicts, m)?)?;
    m.add_function(wrap_pyfunction!(validate_rule, m)?)?;
    Ok(())
}

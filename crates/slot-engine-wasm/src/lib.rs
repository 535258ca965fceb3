//! WASM bindings for slot-engine.
//!
//! Exposes slot generation, availability resolution, conflict checks, and
//! schedule validation to the booking front-end via `wasm-bindgen`. All
//! complex types are passed as JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/slot-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

use serde::{Deserialize, Serialize};
use slot_engine::interval::parse_weekday;
use slot_engine::overlap::CheckScope;
use slot_engine::rules::time_options;
use slot_engine::zone::{discard_started, parse_date, parse_instant, parse_timezone};
use slot_engine::{
    generate_slots, resolve_availability, validate_rule, AvailabilityRequest, BookedInterval,
    OwnerId, RoomId, RuleDraft, RulePolicy, SlotDuration, WorkingInterval,
};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly inputs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

/// Input for `resolveAvailability`.
#[derive(Deserialize)]
struct AvailabilityInput {
    owner: OwnerId,
    room: RoomId,
    date: String,
    #[serde(default)]
    working: Vec<WorkingInterval>,
    #[serde(default)]
    booked: Vec<BookedInterval>,
    /// RFC 3339 instant; when set, slots starting at or before it are dropped.
    #[serde(default)]
    now: Option<String>,
    /// IANA zone used with `now`.
    #[serde(default)]
    timezone: Option<String>,
}

/// Result of `validateRule`: either the normalized interval or the messages.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidationDto {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    interval: Option<WorkingInterval>,
    errors: Vec<String>,
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn from_json<T: serde::de::DeserializeOwned>(json: &str, what: &str) -> Result<T, JsValue> {
    serde_json::from_str(json).map_err(|e| JsValue::from_str(&format!("Invalid {} JSON: {}", what, e)))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Split a working interval into fixed-length slots for `date`.
///
/// Returns a JSON array of `{date, start, end, room}` objects.
#[wasm_bindgen(js_name = "generateSlots")]
pub fn generate(
    day: &str,
    start: &str,
    end: &str,
    room: u32,
    date: &str,
    duration_minutes: u16,
) -> Result<String, JsValue> {
    let interval = WorkingInterval::parse(
        parse_weekday(day).map_err(js_err)?,
        start,
        end,
        RoomId(u64::from(room)),
        OwnerId(0),
    )
    .map_err(js_err)?;
    let duration = SlotDuration::minutes(duration_minutes).map_err(js_err)?;
    let date = parse_date(date).map_err(js_err)?;

    to_json(&generate_slots(&interval, duration, date))
}

/// Bookable slots for an owner in a room on a date.
///
/// `request_json` is `{owner, room, date, working, booked, now?, timezone?}`.
/// Returns `{owner, room, date, day, slots}`.
#[wasm_bindgen(js_name = "resolveAvailability")]
pub fn resolve_availability_json(request_json: &str, duration_minutes: u16) -> Result<String, JsValue> {
    let input: AvailabilityInput = from_json(request_json, "availability request")?;
    let duration = SlotDuration::minutes(duration_minutes).map_err(js_err)?;
    let date = parse_date(&input.date).map_err(js_err)?;

    let mut availability = resolve_availability(&AvailabilityRequest {
        owner: input.owner,
        room: input.room,
        date,
        working: &input.working,
        booked: &input.booked,
        duration,
    });

    if let Some(now) = input.now.as_deref() {
        let tz_name = input
            .timezone
            .as_deref()
            .ok_or_else(|| JsValue::from_str("`timezone` is required when `now` is set"))?;
        let tz = parse_timezone(tz_name).map_err(js_err)?;
        let now = parse_instant(now).map_err(js_err)?;
        availability.slots = discard_started(availability.slots, now, tz);
    }

    to_json(&availability)
}

/// Conflicts between a candidate interval and existing ones.
///
/// With `cross_specialty` the owner pass runs too. Each existing interval is
/// reported at most once.
#[wasm_bindgen(js_name = "findConflicts")]
pub fn find_conflicts(
    candidate_json: &str,
    existing_json: &str,
    cross_specialty: bool,
) -> Result<String, JsValue> {
    let candidate: WorkingInterval = from_json(candidate_json, "candidate")?;
    let existing: Vec<WorkingInterval> = from_json(existing_json, "existing intervals")?;

    let scope = if cross_specialty {
        CheckScope::RoomAndOwner
    } else {
        CheckScope::Room
    };
    to_json(&slot_engine::find_conflicts(&candidate, &existing, scope))
}

/// Validate an admin-form draft against the default policy, or the policy in
/// `policy_json` when given.
#[wasm_bindgen(js_name = "validateRule")]
pub fn validate(draft_json: &str, policy_json: Option<String>) -> Result<String, JsValue> {
    let draft: RuleDraft = from_json(draft_json, "draft")?;
    let policy: RulePolicy = match policy_json.as_deref() {
        Some(json) => from_json(json, "policy")?,
        None => RulePolicy::default(),
    };

    let dto = match validate_rule(&draft, &policy) {
        Ok(interval) => ValidationDto {
            valid: true,
            interval: Some(interval),
            errors: Vec::new(),
        },
        Err(violations) => ValidationDto {
            valid: false,
            interval: None,
            errors: violations.violations().iter().map(ToString::to_string).collect(),
        },
    };
    to_json(&dto)
}

/// `HH:MM` options on the default grid (08:00 through 20:00 every 15 minutes).
#[wasm_bindgen(js_name = "timeOptions")]
pub fn options() -> Result<String, JsValue> {
    let options: Vec<String> = time_options(&RulePolicy::default())
        .into_iter()
        .map(|t| t.to_string())
        .collect();
    to_json(&options)
}

//! # slot-engine
//!
//! Deterministic appointment slot computation for clinic schedules.
//!
//! Doctors see patients in consulting rooms (boxes) during weekly working
//! intervals. The engine splits those intervals into fixed-duration slots,
//! detects overlapping schedule entries, and resolves which slots are still
//! bookable on a given date. It is a pure function layer: no I/O, no clock, no
//! shared state. Callers supply the intervals, the date, and the timezone.
//!
//! ## Modules
//!
//! - [`interval`] - Time of day, weekly working intervals, booked intervals, candidate slots
//! - [`slots`] - Working interval → fixed-duration slots; day-period grouping
//! - [`overlap`] - Half-open overlap predicate, same-room and cross-specialty passes
//! - [`availability`] - Candidate slots minus booked slots for a date or date range
//! - [`rules`] - Admin-side validation of new schedule entries
//! - [`recurrence`] - Dates on which a weekly interval applies
//! - [`zone`] - Explicit timezone, date parsing, past-slot filtering
//! - [`config`] - Engine configuration passed by callers
//! - [`error`] - Error types

pub mod availability;
pub mod config;
pub mod error;
pub mod interval;
pub mod overlap;
pub mod recurrence;
pub mod rules;
pub mod slots;
pub mod zone;

pub use availability::{
    resolve, resolve_availability, resolve_range, resolve_str, Availability, AvailabilityRequest,
};
pub use config::EngineConfig;
pub use error::{ErrorKind, SlotError};
pub use interval::{
    BookedInterval, BookingId, CandidateSlot, OwnerId, RoomId, TimeOfDay, WorkingInterval,
};
pub use overlap::{
    find_conflicts, find_owner_conflicts, find_room_conflicts, overlaps, CheckScope, Conflict,
};
pub use rules::{validate_rule, RuleDraft, RulePolicy, RuleViolations};
pub use slots::{generate_slots, SlotDuration};

//! Tests for availability resolution.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Weekday};
use slot_engine::availability::resolve_range;
use slot_engine::error::ErrorKind;
use slot_engine::{
    generate_slots, resolve, resolve_availability, resolve_str, AvailabilityRequest,
    BookedInterval, BookingId, CandidateSlot, OwnerId, RoomId, SlotDuration, WorkingInterval,
};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn working(day: Weekday, start: &str, end: &str, room: u64, owner: u64) -> WorkingInterval {
    WorkingInterval::parse(day, start, end, RoomId(room), OwnerId(owner)).unwrap()
}

fn booked(day: Weekday, start: &str, end: &str, room: u64, booking: u64) -> BookedInterval {
    BookedInterval::new(
        WorkingInterval::parse(day, start, end, RoomId(room), OwnerId(1)).unwrap(),
        BookingId(booking),
    )
}

/// Monday 2026-03-16.
fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 16).unwrap()
}

fn quarter() -> SlotDuration {
    SlotDuration::minutes(15).unwrap()
}

fn labels(slots: &[CandidateSlot]) -> Vec<String> {
    slots
        .iter()
        .map(|s| format!("{}-{}", s.start, s.end))
        .collect()
}

fn request<'a>(
    working: &'a [WorkingInterval],
    booked: &'a [BookedInterval],
) -> AvailabilityRequest<'a> {
    AvailabilityRequest {
        owner: OwnerId(1),
        room: RoomId(1),
        date: monday(),
        working,
        booked,
        duration: quarter(),
    }
}

// ── Single date ─────────────────────────────────────────────────────────────

#[test]
fn booked_slot_is_excluded() {
    let schedule = vec![working(Weekday::Mon, "08:00", "09:00", 1, 1)];
    let bookings = vec![booked(Weekday::Mon, "08:15", "08:30", 1, 100)];

    let slots = resolve(&request(&schedule, &bookings));

    assert_eq!(labels(&slots), vec!["08:00-08:15", "08:30-08:45", "08:45-09:00"]);
}

#[test]
fn no_bookings_returns_every_generated_slot() {
    let schedule = vec![working(Weekday::Mon, "08:00", "09:00", 1, 1)];
    let slots = resolve(&request(&schedule, &[]));
    assert_eq!(slots, generate_slots(&schedule[0], quarter(), monday()));
}

#[test]
fn no_working_interval_is_empty_not_error() {
    // Owner only works Tuesdays; 2026-03-16 is a Monday.
    let schedule = vec![working(Weekday::Tue, "08:00", "12:00", 1, 1)];
    assert!(resolve(&request(&schedule, &[])).is_empty());
    assert!(resolve(&request(&[], &[])).is_empty());
}

#[test]
fn other_rooms_and_owners_are_ignored() {
    let schedule = vec![
        working(Weekday::Mon, "08:00", "08:30", 1, 1),
        working(Weekday::Mon, "10:00", "11:00", 2, 1), // other room
        working(Weekday::Mon, "12:00", "13:00", 1, 2), // other owner
    ];
    let slots = resolve(&request(&schedule, &[]));
    assert_eq!(labels(&slots), vec!["08:00-08:15", "08:15-08:30"]);
}

#[test]
fn bookings_in_other_rooms_do_not_block() {
    let schedule = vec![working(Weekday::Mon, "08:00", "08:30", 1, 1)];
    let bookings = vec![booked(Weekday::Mon, "08:00", "08:30", 2, 7)];
    assert_eq!(resolve(&request(&schedule, &bookings)).len(), 2);
}

#[test]
fn booking_spanning_several_slots_removes_all_of_them() {
    let schedule = vec![working(Weekday::Mon, "08:00", "10:00", 1, 1)];
    // 08:20-09:10 touches the 08:15, 08:30, 08:45, 09:00 slots.
    let bookings = vec![booked(Weekday::Mon, "08:20", "09:10", 1, 1)];

    let slots = resolve(&request(&schedule, &bookings));
    assert_eq!(
        labels(&slots),
        vec!["08:00-08:15", "09:15-09:30", "09:30-09:45", "09:45-10:00"]
    );
}

#[test]
fn booking_adjacent_to_slot_does_not_block_it() {
    let schedule = vec![working(Weekday::Mon, "08:00", "08:30", 1, 1)];
    let bookings = vec![booked(Weekday::Mon, "07:45", "08:00", 1, 1)];
    assert_eq!(resolve(&request(&schedule, &bookings)).len(), 2);
}

#[test]
fn multiple_working_intervals_merge_in_order_without_duplicates() {
    let schedule = vec![
        working(Weekday::Mon, "14:00", "14:30", 1, 1),
        working(Weekday::Mon, "08:00", "08:30", 1, 1),
        working(Weekday::Mon, "08:15", "08:45", 1, 1), // overlaps the previous
    ];
    let slots = resolve(&request(&schedule, &[]));
    assert_eq!(
        labels(&slots),
        vec![
            "08:00-08:15",
            "08:15-08:30",
            "08:30-08:45",
            "14:00-14:15",
            "14:15-14:30"
        ]
    );
}

#[test]
fn output_is_subset_of_generator_output() {
    let schedule = vec![working(Weekday::Mon, "09:00", "12:00", 1, 1)];
    let bookings = vec![
        booked(Weekday::Mon, "09:30", "10:00", 1, 1),
        booked(Weekday::Mon, "11:50", "12:30", 1, 2),
    ];
    let generated = generate_slots(&schedule[0], quarter(), monday());
    for slot in resolve(&request(&schedule, &bookings)) {
        assert!(generated.contains(&slot), "{} was invented", slot);
    }
}

#[test]
fn resolution_is_deterministic() {
    let schedule = vec![
        working(Weekday::Mon, "08:00", "12:00", 1, 1),
        working(Weekday::Mon, "15:00", "18:00", 1, 1),
    ];
    let bookings = vec![booked(Weekday::Mon, "10:00", "10:45", 1, 1)];
    let first = resolve(&request(&schedule, &bookings));
    let second = resolve(&request(&schedule, &bookings));
    assert_eq!(first, second);
}

#[test]
fn past_dates_still_resolve() {
    let schedule = vec![working(Weekday::Mon, "08:00", "08:30", 1, 1)];
    let mut req = request(&schedule, &[]);
    req.date = NaiveDate::from_ymd_opt(2001, 1, 1).unwrap(); // a Monday
    assert_eq!(resolve(&req).len(), 2);
}

#[test]
fn availability_echoes_query_keys() {
    let schedule = vec![working(Weekday::Mon, "08:00", "08:30", 1, 1)];
    let result = resolve_availability(&request(&schedule, &[]));

    assert_eq!(result.owner, OwnerId(1));
    assert_eq!(result.room, RoomId(1));
    assert_eq!(result.date, monday());
    assert_eq!(result.day, Weekday::Mon);
    assert_eq!(result.slots.len(), 2);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["date"], "2026-03-16");
    assert_eq!(json["day"], "Monday");
    assert_eq!(json["slots"][0]["start"], "08:00");
    assert_eq!(json["slots"][0]["end"], "08:15");
    assert_eq!(json["slots"][0]["room"], 1);
}

#[test]
fn resolve_str_parses_iso_date() {
    let schedule = vec![working(Weekday::Mon, "08:00", "08:30", 1, 1)];
    let slots = resolve_str(OwnerId(1), RoomId(1), "2026-03-16", &schedule, &[], quarter()).unwrap();
    assert_eq!(slots.len(), 2);
}

#[test]
fn resolve_str_rejects_malformed_date() {
    let err = resolve_str(OwnerId(1), RoomId(1), "16/03/2026", &[], &[], quarter()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

// ── Date ranges ─────────────────────────────────────────────────────────────

#[test]
fn range_covers_each_working_weekday() {
    let schedule = vec![
        working(Weekday::Mon, "08:00", "08:30", 1, 1),
        working(Weekday::Wed, "09:00", "09:15", 1, 1),
    ];
    let mut bookings = BTreeMap::new();
    bookings.insert(
        NaiveDate::from_ymd_opt(2026, 3, 18).unwrap(),
        vec![booked(Weekday::Wed, "09:00", "09:15", 1, 5)],
    );

    let days = resolve_range(
        OwnerId(1),
        RoomId(1),
        NaiveDate::from_ymd_opt(2026, 3, 16).unwrap(),
        NaiveDate::from_ymd_opt(2026, 3, 23).unwrap(),
        &schedule,
        &bookings,
        quarter(),
        chrono_tz::America::Santiago,
    )
    .unwrap();

    let dates: Vec<String> = days.iter().map(|d| d.date.to_string()).collect();
    assert_eq!(dates, vec!["2026-03-16", "2026-03-18", "2026-03-23"]);
    assert_eq!(days[0].slots.len(), 2);
    assert!(days[1].slots.is_empty(), "the only Wednesday slot is booked");
    assert_eq!(days[2].slots.len(), 2);
}

#[test]
fn inverted_range_is_empty() {
    let schedule = vec![working(Weekday::Mon, "08:00", "08:30", 1, 1)];
    let days = resolve_range(
        OwnerId(1),
        RoomId(1),
        NaiveDate::from_ymd_opt(2026, 3, 23).unwrap(),
        NaiveDate::from_ymd_opt(2026, 3, 16).unwrap(),
        &schedule,
        &BTreeMap::new(),
        quarter(),
        chrono_tz::UTC,
    )
    .unwrap();
    assert!(days.is_empty());
}

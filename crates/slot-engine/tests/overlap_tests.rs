//! Tests for overlap detection between working intervals.

use chrono::Weekday;
use slot_engine::error::ErrorKind;
use slot_engine::overlap::{
    find_conflicts, has_room_conflict, overlap_minutes, validate_against, CheckScope,
};
use slot_engine::{find_owner_conflicts, find_room_conflicts, overlaps, OwnerId, RoomId, SlotError, WorkingInterval};

/// Helper to create a working interval from `"HH:MM"` strings.
fn iv(day: Weekday, start: &str, end: &str, room: u64, owner: u64) -> WorkingInterval {
    WorkingInterval::parse(day, start, end, RoomId(room), OwnerId(owner)).unwrap()
}

#[test]
fn partially_overlapping_intervals_detected() {
    // A: 09:00-10:00, B: 09:30-10:30 → 30-min overlap
    let a = iv(Weekday::Mon, "09:00", "10:00", 1, 1);
    let b = iv(Weekday::Mon, "09:30", "10:30", 1, 2);

    assert!(overlaps(&a, &b));
    assert_eq!(overlap_minutes(&a, &b), 30);

    let conflicts = find_room_conflicts(&a, &[b.clone()]);
    assert_eq!(conflicts.len(), 1, "should detect exactly one conflict");
    assert_eq!(conflicts[0].existing, b);
    assert_eq!(conflicts[0].overlap_minutes, 30);
}

#[test]
fn adjacent_intervals_not_a_conflict() {
    // A: 09:00-10:00, B: 10:00-11:00 → touching endpoints, NOT overlapping
    let a = iv(Weekday::Mon, "09:00", "10:00", 1, 1);
    let b = iv(Weekday::Mon, "10:00", "11:00", 1, 1);

    assert!(!overlaps(&a, &b));
    assert!(!overlaps(&b, &a));
    assert!(find_room_conflicts(&a, &[b]).is_empty());
}

#[test]
fn overlap_is_symmetric() {
    let a = iv(Weekday::Wed, "08:00", "12:00", 4, 1);
    let b = iv(Weekday::Wed, "11:00", "13:00", 4, 2);
    assert_eq!(overlaps(&a, &b), overlaps(&b, &a));
    assert_eq!(overlap_minutes(&a, &b), overlap_minutes(&b, &a));
}

#[test]
fn identical_interval_conflicts_with_itself() {
    let a = iv(Weekday::Thu, "14:00", "15:00", 2, 7);
    assert!(overlaps(&a, &a));
    assert_eq!(overlap_minutes(&a, &a), 60);
    assert_eq!(find_room_conflicts(&a, &[a.clone()]).len(), 1);
}

#[test]
fn fully_contained_interval_correct_overlap() {
    let outer = iv(Weekday::Mon, "09:00", "12:00", 1, 1);
    let inner = iv(Weekday::Mon, "10:00", "11:00", 1, 2);
    assert_eq!(overlap_minutes(&outer, &inner), 60);
}

#[test]
fn different_day_never_overlaps() {
    let a = iv(Weekday::Mon, "09:00", "10:00", 1, 1);
    let b = iv(Weekday::Tue, "09:00", "10:00", 1, 1);
    assert!(!overlaps(&a, &b));
    assert_eq!(overlap_minutes(&a, &b), 0);
}

#[test]
fn same_owner_different_rooms_not_flagged_by_either_pass() {
    // Same owner, same time, rooms 1 and 2.
    let room_one = iv(Weekday::Mon, "10:00", "10:30", 1, 5);
    let room_two = iv(Weekday::Mon, "10:00", "10:30", 2, 5);

    assert!(find_room_conflicts(&room_one, &[room_two.clone()]).is_empty());
    assert!(
        find_owner_conflicts(&room_one, &[room_two.clone()]).is_empty(),
        "rooms differ, so the cross-specialty pass raises nothing either"
    );
    assert!(validate_against(&room_one, &[room_two], CheckScope::RoomAndOwner).is_ok());
}

#[test]
fn room_pass_ignores_owner() {
    // Two owners competing for the same room at the same time.
    let mine = iv(Weekday::Fri, "15:00", "16:00", 3, 1);
    let theirs = iv(Weekday::Fri, "15:30", "16:30", 3, 2);

    assert_eq!(find_room_conflicts(&mine, &[theirs.clone()]).len(), 1);
    assert!(
        find_owner_conflicts(&mine, &[theirs]).is_empty(),
        "owner pass only looks at the candidate's own assignments"
    );
}

#[test]
fn both_passes_agree_on_same_room_same_owner() {
    let candidate = iv(Weekday::Mon, "08:00", "09:00", 1, 9);
    let existing = vec![
        iv(Weekday::Mon, "08:30", "09:30", 1, 9),
        iv(Weekday::Mon, "08:30", "09:30", 2, 9),
        iv(Weekday::Mon, "09:00", "10:00", 1, 9),
    ];

    let by_room = find_room_conflicts(&candidate, &existing);
    let by_owner = find_owner_conflicts(&candidate, &existing);
    assert_eq!(by_room, by_owner);
    assert_eq!(by_room.len(), 1);
    assert_eq!(by_room[0].existing, existing[0]);
}

#[test]
fn combined_passes_report_each_existing_interval_once() {
    let candidate = iv(Weekday::Mon, "10:00", "10:30", 1, 7);
    let existing = vec![iv(Weekday::Mon, "10:15", "10:45", 1, 7)];

    let conflicts = find_conflicts(&candidate, &existing, CheckScope::RoomAndOwner);
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].existing, existing[0]);
    assert_eq!(conflicts[0].overlap_minutes, 15);
}

#[test]
fn combined_passes_keep_room_order_and_skip_other_rooms() {
    let candidate = iv(Weekday::Wed, "09:00", "11:00", 4, 7);
    let existing = vec![
        iv(Weekday::Wed, "10:00", "12:00", 4, 8),
        iv(Weekday::Wed, "08:30", "09:30", 4, 7),
        iv(Weekday::Wed, "09:00", "11:00", 5, 7),
    ];

    let room_only = find_conflicts(&candidate, &existing, CheckScope::Room);
    let combined = find_conflicts(&candidate, &existing, CheckScope::RoomAndOwner);
    assert_eq!(room_only, combined);
    assert_eq!(combined.len(), 2);
    assert_eq!(combined[0].existing, existing[0]);
    assert_eq!(combined[1].existing, existing[1]);
}

#[test]
fn multiple_conflicts_all_found_in_input_order() {
    let candidate = iv(Weekday::Tue, "09:00", "12:00", 1, 1);
    let existing = vec![
        iv(Weekday::Tue, "08:00", "09:15", 1, 2),
        iv(Weekday::Tue, "12:00", "13:00", 1, 3),
        iv(Weekday::Tue, "11:00", "12:30", 1, 4),
    ];

    let conflicts = find_room_conflicts(&candidate, &existing);
    assert_eq!(conflicts.len(), 2);
    assert_eq!(conflicts[0].overlap_minutes, 15);
    assert_eq!(conflicts[1].overlap_minutes, 60);
    assert!(has_room_conflict(&candidate, &existing));
}

#[test]
fn empty_existing_list_no_conflicts() {
    let candidate = iv(Weekday::Sat, "09:00", "10:00", 1, 1);
    assert!(find_room_conflicts(&candidate, &[]).is_empty());
    assert!(!has_room_conflict(&candidate, &[]));
    assert!(validate_against(&candidate, &[], CheckScope::Room).is_ok());
}

#[test]
fn validate_against_reports_conflict_kind() {
    let candidate = iv(Weekday::Mon, "09:00", "10:00", 1, 1);
    let existing = vec![iv(Weekday::Mon, "09:45", "10:15", 1, 2)];

    let err = validate_against(&candidate, &existing, CheckScope::Room).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert!(matches!(err, SlotError::Conflict(ref msg) if msg.contains("15 minutes")));
}

//! Tests for lane assignment within one day.

use replay_calendar::lanes::{assign_lanes, assign_lanes_with, reassign_lanes, DayLanes, OverlapPolicy};
use replay_calendar::{CalendarError, Fragment, LaneFragment};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn lanes_of(day: &DayLanes) -> Vec<usize> {
    day.fragments.iter().map(|f| f.lane_index).collect()
}

fn ids_of(day: &DayLanes) -> Vec<&str> {
    day.fragments.iter().map(|f| f.fragment.id.as_str()).collect()
}

// ── Reference scenarios ─────────────────────────────────────────────────────

#[test]
fn overlapping_pair_uses_two_lanes() {
    let day =
        assign_lanes(&[Fragment::new("1", 0, 3600), Fragment::new("2", 1800, 5400)]).unwrap();

    assert_eq!(lanes_of(&day), vec![0, 1]);
    assert_eq!(day.lane_count, 2);
}

#[test]
fn nested_fragments_share_second_lane() {
    // "2" and "3" both sit inside "1" but not inside each other.
    let day = assign_lanes(&[
        Fragment::new("1", 0, 7200),
        Fragment::new("2", 1000, 2000),
        Fragment::new("3", 3000, 4000),
    ])
    .unwrap();

    assert_eq!(lanes_of(&day), vec![0, 1, 1]);
    assert_eq!(day.lane_count, 2);
}

#[test]
fn adjacent_fragments_share_a_lane() {
    let day = assign_lanes(&[Fragment::new("1", 0, 100), Fragment::new("2", 100, 200)]).unwrap();

    assert_eq!(lanes_of(&day), vec![0, 0]);
    assert_eq!(day.lane_count, 1);
}

#[test]
fn empty_day_has_one_lane() {
    let day = assign_lanes(&[]).unwrap();

    assert!(day.fragments.is_empty());
    assert_eq!(day.lane_count, 1);
}

// ── Packing behavior ────────────────────────────────────────────────────────

#[test]
fn output_keeps_input_order() {
    let day = assign_lanes(&[
        Fragment::new("b", 500, 900),
        Fragment::new("a", 0, 100),
        Fragment::new("c", 50, 600),
    ])
    .unwrap();

    assert_eq!(ids_of(&day), vec!["b", "a", "c"]);
    assert_eq!(lanes_of(&day), vec![0, 0, 1]);
}

#[test]
fn shared_start_still_conflicts() {
    // Continuation slices all begin at midnight.
    let day = assign_lanes(&[
        Fragment::new("1", 0, 3600),
        Fragment::new("2", 0, 600),
        Fragment::new("3", 0, 3600),
    ])
    .unwrap();

    assert_eq!(lanes_of(&day), vec![0, 1, 2]);
}

#[test]
fn identical_intervals_never_share_a_lane() {
    let day = assign_lanes(&[Fragment::new("1", 10, 20), Fragment::new("2", 10, 20)]).unwrap();

    assert_eq!(lanes_of(&day), vec![0, 1]);
}

#[test]
fn rescan_skips_lanes_taken_by_earlier_fragments() {
    // "4" collides with "1" in lane 0, "2" in lane 1 and "3" in lane 2.
    let day = assign_lanes(&[
        Fragment::new("1", 0, 1000),
        Fragment::new("2", 100, 1000),
        Fragment::new("3", 200, 1000),
        Fragment::new("4", 300, 400),
    ])
    .unwrap();

    assert_eq!(lanes_of(&day), vec![0, 1, 2, 3]);
    assert_eq!(day.lane_count, 4);
}

#[test]
fn freed_lane_is_reused() {
    let day = assign_lanes(&[
        Fragment::new("1", 0, 1000),
        Fragment::new("2", 100, 200),
        Fragment::new("3", 300, 400),
        Fragment::new("4", 1000, 2000),
    ])
    .unwrap();

    assert_eq!(lanes_of(&day), vec![0, 1, 1, 0]);
}

#[test]
fn unsorted_input_packs_non_optimally() {
    // At most two fragments overlap at any instant, but input order forces 3 lanes.
    let day = assign_lanes(&[
        Fragment::new("a", 0, 10),
        Fragment::new("b", 20, 30),
        Fragment::new("c", 15, 25),
        Fragment::new("d", 5, 18),
    ])
    .unwrap();

    assert_eq!(lanes_of(&day), vec![0, 0, 1, 2]);
    assert_eq!(day.lane_count, 3);
}

#[test]
fn zero_length_fragment_inside_another_conflicts() {
    let day = assign_lanes(&[Fragment::new("1", 0, 100), Fragment::new("2", 50, 50)]).unwrap();

    assert_eq!(lanes_of(&day), vec![0, 1]);
}

#[test]
fn zero_length_fragment_on_boundary_does_not_conflict() {
    let day = assign_lanes(&[Fragment::new("1", 0, 100), Fragment::new("2", 100, 100)]).unwrap();

    assert_eq!(lanes_of(&day), vec![0, 0]);
}

#[test]
fn same_input_gives_same_lanes() {
    let input = vec![
        Fragment::new("1", 0, 5000),
        Fragment::new("2", 100, 300),
        Fragment::new("3", 250, 900),
        Fragment::new("4", 4000, 6000),
    ];

    assert_eq!(assign_lanes(&input).unwrap(), assign_lanes(&input).unwrap());
}

// ── Policies ────────────────────────────────────────────────────────────────

#[test]
fn inclusive_policy_separates_adjacent_fragments() {
    let day = assign_lanes_with(
        &[Fragment::new("1", 0, 100), Fragment::new("2", 100, 200)],
        OverlapPolicy::Inclusive,
    )
    .unwrap();

    assert_eq!(lanes_of(&day), vec![0, 1]);
    assert_eq!(day.lane_count, 2);
}

#[test]
fn policies_agree_on_disjoint_fragments() {
    let a = Fragment::new("a", 0, 100);
    let b = Fragment::new("b", 101, 200);

    assert!(!OverlapPolicy::HalfOpen.overlaps(&a, &b));
    assert!(!OverlapPolicy::Inclusive.overlaps(&a, &b));
}

#[test]
fn overlap_is_symmetric() {
    let a = Fragment::new("a", 0, 100);
    let b = Fragment::new("b", 50, 60);

    assert!(OverlapPolicy::HalfOpen.overlaps(&a, &b));
    assert!(OverlapPolicy::HalfOpen.overlaps(&b, &a));
}

#[test]
fn reassign_starts_from_previous_lane() {
    let seeded = vec![
        LaneFragment {
            fragment: Fragment::new("1", 0, 100),
            lane_index: 2,
        },
        LaneFragment {
            fragment: Fragment::new("2", 200, 300),
            lane_index: 0,
        },
    ];

    let day = reassign_lanes(&seeded, OverlapPolicy::HalfOpen).unwrap();

    assert_eq!(lanes_of(&day), vec![2, 0]);
    assert_eq!(day.lane_count, 3);
    assert!(day.fragments[1].is_primary());
}

// ── Validation ──────────────────────────────────────────────────────────────

#[test]
fn end_before_start_is_rejected() {
    let err = assign_lanes(&[Fragment::new("ok", 0, 10), Fragment::new("bad", 500, 100)])
        .unwrap_err();

    match err {
        CalendarError::InvalidEvent { id, field, .. } => {
            assert_eq!(id, "bad");
            assert_eq!(field, "end_in_seconds");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

//! Tests for the full week layout pipeline and render geometry.

use chrono::{NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use replay_calendar::layout::{geometry, TimeWindow, WeekLayout};
use replay_calendar::{Event, Fragment, LaneFragment, OverlapPolicy, Week, SECONDS_IN_DAY};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn utc_week() -> Week {
    Week::new(NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(), Tz::UTC)
}

fn event(id: &str, day: u32, hour: u32, minute: u32, duration_seconds: i64) -> Event {
    Event::new(
        id,
        "u1",
        Utc.with_ymd_and_hms(2026, 3, day, hour, minute, 0).unwrap(),
        duration_seconds,
    )
}

fn lane_fragment(start: i64, end: i64, lane_index: usize) -> LaneFragment {
    LaneFragment {
        fragment: Fragment::new("f", start, end),
        lane_index,
    }
}

// ── Pipeline ────────────────────────────────────────────────────────────────

#[test]
fn build_produces_seven_dated_days() {
    let layout = WeekLayout::build(&[], &utc_week(), OverlapPolicy::HalfOpen).unwrap();

    assert_eq!(layout.days.len(), 7);
    assert_eq!(layout.first_day, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
    for (index, day) in layout.days.iter().enumerate() {
        assert_eq!(day.index, index);
        assert_eq!(day.lane_count, 1);
    }
    assert_eq!(
        layout.days[6].date,
        NaiveDate::from_ymd_opt(2026, 3, 8).unwrap()
    );
}

#[test]
fn buckets_are_sorted_before_lane_assignment() {
    // Given in reverse order; sorted they pack into two lanes.
    let events = vec![
        event("c", 3, 3, 0, 3600),
        event("b", 3, 0, 30, 3600),
        event("a", 3, 0, 0, 3600),
    ];

    let layout = WeekLayout::build(&events, &utc_week(), OverlapPolicy::HalfOpen).unwrap();
    let day = &layout.days[1];

    let ids: Vec<&str> = day.fragments.iter().map(|f| f.fragment.id.as_str()).collect();
    let lanes: Vec<usize> = day.fragments.iter().map(|f| f.lane_index).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert_eq!(lanes, vec![0, 1, 0]);
    assert_eq!(day.lane_count, 2);
}

#[test]
fn equal_starts_keep_input_order() {
    let events = vec![event("first", 4, 10, 0, 60), event("second", 4, 10, 0, 120)];

    let layout = WeekLayout::build(&events, &utc_week(), OverlapPolicy::HalfOpen).unwrap();
    let ids: Vec<&str> = layout.days[2]
        .fragments
        .iter()
        .map(|f| f.fragment.id.as_str())
        .collect();

    assert_eq!(ids, vec!["first", "second"]);
}

#[test]
fn continuation_competes_with_next_day_events() {
    // A late stream spills into Tuesday and collides with an early Tuesday VOD.
    let events = vec![event("late", 2, 22, 0, 4 * 3600), event("early", 3, 1, 0, 3600)];

    let layout = WeekLayout::build(&events, &utc_week(), OverlapPolicy::HalfOpen).unwrap();
    let tuesday = &layout.days[1];

    assert_eq!(tuesday.fragments.len(), 2);
    assert_eq!(tuesday.fragments[0].fragment.id, "late");
    assert!(tuesday.fragments[0].fragment.is_fragment_copy);
    assert_eq!(tuesday.lane_count, 2);
    assert_eq!(layout.fragment_count(), 3);
}

#[test]
fn policy_is_applied_per_day() {
    let events = vec![event("a", 5, 9, 0, 3600), event("b", 5, 10, 0, 3600)];

    let half_open = WeekLayout::build(&events, &utc_week(), OverlapPolicy::HalfOpen).unwrap();
    let inclusive = WeekLayout::build(&events, &utc_week(), OverlapPolicy::Inclusive).unwrap();

    assert_eq!(half_open.days[3].lane_count, 1);
    assert_eq!(inclusive.days[3].lane_count, 2);
}

#[test]
fn invalid_event_fails_the_build() {
    let events = vec![event("ok", 2, 9, 0, 60), event("bad", 2, 9, 0, -60)];

    assert!(WeekLayout::build(&events, &utc_week(), OverlapPolicy::HalfOpen).is_err());
}

#[test]
fn layout_serializes_to_json() {
    let layout =
        WeekLayout::build(&[event("a", 2, 9, 0, 60)], &utc_week(), OverlapPolicy::HalfOpen)
            .unwrap();
    let json = serde_json::to_value(&layout).unwrap();

    assert_eq!(json["first_day"], "2026-03-02");
    assert_eq!(json["timezone"], "UTC");
    assert_eq!(json["days"][0]["fragments"][0]["id"], "a");
    assert_eq!(json["days"][0]["fragments"][0]["lane_index"], 0);
}

// ── Visible window ──────────────────────────────────────────────────────────

#[test]
fn visible_window_starts_at_earliest_hour() {
    let events = vec![event("a", 3, 14, 45, 600), event("b", 6, 9, 20, 600)];

    let layout = WeekLayout::build(&events, &utc_week(), OverlapPolicy::HalfOpen).unwrap();

    assert_eq!(
        layout.visible_window(),
        TimeWindow {
            start: 9 * 3600,
            end: SECONDS_IN_DAY
        }
    );
}

#[test]
fn visible_window_of_empty_week_is_full_day() {
    let layout = WeekLayout::build(&[], &utc_week(), OverlapPolicy::HalfOpen).unwrap();

    assert_eq!(layout.visible_window(), TimeWindow::FULL_DAY);
}

#[test]
fn hour_labels_include_both_ends() {
    let window = TimeWindow {
        start: 20 * 3600,
        end: SECONDS_IN_DAY,
    };

    assert_eq!(window.hour_labels(), vec![20, 21, 22, 23, 0]);
    assert_eq!(TimeWindow::FULL_DAY.hour_labels().len(), 25);
}

// ── Geometry ────────────────────────────────────────────────────────────────

#[test]
fn geometry_over_full_day() {
    let g = geometry(&lane_fragment(21_600, 43_200, 2), TimeWindow::FULL_DAY, 64.0);

    assert!((g.left - 0.25).abs() < 1e-9);
    assert!((g.width - 0.25).abs() < 1e-9);
    assert_eq!(g.top, 128.0);
    assert_eq!(g.height, 64.0);
}

#[test]
fn geometry_clamps_tail_to_window() {
    let g = geometry(&lane_fragment(82_800, 90_000, 0), TimeWindow::FULL_DAY, 64.0);

    assert!((g.left - 82_800.0 / 86_400.0).abs() < 1e-9);
    assert!((g.width - 3_600.0 / 86_400.0).abs() < 1e-9);
    assert_eq!(g.top, 0.0);
}

#[test]
fn geometry_relative_to_trimmed_window() {
    let window = TimeWindow {
        start: 43_200,
        end: SECONDS_IN_DAY,
    };
    let g = geometry(&lane_fragment(64_800, 75_600, 1), window, 50.0);

    assert!((g.left - 0.5).abs() < 1e-9);
    assert!((g.width - 0.25).abs() < 1e-9);
    assert_eq!(g.top, 50.0);
}

#[test]
fn row_height_scales_with_lanes() {
    let events = vec![
        event("a", 7, 9, 0, 3600),
        event("b", 7, 9, 10, 3600),
        event("c", 7, 9, 20, 3600),
    ];

    let layout = WeekLayout::build(&events, &utc_week(), OverlapPolicy::HalfOpen).unwrap();
    let saturday = &layout.days[5];

    assert_eq!(saturday.row_height(64.0), 192.0);
    let tops: Vec<f64> = saturday
        .placements(TimeWindow::FULL_DAY, 64.0)
        .map(|(_, g)| g.top)
        .collect();
    assert_eq!(tops, vec![0.0, 64.0, 128.0]);
}

//! WASM bindings for replay-calendar.
//!
//! Exposes week layout, day splitting, lane assignment and source record
//! normalization to JavaScript via `wasm-bindgen`. All complex types are
//! passed as JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p replay-calendar-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/replay-calendar-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/replay_calendar_wasm.wasm
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use replay_calendar::{
    assign_lanes_with, parse_duration, split_by_day, week_events, CalendarSettings, Event,
    Fragment, OverlapPolicy, StreamRecord, TimeWindow, VideoRecord, Week, WeekLayout,
    WeekStartDay,
};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

/// Input format for events passed from JavaScript.
#[derive(Deserialize)]
struct EventInput {
    id: String,
    #[serde(default)]
    user_id: String,
    created_at: String,
    duration_seconds: i64,
    #[serde(default)]
    is_live: bool,
}

#[derive(Serialize)]
struct WeekLayoutDto<'a> {
    #[serde(flatten)]
    layout: &'a WeekLayout,
    window: TimeWindow,
    hours: Vec<u32>,
    row_height: f64,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse an ISO 8601 datetime string into `DateTime<Utc>`.
///
/// Accepts RFC 3339 (e.g. "2026-03-02T09:00:00Z") and naive datetimes
/// (e.g. "2026-03-02T09:00:00"), which are interpreted as UTC.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>, JsValue> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .map_err(|e| JsValue::from_str(&format!("Invalid datetime '{}': {}", s, e)))
}

fn parse_events_json(json: &str) -> Result<Vec<Event>, JsValue> {
    let inputs: Vec<EventInput> = serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid events JSON: {}", e)))?;

    inputs
        .into_iter()
        .map(|input| {
            Ok(Event {
                id: input.id,
                user_id: input.user_id,
                created_at: parse_datetime(&input.created_at)?,
                duration_seconds: input.duration_seconds,
                is_live: input.is_live,
            })
        })
        .collect()
}

fn parse_week(first_day: &str, timezone: &str) -> Result<Week, JsValue> {
    let first_day = NaiveDate::parse_from_str(first_day, "%Y-%m-%d")
        .map_err(|e| JsValue::from_str(&format!("Invalid date '{}': {}", first_day, e)))?;
    let timezone: Tz = timezone
        .parse()
        .map_err(|_| JsValue::from_str(&format!("Invalid timezone: {}", timezone)))?;
    Ok(Week::new(first_day, timezone))
}

fn parse_settings(json: Option<String>) -> Result<CalendarSettings, JsValue> {
    match json {
        Some(json) => CalendarSettings::from_json(&json).map_err(to_js),
        None => Ok(CalendarSettings::default()),
    }
}

fn policy(inclusive: bool) -> OverlapPolicy {
    if inclusive {
        OverlapPolicy::Inclusive
    } else {
        OverlapPolicy::HalfOpen
    }
}

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Lay out the week containing `now`, moved by `week_offset` weeks.
///
/// Returns a JSON object with `first_day`, `timezone`, the seven `days` (each
/// with lane-annotated fragments and `lane_count`), the visible `window`,
/// its hour labels and the lane height.
///
/// # Arguments
/// - `events_json` -- JSON array of `{id, user_id?, created_at, duration_seconds, is_live?}`
/// - `settings_json` -- Optional settings object (locale, timezone, week_start,
///   overlap_policy, row_height); missing fields use defaults
/// - `now` -- Reference instant (e.g. "2026-03-05T12:00:00Z")
/// - `week_offset` -- Weeks relative to the one containing `now`
#[wasm_bindgen(js_name = "layoutWeek")]
pub fn layout_week(
    events_json: &str,
    settings_json: Option<String>,
    now: &str,
    week_offset: i32,
) -> Result<String, JsValue> {
    let settings = parse_settings(settings_json)?;
    let now = parse_datetime(now)?;
    let week = settings
        .week(now, i64::from(week_offset))
        .map_err(to_js)?;
    let events = parse_events_json(events_json)?;

    let layout = WeekLayout::build(&events, &week, settings.overlap_policy).map_err(to_js)?;
    let window = layout.visible_window();

    to_json(&WeekLayoutDto {
        layout: &layout,
        window,
        hours: window.hour_labels(),
        row_height: settings.row_height,
    })
}

/// Split events into the seven day buckets of the week starting on `first_day`.
///
/// Returns a JSON array of seven arrays of fragments.
///
/// # Arguments
/// - `events_json` -- JSON array of events
/// - `first_day` -- Local date of the first day (e.g. "2026-03-02")
/// - `timezone` -- IANA timezone (e.g. "Europe/Paris")
#[wasm_bindgen(js_name = "splitByDay")]
pub fn split_by_day_js(
    events_json: &str,
    first_day: &str,
    timezone: &str,
) -> Result<String, JsValue> {
    let week = parse_week(first_day, timezone)?;
    let events = parse_events_json(events_json)?;

    let buckets = split_by_day(&events, &week).map_err(to_js)?;
    to_json(&buckets)
}

/// Assign lanes to one day's fragments, in input order.
///
/// Returns a JSON object `{fragments, lane_count}` where each fragment carries
/// its `lane_index`.
///
/// # Arguments
/// - `fragments_json` -- JSON array of `{id, start_in_seconds, end_in_seconds, ...}`
/// - `inclusive` -- Treat touching fragments as overlapping
#[wasm_bindgen(js_name = "assignLanes")]
pub fn assign_lanes_js(fragments_json: &str, inclusive: bool) -> Result<String, JsValue> {
    let fragments: Vec<Fragment> = serde_json::from_str(fragments_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid fragments JSON: {}", e)))?;

    let day = assign_lanes_with(&fragments, policy(inclusive)).map_err(to_js)?;
    to_json(&day)
}

/// Convert platform video and live stream records into the events of the
/// week containing `now`, moved by `week_offset` weeks.
///
/// Videos that are not archives or whose recording is still processing are
/// dropped. Live streams are only kept when the selected week is the current
/// one, with a duration of `now - started_at`.
///
/// # Arguments
/// - `videos_json` -- JSON array of video records
/// - `streams_json` -- Optional JSON array of `{id, user_id, started_at}`
/// - `now` -- Reference instant for the current week and live durations
/// - `settings_json` -- Optional settings object selecting timezone and week start
/// - `week_offset` -- Weeks relative to the one containing `now`
#[wasm_bindgen(js_name = "toEvents")]
pub fn to_events(
    videos_json: &str,
    streams_json: Option<String>,
    now: &str,
    settings_json: Option<String>,
    week_offset: i32,
) -> Result<String, JsValue> {
    let settings = parse_settings(settings_json)?;
    let now = parse_datetime(now)?;
    let week = settings
        .week(now, i64::from(week_offset))
        .map_err(to_js)?;

    let videos: Vec<VideoRecord> = serde_json::from_str(videos_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid videos JSON: {}", e)))?;
    let streams: Vec<StreamRecord> = match streams_json {
        Some(json) => serde_json::from_str(&json)
            .map_err(|e| JsValue::from_str(&format!("Invalid streams JSON: {}", e)))?,
        None => Vec::new(),
    };

    let events = week_events(videos, &streams, &week, now).map_err(to_js)?;
    to_json(&events)
}

/// Parse a platform duration string such as "1h2m3s" into seconds.
#[wasm_bindgen(js_name = "parseDuration")]
pub fn parse_duration_js(duration: &str) -> Result<f64, JsValue> {
    parse_duration(duration)
        .map(|seconds| seconds as f64)
        .map_err(to_js)
}

/// First day of the week for a locale tag: "monday" or "sunday".
#[wasm_bindgen(js_name = "weekStartForLocale")]
pub fn week_start_for_locale(locale: &str) -> String {
    match WeekStartDay::from_locale(locale) {
        WeekStartDay::Monday => "monday".to_string(),
        WeekStartDay::Sunday => "sunday".to_string(),
    }
}

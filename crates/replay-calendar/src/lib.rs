//! # replay-calendar
//!
//! Deterministic timeline layout for a weekly calendar of videos and live
//! streams from followed channels.
//!
//! Events anchored to absolute instants are split into the seven local days
//! of the displayed week, then each day's fragments are packed into lanes so
//! that overlapping fragments never share a row. Everything here is pure:
//! no I/O, no shared state, inputs are never mutated.
//!
//! ## Modules
//!
//! - [`event`] — Event, fragment and lane-annotated fragment records
//! - [`week`] — Week boundaries in a configured timezone, week start by locale
//! - [`splitter`] — Events → seven day buckets of day-relative fragments
//! - [`lanes`] — Greedy first-fit lane assignment for one day
//! - [`layout`] — Full week pipeline plus render geometry
//! - [`source`] — Platform video/stream records → events
//! - [`roster`] — Caller-owned channel cache with recoverable misses
//! - [`settings`] — Locale, timezone and layout settings
//! - [`error`] — Error types

pub mod error;
pub mod event;
pub mod lanes;
pub mod layout;
pub mod roster;
pub mod settings;
pub mod source;
pub mod splitter;
pub mod week;

pub use error::{CalendarError, Result};
pub use event::{Event, Fragment, LaneFragment, DAYS_IN_WEEK, SECONDS_IN_DAY};
pub use lanes::{assign_lanes, assign_lanes_with, reassign_lanes, DayLanes, OverlapPolicy};
pub use layout::{geometry, DayLayout, Geometry, TimeWindow, WeekLayout};
pub use roster::{Channel, Roster};
pub use settings::CalendarSettings;
pub use source::{parse_duration, week_events, StreamRecord, VideoKind, VideoRecord};
pub use splitter::{split_by_day, DayBuckets};
pub use week::{Week, WeekStartDay};

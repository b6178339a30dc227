//! Week layout: the full pipeline from raw events to positioned fragments.
//!
//! Splits events into day buckets, sorts each bucket by start, assigns lanes
//! per day, and exposes the geometry a renderer needs (horizontal position as
//! a fraction of the visible window, vertical position in row units).

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::event::{Event, LaneFragment, SECONDS_IN_DAY};
use crate::lanes::{assign_lanes_with, OverlapPolicy};
use crate::splitter::split_by_day;
use crate::week::Week;

const SECONDS_IN_HOUR: i64 = 3_600;

/// A range of day-relative seconds shown on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: i64,
    pub end: i64,
}

impl TimeWindow {
    pub const FULL_DAY: TimeWindow = TimeWindow {
        start: 0,
        end: SECONDS_IN_DAY,
    };

    pub fn len(&self) -> i64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 0
    }

    /// Hour labels for the time ruler, wrapping past midnight.
    pub fn hour_labels(&self) -> Vec<u32> {
        let first = self.start.div_euclid(SECONDS_IN_HOUR);
        let last = self.end.div_euclid(SECONDS_IN_HOUR);

        (first..=last)
            .map(|hour| hour.rem_euclid(24) as u32)
            .collect()
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        TimeWindow::FULL_DAY
    }
}

/// Where a fragment is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Offset from the window start, as a fraction of the window.
    pub left: f64,
    /// Visible length, as a fraction of the window.
    pub width: f64,
    /// Offset from the top of the day row, in the unit of `row_unit`.
    pub top: f64,
    pub height: f64,
}

/// Compute the geometry of `fragment` within `window`.
///
/// The fragment is clamped to the window, so a tail that continues into the
/// next day ends at the right edge.
pub fn geometry(fragment: &LaneFragment, window: TimeWindow, row_unit: f64) -> Geometry {
    let span = window.len().max(1) as f64;
    let start = fragment
        .fragment
        .start_in_seconds
        .clamp(window.start, window.end);
    let end = fragment
        .fragment
        .end_in_seconds
        .clamp(window.start, window.end);

    Geometry {
        left: (start - window.start) as f64 / span,
        width: (end - start) as f64 / span,
        top: fragment.lane_index as f64 * row_unit,
        height: row_unit,
    }
}

/// One day row of the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayLayout {
    /// Position in the week (0 = first day).
    pub index: usize,
    pub date: NaiveDate,
    /// Fragments sorted by start, with lanes.
    pub fragments: Vec<LaneFragment>,
    pub lane_count: usize,
}

impl DayLayout {
    pub fn row_height(&self, row_unit: f64) -> f64 {
        self.lane_count as f64 * row_unit
    }

    pub fn placements(
        &self,
        window: TimeWindow,
        row_unit: f64,
    ) -> impl Iterator<Item = (&LaneFragment, Geometry)> + '_ {
        self.fragments
            .iter()
            .map(move |fragment| (fragment, geometry(fragment, window, row_unit)))
    }
}

/// The seven laid-out days of a week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekLayout {
    pub first_day: NaiveDate,
    pub timezone: Tz,
    pub days: Vec<DayLayout>,
}

impl WeekLayout {
    /// Lay out `events` over `week`.
    ///
    /// Each day bucket is stable-sorted by `start_in_seconds` before lanes are
    /// assigned, so events starting together keep their input order.
    ///
    /// # Errors
    /// Returns `CalendarError::InvalidEvent` for the first malformed event.
    pub fn build(events: &[Event], week: &Week, policy: OverlapPolicy) -> Result<Self> {
        let buckets = split_by_day(events, week)?;

        let days = buckets
            .into_iter()
            .enumerate()
            .map(|(index, mut bucket)| {
                bucket.sort_by_key(|f| f.start_in_seconds);
                let lanes = assign_lanes_with(&bucket, policy)?;

                tracing::debug!(
                    day = index,
                    fragments = lanes.fragments.len(),
                    lanes = lanes.lane_count,
                    "laid out day"
                );

                Ok(DayLayout {
                    index,
                    date: week.day(index),
                    fragments: lanes.fragments,
                    lane_count: lanes.lane_count,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            first_day = %week.first_day(),
            timezone = %week.timezone(),
            events = events.len(),
            "built week layout"
        );

        Ok(Self {
            first_day: week.first_day(),
            timezone: week.timezone(),
            days,
        })
    }

    /// The window worth displaying: from the hour of the earliest fragment
    /// start in the week to the end of the day.
    pub fn visible_window(&self) -> TimeWindow {
        let earliest = self
            .days
            .iter()
            .flat_map(|day| day.fragments.iter())
            .map(|f| f.fragment.start_in_seconds)
            .min();

        match earliest {
            Some(start) => {
                let start = start.clamp(0, SECONDS_IN_DAY);
                TimeWindow {
                    start: start - start % SECONDS_IN_HOUR,
                    end: SECONDS_IN_DAY,
                }
            }
            None => TimeWindow::FULL_DAY,
        }
    }

    pub fn fragment_count(&self) -> usize {
        self.days.iter().map(|day| day.fragments.len()).sum()
    }
}

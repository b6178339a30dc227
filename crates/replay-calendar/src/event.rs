//! Event and fragment records flowing through the layout pipeline.
//!
//! An [`Event`] is anchored to an absolute instant. The day splitter turns it
//! into one or more day-relative [`Fragment`]s, and the lane assigner wraps
//! each fragment in a [`LaneFragment`].

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CalendarError, Result};

/// Number of seconds in one calendar day of the timeline.
pub const SECONDS_IN_DAY: i64 = 86_400;

/// Number of day buckets in a week.
pub const DAYS_IN_WEEK: usize = 7;

/// A video or live stream from a followed channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Opaque identifier, shared by every fragment derived from this event.
    pub id: String,
    /// Channel that published the event.
    #[serde(default)]
    pub user_id: String,
    /// Start instant.
    pub created_at: DateTime<Utc>,
    /// Length in seconds. For live streams this is `now - created_at`,
    /// recomputed by the caller on every read.
    pub duration_seconds: i64,
    #[serde(default)]
    pub is_live: bool,
}

impl Event {
    /// A completed recording.
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        created_at: DateTime<Utc>,
        duration_seconds: i64,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            created_at,
            duration_seconds,
            is_live: false,
        }
    }

    /// Check the input contract: non-negative duration and a representable end.
    pub fn validate(&self) -> Result<()> {
        self.end().map(|_| ())
    }

    /// End instant (`created_at + duration_seconds`).
    ///
    /// # Errors
    /// Returns `CalendarError::InvalidEvent` when the duration is negative or
    /// the end instant overflows.
    pub fn end(&self) -> Result<DateTime<Utc>> {
        if self.duration_seconds < 0 {
            return Err(CalendarError::invalid_event(
                &self.id,
                "duration_seconds",
                format!("must be non-negative, got {}", self.duration_seconds),
            ));
        }

        TimeDelta::try_seconds(self.duration_seconds)
            .and_then(|delta| self.created_at.checked_add_signed(delta))
            .ok_or_else(|| {
                CalendarError::invalid_event(
                    &self.id,
                    "duration_seconds",
                    format!("{} overflows the end instant", self.duration_seconds),
                )
            })
    }
}

/// A day-scoped slice of an [`Event`], in seconds relative to local midnight
/// of the day bucket that holds it.
///
/// `start_in_seconds` is always below [`SECONDS_IN_DAY`] once pushed into a
/// bucket, and is 0 for continuation slices. `end_in_seconds` is left
/// unclamped and may exceed [`SECONDS_IN_DAY`] when the tail continues into
/// the next bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub start_in_seconds: i64,
    pub end_in_seconds: i64,
    /// `false` only for the slice holding the event's true start.
    #[serde(default)]
    pub is_fragment_copy: bool,
    #[serde(default)]
    pub is_live: bool,
}

impl Fragment {
    pub fn new(id: impl Into<String>, start_in_seconds: i64, end_in_seconds: i64) -> Self {
        Self {
            id: id.into(),
            user_id: String::new(),
            start_in_seconds,
            end_in_seconds,
            is_fragment_copy: false,
            is_live: false,
        }
    }

    pub fn duration_seconds(&self) -> i64 {
        self.end_in_seconds - self.start_in_seconds
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.end_in_seconds < self.start_in_seconds {
            return Err(CalendarError::invalid_event(
                &self.id,
                "end_in_seconds",
                format!(
                    "{} is before start_in_seconds {}",
                    self.end_in_seconds, self.start_in_seconds
                ),
            ));
        }
        Ok(())
    }
}

/// A fragment with its assigned lane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneFragment {
    #[serde(flatten)]
    pub fragment: Fragment,
    pub lane_index: usize,
}

impl LaneFragment {
    /// Lane 0 is rendered as the primary lane.
    pub fn is_primary(&self) -> bool {
        self.lane_index == 0
    }
}

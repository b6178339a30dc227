//! Normalization of streaming-platform records into [`Event`]s.
//!
//! The network layer hands over raw video and stream records; this module
//! decides which of them become events and computes their durations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CalendarError, Result};
use crate::event::Event;
use crate::week::Week;

/// Thumbnail marker the platform uses while a recording is still processing.
const PROCESSING_THUMBNAIL: &str = "404_processing_";

/// Kind of a video as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoKind {
    Upload,
    Archive,
    Highlight,
}

/// A video record as returned by the platform API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    /// Platform duration string, e.g. `"3h2m1s"`.
    pub duration: String,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(rename = "type")]
    pub kind: VideoKind,
}

impl VideoRecord {
    /// Convert into an event.
    ///
    /// Returns `Ok(None)` for records that should not appear on the calendar:
    /// non-archive videos and recordings whose thumbnail is missing or still
    /// a processing placeholder.
    ///
    /// # Errors
    /// Returns `CalendarError::InvalidDuration` when the duration string is
    /// malformed.
    pub fn into_event(self) -> Result<Option<Event>> {
        if self.kind != VideoKind::Archive
            || self.thumbnail_url.is_empty()
            || self.thumbnail_url.contains(PROCESSING_THUMBNAIL)
        {
            return Ok(None);
        }

        let duration_seconds = parse_duration(&self.duration)?;

        Ok(Some(Event {
            id: self.id,
            user_id: self.user_id,
            created_at: self.created_at,
            duration_seconds,
            is_live: false,
        }))
    }
}

/// A live stream record as returned by the platform API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamRecord {
    pub id: String,
    pub user_id: String,
    pub started_at: DateTime<Utc>,
}

impl StreamRecord {
    /// Convert into a live event whose duration runs up to `now`.
    ///
    /// A start reported slightly in the future (clock skew) yields a zero
    /// duration.
    pub fn to_event(&self, now: DateTime<Utc>) -> Event {
        Event {
            id: self.id.clone(),
            user_id: self.user_id.clone(),
            created_at: self.started_at,
            duration_seconds: (now - self.started_at).num_seconds().max(0),
            is_live: true,
        }
    }
}

/// Events to display for `week`: the archived videos, plus the live streams
/// when `week` is the one containing `now`.
///
/// # Errors
/// Returns `CalendarError::InvalidDuration` for the first malformed video
/// duration.
pub fn week_events(
    videos: Vec<VideoRecord>,
    streams: &[StreamRecord],
    week: &Week,
    now: DateTime<Utc>,
) -> Result<Vec<Event>> {
    let mut events = Vec::with_capacity(videos.len() + streams.len());
    for video in videos {
        if let Some(event) = video.into_event()? {
            events.push(event);
        }
    }

    if week.contains(now) {
        events.extend(streams.iter().map(|stream| stream.to_event(now)));
    } else if !streams.is_empty() {
        tracing::debug!(
            first_day = %week.first_day(),
            streams = streams.len(),
            "skipping live streams outside the current week"
        );
    }

    Ok(events)
}

/// Parse a platform duration such as `"1h2m3s"`, `"45m0s"` or `"12s"` into
/// seconds.
///
/// Each of `h`, `m` and `s` may appear at most once and in that order.
///
/// # Errors
/// Returns `CalendarError::InvalidDuration` for empty input, unknown units,
/// units out of order, dangling digits, or overflow.
pub fn parse_duration(duration: &str) -> Result<i64> {
    let invalid = || CalendarError::InvalidDuration(duration.to_string());

    if duration.is_empty() {
        return Err(invalid());
    }

    let mut total: i64 = 0;
    let mut digits = String::new();
    // Index into "hms" of the last unit seen; units must strictly advance.
    let mut last_unit: Option<usize> = None;

    for c in duration.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }

        let unit = ['h', 'm', 's'].iter().position(|&u| u == c).ok_or_else(invalid)?;
        if last_unit.is_some_and(|last| unit <= last) || digits.is_empty() {
            return Err(invalid());
        }

        let value: i64 = digits.parse().map_err(|_| invalid())?;
        let factor = [3_600, 60, 1][unit];
        total = value
            .checked_mul(factor)
            .and_then(|seconds| total.checked_add(seconds))
            .ok_or_else(invalid)?;

        digits.clear();
        last_unit = Some(unit);
    }

    if !digits.is_empty() {
        return Err(invalid());
    }

    Ok(total)
}

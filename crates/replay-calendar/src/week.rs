//! Week boundaries in a configured timezone.
//!
//! A [`Week`] is identified by the local date of its first day. Its seven day
//! windows start at local midnight; all day-relative arithmetic in the
//! splitter is done on wall-clock time in the week's timezone.

use chrono::{
    DateTime, Datelike, Days, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc, Weekday,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::event::{Event, DAYS_IN_WEEK};

/// Regions whose calendars conventionally start the week on Sunday.
const SUNDAY_FIRST_REGIONS: &[&str] = &[
    "US", "CA", "MX", "BR", "JP", "KR", "TW", "HK", "IL", "PH", "IN", "ZA",
];

/// First day of the displayed week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStartDay {
    #[default]
    Monday,
    Sunday,
}

impl WeekStartDay {
    /// Derive the week start from a BCP 47 locale tag such as `fr-FR` or `en_US`.
    ///
    /// Tags without a region fall back to Monday.
    pub fn from_locale(locale: &str) -> Self {
        let region = locale
            .split(['-', '_'])
            .skip(1)
            .find(|part| part.len() == 2 && part.chars().all(|c| c.is_ascii_alphabetic()));

        match region {
            Some(region)
                if SUNDAY_FIRST_REGIONS
                    .iter()
                    .any(|r| r.eq_ignore_ascii_case(region)) =>
            {
                WeekStartDay::Sunday
            }
            _ => WeekStartDay::Monday,
        }
    }

    pub fn weekday(self) -> Weekday {
        match self {
            WeekStartDay::Monday => Weekday::Mon,
            WeekStartDay::Sunday => Weekday::Sun,
        }
    }
}

/// The 7-day window currently displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Week {
    first_day: NaiveDate,
    timezone: Tz,
}

impl Week {
    pub fn new(first_day: NaiveDate, timezone: Tz) -> Self {
        Self {
            first_day,
            timezone,
        }
    }

    /// The week that contains `instant` when viewed in `timezone`.
    pub fn containing(instant: DateTime<Utc>, timezone: Tz, start: WeekStartDay) -> Self {
        let local = instant.with_timezone(&timezone).date_naive();
        let back = (7 + local.weekday().num_days_from_monday()
            - start.weekday().num_days_from_monday())
            % 7;

        Self {
            first_day: local - Days::new(u64::from(back)),
            timezone,
        }
    }

    /// Move by `weeks` whole weeks (negative goes back). `None` on date overflow.
    pub fn offset(&self, weeks: i64) -> Option<Self> {
        let first_day = TimeDelta::try_weeks(weeks)
            .and_then(|delta| self.first_day.checked_add_signed(delta))?;

        Some(Self {
            first_day,
            timezone: self.timezone,
        })
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Local date of day `index` (0 = first day of the week).
    pub fn day(&self, index: usize) -> NaiveDate {
        self.first_day + Days::new(index as u64)
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..DAYS_IN_WEEK).map(|index| self.day(index))
    }

    /// Local midnight of the first day, as a UTC instant.
    pub fn start_instant(&self) -> DateTime<Utc> {
        local_midnight(self.timezone, self.first_day)
    }

    /// Local midnight following the last day, as a UTC instant.
    pub fn end_instant(&self) -> DateTime<Utc> {
        local_midnight(self.timezone, self.day(DAYS_IN_WEEK))
    }

    /// Whether `instant` falls inside the week. [`crate::source::week_events`]
    /// uses it to merge live streams only into the week containing "now".
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start_instant() <= instant && instant < self.end_instant()
    }

    /// Whether any part of `event` falls inside the week.
    ///
    /// Half-open on both sides: an event ending exactly at the week start does
    /// not intersect. A zero-length event intersects when its instant is inside.
    ///
    /// # Errors
    /// Propagates `CalendarError::InvalidEvent` from [`Event::end`].
    pub fn intersects(&self, event: &Event) -> Result<bool> {
        let end = event.end()?;
        let week_start = self.start_instant();
        let week_end = self.end_instant();

        if event.duration_seconds == 0 {
            return Ok(week_start <= event.created_at && event.created_at < week_end);
        }

        Ok(event.created_at < week_end && end > week_start)
    }
}

/// Resolve local midnight of `date` in `tz`.
///
/// A midnight inside a DST gap resolves to the first valid quarter hour after it.
fn local_midnight(tz: Tz, date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);

    (0..=16)
        .map(|step| midnight + TimeDelta::minutes(15 * step))
        .find_map(|local| tz.from_local_datetime(&local).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| midnight.and_utc())
}

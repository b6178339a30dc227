//! Day splitting: events anchored to absolute instants -> seven day buckets of
//! day-relative fragments.
//!
//! Events crossing local midnight are cut into one fragment per day touched.
//! Every slice after the first starts at local midnight (second 0) of its day
//! and keeps the event's remaining end, unclamped. Events that began in an
//! earlier week enter the first bucket as such a continuation slice.
//!
//! Both ends are read on the wall clock of the week's timezone, so a slice
//! crossing a DST change ends at the local time the event actually ends.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};

use crate::error::Result;
use crate::event::{Event, Fragment, DAYS_IN_WEEK, SECONDS_IN_DAY};
use crate::week::Week;

/// One bucket of fragments per day of the week, in week order.
pub type DayBuckets = [Vec<Fragment>; DAYS_IN_WEEK];

/// Split `events` into the seven day buckets of `week`.
///
/// Events that do not intersect the week are skipped. Bucket contents follow
/// input order; sort them before lane assignment.
///
/// # Errors
/// Returns `CalendarError::InvalidEvent` for the first event with a negative
/// or overflowing duration.
pub fn split_by_day(events: &[Event], week: &Week) -> Result<DayBuckets> {
    let mut buckets: DayBuckets = Default::default();

    for event in events {
        let end = event.end()?;

        if !week.intersects(event)? {
            continue;
        }

        split_event(event, end, week, &mut buckets);
    }

    Ok(buckets)
}

fn split_event(
    event: &Event,
    end_instant: DateTime<Utc>,
    week: &Week,
    buckets: &mut DayBuckets,
) {
    let tz = week.timezone();
    let local = event.created_at.with_timezone(&tz).naive_local();
    let end_local = end_instant.with_timezone(&tz).naive_local();

    let mut weekday = (local.date() - week.first_day()).num_days();
    let mut start = i64::from(local.time().num_seconds_from_midnight());
    let mut end = seconds_since_midnight(local.date(), end_local);
    let mut is_fragment_copy = false;

    if weekday < 0 {
        // Started in an earlier week: only the tail from the week start is visible.
        start = 0;
        end = seconds_since_midnight(week.first_day(), end_local);
        weekday = 0;
        is_fragment_copy = true;
    }

    // A repeated hour when clocks fall back can put the local end before the start.
    end = end.max(start);

    let mut fragment = Fragment {
        id: event.id.clone(),
        user_id: event.user_id.clone(),
        start_in_seconds: start,
        end_in_seconds: end,
        is_fragment_copy,
        is_live: event.is_live,
    };

    push(buckets, weekday, &fragment);

    // At most one iteration per remaining bucket.
    while fragment.end_in_seconds > SECONDS_IN_DAY && weekday < DAYS_IN_WEEK as i64 {
        fragment.start_in_seconds = 0;
        fragment.end_in_seconds -= SECONDS_IN_DAY;
        fragment.is_fragment_copy = true;
        weekday += 1;

        push(buckets, weekday, &fragment);
    }
}

/// Wall-clock seconds from local midnight of `day` to `local`.
fn seconds_since_midnight(day: NaiveDate, local: NaiveDateTime) -> i64 {
    (local - day.and_time(NaiveTime::MIN)).num_seconds()
}

fn push(buckets: &mut DayBuckets, weekday: i64, fragment: &Fragment) {
    let Ok(index) = usize::try_from(weekday) else {
        return;
    };

    if index < DAYS_IN_WEEK && fragment.start_in_seconds < SECONDS_IN_DAY {
        buckets[index].push(fragment.clone());
    }
}

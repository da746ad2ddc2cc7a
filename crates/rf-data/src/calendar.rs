//! iCalendar feeds to schedules.

use chrono::{DateTime, FixedOffset, TimeZone};
use chrono_tz::Tz;
use icalendar::{
    Calendar, CalendarComponent, CalendarDateTime, Component, DatePerhapsTime, Event, EventLike,
};
use rayon::prelude::*;
use rf_core::{Catalog, Interval, Schedule};

use crate::DataError;

/// Raw calendar contents of one schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feed {
    pub schedule_id: String,
    pub contents: String,
}

/// Parses a calendar into a schedule.
///
/// Each event with a summary and date-time bounds becomes one course. Other
/// events (all-day entries, missing fields, unknown zones, empty ranges) are
/// skipped. Floating times are read in `floating`.
pub fn parse_calendar(
    schedule_id: &str,
    text: &str,
    floating: Tz,
) -> Result<Schedule, DataError> {
    let invalid = |message: String| DataError::InvalidCalendar {
        schedule_id: schedule_id.to_string(),
        message,
    };

    if !text
        .trim_start_matches('\u{feff}')
        .trim_start()
        .starts_with("BEGIN:VCALENDAR")
    {
        return Err(invalid("missing BEGIN:VCALENDAR".to_string()));
    }
    let calendar = text
        .parse::<Calendar>()
        .map_err(|e| invalid(e.to_string()))?;

    let mut skipped = 0_usize;
    let intervals: Vec<Interval> = calendar
        .components
        .iter()
        .filter_map(|component| match component {
            CalendarComponent::Event(event) => Some(event),
            _ => None,
        })
        .filter_map(|event| {
            let interval = to_interval(event, floating);
            if interval.is_none() {
                skipped += 1;
            }
            interval
        })
        .collect();

    if skipped > 0 {
        tracing::debug!(schedule_id, skipped, "skipped malformed events");
    }
    Ok(Schedule::new(intervals))
}

fn to_interval(event: &Event, floating: Tz) -> Option<Interval> {
    let label = event.get_summary()?;
    let start = resolve(event.get_start()?, floating)?;
    let end = resolve(event.get_end()?, floating)?;
    Interval::new(label, start, end).ok()
}

fn resolve(value: DatePerhapsTime, floating: Tz) -> Option<DateTime<FixedOffset>> {
    match value {
        DatePerhapsTime::DateTime(CalendarDateTime::Utc(date_time)) => {
            Some(date_time.fixed_offset())
        }
        DatePerhapsTime::DateTime(CalendarDateTime::Floating(naive)) => floating
            .from_local_datetime(&naive)
            .earliest()
            .map(|date_time| date_time.fixed_offset()),
        DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, tzid }) => {
            let zone: Tz = tzid.parse().ok()?;
            zone.from_local_datetime(&date_time)
                .earliest()
                .map(|date_time| date_time.fixed_offset())
        }
        DatePerhapsTime::Date(_) => None,
    }
}

/// Parses feeds in parallel and installs each schedule on its classrooms.
///
/// Feeds that fail to parse are logged and leave their classrooms as they
/// were. Returns how many schedules were installed.
pub fn install_feeds(catalog: &Catalog, feeds: &[Feed], floating: Tz) -> usize {
    let parsed: Vec<_> = feeds
        .par_iter()
        .map(|feed| {
            (
                feed.schedule_id.as_str(),
                parse_calendar(&feed.schedule_id, &feed.contents, floating),
            )
        })
        .collect();

    let mut installed = 0;
    for (schedule_id, result) in parsed {
        match result {
            Ok(schedule) => {
                tracing::debug!(schedule_id, courses = schedule.len(), "loaded schedule");
                catalog.install_schedule(schedule_id, schedule);
                installed += 1;
            }
            Err(e) => tracing::warn!(schedule_id, error = %e, "skipping unreadable schedule"),
        }
    }
    installed
}

//! Point-in-time availability queries over a classroom's courses.
//!
//! A [`Schedule`] owns the courses of one classroom sorted by start. The
//! lookups rely only on that ordering: overlapping courses are allowed, and
//! a scan stops at the first course starting after the query instant since
//! no later course can contain it.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};

use crate::interval::Interval;

/// Availability reported when no course is scheduled after the query instant.
///
/// This is a marker for "no upcoming limit", not a real bound. Callers that
/// need to tell the two apart should check [`Schedule::next_interval`].
pub const INDEFINITE_AVAILABILITY: TimeDelta = TimeDelta::days(365);

/// Outcome of scanning for the course that contains an instant.
enum Scan<'a> {
    /// A course contains the instant.
    Inside(&'a Interval),
    /// The scan reached a course starting after the instant.
    Passed,
    /// No course starts after the instant.
    Exhausted,
}

/// Sorted, immutable course list of one classroom.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    intervals: Vec<Interval>,
}

impl Schedule {
    /// Builds a schedule, sorting courses by start.
    ///
    /// The sort is stable so courses sharing a start keep their load order.
    pub fn new(mut intervals: Vec<Interval>) -> Self {
        intervals.sort_by_key(Interval::start_utc);
        Self { intervals }
    }

    pub const fn empty() -> Self {
        Self {
            intervals: Vec::new(),
        }
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    fn scan(&self, at: DateTime<Utc>) -> Scan<'_> {
        for interval in &self.intervals {
            if interval.contains(at) {
                return Scan::Inside(interval);
            }
            if at < interval.start_utc() {
                return Scan::Passed;
            }
        }
        Scan::Exhausted
    }

    /// Whether no course is running at `at`.
    pub fn is_available<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> bool {
        !matches!(self.scan(at.with_timezone(&Utc)), Scan::Inside(_))
    }

    /// The course running at `at`, if any.
    pub fn current_interval<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> Option<&Interval> {
        match self.scan(at.with_timezone(&Utc)) {
            Scan::Inside(interval) => Some(interval),
            Scan::Passed | Scan::Exhausted => None,
        }
    }

    /// The first course starting strictly after `at`.
    pub fn next_interval<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> Option<&Interval> {
        let at = at.with_timezone(&Utc);
        self.intervals
            .iter()
            .find(|interval| at < interval.start_utc())
    }

    /// Time left before the next course.
    ///
    /// Assumes the classroom is available at `at`; this is not re-checked.
    /// Returns [`INDEFINITE_AVAILABILITY`] when no course follows.
    pub fn available_duration<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> TimeDelta {
        let at = at.with_timezone(&Utc);
        self.next_interval(&at)
            .map_or(INDEFINITE_AVAILABILITY, |next| next.start_utc() - at)
    }

    /// Time left before the running course ends.
    ///
    /// Assumes the classroom is unavailable at `at`; returns zero otherwise.
    pub fn unavailable_duration<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> TimeDelta {
        let at = at.with_timezone(&Utc);
        self.current_interval(&at)
            .map_or(TimeDelta::zero(), |current| current.end_utc() - at)
    }
}

impl FromIterator<Interval> for Schedule {
    fn from_iter<I: IntoIterator<Item = Interval>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

//! Scheduled course occurrences.

use std::fmt;

use chrono::{DateTime, FixedOffset, TimeDelta, TimeZone, Utc};
use serde::Serialize;
use thiserror::Error;

/// Reasons an interval cannot be constructed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IntervalError {
    /// The label was empty.
    #[error("interval label cannot be empty")]
    EmptyLabel,

    /// The interval does not move forward in time.
    #[error("interval '{label}' ends at {end} which is not after its start {start}")]
    NotIncreasing {
        label: String,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    },
}

/// One scheduled occupation of a classroom, covering `[start, end)`.
///
/// Bounds keep the offset they were loaded with so they can be displayed in
/// their original zone; every comparison goes through UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interval {
    label: String,
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
}

impl Interval {
    /// Creates an interval, rejecting empty labels and `end <= start`.
    pub fn new<Tz: TimeZone>(
        label: impl Into<String>,
        start: DateTime<Tz>,
        end: DateTime<Tz>,
    ) -> Result<Self, IntervalError> {
        let label = label.into();
        if label.is_empty() {
            return Err(IntervalError::EmptyLabel);
        }

        let start = start.fixed_offset();
        let end = end.fixed_offset();
        if end <= start {
            return Err(IntervalError::NotIncreasing { label, start, end });
        }

        Ok(Self { label, start, end })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Start bound in its original offset.
    pub const fn start(&self) -> DateTime<FixedOffset> {
        self.start
    }

    /// End bound in its original offset.
    pub const fn end(&self) -> DateTime<FixedOffset> {
        self.end
    }

    pub fn start_utc(&self) -> DateTime<Utc> {
        self.start.with_timezone(&Utc)
    }

    pub fn end_utc(&self) -> DateTime<Utc> {
        self.end.with_timezone(&Utc)
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Whether `at` falls inside `[start, end)`.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start_utc() <= at && at < self.end_utc()
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} - {}",
            self.label,
            self.start.format("%d/%m/%Y %Hh%M"),
            self.end.format("%Hh%M")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paris() -> FixedOffset {
        FixedOffset::east_opt(3600).unwrap()
    }

    #[test]
    fn new_rejects_empty_label() {
        let start = Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
        assert_eq!(Interval::new("", start, end), Err(IntervalError::EmptyLabel));
    }

    #[test]
    fn new_rejects_end_not_after_start() {
        let start = Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap();
        let result = Interval::new("Math", start, start);
        assert!(matches!(result, Err(IntervalError::NotIncreasing { .. })));
    }

    #[test]
    fn contains_is_inclusive_at_start_and_exclusive_at_end() {
        let start = paris().with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
        let end = paris().with_ymd_and_hms(2025, 3, 10, 10, 0, 0).unwrap();
        let interval = Interval::new("Math", start, end).unwrap();

        assert!(interval.contains(Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap()));
        assert!(interval.contains(Utc.with_ymd_and_hms(2025, 3, 10, 8, 59, 59).unwrap()));
        assert!(!interval.contains(Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap()));
        assert!(!interval.contains(Utc.with_ymd_and_hms(2025, 3, 10, 7, 59, 59).unwrap()));
    }

    #[test]
    fn display_uses_original_offset() {
        let start = paris().with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
        let end = paris().with_ymd_and_hms(2025, 3, 10, 10, 30, 0).unwrap();
        let interval = Interval::new("Physics", start, end).unwrap();

        assert_eq!(interval.to_string(), "Physics | 10/03/2025 09h00 - 10h30");
        assert_eq!(interval.duration(), TimeDelta::minutes(90));
    }
}

//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::Context;
use chrono::{DateTime, NaiveDateTime, TimeDelta, TimeZone};
use regex::Regex;
use rf_core::Interval;

/// Input and display format of query dates, e.g. `10/03/2025 09h30`.
pub const DATETIME_FORMAT: &str = "%d/%m/%Y %Hh%M";

/// Pre-compiled regex for `1d2h3m4s` durations; every part is optional.
static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?P<days>[.\d]+?)d)?(?:(?P<hours>[.\d]+?)h)?(?:(?P<minutes>[.\d]+?)m)?(?:(?P<seconds>[.\d]+?)s)?$",
    )
    .unwrap()
});

/// Parse a date such as `10/03/2025 09h30`, without zone.
pub fn parse_datetime(s: &str) -> anyhow::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), DATETIME_FORMAT).map_err(|_| {
        anyhow::anyhow!(
            "Unable to parse a datetime from '{s}'. Example of valid datetime: '01/01/1970 08h00'."
        )
    })
}

/// Parse a duration such as `4h`, `5m34s` or `1.5d`.
pub fn parse_duration(s: &str) -> anyhow::Result<TimeDelta> {
    let invalid = || {
        anyhow::anyhow!(
            "Unable to parse a duration from '{s}'. Examples of valid durations: '4h', '5m34s', '10d8h5m20s'."
        )
    };

    let caps = DURATION_RE.captures(s.trim()).ok_or_else(invalid)?;
    let mut seconds = 0.0_f64;
    let mut matched = false;
    for (unit, unit_seconds) in [("days", 86_400.0), ("hours", 3_600.0), ("minutes", 60.0), ("seconds", 1.0)] {
        if let Some(value) = caps.name(unit) {
            let value: f64 = value
                .as_str()
                .parse()
                .with_context(invalid)?;
            seconds += value * unit_seconds;
            matched = true;
        }
    }
    if !matched {
        return Err(invalid());
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "durations are bounded by the millisecond range checked below"
    )]
    let millis = (seconds * 1000.0).round() as i64;
    TimeDelta::try_milliseconds(millis).ok_or_else(invalid)
}

/// Formats a duration as `1 day, 2 hours, 5 minutes`.
///
/// Seconds are dropped; anything under a minute reads `less than a minute`.
pub fn format_duration(duration: TimeDelta) -> String {
    let mut seconds = duration.num_seconds();
    let mut parts = Vec::new();
    for (name, period) in [("day", 86_400), ("hour", 3_600), ("minute", 60)] {
        if seconds >= period {
            let count = seconds / period;
            seconds %= period;
            let plural = if count > 1 { "s" } else { "" };
            parts.push(format!("{count} {name}{plural}"));
        }
    }

    if parts.is_empty() {
        "less than a minute".to_string()
    } else {
        parts.join(", ")
    }
}

/// Formats a course as `label | 10/03/2025 09h00 - 10h00` in `zone`.
pub fn format_interval<Tz: TimeZone>(interval: &Interval, zone: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let start = interval.start().with_timezone(zone);
    let end = interval.end().with_timezone(zone);
    format!(
        "{} | {} - {}",
        interval.label(),
        start.format(DATETIME_FORMAT),
        end.format("%Hh%M")
    )
}

/// Resolves a zone-less date in `zone`, picking the earlier instant on DST
/// overlaps.
pub fn localize<Tz: TimeZone>(naive: NaiveDateTime, zone: &Tz) -> anyhow::Result<DateTime<Tz>> {
    zone.from_local_datetime(&naive)
        .earliest()
        .with_context(|| format!("{} does not exist in the configured time zone", naive.format(DATETIME_FORMAT)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    #[test]
    fn parse_datetime_accepts_french_format() {
        let parsed = parse_datetime("10/03/2025 09h30").unwrap();
        let expected = NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn parse_datetime_error_names_input_and_example() {
        let err = parse_datetime("tomorrow").unwrap_err().to_string();
        assert_eq!(
            err,
            "Unable to parse a datetime from 'tomorrow'. Example of valid datetime: '01/01/1970 08h00'."
        );
    }

    #[test]
    fn parse_duration_units() {
        assert_eq!(parse_duration("4h").unwrap(), TimeDelta::hours(4));
        assert_eq!(
            parse_duration("5m34s").unwrap(),
            TimeDelta::seconds(5 * 60 + 34)
        );
        assert_eq!(
            parse_duration("10d8h5m20s").unwrap(),
            TimeDelta::days(10) + TimeDelta::hours(8) + TimeDelta::minutes(5) + TimeDelta::seconds(20)
        );
        assert_eq!(parse_duration("1.5h").unwrap(), TimeDelta::minutes(90));
    }

    #[test]
    fn parse_duration_rejects_invalid() {
        for input in ["", "4", "h", "4x", "1..2h", "4h3d"] {
            let err = parse_duration(input).unwrap_err().to_string();
            assert!(
                err.starts_with(&format!("Unable to parse a duration from '{input}'.")),
                "unexpected error for {input:?}: {err}"
            );
        }
    }

    #[test]
    fn format_duration_drops_seconds_and_pluralizes() {
        assert_eq!(format_duration(TimeDelta::minutes(30)), "30 minutes");
        assert_eq!(format_duration(TimeDelta::minutes(61)), "1 hour, 1 minute");
        assert_eq!(
            format_duration(TimeDelta::days(2) + TimeDelta::hours(3) + TimeDelta::seconds(59)),
            "2 days, 3 hours"
        );
        assert_eq!(format_duration(TimeDelta::seconds(42)), "less than a minute");
    }

    #[test]
    fn format_interval_in_zone() {
        let start = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 3, 10, 10, 30, 0).unwrap();
        let interval = Interval::new("Math", start, end).unwrap();

        assert_eq!(
            format_interval(&interval, &chrono_tz::Europe::Paris),
            "Math | 10/03/2025 10h00 - 11h30"
        );
    }

    #[test]
    fn localize_in_zone() {
        let naive = parse_datetime("10/03/2025 10h00").unwrap();
        let local = localize(naive, &chrono_tz::Europe::Paris).unwrap();
        assert_eq!(
            local.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap()
        );

        // Clocks jump from 02h00 to 03h00 on this night.
        let gap = parse_datetime("30/03/2025 02h30").unwrap();
        assert!(localize(gap, &chrono_tz::Europe::Paris).is_err());
    }
}

//! Countdown - time remaining until the target date, and the date input format
//!
//! Targets are local midnight of the picked day, stored as UTC instants.

use std::fmt;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};

const MS_PER_SECOND: i64 = 1000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeRemaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub total_ms: i64,
}

impl TimeRemaining {
    pub const ZERO: Self = Self { days: 0, hours: 0, minutes: 0, seconds: 0, total_ms: 0 };

    /// Split `target - now` into calendar-free units. Past targets are zero.
    pub fn between(target_ms: i64, now_ms: i64) -> Self {
        let total = target_ms - now_ms;
        if total <= 0 {
            return Self::ZERO;
        }
        Self {
            days: total / MS_PER_DAY,
            hours: (total / MS_PER_HOUR) % 24,
            minutes: (total / MS_PER_MINUTE) % 60,
            seconds: (total / MS_PER_SECOND) % 60,
            total_ms: total,
        }
    }

    /// Remaining time from the wall clock
    pub fn until(target: DateTime<Utc>) -> Self {
        Self::between(target.timestamp_millis(), Utc::now().timestamp_millis())
    }

    pub fn is_expired(&self) -> bool {
        self.total_ms <= 0
    }
}

impl fmt::Display for TimeRemaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} days, {}h, {}m, {}s", self.days, self.hours, self.minutes, self.seconds)
    }
}

/// Parse an `<input type="date">` value. Empty or malformed input is `None`.
pub fn parse_date_input(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_INPUT_FORMAT).ok()
}

/// Start of `date` in `tz`. On a DST gap at midnight the earliest valid
/// instant is used; `None` only if the day has no midnight at all.
pub fn midnight_in<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Option<DateTime<Utc>> {
    let midnight = date.and_hms_opt(0, 0, 0)?;
    tz.from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

pub fn local_midnight(date: NaiveDate) -> Option<DateTime<Utc>> {
    midnight_in(date, &Local)
}

pub fn format_date_input_in<Tz>(target: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    target.with_timezone(tz).format(DATE_INPUT_FORMAT).to_string()
}

/// Value for the date input, in local time
pub fn format_date_input(target: &DateTime<Utc>) -> String {
    format_date_input_in(target, &Local)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn splits_into_units() {
        let total = 3 * MS_PER_DAY + 4 * MS_PER_HOUR + 5 * MS_PER_MINUTE + 6 * MS_PER_SECOND + 789;
        let t = TimeRemaining::between(total + 1_000, 1_000);
        assert_eq!(t.days, 3);
        assert_eq!(t.hours, 4);
        assert_eq!(t.minutes, 5);
        assert_eq!(t.seconds, 6);
        assert_eq!(t.total_ms, total);
        assert!(!t.is_expired());
    }

    #[test]
    fn sub_second_remainder_is_not_expired() {
        let t = TimeRemaining::between(500, 0);
        assert_eq!(t.seconds, 0);
        assert!(!t.is_expired());
    }

    #[test]
    fn past_and_present_are_zero() {
        assert_eq!(TimeRemaining::between(1_000, 1_000), TimeRemaining::ZERO);
        assert_eq!(TimeRemaining::between(1_000, 90_000), TimeRemaining::ZERO);
        assert!(TimeRemaining::between(0, 1).is_expired());
    }

    #[test]
    fn display_format() {
        let t = TimeRemaining::between(MS_PER_DAY + 2 * MS_PER_HOUR + 3 * MS_PER_MINUTE + 4 * MS_PER_SECOND, 0);
        assert_eq!(t.to_string(), "1 days, 2h, 3m, 4s");
        assert_eq!(TimeRemaining::ZERO.to_string(), "0 days, 0h, 0m, 0s");
    }

    #[test]
    fn parse_date_input_values() {
        assert_eq!(parse_date_input("2026-12-25"), NaiveDate::from_ymd_opt(2026, 12, 25));
        assert_eq!(parse_date_input(" 2026-01-02 "), NaiveDate::from_ymd_opt(2026, 1, 2));
        assert_eq!(parse_date_input(""), None);
        assert_eq!(parse_date_input("2026-02-30"), None);
        assert_eq!(parse_date_input("25/12/2026"), None);
    }

    #[test]
    fn midnight_uses_local_offset() {
        let date = NaiveDate::from_ymd_opt(2026, 12, 25).unwrap();
        let east = FixedOffset::east_opt(2 * 3600).unwrap();
        let utc = midnight_in(date, &east).unwrap();
        assert_eq!(utc.to_rfc3339(), "2026-12-24T22:00:00+00:00");

        let utc = midnight_in(date, &Utc).unwrap();
        assert_eq!(utc.to_rfc3339(), "2026-12-25T00:00:00+00:00");
    }

    #[test]
    fn date_input_is_rendered_in_the_given_zone() {
        let date = NaiveDate::from_ymd_opt(2026, 12, 25).unwrap();
        let east = FixedOffset::east_opt(2 * 3600).unwrap();
        let target = midnight_in(date, &east).unwrap();
        assert_eq!(format_date_input_in(&target, &east), "2026-12-25");
        assert_eq!(format_date_input_in(&target, &Utc), "2026-12-24");
    }
}

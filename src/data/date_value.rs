use crate::calc::calendar_math::{self, is_valid, numeral, weekday_of};
use crate::data::ValueError;
use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// A calendar date. The weekday is always derived from `(year, month, day)`,
/// so it cannot drift from the date it describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateValue {
    year: i32,
    month: u32,
    day: u32,
}

impl DateValue {
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, ValueError> {
        if is_valid(year, month, day) {
            Ok(DateValue { year, month, day })
        } else {
            Err(ValueError::OutOfRange(calendar_math::format(year, month, day)))
        }
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        DateValue {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }

    /// Parses a bound-field value, falling back to `current` for empty or
    /// malformed input.
    pub fn parse_or(input: &str, current: DateValue) -> Self {
        match input.parse() {
            Ok(date) => date,
            Err(ValueError::Empty) => current,
            Err(e) => {
                warn!(input, %e, fallback = %current, "malformed date value");
                current
            }
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// 0 = Sunday.
    pub fn weekday(&self) -> u32 {
        weekday_of(self.year, self.month, self.day).unwrap_or(0)
    }

    pub fn triple(&self) -> (i32, u32, u32) {
        (self.year, self.month, self.day)
    }

    pub fn same_month(&self, year: i32, month: u32) -> bool {
        self.year == year && self.month == month
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", calendar_math::format(self.year, self.month, self.day))
    }
}

impl FromStr for DateValue {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValueError::Empty);
        }
        let mut parts = trimmed.split('-').map(str::trim);
        let year = next_part(&mut parts, trimmed)?.parse::<i32>()?;
        let month = next_part(&mut parts, trimmed)?.parse::<u32>()?;
        let day = next_part(&mut parts, trimmed)?.parse::<u32>()?;
        if parts.next().is_some() {
            return Err(ValueError::Malformed(trimmed.to_string()));
        }
        DateValue::new(year, month, day)
    }
}

fn next_part<'a>(
    parts: &mut impl Iterator<Item = &'a str>,
    raw: &str,
) -> Result<&'a str, ValueError> {
    parts
        .next()
        .ok_or_else(|| ValueError::Malformed(raw.to_string()))
}

/// Header fields shown next to the calendar grid.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct DateDisplay {
    pub year: String,
    pub month: String,
    pub day: String,
    pub weekday: String,
}

impl DateDisplay {
    /// Simplified layout shows an arabic month; the normal layout uses the
    /// numeral table for both month and weekday.
    pub fn of(date: &DateValue, simplify: bool) -> Self {
        let month = if simplify {
            format!("{}月", date.month)
        } else {
            format!("{}月", numeral(date.month))
        };
        DateDisplay {
            year: date.year.to_string(),
            month,
            day: date.day.to_string(),
            weekday: format!("周{}", numeral(date.weekday())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> DateValue {
        DateValue::new(y, m, day).unwrap()
    }

    #[test]
    fn test_new_rejects_impossible_dates() {
        assert!(DateValue::new(2023, 2, 29).is_err());
        assert!(DateValue::new(2024, 0, 1).is_err());
        assert!(DateValue::new(2024, 4, 31).is_err());
        assert!(DateValue::new(2024, 2, 29).is_ok());
    }

    #[test]
    fn test_weekday_tracks_date() {
        assert_eq!(d(2024, 1, 1).weekday(), 1);
        assert_eq!(d(2024, 2, 29).weekday(), 4);
    }

    #[test]
    fn test_display_and_from_str_roundtrip() {
        let date = d(2024, 2, 29);
        assert_eq!(date.to_string(), "2024-2-29");
        assert_eq!("2024-2-29".parse::<DateValue>().unwrap(), date);
    }

    #[test]
    fn test_from_str_errors() {
        assert_eq!("".parse::<DateValue>(), Err(ValueError::Empty));
        assert!(matches!("2024-2".parse::<DateValue>(), Err(ValueError::Malformed(_))));
        assert!(matches!("2024-x-1".parse::<DateValue>(), Err(ValueError::Number(_))));
        assert!(matches!("2023-2-29".parse::<DateValue>(), Err(ValueError::OutOfRange(_))));
    }

    #[test]
    fn test_parse_or_falls_back() {
        let now = d(2025, 6, 15);
        assert_eq!(DateValue::parse_or("", now), now);
        assert_eq!(DateValue::parse_or("garbage", now), now);
        assert_eq!(DateValue::parse_or("2024-2-29", now), d(2024, 2, 29));
        assert_eq!(DateValue::parse_or("300000-1-1", now), now);
    }

    #[test]
    fn test_parse_or_warns_only_for_malformed_input() {
        let now = d(2025, 6, 15);
        let logs = crate::capture_logs(|| {
            DateValue::parse_or("", now);
        });
        assert!(logs.is_empty());
        let logs = crate::capture_logs(|| {
            DateValue::parse_or("2024-13-1", now);
        });
        assert!(logs.contains("WARN"));
        assert!(logs.contains("malformed date value"));
    }

    #[test]
    fn test_new_rejects_years_chrono_cannot_place() {
        assert!(matches!(DateValue::new(300_000, 1, 1), Err(ValueError::OutOfRange(_))));
        assert!(DateValue::new(i32::MAX, 12, 1).is_err());
    }

    #[test]
    fn test_display_fields_normal_layout() {
        let display = DateDisplay::of(&d(2024, 2, 29), false);
        assert_eq!(display.year, "2024");
        assert_eq!(display.month, "二月");
        assert_eq!(display.day, "29");
        assert_eq!(display.weekday, "周四");
    }

    #[test]
    fn test_display_fields_simplified_layout() {
        let display = DateDisplay::of(&d(2024, 12, 1), true);
        assert_eq!(display.month, "12月");
        assert_eq!(display.weekday, "周日");
    }
}

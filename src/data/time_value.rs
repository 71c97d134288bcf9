use crate::data::ValueError;
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TimeFormat {
    #[default]
    #[serde(rename = "24hr")]
    H24,
    #[serde(rename = "ampm")]
    AmPm,
}

impl FromStr for TimeFormat {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "24hr" => Ok(TimeFormat::H24),
            "ampm" => Ok(TimeFormat::AmPm),
            other => Err(ValueError::Unknown {
                kind: "time format",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for TimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeFormat::H24 => write!(f, "24hr"),
            TimeFormat::AmPm => write!(f, "ampm"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    pub fn of_hour24(hour: u32) -> Self {
        if hour >= 12 { Meridiem::Pm } else { Meridiem::Am }
    }
}

impl FromStr for Meridiem {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "am" => Ok(Meridiem::Am),
            "pm" => Ok(Meridiem::Pm),
            other => Err(ValueError::Unknown {
                kind: "meridiem",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Meridiem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Meridiem::Am => write!(f, "am"),
            Meridiem::Pm => write!(f, "pm"),
        }
    }
}

/// A time of day in either 24-hour (`hour` 0..=23, no meridiem) or 12-hour
/// (`hour` 1..=12 plus meridiem) form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeValue {
    hour: u32,
    minute: u32,
    meridiem: Option<Meridiem>,
}

impl TimeValue {
    pub fn h24(hour: u32, minute: u32) -> Result<Self, ValueError> {
        // 24 is the dial's label for midnight.
        let hour = if hour == 24 { 0 } else { hour };
        if hour > 23 || minute > 59 {
            return Err(ValueError::OutOfRange(format!("{}:{:02}", hour, minute)));
        }
        Ok(TimeValue {
            hour,
            minute,
            meridiem: None,
        })
    }

    pub fn ampm(hour: u32, minute: u32, meridiem: Meridiem) -> Result<Self, ValueError> {
        if !(1..=12).contains(&hour) || minute > 59 {
            return Err(ValueError::OutOfRange(format!(
                "{}:{:02} {}",
                hour, minute, meridiem
            )));
        }
        Ok(TimeValue {
            hour,
            minute,
            meridiem: Some(meridiem),
        })
    }

    /// Live clock time expressed in `format`.
    pub fn from_clock(time: NaiveTime, format: TimeFormat) -> Self {
        let hour = time.hour();
        match format {
            TimeFormat::H24 => TimeValue {
                hour,
                minute: time.minute(),
                meridiem: None,
            },
            TimeFormat::AmPm => TimeValue {
                hour: match hour % 12 {
                    0 => 12,
                    h => h,
                },
                minute: time.minute(),
                meridiem: Some(Meridiem::of_hour24(hour)),
            },
        }
    }

    pub fn parse(input: &str, format: TimeFormat) -> Result<Self, ValueError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValueError::Empty);
        }
        let (clock, suffix) = match trimmed.split_once(' ') {
            Some((clock, suffix)) => (clock, Some(suffix.trim())),
            None => (trimmed, None),
        };
        let (hour, minute) = clock
            .split_once(':')
            .ok_or_else(|| ValueError::Malformed(trimmed.to_string()))?;
        let hour = hour.trim().parse::<u32>()?;
        let minute = minute.trim().parse::<u32>()?;
        match (format, suffix) {
            (TimeFormat::H24, None) => TimeValue::h24(hour, minute),
            (TimeFormat::AmPm, Some(suffix)) => TimeValue::ampm(hour, minute, suffix.parse()?),
            _ => Err(ValueError::Malformed(trimmed.to_string())),
        }
    }

    /// Parses a bound-field value, falling back to the live clock for empty
    /// or malformed input.
    pub fn parse_or(input: &str, format: TimeFormat, now: NaiveTime) -> Self {
        match TimeValue::parse(input, format) {
            Ok(value) => value,
            Err(ValueError::Empty) => TimeValue::from_clock(now, format),
            Err(e) => {
                let fallback = TimeValue::from_clock(now, format);
                warn!(input, %e, %fallback, "malformed time value");
                fallback
            }
        }
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn meridiem(&self) -> Option<Meridiem> {
        self.meridiem
    }

    /// Zero-padded hour for the compact display.
    pub fn compact_hour(&self) -> String {
        format!("{:02}", self.hour)
    }

    pub fn compact_minute(&self) -> String {
        format!("{:02}", self.minute)
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.meridiem {
            Some(m) => write!(f, "{}:{:02} {}", self.hour, self.minute, m),
            None => write!(f, "{}:{:02}", self.hour, self.minute),
        }
    }
}

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MINUTES_PER_HOUR: u32 = 60;
pub const MINUTES_PER_DAY: u32 = 24 * MINUTES_PER_HOUR;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    #[error("Empty time string")]
    Empty,
    #[error("Unrecognized time format: {0:?} (expected e.g. \"9:30 AM\")")]
    Malformed(String),
    #[error("Hour out of range in {0:?}")]
    HourOutOfRange(String),
    #[error("Minute out of range in {0:?}")]
    MinuteOutOfRange(String),
    #[error("Minute of day out of range: {0}")]
    OutOfRange(u32),
}

fn time_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^(\d{1,2})(?::(\d{2}))?\s*([ap]m)$").expect("time pattern compiles")
    })
}

/// Parses `"9:30 AM"`, `"9 PM"` or `"12:05am"` into minutes since midnight.
///
/// 24-hour input (`"13:00"`), a missing AM/PM suffix and out-of-range
/// fields are rejected.
pub fn parse_time_to_minutes(input: &str) -> Result<u32, TimeError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(TimeError::Empty);
    }

    let caps = time_pattern()
        .captures(trimmed)
        .ok_or_else(|| TimeError::Malformed(trimmed.to_string()))?;

    let hour: u32 = caps[1]
        .parse()
        .map_err(|_| TimeError::Malformed(trimmed.to_string()))?;
    let minute: u32 = match caps.get(2) {
        Some(m) => m
            .as_str()
            .parse()
            .map_err(|_| TimeError::Malformed(trimmed.to_string()))?,
        None => 0,
    };

    if !(1..=12).contains(&hour) {
        return Err(TimeError::HourOutOfRange(trimmed.to_string()));
    }
    if minute >= MINUTES_PER_HOUR {
        return Err(TimeError::MinuteOutOfRange(trimmed.to_string()));
    }

    let is_pm = caps[3].eq_ignore_ascii_case("pm");
    let hour24 = match (hour, is_pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, true) => h + 12,
        (h, false) => h,
    };

    Ok(hour24 * MINUTES_PER_HOUR + minute)
}

pub fn format_minutes_to_time(minutes: u32) -> Result<String, TimeError> {
    if minutes >= MINUTES_PER_DAY {
        return Err(TimeError::OutOfRange(minutes));
    }
    Ok(render_clock(minutes))
}

/// `13` -> `"1:00 PM"`.
pub fn format_hour_to_time_string(hour: u32) -> Result<String, TimeError> {
    let minutes = hour
        .checked_mul(MINUTES_PER_HOUR)
        .ok_or(TimeError::OutOfRange(u32::MAX))?;
    format_minutes_to_time(minutes)
}

fn render_clock(minutes: u32) -> String {
    let hour24 = minutes / MINUTES_PER_HOUR;
    let minute = minutes % MINUTES_PER_HOUR;
    let period = if hour24 < 12 { "AM" } else { "PM" };
    let hour12 = match hour24 % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{:02} {}", hour12, minute, period)
}

/// A minute of the day in `0..1440`, carried on the wire as its display string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u32);

impl ClockTime {
    pub fn from_minutes(minutes: u32) -> Result<Self, TimeError> {
        if minutes >= MINUTES_PER_DAY {
            return Err(TimeError::OutOfRange(minutes));
        }
        Ok(Self(minutes))
    }

    pub fn from_hm(hour: u32, minute: u32) -> Result<Self, TimeError> {
        if minute >= MINUTES_PER_HOUR {
            return Err(TimeError::MinuteOutOfRange(format!("{}:{}", hour, minute)));
        }
        let minutes = hour
            .checked_mul(MINUTES_PER_HOUR)
            .and_then(|m| m.checked_add(minute))
            .ok_or(TimeError::OutOfRange(u32::MAX))?;
        Self::from_minutes(minutes)
    }

    pub fn minutes(self) -> u32 {
        self.0
    }

    pub fn hour(self) -> u32 {
        self.0 / MINUTES_PER_HOUR
    }

    pub fn minute(self) -> u32 {
        self.0 % MINUTES_PER_HOUR
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_clock(self.0))
    }
}

impl FromStr for ClockTime {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_time_to_minutes(s).map(ClockTime)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = TimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

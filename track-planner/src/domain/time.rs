//! Clock time handling for timetable data.
//!
//! The timetable provides stop times as "HH:MM" strings with no date. This
//! module parses them into minutes since midnight and handles the day
//! rollover of legs that run past midnight.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Minutes in one day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Sentinel the timetable uses for "does not stop here".
pub const NO_STOP: &str = "-";

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A time of day with minute precision.
///
/// Stored as minutes since midnight, so `ClockTime` values order
/// chronologically within one day.
///
/// # Examples
///
/// ```
/// use track_planner::domain::ClockTime;
///
/// let time = ClockTime::parse_hhmm("07:29").unwrap();
/// assert_eq!(time.minutes(), 449);
/// assert_eq!(time.to_string(), "07:29");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u16);

impl ClockTime {
    /// Midnight.
    pub const MIDNIGHT: ClockTime = ClockTime(0);

    /// Create a time from hour and minute components.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self((hour * 60 + minute) as u16))
    }

    /// Create a time from an absolute minute count, wrapping at midnight.
    ///
    /// Minute counts past one day (legs that rolled over) map back onto
    /// the clock face.
    ///
    /// ```
    /// use track_planner::domain::ClockTime;
    ///
    /// assert_eq!(ClockTime::from_minutes_wrapping(1440 + 65).to_string(), "01:05");
    /// ```
    pub fn from_minutes_wrapping(minutes: u32) -> Self {
        Self((minutes % MINUTES_PER_DAY) as u16)
    }

    /// Parse a time from "HH:MM" format.
    ///
    /// # Examples
    ///
    /// ```
    /// use track_planner::domain::ClockTime;
    ///
    /// assert!(ClockTime::parse_hhmm("00:00").is_ok());
    /// assert!(ClockTime::parse_hhmm("23:59").is_ok());
    ///
    /// assert!(ClockTime::parse_hhmm("0729").is_err());
    /// assert!(ClockTime::parse_hhmm("7:29").is_err());
    /// assert!(ClockTime::parse_hhmm("24:00").is_err());
    /// ```
    pub fn parse_hhmm(s: &str) -> Result<Self, TimeError> {
        // Must be exactly 5 characters: HH:MM
        if s.len() != 5 {
            return Err(TimeError::new("expected HH:MM format"));
        }

        let bytes = s.as_bytes();

        if bytes[2] != b':' {
            return Err(TimeError::new("expected colon at position 2"));
        }

        let hour =
            parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        if hour > 23 {
            return Err(TimeError::new("hour must be 0-23"));
        }

        let minute = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| TimeError::new("invalid minute digits"))?;
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }

        Ok(Self((hour * 60 + minute) as u16))
    }

    /// Minutes since midnight (0..1440).
    pub fn minutes(&self) -> u32 {
        u32::from(self.0)
    }

    /// Returns the hour (0-23).
    pub fn hour(&self) -> u32 {
        self.minutes() / 60
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u32 {
        self.minutes() % 60
    }

    /// Converts to a chrono `NaiveTime`.
    pub fn to_naive_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour(), self.minute(), 0).unwrap_or(NaiveTime::MIN)
    }

    /// Truncates a chrono `NaiveTime` to minute precision.
    pub fn from_naive_time(time: NaiveTime) -> Self {
        Self((time.hour() * 60 + time.minute()) as u16)
    }
}

impl FromStr for ClockTime {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hhmm(s)
    }
}

impl fmt::Debug for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClockTime({:02}:{:02})", self.hour(), self.minute())
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_hhmm(&s).map_err(serde::de::Error::custom)
    }
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}

/// Parse a raw stop time from the timetable.
///
/// Returns `None` for the "does not stop" sentinel, for empty strings and
/// for anything that fails to parse: all three mean the run cannot be
/// boarded or left at that stop.
pub fn parse_stop_time(raw: &str) -> Option<ClockTime> {
    let raw = raw.trim();
    if raw.is_empty() || raw == NO_STOP {
        return None;
    }
    ClockTime::parse_hhmm(raw).ok()
}

/// Absolute arrival minutes for a leg departing at `depart`.
///
/// An arrival that reads earlier than its departure happened on the next
/// day.
pub fn rollover_arrival(depart: ClockTime, arrive: ClockTime) -> u32 {
    if arrive < depart {
        arrive.minutes() + MINUTES_PER_DAY
    } else {
        arrive.minutes()
    }
}

/// Format a duration in minutes for display, e.g. "1h5m", "2h0m", "45m".
pub fn format_duration(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{hours}h{mins}m")
    } else {
        format!("{mins}m")
    }
}

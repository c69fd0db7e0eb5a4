//! Day-of-week and wall-clock time primitives.
//!
//! Everything in this crate is anchored to a weekly grid: a [`Day`] plus a
//! minute-precision [`TimeOfDay`]. Times parse from and format to the fixed
//! `"HH:MM"` shape; out-of-range or malformed text is a [`TimeParseError`],
//! never a clamped value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error raised when parsing a `"HH:MM"` time or a day name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeParseError {
    #[error("time must be formatted as HH:MM, got '{0}'")]
    InvalidFormat(String),

    #[error("hour out of range (0-23): {0}")]
    HourOutOfRange(u32),

    #[error("minute out of range (0-59): {0}")]
    MinuteOutOfRange(u32),

    #[error("unknown day name: '{0}'")]
    UnknownDay(String),
}

/// Day of the week.
///
/// Ordering follows calendar order (Monday first); it is used for grouping
/// and deterministic iteration, never for cross-day time comparison.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    /// All seven days in calendar order.
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    /// Monday through Friday.
    pub const WEEKDAYS: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Day {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Monday" => Ok(Day::Monday),
            "Tuesday" => Ok(Day::Tuesday),
            "Wednesday" => Ok(Day::Wednesday),
            "Thursday" => Ok(Day::Thursday),
            "Friday" => Ok(Day::Friday),
            "Saturday" => Ok(Day::Saturday),
            "Sunday" => Ok(Day::Sunday),
            other => Err(TimeParseError::UnknownDay(other.to_string())),
        }
    }
}

/// A wall-clock time on a 24-hour scale with minute precision.
///
/// Construction is validated: hour must be in 0..=23 and minute in 0..=59.
/// Serializes as the `"HH:MM"` string form, so deserializing untrusted data
/// re-runs the same validation.
///
/// The derived `Ord` gives the total order by (hour, minute).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    /// Create a time from components.
    ///
    /// # Returns
    /// * `Err(TimeParseError)` if hour > 23 or minute > 59
    pub fn new(hour: u8, minute: u8) -> Result<Self, TimeParseError> {
        if hour > 23 {
            return Err(TimeParseError::HourOutOfRange(u32::from(hour)));
        }
        if minute > 59 {
            return Err(TimeParseError::MinuteOutOfRange(u32::from(minute)));
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Minutes elapsed since 00:00, for interval arithmetic.
    pub fn minutes_since_midnight(&self) -> u32 {
        u32::from(self.hour) * 60 + u32::from(self.minute)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeParseError;

    /// Parse the fixed `"HH:MM"` form: exactly two colon-separated numeric
    /// fields, hour in [0, 23] and minute in [0, 59].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hour_text, minute_text) = s
            .split_once(':')
            .ok_or_else(|| TimeParseError::InvalidFormat(s.to_string()))?;

        let field = |text: &str| -> Result<u32, TimeParseError> {
            if text.is_empty() || text.len() > 2 || !text.bytes().all(|b| b.is_ascii_digit()) {
                return Err(TimeParseError::InvalidFormat(s.to_string()));
            }
            text.parse::<u32>()
                .map_err(|_| TimeParseError::InvalidFormat(s.to_string()))
        };

        let hour = field(hour_text)?;
        let minute = field(minute_text)?;

        if hour > 23 {
            return Err(TimeParseError::HourOutOfRange(hour));
        }
        if minute > 59 {
            return Err(TimeParseError::MinuteOutOfRange(minute));
        }

        Ok(Self {
            hour: hour as u8,
            minute: minute as u8,
        })
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = TimeParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(t: TimeOfDay) -> Self {
        t.to_string()
    }
}

/// Minutes between `start` and `end` on the same day.
///
/// Returns `None` when `end <= start`; callers are expected to have validated
/// the interval invariant before using the result for aggregation.
pub fn duration_minutes(start: TimeOfDay, end: TimeOfDay) -> Option<u32> {
    let s = start.minutes_since_midnight();
    let e = end.minutes_since_midnight();
    if e > s {
        Some(e - s)
    } else {
        None
    }
}

/// A bookable interval on the weekly grid. Invariant: start < end.
///
/// Time slots are reference data: a generated grid that assignments may point
/// at by id, not something an assignment owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: String,
    pub day: Day,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

/// Generate a contiguous, non-overlapping slot grid for the given days.
///
/// Slot ids are formed from the day and start time (e.g. `"Monday-0800"`), so
/// regenerating the same grid yields identical ids. A trailing partial slot
/// that would cross `end_hour` is not emitted.
///
/// # Arguments
/// * `days` - Days to generate slots for, in the order given
/// * `start_hour` - First slot starts at this hour (0-23)
/// * `end_hour` - No slot ends after this hour
/// * `slot_minutes` - Width of each slot; 0 yields an empty grid
pub fn generate_slots(
    days: &[Day],
    start_hour: u8,
    end_hour: u8,
    slot_minutes: u32,
) -> Vec<TimeSlot> {
    let mut slots = Vec::new();
    if slot_minutes == 0 {
        return slots;
    }

    for &day in days {
        let mut cursor = u32::from(start_hour) * 60;
        let boundary = u32::from(end_hour) * 60;

        while cursor + slot_minutes <= boundary {
            let next = cursor + slot_minutes;
            let start = match TimeOfDay::new((cursor / 60) as u8, (cursor % 60) as u8) {
                Ok(t) => t,
                Err(_) => break,
            };
            let end = match TimeOfDay::new((next / 60) as u8, (next % 60) as u8) {
                Ok(t) => t,
                Err(_) => break,
            };

            slots.push(TimeSlot {
                id: format!("{}-{:02}{:02}", day, start.hour(), start.minute()),
                day,
                start,
                end,
            });
            cursor = next;
        }
    }

    slots
}

//! Configuration types for punch classification.
//!
//! This module contains the raw YAML shape of the store timings file and the
//! validated, immutable [`StoreTimings`] value the engine works with.

use chrono::{NaiveTime, Timelike};
use serde::Deserialize;

use crate::error::{EngineError, EngineResult};

/// Store timings as they appear in `store_timings.yaml`.
///
/// Every key is optional at this stage so a missing key can be reported by
/// name instead of as a generic YAML error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStoreTimings {
    /// Expected arrival time.
    #[serde(default, alias = "morningStart")]
    pub morning_start: Option<String>,
    /// End of the morning window.
    #[serde(default, alias = "morningEnd")]
    pub morning_end: Option<String>,
    /// Start of the lunch window.
    #[serde(default, alias = "lunchStart")]
    pub lunch_start: Option<String>,
    /// End of the lunch window.
    #[serde(default, alias = "lunchEnd")]
    pub lunch_end: Option<String>,
    /// Start of the evening window.
    #[serde(default, alias = "eveningStart")]
    pub evening_start: Option<String>,
    /// Expected departure time.
    #[serde(default, alias = "eveningEnd")]
    pub evening_end: Option<String>,
}

/// A `start..end` clock window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    /// Inclusive start of the window.
    pub start: NaiveTime,
    /// Exclusive end of the window.
    pub end: NaiveTime,
}

impl TimeWindow {
    /// Returns true if `time` falls inside the window.
    pub fn contains(&self, time: NaiveTime) -> bool {
        time >= self.start && time < self.end
    }
}

/// Validated store opening hours.
///
/// Loaded once at startup and passed explicitly to the classifier; the engine
/// never mutates it.
///
/// # Example
///
/// ```
/// use attendance_engine::config::StoreTimings;
///
/// let timings = StoreTimings::from_hhmm("09:30", "13:00", "13:00", "14:00", "14:00", "21:00")?;
/// assert_eq!(timings.morning_start_minutes(), 570);
/// assert_eq!(timings.evening_end_minutes(), 1260);
/// # Ok::<(), attendance_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreTimings {
    morning: TimeWindow,
    lunch: TimeWindow,
    evening: TimeWindow,
}

impl StoreTimings {
    /// Builds timings from already-parsed clock times.
    ///
    /// Each window must start before it ends.
    pub fn new(
        morning_start: NaiveTime,
        morning_end: NaiveTime,
        lunch_start: NaiveTime,
        lunch_end: NaiveTime,
        evening_start: NaiveTime,
        evening_end: NaiveTime,
    ) -> EngineResult<Self> {
        let morning = window("morning", morning_start, morning_end)?;
        let lunch = window("lunch", lunch_start, lunch_end)?;
        let evening = window("evening", evening_start, evening_end)?;
        Ok(Self {
            morning,
            lunch,
            evening,
        })
    }

    /// Builds timings from six `HH:MM` strings, in configuration order.
    pub fn from_hhmm(
        morning_start: &str,
        morning_end: &str,
        lunch_start: &str,
        lunch_end: &str,
        evening_start: &str,
        evening_end: &str,
    ) -> EngineResult<Self> {
        Self::new(
            parse_hhmm("morning_start", morning_start)?,
            parse_hhmm("morning_end", morning_end)?,
            parse_hhmm("lunch_start", lunch_start)?,
            parse_hhmm("lunch_end", lunch_end)?,
            parse_hhmm("evening_start", evening_start)?,
            parse_hhmm("evening_end", evening_end)?,
        )
    }

    /// Validates a raw configuration document.
    pub fn from_raw(raw: &RawStoreTimings) -> EngineResult<Self> {
        Self::from_hhmm(
            required("morning_start", &raw.morning_start)?,
            required("morning_end", &raw.morning_end)?,
            required("lunch_start", &raw.lunch_start)?,
            required("lunch_end", &raw.lunch_end)?,
            required("evening_start", &raw.evening_start)?,
            required("evening_end", &raw.evening_end)?,
        )
    }

    /// Expected arrival time.
    pub fn morning_start(&self) -> NaiveTime {
        self.morning.start
    }

    /// Expected departure time.
    pub fn evening_end(&self) -> NaiveTime {
        self.evening.end
    }

    /// The morning window.
    pub fn morning_window(&self) -> TimeWindow {
        self.morning
    }

    /// The lunch window.
    pub fn lunch_window(&self) -> TimeWindow {
        self.lunch
    }

    /// The evening window.
    pub fn evening_window(&self) -> TimeWindow {
        self.evening
    }

    /// `morning_start` as minutes since midnight.
    pub fn morning_start_minutes(&self) -> i64 {
        minutes_since_midnight(self.morning.start)
    }

    /// `evening_end` as minutes since midnight.
    pub fn evening_end_minutes(&self) -> i64 {
        minutes_since_midnight(self.evening.end)
    }
}

/// Reduces a clock time to whole minutes since midnight, discarding seconds.
pub fn minutes_since_midnight(time: NaiveTime) -> i64 {
    i64::from(time.hour()) * 60 + i64::from(time.minute())
}

/// Parses a strict `HH:MM` 24-hour string.
pub fn parse_hhmm(key: &str, value: &str) -> EngineResult<NaiveTime> {
    let invalid = || EngineError::InvalidStoreTiming {
        key: key.to_string(),
        value: value.to_string(),
    };

    let trimmed = value.trim();
    let (hours, minutes) = trimmed.split_once(':').ok_or_else(invalid)?;
    let two_digits = |part: &str| part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit());
    if !two_digits(hours) || !two_digits(minutes) {
        return Err(invalid());
    }
    let hours: u32 = hours.parse().map_err(|_| invalid())?;
    let minutes: u32 = minutes.parse().map_err(|_| invalid())?;

    NaiveTime::from_hms_opt(hours, minutes, 0).ok_or_else(invalid)
}

fn required<'a>(key: &str, value: &'a Option<String>) -> EngineResult<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| EngineError::InvalidStoreTiming {
            key: key.to_string(),
            value: "missing".to_string(),
        })
}

fn window(name: &str, start: NaiveTime, end: NaiveTime) -> EngineResult<TimeWindow> {
    if start >= end {
        return Err(EngineError::InvalidStoreTiming {
            key: format!("{}_start", name),
            value: format!(
                "{} window starts at {} but ends at {}",
                name,
                start.format("%H:%M"),
                end.format("%H:%M")
            ),
        });
    }
    Ok(TimeWindow { start, end })
}

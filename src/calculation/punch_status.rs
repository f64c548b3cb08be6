//! Arrival and departure classification.
//!
//! Compares an IN punch against the store's morning start and an OUT punch
//! against its evening end.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::config::{StoreTimings, minutes_since_midnight};
use crate::models::{Punch, PunchStatus, PunchType};

/// Which reference point a punch is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClockDirection {
    /// Arrival, compared with `morning_start`.
    In,
    /// Departure, compared with `evening_end`.
    Out,
}

impl ClockDirection {
    /// The direction for a punch type; break punches have none.
    pub fn for_punch_type(punch_type: PunchType) -> Option<Self> {
        match punch_type {
            PunchType::In => Some(ClockDirection::In),
            PunchType::Out => Some(ClockDirection::Out),
            PunchType::BreakStart | PunchType::BreakEnd => None,
        }
    }
}

/// The outcome of classifying one punch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunchClassification {
    /// On-time, late, early or overtime.
    pub status: PunchStatus,
    /// Absolute distance from the reference time, in minutes.
    pub offset_minutes: i64,
    /// `"<offset> minutes <status>"`, absent when on time.
    pub message: Option<String>,
}

/// Classifies a punch time against store hours.
///
/// Seconds are discarded before comparing. Arrivals before `morning_start`
/// are early and after it late; departures before `evening_end` are early and
/// after it overtime.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::{classify, ClockDirection};
/// use attendance_engine::config::StoreTimings;
/// use attendance_engine::models::PunchStatus;
/// use chrono::NaiveDateTime;
///
/// let timings = StoreTimings::from_hhmm("09:30", "13:00", "13:00", "14:00", "14:00", "21:00")?;
/// let at = NaiveDateTime::parse_from_str("2026-01-15 09:05:00", "%Y-%m-%d %H:%M:%S").unwrap();
///
/// let result = classify(at, ClockDirection::In, &timings);
/// assert_eq!(result.status, PunchStatus::Early);
/// assert_eq!(result.offset_minutes, 25);
/// assert_eq!(result.message.as_deref(), Some("25 minutes early"));
/// # Ok::<(), attendance_engine::error::EngineError>(())
/// ```
pub fn classify(
    at: NaiveDateTime,
    direction: ClockDirection,
    timings: &StoreTimings,
) -> PunchClassification {
    let actual = minutes_since_midnight(at.time());
    let (expected, after) = match direction {
        ClockDirection::In => (timings.morning_start_minutes(), PunchStatus::Late),
        ClockDirection::Out => (timings.evening_end_minutes(), PunchStatus::Overtime),
    };

    let status = if actual < expected {
        PunchStatus::Early
    } else if actual > expected {
        after
    } else {
        PunchStatus::OnTime
    };
    let offset_minutes = (actual - expected).abs();

    let message = match status {
        PunchStatus::OnTime => None,
        other => Some(format!("{} minutes {}", offset_minutes, other)),
    };

    PunchClassification {
        status,
        offset_minutes,
        message,
    }
}

/// Classifies an IN or OUT punch; break punches are not classified.
pub fn classify_punch(punch: &Punch, timings: &StoreTimings) -> Option<PunchClassification> {
    ClockDirection::for_punch_type(punch.punch_type())
        .map(|direction| classify(punch.at, direction, timings))
}

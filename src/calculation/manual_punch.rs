//! Administrator-entered punches.
//!
//! A manual punch carries a caller-supplied timestamp and attribution. Unlike
//! ordinary punches it is checked against the punch state machine before it
//! touches a ledger: an insertion that would put two incompatible punches
//! next to each other is rejected outright.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::models::{Attendance, AttendanceState, Punch, PunchType};

/// Accepted layouts for a caller-supplied timestamp, besides RFC 3339.
const CUSTOM_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// An administrator's request to punch on behalf of an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualPunchRequest {
    /// The employee being punched for.
    pub target_user_id: String,
    /// Raw punch type, one of `IN`, `OUT`, `BREAK_START`, `BREAK_END`.
    pub punch_type: String,
    /// Raw local timestamp of the punch.
    pub custom_time: String,
    /// The administrator entering the punch.
    pub caller_id: String,
    /// Reason; required for `BREAK_START`.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Parses a caller-supplied local timestamp.
///
/// RFC 3339 values keep their local wall-clock reading; the offset is dropped
/// because the engine works in a single store timezone.
///
/// ```
/// use attendance_engine::calculation::parse_custom_time;
///
/// assert!(parse_custom_time("2026-01-15 09:30").is_ok());
/// assert!(parse_custom_time("2026-01-15T09:30:00+05:30").is_ok());
/// assert!(parse_custom_time("yesterday").is_err());
/// ```
pub fn parse_custom_time(value: &str) -> EngineResult<NaiveDateTime> {
    let trimmed = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.naive_local());
    }
    CUSTOM_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| {
            EngineError::invalid_punch(
                "custom_time",
                format!("'{}' is not a valid local timestamp", value),
            )
        })
}

/// Validates a manual punch request and builds the attributed punch.
///
/// The result has `manual_punch = true`, `punched_by = caller_id` and
/// `at = custom_time`. Nothing is written to any ledger here.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::{authorize, ManualPunchRequest};
/// use attendance_engine::models::PunchType;
///
/// let punch = authorize(&ManualPunchRequest {
///     target_user_id: "emp_001".to_string(),
///     punch_type: "IN".to_string(),
///     custom_time: "2026-01-15 09:00".to_string(),
///     caller_id: "admin_7".to_string(),
///     reason: Some("forgot to punch".to_string()),
/// })?;
///
/// assert_eq!(punch.punch_type(), PunchType::In);
/// assert!(punch.manual_punch);
/// assert_eq!(punch.punched_by.as_deref(), Some("admin_7"));
/// # Ok::<(), attendance_engine::error::EngineError>(())
/// ```
pub fn authorize(request: &ManualPunchRequest) -> EngineResult<Punch> {
    if request.target_user_id.trim().is_empty() {
        return Err(EngineError::invalid_punch(
            "target_user_id",
            "a target employee is required",
        ));
    }
    if request.caller_id.trim().is_empty() {
        return Err(EngineError::invalid_punch(
            "punched_by",
            "manual punches must name the administrator entering them",
        ));
    }

    let punch_type: PunchType = request.punch_type.parse()?;
    let at = parse_custom_time(&request.custom_time)?;
    let punch = Punch::from_type(punch_type, at, request.reason.as_deref())?;

    Ok(punch.with_manual(request.caller_id.trim()))
}

/// Checks that `punch` may be inserted into `ledger` and returns its slot.
///
/// The punch must fall on the ledger's date, and both the predecessor → punch
/// and punch → successor transitions must be legal.
pub fn validate_insertion(ledger: &Attendance, punch: &Punch) -> EngineResult<usize> {
    if punch.at.date() != ledger.date() {
        return Err(EngineError::invalid_punch(
            "custom_time",
            format!(
                "{} does not fall on the ledger date {}",
                punch.at,
                ledger.date()
            ),
        ));
    }

    let index = ledger.insertion_index(punch.at);
    check_neighbours(ledger.punches(), index, punch)?;
    Ok(index)
}

/// Validates and inserts a manual punch, leaving the ledger untouched on error.
pub fn insert_manual_punch(ledger: &mut Attendance, punch: Punch) -> EngineResult<usize> {
    if let Err(err) = validate_insertion(ledger, &punch) {
        warn!(
            user_id = %ledger.user_id(),
            punch_type = %punch.punch_type(),
            at = %punch.at,
            error = %err,
            "Manual punch rejected"
        );
        return Err(err);
    }
    Ok(ledger.insert_punch(punch))
}

/// Inserts several manual punches as one correction.
///
/// The neighbours of every new punch are checked in the merged sequence, so a
/// missing break pair can be added in a single step even though neither half
/// could be inserted alone. Either all punches are inserted or none.
pub fn insert_manual_batch(ledger: &mut Attendance, punches: Vec<Punch>) -> EngineResult<()> {
    let size = punches.len();
    match stage_batch(ledger, punches) {
        Ok(staged) => {
            *ledger = staged;
            Ok(())
        }
        Err(err) => {
            warn!(
                user_id = %ledger.user_id(),
                date = %ledger.date(),
                size,
                error = %err,
                "Manual batch rejected"
            );
            Err(err)
        }
    }
}

fn stage_batch(ledger: &Attendance, punches: Vec<Punch>) -> EngineResult<Attendance> {
    let mut staged = ledger.clone();
    let mut is_new = vec![false; staged.punches().len()];

    for punch in punches {
        if punch.at.date() != staged.date() {
            return Err(EngineError::invalid_punch(
                "custom_time",
                format!(
                    "{} does not fall on the ledger date {}",
                    punch.at,
                    staged.date()
                ),
            ));
        }
        let index = staged.insert_punch(punch);
        is_new.insert(index, true);
    }

    let merged = staged.punches();
    for (index, punch) in merged.iter().enumerate() {
        if !is_new[index] {
            continue;
        }
        let previous = index.checked_sub(1).map(|i| merged[i].punch_type());
        if !punch.punch_type().can_follow(previous) {
            return Err(order_violation(previous, punch));
        }
        check_successor(merged.get(index + 1), punch)?;
    }

    Ok(staged)
}

fn check_neighbours(punches: &[Punch], index: usize, punch: &Punch) -> EngineResult<()> {
    let previous = index.checked_sub(1).map(|i| punches[i].punch_type());
    if !punch.punch_type().can_follow(previous) {
        return Err(order_violation(previous, punch));
    }
    check_successor(punches.get(index), punch)
}

fn check_successor(next: Option<&Punch>, punch: &Punch) -> EngineResult<()> {
    match next {
        Some(next) if !next.punch_type().can_follow(Some(punch.punch_type())) => {
            Err(EngineError::PunchOrderViolation {
                previous: punch.punch_type().to_string(),
                next: next.punch_type().to_string(),
                at: punch.at,
            })
        }
        _ => Ok(()),
    }
}

fn order_violation(previous: Option<PunchType>, punch: &Punch) -> EngineError {
    EngineError::PunchOrderViolation {
        previous: previous
            .map(|p| p.to_string())
            .unwrap_or_else(|| AttendanceState::NotStarted.to_string()),
        next: punch.punch_type().to_string(),
        at: punch.at,
    }
}

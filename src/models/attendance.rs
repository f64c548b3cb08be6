//! Attendance ledger model.
//!
//! An [`Attendance`] holds the punches of one employee on one calendar date.
//! Punches are kept in chronological order and the work/break totals are a
//! cache recomputed on every mutation; neither can be edited directly.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::{
    WorkSession, WorkTotals, classify_punch, closed_totals, extract_sessions, live_totals,
};
use crate::config::StoreTimings;

use super::{Punch, PunchType};

/// Where a ledger stands in the punch state machine.
///
/// Always derived from the type of the last punch; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceState {
    /// No punch yet.
    NotStarted,
    /// Working.
    CheckedIn,
    /// On break.
    OnBreak,
    /// Checked out; a later IN reopens a new session.
    CheckedOut,
}

impl AttendanceState {
    /// The state after a punch of type `last`.
    pub fn from_last(last: Option<PunchType>) -> Self {
        match last {
            None => AttendanceState::NotStarted,
            Some(PunchType::In) | Some(PunchType::BreakEnd) => AttendanceState::CheckedIn,
            Some(PunchType::BreakStart) => AttendanceState::OnBreak,
            Some(PunchType::Out) => AttendanceState::CheckedOut,
        }
    }

    /// Returns true while a session is running (working or on break).
    pub fn is_open(&self) -> bool {
        matches!(self, AttendanceState::CheckedIn | AttendanceState::OnBreak)
    }
}

impl fmt::Display for AttendanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AttendanceState::NotStarted => "NOT_STARTED",
            AttendanceState::CheckedIn => "CHECKED_IN",
            AttendanceState::OnBreak => "ON_BREAK",
            AttendanceState::CheckedOut => "CHECKED_OUT",
        };
        f.write_str(label)
    }
}

/// The punch ledger of one employee on one calendar date.
///
/// # Example
///
/// ```
/// use attendance_engine::models::{Attendance, AttendanceState, Punch, PunchKind};
/// use chrono::{NaiveDate, NaiveDateTime};
///
/// let t = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap();
/// let mut ledger = Attendance::new("emp_001", NaiveDate::from_ymd_opt(2026, 1, 15).unwrap());
///
/// ledger.append_punch(Punch::new(PunchKind::In, t("2026-01-15 09:00")));
/// ledger.append_punch(Punch::new(PunchKind::Out, t("2026-01-15 17:00")));
///
/// assert_eq!(ledger.state(), AttendanceState::CheckedOut);
/// assert_eq!(ledger.totals().work_min, 480);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredAttendance")]
pub struct Attendance {
    id: Uuid,
    user_id: String,
    date: NaiveDate,
    punches: Vec<Punch>,
    totals: WorkTotals,
}

/// Deserialization shape; totals are recomputed rather than trusted.
#[derive(Deserialize)]
struct StoredAttendance {
    id: Uuid,
    user_id: String,
    date: NaiveDate,
    #[serde(default)]
    punches: Vec<Punch>,
}

impl From<StoredAttendance> for Attendance {
    fn from(stored: StoredAttendance) -> Self {
        let mut attendance = Attendance {
            id: stored.id,
            user_id: stored.user_id,
            date: stored.date,
            punches: stored.punches,
            totals: WorkTotals::default(),
        };
        attendance.recompute();
        attendance
    }
}

impl Attendance {
    /// Creates an empty ledger.
    pub fn new(user_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            date,
            punches: Vec::new(),
            totals: WorkTotals::default(),
        }
    }

    /// The ledger id.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The employee the ledger belongs to.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The calendar date of the ledger.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Punches in chronological order.
    pub fn punches(&self) -> &[Punch] {
        &self.punches
    }

    /// Persisted totals, evaluated as of the last punch.
    pub fn totals(&self) -> WorkTotals {
        self.totals
    }

    /// The most recent punch.
    pub fn last_punch(&self) -> Option<&Punch> {
        self.punches.last()
    }

    /// Returns true if the ledger has no punches.
    pub fn is_empty(&self) -> bool {
        self.punches.is_empty()
    }

    /// Current state, derived from the last punch.
    pub fn state(&self) -> AttendanceState {
        AttendanceState::from_last(self.last_punch().map(Punch::punch_type))
    }

    /// Index at which a punch at `at` belongs.
    ///
    /// Punches with an equal timestamp stay ahead of the new one.
    pub fn insertion_index(&self, at: NaiveDateTime) -> usize {
        self.punches.partition_point(|p| p.at <= at)
    }

    /// Inserts `punch` at its chronological position and recomputes totals.
    ///
    /// Returns the index the punch landed at.
    pub fn insert_punch(&mut self, punch: Punch) -> usize {
        let index = self.insertion_index(punch.at);
        self.punches.insert(index, punch);
        self.recompute();
        index
    }

    /// Appends an in-order punch and recomputes totals.
    ///
    /// A punch older than the last one is placed chronologically instead.
    pub fn append_punch(&mut self, punch: Punch) -> usize {
        match self.punches.last() {
            Some(last) if punch.at < last.at => self.insert_punch(punch),
            _ => {
                self.punches.push(punch);
                self.recompute();
                self.punches.len() - 1
            }
        }
    }

    /// Totals as of `now`, including a running session. Not persisted.
    pub fn live_totals(&self, now: NaiveDateTime) -> WorkTotals {
        live_totals(&self.punches, now)
    }

    /// The IN→OUT sessions of the day; an open session runs until `now`.
    pub fn sessions(&self, now: NaiveDateTime) -> Vec<WorkSession> {
        extract_sessions(&self.punches, now)
    }

    /// Re-derives the cached status of every IN/OUT punch.
    ///
    /// Synthetic midnight OUTs are not classified.
    pub fn annotate_statuses(&mut self, timings: &StoreTimings) {
        for punch in self.punches.iter_mut().filter(|p| !p.synthetic) {
            if let Some(classification) = classify_punch(punch, timings) {
                punch.status = Some(classification.status);
                punch.status_message = classification.message;
            }
        }
    }

    fn recompute(&mut self) {
        self.totals = closed_totals(&self.punches);
    }
}

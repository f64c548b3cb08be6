//! Core data models for the attendance engine.
//!
//! This module contains the punch event types and the per-day punch ledger.

mod attendance;
mod punch;

pub use attendance::{Attendance, AttendanceState};
pub use punch::{Punch, PunchKind, PunchStatus, PunchType};

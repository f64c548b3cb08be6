//! Calculation logic for the attendance engine.
//!
//! This module contains the pure functions of the engine: folding punches
//! into work/break totals, classifying arrivals and departures against store
//! hours, closing sessions left open across midnight, validating manual
//! punches, computing leave deductions and summarizing attendance history.

mod day_rollover;
mod leave_deduction;
mod manual_punch;
mod punch_status;
mod summary;
mod time_accountant;

pub use day_rollover::{RolloverOutcome, end_of_day, rollover_prior_day};
pub use leave_deduction::{LeaveDeduction, LeaveType, daily_rate_from_monthly, on_leave_approved};
pub use manual_punch::{
    ManualPunchRequest, authorize, insert_manual_batch, insert_manual_punch, parse_custom_time,
    validate_insertion,
};
pub use punch_status::{ClockDirection, PunchClassification, classify, classify_punch};
pub use summary::{AttendanceSummary, summarize};
pub use time_accountant::{
    WorkSession, WorkTotals, closed_totals, compute_totals, extract_sessions, live_totals,
    round_to_minutes,
};

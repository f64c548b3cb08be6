//! Salary deduction for approved leave.
//!
//! The engine only computes the amount; applying it to a salary record is
//! left to the caller.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The length of an approved leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    /// A whole working day.
    Full,
    /// Half a working day.
    Half,
}

/// The deduction to apply for one day of leave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveDeduction {
    /// The employee on leave.
    pub user_id: String,
    /// The leave date.
    pub date: NaiveDate,
    /// Full or half day.
    pub leave_type: LeaveType,
    /// The daily rate the deduction was derived from.
    pub daily_rate: Decimal,
    /// The amount to deduct, rounded to cents.
    pub amount: Decimal,
}

/// Computes the salary deduction for an approved leave.
///
/// `daily_rate_fn` supplies the employee's daily rate for the date; a full
/// day deducts the whole rate and a half day deducts half of it.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::{on_leave_approved, LeaveType};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
/// let deduction = on_leave_approved("emp_001", date, LeaveType::Half, |_, _| {
///     Ok(Decimal::new(1000, 0))
/// })?;
/// assert_eq!(deduction.amount, Decimal::new(500, 0));
/// # Ok::<(), attendance_engine::error::EngineError>(())
/// ```
pub fn on_leave_approved<F>(
    user_id: &str,
    date: NaiveDate,
    leave_type: LeaveType,
    daily_rate_fn: F,
) -> EngineResult<LeaveDeduction>
where
    F: FnOnce(&str, NaiveDate) -> EngineResult<Decimal>,
{
    let daily_rate = daily_rate_fn(user_id, date)?;
    if daily_rate.is_sign_negative() {
        return Err(EngineError::InvalidLeave {
            message: format!("daily rate for {} on {} is negative: {}", user_id, date, daily_rate),
        });
    }

    let amount = match leave_type {
        LeaveType::Full => daily_rate,
        LeaveType::Half => daily_rate / Decimal::TWO,
    }
    .round_dp(2);

    Ok(LeaveDeduction {
        user_id: user_id.to_string(),
        date,
        leave_type,
        daily_rate,
        amount,
    })
}

/// Derives a daily rate from a monthly salary and the month's working days.
///
/// ```
/// use attendance_engine::calculation::daily_rate_from_monthly;
/// use rust_decimal::Decimal;
///
/// let rate = daily_rate_from_monthly(Decimal::new(30000, 0), 30)?;
/// assert_eq!(rate, Decimal::new(1000, 0));
/// # Ok::<(), attendance_engine::error::EngineError>(())
/// ```
pub fn daily_rate_from_monthly(monthly_salary: Decimal, working_days: u32) -> EngineResult<Decimal> {
    if working_days == 0 {
        return Err(EngineError::InvalidLeave {
            message: "a month must have at least one working day".to_string(),
        });
    }
    Ok((monthly_salary / Decimal::from(working_days)).round_dp(2))
}

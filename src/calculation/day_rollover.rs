//! Cross-midnight session handling.
//!
//! When an IN punch starts a new day, a session left open on the previous
//! calendar date is closed at that date's last millisecond before the new
//! session is opened.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::{Attendance, Punch, PunchType};

use super::WorkTotals;

/// What a rollover did to the previous day's ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolloverOutcome {
    /// The date that was closed.
    pub closed_date: NaiveDate,
    /// The punch type the prior day was left on.
    pub left_open_on: PunchType,
    /// The synthesized OUT punch.
    pub synthesized: Punch,
    /// The prior ledger's totals after closing.
    pub totals: WorkTotals,
}

/// The last representable instant of `date` at millisecond precision,
/// `23:59:59.999`.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::end_of_day;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2026, 1, 14).unwrap();
/// assert_eq!(end_of_day(date).to_string(), "2026-01-14 23:59:59.999");
/// ```
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    let last_millisecond =
        NaiveTime::from_hms_milli_opt(23, 59, 59, 999).expect("Valid end-of-day time");
    date.and_time(last_millisecond)
}

/// Closes `prior` if it was left open the day before `new_in_date`.
///
/// Acts only when `prior` belongs to `new_in_date - 1`, is non-empty and its
/// last punch is `IN`, `BREAK_END` or `BREAK_START`. A synthetic `OUT` at
/// [`end_of_day`] is appended and the ledger's totals are recomputed.
///
/// A break still open at midnight is closed by the OUT but its break time is
/// not counted, because break time is only accrued on a `BREAK_END`.
///
/// Returns `None` when there was nothing to close.
pub fn rollover_prior_day(
    prior: &mut Attendance,
    new_in_date: NaiveDate,
) -> Option<RolloverOutcome> {
    let expected_prior = new_in_date.checked_sub_days(Days::new(1))?;
    if prior.date() != expected_prior {
        return None;
    }

    let left_open_on = prior.last_punch().map(Punch::punch_type)?;
    if !prior.state().is_open() {
        return None;
    }

    let synthesized = Punch::synthetic_out(end_of_day(expected_prior));
    prior.append_punch(synthesized.clone());
    let totals = prior.totals();

    info!(
        user_id = %prior.user_id(),
        closed_date = %expected_prior,
        left_open_on = %left_open_on,
        work_min = totals.work_min,
        "Closed session left open across midnight"
    );

    Some(RolloverOutcome {
        closed_date: expected_prior,
        left_open_on,
        synthesized,
        totals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AttendanceState, PunchKind};

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn make_datetime(date_str: &str, time_str: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{} {}", date_str, time_str), "%Y-%m-%d %H:%M:%S")
            .unwrap()
    }

    fn prior_with(punches: Vec<Punch>) -> Attendance {
        let mut ledger = Attendance::new("emp_001", make_date("2026-01-14"));
        for punch in punches {
            ledger.append_punch(punch);
        }
        ledger
    }

    #[test]
    fn test_open_session_is_closed_at_end_of_day() {
        let mut prior = prior_with(vec![Punch::new(
            PunchKind::In,
            make_datetime("2026-01-14", "18:00:00"),
        )]);

        let outcome = rollover_prior_day(&mut prior, make_date("2026-01-15")).unwrap();

        let last = prior.last_punch().unwrap();
        assert_eq!(last.punch_type(), PunchType::Out);
        assert!(last.synthetic);
        assert_eq!(last.at.to_string(), "2026-01-14 23:59:59.999");
        assert_eq!(prior.state(), AttendanceState::CheckedOut);
        assert_eq!(prior.totals().work_min, 360);
        assert_eq!(outcome.totals.work_min, 360);
        assert_eq!(outcome.left_open_on, PunchType::In);
    }

    #[test]
    fn test_session_resumed_after_break_is_closed() {
        let mut prior = prior_with(vec![
            Punch::new(PunchKind::In, make_datetime("2026-01-14", "20:00:00")),
            Punch::new(
                PunchKind::BreakStart {
                    reason: "dinner".to_string(),
                },
                make_datetime("2026-01-14", "21:00:00"),
            ),
            Punch::new(PunchKind::BreakEnd, make_datetime("2026-01-14", "21:30:00")),
        ]);

        let outcome = rollover_prior_day(&mut prior, make_date("2026-01-15")).unwrap();
        assert_eq!(outcome.left_open_on, PunchType::BreakEnd);
        assert_eq!(prior.totals().work_min, 60 + 150);
        assert_eq!(prior.totals().break_min, 30);
    }

    #[test]
    fn test_unclosed_break_is_closed_without_counting_break_time() {
        let mut prior = prior_with(vec![
            Punch::new(PunchKind::In, make_datetime("2026-01-14", "20:00:00")),
            Punch::new(
                PunchKind::BreakStart {
                    reason: "dinner".to_string(),
                },
                make_datetime("2026-01-14", "21:00:00"),
            ),
        ]);

        let outcome = rollover_prior_day(&mut prior, make_date("2026-01-15")).unwrap();
        assert_eq!(outcome.left_open_on, PunchType::BreakStart);
        assert_eq!(prior.state(), AttendanceState::CheckedOut);
        assert_eq!(prior.totals().work_min, 60);
        assert_eq!(prior.totals().break_min, 0);
    }

    #[test]
    fn test_closed_day_is_left_alone() {
        let mut prior = prior_with(vec![
            Punch::new(PunchKind::In, make_datetime("2026-01-14", "09:00:00")),
            Punch::new(PunchKind::Out, make_datetime("2026-01-14", "17:00:00")),
        ]);

        assert!(rollover_prior_day(&mut prior, make_date("2026-01-15")).is_none());
        assert_eq!(prior.punches().len(), 2);
    }

    #[test]
    fn test_empty_prior_ledger_is_left_alone() {
        let mut prior = prior_with(vec![]);
        assert!(rollover_prior_day(&mut prior, make_date("2026-01-15")).is_none());
        assert!(prior.is_empty());
    }

    #[test]
    fn test_ledger_from_another_date_is_left_alone() {
        let mut prior = prior_with(vec![Punch::new(
            PunchKind::In,
            make_datetime("2026-01-14", "18:00:00"),
        )]);

        assert!(rollover_prior_day(&mut prior, make_date("2026-01-17")).is_none());
        assert_eq!(prior.punches().len(), 1);
    }
}

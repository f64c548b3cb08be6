//! Attendance history summary.
//!
//! Aggregates a set of daily ledgers into counts of late arrivals, early and
//! overtime departures, and total work/break minutes.

use serde::{Deserialize, Serialize};

use crate::config::StoreTimings;
use crate::models::{Attendance, PunchStatus, PunchType};

use super::{ClockDirection, classify};

/// Aggregate figures over a range of ledgers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    /// Ledgers with at least one IN.
    pub days_present: u32,
    /// Days whose first IN was late.
    pub late_arrivals: u32,
    /// Days whose last OUT was before closing time.
    pub early_departures: u32,
    /// Days whose last OUT was after closing time.
    pub overtime_departures: u32,
    /// Persisted work minutes across all ledgers.
    pub work_min: i64,
    /// Persisted break minutes across all ledgers.
    pub break_min: i64,
}

/// Summarizes `ledgers` against `timings`.
///
/// Arrival is judged on each day's first IN and departure on its last OUT.
/// Synthetic midnight OUTs are not counted as departures.
pub fn summarize<'a, I>(ledgers: I, timings: &StoreTimings) -> AttendanceSummary
where
    I: IntoIterator<Item = &'a Attendance>,
{
    let mut summary = AttendanceSummary::default();

    for ledger in ledgers {
        let totals = ledger.totals();
        summary.work_min += totals.work_min;
        summary.break_min += totals.break_min;

        let punches = ledger.punches();
        let Some(first_in) = punches.iter().find(|p| p.punch_type() == PunchType::In) else {
            continue;
        };
        summary.days_present += 1;

        if classify(first_in.at, ClockDirection::In, timings).status == PunchStatus::Late {
            summary.late_arrivals += 1;
        }

        let last_out = punches
            .iter()
            .rev()
            .find(|p| p.punch_type() == PunchType::Out && !p.synthetic);
        if let Some(last_out) = last_out {
            match classify(last_out.at, ClockDirection::Out, timings).status {
                PunchStatus::Early => summary.early_departures += 1,
                PunchStatus::Overtime => summary.overtime_departures += 1,
                _ => {}
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::rollover_prior_day;
    use crate::models::{Punch, PunchKind};
    use chrono::{NaiveDate, NaiveDateTime};

    fn timings() -> StoreTimings {
        StoreTimings::from_hhmm("09:30", "13:00", "13:00", "14:00", "14:00", "21:00").unwrap()
    }

    fn day(date_str: &str, punches: &[(PunchKind, &str)]) -> Attendance {
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap();
        let mut ledger = Attendance::new("emp_001", date);
        for (kind, time) in punches {
            let at = NaiveDateTime::parse_from_str(
                &format!("{} {}", date_str, time),
                "%Y-%m-%d %H:%M:%S",
            )
            .unwrap();
            ledger.append_punch(Punch::new(kind.clone(), at));
        }
        ledger
    }

    #[test]
    fn test_summary_counts_arrivals_and_departures() {
        let ledgers = vec![
            day(
                "2026-01-12",
                &[(PunchKind::In, "09:45:00"), (PunchKind::Out, "21:00:00")],
            ),
            day(
                "2026-01-13",
                &[(PunchKind::In, "09:20:00"), (PunchKind::Out, "20:00:00")],
            ),
            day(
                "2026-01-14",
                &[(PunchKind::In, "09:30:00"), (PunchKind::Out, "22:00:00")],
            ),
            day("2026-01-15", &[]),
        ];

        let summary = summarize(&ledgers, &timings());
        assert_eq!(summary.days_present, 3);
        assert_eq!(summary.late_arrivals, 1);
        assert_eq!(summary.early_departures, 1);
        assert_eq!(summary.overtime_departures, 1);
        assert_eq!(summary.work_min, 675 + 640 + 750);
    }

    #[test]
    fn test_synthetic_out_is_not_a_departure() {
        let mut ledger = day("2026-01-14", &[(PunchKind::In, "18:00:00")]);
        let next = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        rollover_prior_day(&mut ledger, next).unwrap();

        let summary = summarize([&ledger], &timings());
        assert_eq!(summary.days_present, 1);
        assert_eq!(summary.overtime_departures, 0);
        assert_eq!(summary.work_min, 360);
    }
}

//! Work and break time accounting.
//!
//! This module folds an ordered punch sequence into work/break minute totals,
//! either for a closed day or "as of" an arbitrary instant for a session that
//! is still running.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Punch, PunchType};

const MILLIS_PER_MINUTE: i64 = 60_000;

/// Work and break minutes for a punch sequence.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::WorkTotals;
///
/// let totals = WorkTotals { work_min: 510, break_min: 30 };
/// assert_eq!(totals.work_min + totals.break_min, 540);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkTotals {
    /// Minutes worked, breaks excluded.
    pub work_min: i64,
    /// Minutes spent on break.
    pub break_min: i64,
}

/// One IN→OUT span within a ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkSession {
    /// When the session started.
    pub started_at: NaiveDateTime,
    /// When the session ended; `None` while it is still open.
    pub ended_at: Option<NaiveDateTime>,
    /// Work minutes within the session (up to `as_of` if open).
    pub work_min: i64,
    /// Break minutes within the session (up to `as_of` if open).
    pub break_min: i64,
}

impl WorkSession {
    /// Returns true if the session has not been closed by an OUT.
    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }
}

/// Running cursor state of the accounting fold.
#[derive(Debug)]
struct Accumulator {
    work: Duration,
    on_break: Duration,
    last_in: Option<NaiveDateTime>,
    last_break_start: Option<NaiveDateTime>,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            work: Duration::zero(),
            on_break: Duration::zero(),
            last_in: None,
            last_break_start: None,
        }
    }

    fn apply(&mut self, punch: &Punch) {
        match punch.punch_type() {
            PunchType::In => {
                self.last_in = Some(punch.at);
            }
            PunchType::Out => match self.last_in.take() {
                Some(start) => self.work = self.work + (punch.at - start),
                None => debug!(at = %punch.at, "OUT without open session ignored"),
            },
            PunchType::BreakStart => match self.last_in.take() {
                Some(start) => {
                    self.work = self.work + (punch.at - start);
                    self.last_break_start = Some(punch.at);
                }
                None => debug!(at = %punch.at, "BREAK_START without open session ignored"),
            },
            PunchType::BreakEnd => match self.last_break_start.take() {
                Some(start) => {
                    self.on_break = self.on_break + (punch.at - start);
                    self.last_in = Some(punch.at);
                }
                None => debug!(at = %punch.at, "BREAK_END without open break ignored"),
            },
        }
    }

    /// Ends the fold. Open work and breaks accrue until `open_until`; with
    /// `None` they add nothing.
    fn finish(mut self, open_until: Option<NaiveDateTime>) -> WorkTotals {
        if let Some(as_of) = open_until {
            if let Some(start) = self.last_in {
                self.work = self.work + (as_of - start);
            }
            if let Some(start) = self.last_break_start {
                self.on_break = self.on_break + (as_of - start);
            }
        }
        WorkTotals {
            work_min: round_to_minutes(self.work),
            break_min: round_to_minutes(self.on_break),
        }
    }
}

fn fold(punches: &[Punch]) -> Accumulator {
    let mut acc = Accumulator::new();
    for punch in punches {
        acc.apply(punch);
    }
    acc
}

/// Rounds a duration to the nearest whole minute, halves rounding up.
pub fn round_to_minutes(duration: Duration) -> i64 {
    (duration.num_milliseconds() + MILLIS_PER_MINUTE / 2).div_euclid(MILLIS_PER_MINUTE)
}

/// Folds `punches` into work/break totals as of `as_of`.
///
/// The fold carries two cursors, the last IN and the last BREAK_START:
///
/// - `IN` opens work.
/// - `OUT` closes open work.
/// - `BREAK_START` closes open work and opens a break.
/// - `BREAK_END` closes an open break and reopens work.
///
/// A punch without its matching open cursor is ignored. After the pass, any
/// open work or break runs until `as_of`. Durations are kept at millisecond
/// precision and rounded once at the end.
///
/// Punches must already be in chronological order.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::compute_totals;
/// use attendance_engine::models::{Punch, PunchKind};
/// use chrono::NaiveDateTime;
///
/// let t = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap();
/// let punches = vec![
///     Punch::new(PunchKind::In, t("2026-01-15 09:00")),
///     Punch::new(PunchKind::BreakStart { reason: "lunch".into() }, t("2026-01-15 13:00")),
///     Punch::new(PunchKind::BreakEnd, t("2026-01-15 13:30")),
///     Punch::new(PunchKind::Out, t("2026-01-15 18:00")),
/// ];
///
/// let totals = compute_totals(&punches, t("2026-01-15 18:00"));
/// assert_eq!(totals.work_min, 510);
/// assert_eq!(totals.break_min, 30);
/// ```
pub fn compute_totals(punches: &[Punch], as_of: NaiveDateTime) -> WorkTotals {
    fold(punches).finish(Some(as_of))
}

/// Totals for a closed or historical day.
///
/// Only matched spans count. Work or a break still open at the end of the
/// sequence adds nothing, so an unclosed break followed by an OUT contributes
/// no break time.
pub fn closed_totals(punches: &[Punch]) -> WorkTotals {
    fold(punches).finish(None)
}

/// Totals as of `now`, including any session or break still running.
///
/// A sequence ending in OUT is closed: nothing keeps accruing after it, even
/// if an unmatched BREAK_START was left behind.
///
/// Meant for display only; never persisted.
pub fn live_totals(punches: &[Punch], now: NaiveDateTime) -> WorkTotals {
    match punches.last() {
        None => WorkTotals::default(),
        Some(last) if last.punch_type() == PunchType::Out => closed_totals(punches),
        Some(_) => compute_totals(punches, now),
    }
}

/// Splits a punch sequence into discrete IN→OUT sessions.
///
/// Each session's minutes are accounted with the same rules as
/// [`compute_totals`]; a trailing open session runs until `as_of`.
/// Punches before the first IN are ignored.
pub fn extract_sessions(punches: &[Punch], as_of: NaiveDateTime) -> Vec<WorkSession> {
    let mut sessions = Vec::new();
    let mut current: Option<(NaiveDateTime, usize)> = None;

    for (index, punch) in punches.iter().enumerate() {
        match (punch.punch_type(), current) {
            (PunchType::In, None) => current = Some((punch.at, index)),
            (PunchType::Out, Some((started_at, start_index))) => {
                let totals = closed_totals(&punches[start_index..=index]);
                sessions.push(WorkSession {
                    started_at,
                    ended_at: Some(punch.at),
                    work_min: totals.work_min,
                    break_min: totals.break_min,
                });
                current = None;
            }
            _ => {}
        }
    }

    if let Some((started_at, start_index)) = current {
        let totals = compute_totals(&punches[start_index..], as_of);
        sessions.push(WorkSession {
            started_at,
            ended_at: None,
            work_min: totals.work_min,
            break_min: totals.break_min,
        });
    }

    sessions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PunchKind;

    fn make_datetime(date_str: &str, time_str: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{} {}", date_str, time_str), "%Y-%m-%d %H:%M:%S")
            .unwrap()
    }

    fn punch(kind: PunchKind, time: &str) -> Punch {
        Punch::new(kind, make_datetime("2026-01-15", time))
    }

    fn break_start(time: &str) -> Punch {
        punch(
            PunchKind::BreakStart {
                reason: "lunch".to_string(),
            },
            time,
        )
    }

    #[test]
    fn test_empty_sequence_is_zero() {
        assert_eq!(closed_totals(&[]), WorkTotals::default());
        assert_eq!(
            live_totals(&[], make_datetime("2026-01-15", "12:00:00")),
            WorkTotals::default()
        );
    }

    #[test]
    fn test_single_in_out_pair() {
        let punches = vec![
            punch(PunchKind::In, "09:00:00"),
            punch(PunchKind::Out, "17:00:00"),
        ];
        let totals = closed_totals(&punches);
        assert_eq!(totals.work_min, 480);
        assert_eq!(totals.break_min, 0);
    }

    #[test]
    fn test_break_is_excluded_from_work() {
        let punches = vec![
            punch(PunchKind::In, "09:00:00"),
            break_start("13:00:00"),
            punch(PunchKind::BreakEnd, "13:30:00"),
            punch(PunchKind::Out, "18:00:00"),
        ];
        let totals = closed_totals(&punches);
        assert_eq!(totals.work_min, 510);
        assert_eq!(totals.break_min, 30);
    }

    #[test]
    fn test_multiple_sessions_are_summed() {
        let punches = vec![
            punch(PunchKind::In, "09:00:00"),
            punch(PunchKind::Out, "12:00:00"),
            punch(PunchKind::In, "14:00:00"),
            punch(PunchKind::Out, "16:30:00"),
        ];
        assert_eq!(closed_totals(&punches).work_min, 330);
    }

    #[test]
    fn test_live_total_accrues_open_session() {
        let punches = vec![punch(PunchKind::In, "09:00:00")];
        let now = make_datetime("2026-01-15", "10:15:00");
        assert_eq!(live_totals(&punches, now).work_min, 75);
        assert_eq!(closed_totals(&punches).work_min, 0);
    }

    #[test]
    fn test_live_total_accrues_open_break() {
        let punches = vec![punch(PunchKind::In, "09:00:00"), break_start("12:00:00")];
        let now = make_datetime("2026-01-15", "12:20:00");
        let totals = live_totals(&punches, now);
        assert_eq!(totals.work_min, 180);
        assert_eq!(totals.break_min, 20);
    }

    #[test]
    fn test_closed_day_does_not_keep_accruing() {
        let punches = vec![
            punch(PunchKind::In, "09:00:00"),
            punch(PunchKind::Out, "17:00:00"),
        ];
        let later = make_datetime("2026-01-16", "08:00:00");
        assert_eq!(live_totals(&punches, later), closed_totals(&punches));
    }

    #[test]
    fn test_closed_totals_ignore_unclosed_break() {
        let punches = vec![
            punch(PunchKind::In, "09:00:00"),
            break_start("12:00:00"),
            punch(PunchKind::Out, "17:00:00"),
        ];
        let totals = closed_totals(&punches);
        assert_eq!(totals.work_min, 180);
        assert_eq!(totals.break_min, 0);
    }

    #[test]
    fn test_live_totals_stop_at_out_after_unclosed_break() {
        let punches = vec![
            punch(PunchKind::In, "09:00:00"),
            break_start("12:00:00"),
            punch(PunchKind::Out, "13:00:00"),
        ];
        let expected = WorkTotals {
            work_min: 180,
            break_min: 0,
        };
        assert_eq!(live_totals(&punches, make_datetime("2026-01-15", "13:00:00")), expected);
        assert_eq!(live_totals(&punches, make_datetime("2026-01-15", "18:00:00")), expected);
    }

    #[test]
    fn test_unmatched_punches_are_ignored() {
        let punches = vec![
            punch(PunchKind::Out, "08:00:00"),
            punch(PunchKind::BreakEnd, "08:30:00"),
            punch(PunchKind::In, "09:00:00"),
            punch(PunchKind::Out, "10:00:00"),
            punch(PunchKind::Out, "11:00:00"),
        ];
        let totals = closed_totals(&punches);
        assert_eq!(totals.work_min, 60);
        assert_eq!(totals.break_min, 0);
    }

    #[test]
    fn test_repeated_in_restarts_the_session_cursor() {
        let punches = vec![
            punch(PunchKind::In, "09:00:00"),
            punch(PunchKind::In, "10:00:00"),
            punch(PunchKind::Out, "11:00:00"),
        ];
        assert_eq!(closed_totals(&punches).work_min, 60);
    }

    #[test]
    fn test_rounding_happens_once_at_the_end() {
        // Two 90-second sessions: rounded individually they would give 4 minutes.
        let punches = vec![
            punch(PunchKind::In, "09:00:00"),
            punch(PunchKind::Out, "09:01:30"),
            punch(PunchKind::In, "10:00:00"),
            punch(PunchKind::Out, "10:01:30"),
        ];
        assert_eq!(closed_totals(&punches).work_min, 3);
    }

    #[test]
    fn test_round_to_minutes_half_up() {
        assert_eq!(round_to_minutes(Duration::seconds(29)), 0);
        assert_eq!(round_to_minutes(Duration::seconds(30)), 1);
        assert_eq!(round_to_minutes(Duration::seconds(89)), 1);
        assert_eq!(round_to_minutes(Duration::milliseconds(359 * 60_000 + 59_999)), 360);
    }

    #[test]
    fn test_sessions_are_reported_separately() {
        let punches = vec![
            punch(PunchKind::In, "09:00:00"),
            break_start("12:00:00"),
            punch(PunchKind::BreakEnd, "12:30:00"),
            punch(PunchKind::Out, "13:00:00"),
            punch(PunchKind::In, "15:00:00"),
        ];
        let now = make_datetime("2026-01-15", "16:00:00");
        let sessions = extract_sessions(&punches, now);

        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].work_min, 210);
        assert_eq!(sessions[0].break_min, 30);
        assert!(!sessions[0].is_open());
        assert_eq!(sessions[1].work_min, 60);
        assert!(sessions[1].is_open());
    }
}

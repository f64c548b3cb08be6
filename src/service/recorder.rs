//! Punch recording service.
//!
//! [`AttendanceService`] is the single mutation entry point for ledgers. Each
//! submission for a user runs as one serialized read-modify-write: insertion
//! into the day's ledger, totals recomputation, status annotation, rollover of
//! the previous day and persistence. Nothing is saved if the punch is rejected.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{Days, NaiveDate};
use tracing::info;

use crate::calculation::{
    AttendanceSummary, ManualPunchRequest, WorkSession, WorkTotals, authorize,
    insert_manual_batch, insert_manual_punch, rollover_prior_day, summarize,
};
use crate::config::{ConfigLoader, StoreTimings};
use crate::error::{EngineError, EngineResult};
use crate::models::{Attendance, Punch, PunchType};

use super::clock::{Clock, SystemClock};
use super::request::PunchOptions;
use super::store::AttendanceStore;

/// Records punches and serves attendance reads.
///
/// # Example
///
/// ```
/// use attendance_engine::config::StoreTimings;
/// use attendance_engine::models::PunchType;
/// use attendance_engine::service::{AttendanceService, FixedClock, InMemoryStore, PunchOptions};
/// use chrono::NaiveDateTime;
///
/// let timings = StoreTimings::from_hhmm("09:30", "13:00", "13:00", "14:00", "14:00", "21:00")?;
/// let at = NaiveDateTime::parse_from_str("2026-01-15 09:05:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// let service = AttendanceService::with_clock(timings, InMemoryStore::new(), FixedClock::new(at));
///
/// let ledger = service.record_punch("emp_001", PunchType::In, PunchOptions::default())?;
/// assert_eq!(ledger.punches()[0].status_message.as_deref(), Some("25 minutes early"));
/// # Ok::<(), attendance_engine::error::EngineError>(())
/// ```
pub struct AttendanceService<S, C = SystemClock> {
    timings: StoreTimings,
    store: S,
    clock: C,
    user_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<S: AttendanceStore> AttendanceService<S, SystemClock> {
    /// Creates a service on the system clock.
    pub fn new(timings: StoreTimings, store: S) -> Self {
        Self::with_clock(timings, store, SystemClock)
    }

    /// Creates a service from loaded configuration.
    pub fn from_config(config: ConfigLoader, store: S) -> Self {
        Self::new(config.into_timings(), store)
    }
}

impl<S: AttendanceStore, C: Clock> AttendanceService<S, C> {
    /// Creates a service with an explicit clock.
    pub fn with_clock(timings: StoreTimings, store: S, clock: C) -> Self {
        Self {
            timings,
            store,
            clock,
            user_locks: Mutex::new(HashMap::new()),
        }
    }

    /// The store timings used for classification.
    pub fn timings(&self) -> &StoreTimings {
        &self.timings
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The clock stamping ordinary punches.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Records a punch for `user_id` and returns the updated ledger.
    ///
    /// Ordinary punches are stamped with the current time and appended
    /// without ordering checks. Manual punches carry a caller-supplied time
    /// and attribution, are checked against the punch state machine and are
    /// inserted at their chronological position.
    ///
    /// An `IN` also closes a session left open on the previous date. Both
    /// ledgers are saved only after the punch has been accepted.
    pub fn record_punch(
        &self,
        user_id: &str,
        punch_type: PunchType,
        options: PunchOptions,
    ) -> EngineResult<Attendance> {
        let punch = self.build_punch(user_id, punch_type, options)?;

        self.with_user_lock(user_id, || {
            let date = punch.at.date();
            let manual = punch.manual_punch;

            let mut ledger = self.load_or_create(user_id, date)?;
            if manual {
                insert_manual_punch(&mut ledger, punch)?;
            } else {
                ledger.append_punch(punch);
            }
            ledger.annotate_statuses(&self.timings);

            if punch_type == PunchType::In {
                if let Some(prior) = self.close_previous_day(user_id, date)? {
                    self.store.save(&prior)?;
                }
            }
            self.store.save(&ledger)?;

            let totals = ledger.totals();
            info!(
                user_id = %user_id,
                date = %date,
                punch_type = %punch_type,
                manual,
                state = %ledger.state(),
                work_min = totals.work_min,
                break_min = totals.break_min,
                "Punch recorded"
            );

            Ok(ledger)
        })
    }

    /// Applies several manual punches for one employee and date atomically.
    ///
    /// All requests must target `user_id` and fall on the same date. Either
    /// every punch is inserted or the ledger is left unchanged.
    pub fn record_manual_batch(
        &self,
        user_id: &str,
        requests: &[ManualPunchRequest],
    ) -> EngineResult<Attendance> {
        let punches = requests
            .iter()
            .map(|request| {
                if request.target_user_id != user_id {
                    return Err(EngineError::invalid_punch(
                        "target_user_id",
                        format!(
                            "batch for {} contains a punch for {}",
                            user_id, request.target_user_id
                        ),
                    ));
                }
                authorize(request)
            })
            .collect::<EngineResult<Vec<Punch>>>()?;

        let Some(date) = punches.first().map(|p| p.at.date()) else {
            return Err(EngineError::invalid_punch("punches", "batch is empty"));
        };

        self.with_user_lock(user_id, || {
            let mut ledger = self.load_or_create(user_id, date)?;
            insert_manual_batch(&mut ledger, punches)?;
            ledger.annotate_statuses(&self.timings);
            self.store.save(&ledger)?;

            info!(
                user_id = %user_id,
                date = %date,
                punches = requests.len(),
                work_min = ledger.totals().work_min,
                "Manual batch recorded"
            );
            Ok(ledger)
        })
    }

    /// Today's ledger for `user_id`, if any.
    pub fn today_attendance(&self, user_id: &str) -> EngineResult<Option<Attendance>> {
        self.store.load(user_id, self.clock.now().date())
    }

    /// The `limit` most recent ledgers of `user_id`, newest first.
    pub fn attendance_history(&self, user_id: &str, limit: usize) -> EngineResult<Vec<Attendance>> {
        self.store.history(user_id, limit)
    }

    /// Summary of the `limit` most recent ledgers of `user_id`.
    pub fn attendance_summary(&self, user_id: &str, limit: usize) -> EngineResult<AttendanceSummary> {
        let history = self.store.history(user_id, limit)?;
        Ok(summarize(&history, &self.timings))
    }

    /// Today's totals as of now, including a running session.
    ///
    /// Read-only; safe to poll as often as a running clock needs.
    pub fn live_totals(&self, user_id: &str) -> EngineResult<WorkTotals> {
        let now = self.clock.now();
        Ok(self
            .store
            .load(user_id, now.date())?
            .map(|ledger| ledger.live_totals(now))
            .unwrap_or_default())
    }

    /// Today's sessions as of now.
    pub fn today_sessions(&self, user_id: &str) -> EngineResult<Vec<WorkSession>> {
        let now = self.clock.now();
        Ok(self
            .store
            .load(user_id, now.date())?
            .map(|ledger| ledger.sessions(now))
            .unwrap_or_default())
    }

    fn build_punch(
        &self,
        user_id: &str,
        punch_type: PunchType,
        options: PunchOptions,
    ) -> EngineResult<Punch> {
        if user_id.trim().is_empty() {
            return Err(EngineError::invalid_punch("user_id", "a user id is required"));
        }

        let punch = if options.manual_punch {
            let custom_time = match options.custom_time {
                Some(custom_time) => custom_time,
                None => self.clock.now().format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
            };
            authorize(&ManualPunchRequest {
                target_user_id: user_id.to_string(),
                punch_type: punch_type.to_string(),
                custom_time,
                caller_id: options.punched_by.unwrap_or_default(),
                reason: options.reason,
            })?
        } else {
            if options.custom_time.is_some() {
                return Err(EngineError::invalid_punch(
                    "custom_time",
                    "a custom time is only accepted on manual punches",
                ));
            }
            Punch::from_type(punch_type, self.clock.now(), options.reason.as_deref())?
        };

        Ok(punch
            .with_remote(options.remote_punch)
            .with_selfie(options.selfie_url))
    }

    /// The previous date's ledger, closed in memory if it was left open.
    fn close_previous_day(&self, user_id: &str, date: NaiveDate) -> EngineResult<Option<Attendance>> {
        let Some(previous) = date.checked_sub_days(Days::new(1)) else {
            return Ok(None);
        };
        let Some(mut prior) = self.store.load(user_id, previous)? else {
            return Ok(None);
        };
        Ok(rollover_prior_day(&mut prior, date).map(|_| prior))
    }

    fn load_or_create(&self, user_id: &str, date: NaiveDate) -> EngineResult<Attendance> {
        Ok(self
            .store
            .load(user_id, date)?
            .unwrap_or_else(|| Attendance::new(user_id, date)))
    }

    /// Runs `f` holding the punch lock of `user_id`.
    ///
    /// Lock entries are dropped again once no other submission for the user
    /// holds or awaits them, so the map only holds users with work in flight.
    fn with_user_lock<T>(
        &self,
        user_id: &str,
        f: impl FnOnce() -> EngineResult<T>,
    ) -> EngineResult<T> {
        let lock = {
            let mut locks = self
                .user_locks
                .lock()
                .map_err(|_| lock_poisoned(user_id))?;
            Arc::clone(locks.entry(user_id.to_string()).or_default())
        };

        let result = match lock.lock() {
            Ok(_guard) => f(),
            Err(_) => Err(lock_poisoned(user_id)),
        };

        if let Ok(mut locks) = self.user_locks.lock() {
            // One reference in the map, one held here.
            if Arc::strong_count(&lock) == 2 {
                locks.remove(user_id);
            }
        }
        result
    }
}

fn lock_poisoned(user_id: &str) -> EngineError {
    EngineError::Storage {
        message: format!("punch lock for {} poisoned", user_id),
    }
}

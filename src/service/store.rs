//! Attendance persistence boundary.
//!
//! The engine reads and writes ledgers through [`AttendanceStore`]. The real
//! document store lives outside this crate; [`InMemoryStore`] is a
//! thread-safe reference implementation.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::NaiveDate;

use crate::error::{EngineError, EngineResult};
use crate::models::Attendance;

/// Storage for attendance ledgers keyed by `(user_id, date)`.
///
/// Failures are returned as [`EngineError::Storage`] and propagated to the
/// caller unchanged; retry policy belongs to the implementation.
pub trait AttendanceStore: Send + Sync {
    /// Loads the ledger of `user_id` for `date`, if any.
    fn load(&self, user_id: &str, date: NaiveDate) -> EngineResult<Option<Attendance>>;

    /// Inserts or replaces a ledger.
    fn save(&self, attendance: &Attendance) -> EngineResult<()>;

    /// The most recent `limit` ledgers of `user_id`, newest first.
    fn history(&self, user_id: &str, limit: usize) -> EngineResult<Vec<Attendance>>;
}

/// An in-process [`AttendanceStore`].
#[derive(Debug, Default)]
pub struct InMemoryStore {
    ledgers: RwLock<HashMap<(String, NaiveDate), Attendance>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored ledgers.
    pub fn len(&self) -> EngineResult<usize> {
        Ok(self.ledgers.read().map_err(poisoned)?.len())
    }

    /// Returns true if nothing has been stored.
    pub fn is_empty(&self) -> EngineResult<bool> {
        Ok(self.len()? == 0)
    }
}

fn poisoned<T>(_: T) -> EngineError {
    EngineError::Storage {
        message: "attendance store lock poisoned".to_string(),
    }
}

impl AttendanceStore for InMemoryStore {
    fn load(&self, user_id: &str, date: NaiveDate) -> EngineResult<Option<Attendance>> {
        let ledgers = self.ledgers.read().map_err(poisoned)?;
        Ok(ledgers.get(&(user_id.to_string(), date)).cloned())
    }

    fn save(&self, attendance: &Attendance) -> EngineResult<()> {
        let mut ledgers = self.ledgers.write().map_err(poisoned)?;
        ledgers.insert(
            (attendance.user_id().to_string(), attendance.date()),
            attendance.clone(),
        );
        Ok(())
    }

    fn history(&self, user_id: &str, limit: usize) -> EngineResult<Vec<Attendance>> {
        let ledgers = self.ledgers.read().map_err(poisoned)?;
        let mut matching: Vec<Attendance> = ledgers
            .values()
            .filter(|a| a.user_id() == user_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.date().cmp(&a.date()));
        matching.truncate(limit);
        Ok(matching)
    }
}

//! Error types for the attendance engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure a single punch submission can run into.

use chrono::NaiveDateTime;
use thiserror::Error;

/// The main error type for the attendance engine.
///
/// Every failure is scoped to one operation; there is no global fatal state.
///
/// # Example
///
/// ```
/// use attendance_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/store_timings.yaml".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Configuration file not found: /missing/store_timings.yaml"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A store timing key was missing, malformed or inconsistent.
    #[error("Invalid store timing '{key}': {value}")]
    InvalidStoreTiming {
        /// The configuration key.
        key: String,
        /// The offending value or a description of the problem.
        value: String,
    },

    /// A punch submission failed validation before any mutation.
    #[error("Invalid punch field '{field}': {message}")]
    InvalidPunch {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A manual punch would break the punch state machine.
    #[error("Punch {next} cannot follow {previous} (at {at})")]
    PunchOrderViolation {
        /// The punch type (or state) preceding the insertion point.
        previous: String,
        /// The punch type that would follow it.
        next: String,
        /// The timestamp of the rejected punch.
        at: NaiveDateTime,
    },

    /// A leave deduction could not be computed.
    #[error("Invalid leave deduction: {message}")]
    InvalidLeave {
        /// A description of the problem.
        message: String,
    },

    /// The attendance store failed; the caller decides whether to retry.
    #[error("Attendance store error: {message}")]
    Storage {
        /// A description of the storage failure.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for an [`EngineError::InvalidPunch`].
    pub fn invalid_punch(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::InvalidPunch {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns true for validation and ordering failures that the caller
    /// should surface to the user rather than retry.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidPunch { .. }
                | EngineError::PunchOrderViolation { .. }
                | EngineError::InvalidLeave { .. }
        )
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

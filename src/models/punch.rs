//! Punch model and related types.
//!
//! A punch is one timestamped attendance event. Type-specific fields live on
//! the [`PunchKind`] variants so that, for example, a break start cannot exist
//! without a reason.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The closed set of punch types.
///
/// # Example
///
/// ```
/// use attendance_engine::models::PunchType;
///
/// let punch_type: PunchType = "BREAK_START".parse().unwrap();
/// assert_eq!(punch_type, PunchType::BreakStart);
/// assert!("LUNCH".parse::<PunchType>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PunchType {
    /// Start of a work session.
    In,
    /// End of a work session.
    Out,
    /// Start of a break; pauses work.
    BreakStart,
    /// End of a break; resumes work.
    BreakEnd,
}

impl PunchType {
    /// All punch types in state-machine order.
    pub const ALL: [PunchType; 4] = [
        PunchType::In,
        PunchType::BreakStart,
        PunchType::BreakEnd,
        PunchType::Out,
    ];

    /// The wire name of the punch type.
    pub fn as_str(&self) -> &'static str {
        match self {
            PunchType::In => "IN",
            PunchType::Out => "OUT",
            PunchType::BreakStart => "BREAK_START",
            PunchType::BreakEnd => "BREAK_END",
        }
    }

    /// Returns true if a punch of this type may directly follow `previous`
    /// (`None` meaning the ledger is empty).
    ///
    /// ```
    /// use attendance_engine::models::PunchType;
    ///
    /// assert!(PunchType::In.can_follow(None));
    /// assert!(PunchType::In.can_follow(Some(PunchType::Out)));
    /// assert!(!PunchType::In.can_follow(Some(PunchType::In)));
    /// assert!(PunchType::Out.can_follow(Some(PunchType::BreakEnd)));
    /// ```
    pub fn can_follow(&self, previous: Option<PunchType>) -> bool {
        use PunchType::*;
        matches!(
            (previous, self),
            (None | Some(Out), In)
                | (Some(In) | Some(BreakEnd), BreakStart)
                | (Some(BreakStart), BreakEnd)
                | (Some(In) | Some(BreakEnd), Out)
        )
    }
}

impl fmt::Display for PunchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PunchType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "IN" => Ok(PunchType::In),
            "OUT" => Ok(PunchType::Out),
            "BREAK_START" => Ok(PunchType::BreakStart),
            "BREAK_END" => Ok(PunchType::BreakEnd),
            other => Err(EngineError::invalid_punch(
                "type",
                format!(
                    "'{}' is not one of IN, OUT, BREAK_START, BREAK_END",
                    other
                ),
            )),
        }
    }
}

/// Type-specific punch payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PunchKind {
    /// Check in.
    In,
    /// Check out.
    Out,
    /// Break start; the reason is mandatory.
    BreakStart {
        /// Why the employee went on break.
        reason: String,
    },
    /// Break end.
    BreakEnd,
}

impl PunchKind {
    /// The punch type of this payload.
    pub fn punch_type(&self) -> PunchType {
        match self {
            PunchKind::In => PunchType::In,
            PunchKind::Out => PunchType::Out,
            PunchKind::BreakStart { .. } => PunchType::BreakStart,
            PunchKind::BreakEnd => PunchType::BreakEnd,
        }
    }

    /// Builds the payload for `punch_type`, enforcing the break reason.
    pub fn from_type(punch_type: PunchType, reason: Option<&str>) -> EngineResult<Self> {
        Ok(match punch_type {
            PunchType::In => PunchKind::In,
            PunchType::Out => PunchKind::Out,
            PunchType::BreakEnd => PunchKind::BreakEnd,
            PunchType::BreakStart => {
                let reason = reason.map(str::trim).filter(|r| !r.is_empty()).ok_or_else(
                    || EngineError::invalid_punch("reason", "a reason is required for BREAK_START"),
                )?;
                PunchKind::BreakStart {
                    reason: reason.to_string(),
                }
            }
        })
    }
}

/// Classification of an IN or OUT punch against store hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PunchStatus {
    /// Exactly at the expected time.
    OnTime,
    /// Arrived after the expected start.
    Late,
    /// Arrived before the expected start, or left before the expected end.
    Early,
    /// Left after the expected end.
    Overtime,
}

impl PunchStatus {
    /// The label used in status messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            PunchStatus::OnTime => "on-time",
            PunchStatus::Late => "late",
            PunchStatus::Early => "early",
            PunchStatus::Overtime => "overtime",
        }
    }
}

impl fmt::Display for PunchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One timestamped attendance event.
///
/// # Example
///
/// ```
/// use attendance_engine::models::{Punch, PunchKind, PunchType};
/// use chrono::NaiveDateTime;
///
/// let at = NaiveDateTime::parse_from_str("2026-01-15 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// let punch = Punch::new(PunchKind::In, at).with_remote(true);
///
/// assert_eq!(punch.punch_type(), PunchType::In);
/// assert!(punch.remote_punch);
/// assert!(!punch.manual_punch);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Punch {
    /// Local wall-clock time of the event.
    pub at: NaiveDateTime,
    /// Type-specific payload.
    #[serde(flatten)]
    pub kind: PunchKind,
    /// Optional free-text reason for non-break punches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// True if an administrator entered the punch on the employee's behalf.
    #[serde(default)]
    pub manual_punch: bool,
    /// The administrator who entered a manual punch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub punched_by: Option<String>,
    /// Off-site check-in.
    #[serde(default)]
    pub remote_punch: bool,
    /// Reference to a verification image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selfie_url: Option<String>,
    /// Cached classifier status (IN/OUT only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PunchStatus>,
    /// Cached classifier message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    /// True for the OUT generated when a session is closed at midnight.
    #[serde(default)]
    pub synthetic: bool,
}

impl Punch {
    /// Creates a plain employee punch.
    pub fn new(kind: PunchKind, at: NaiveDateTime) -> Self {
        Self {
            at,
            kind,
            note: None,
            manual_punch: false,
            punched_by: None,
            remote_punch: false,
            selfie_url: None,
            status: None,
            status_message: None,
            synthetic: false,
        }
    }

    /// Creates a punch from a bare type, validating type-specific fields.
    ///
    /// The reason becomes the break reason for `BREAK_START` and an optional
    /// note for every other type.
    pub fn from_type(
        punch_type: PunchType,
        at: NaiveDateTime,
        reason: Option<&str>,
    ) -> EngineResult<Self> {
        let kind = PunchKind::from_type(punch_type, reason)?;
        let mut punch = Self::new(kind, at);
        if punch_type != PunchType::BreakStart {
            punch.note = reason
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string);
        }
        Ok(punch)
    }

    /// The punch type.
    pub fn punch_type(&self) -> PunchType {
        self.kind.punch_type()
    }

    /// The break reason, or the free-text note for other types.
    pub fn reason(&self) -> Option<&str> {
        match &self.kind {
            PunchKind::BreakStart { reason } => Some(reason),
            _ => self.note.as_deref(),
        }
    }

    /// Marks the punch as entered by `admin_id`.
    pub fn with_manual(mut self, admin_id: impl Into<String>) -> Self {
        self.manual_punch = true;
        self.punched_by = Some(admin_id.into());
        self
    }

    /// Sets the off-site flag.
    pub fn with_remote(mut self, remote: bool) -> Self {
        self.remote_punch = remote;
        self
    }

    /// Attaches a verification image reference.
    pub fn with_selfie(mut self, selfie_url: Option<String>) -> Self {
        self.selfie_url = selfie_url;
        self
    }

    pub(crate) fn synthetic_out(at: NaiveDateTime) -> Self {
        let mut punch = Self::new(PunchKind::Out, at);
        punch.synthetic = true;
        punch
    }
}

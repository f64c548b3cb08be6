//! Punch submission options.

use serde::{Deserialize, Serialize};

/// Optional fields accompanying a punch submission.
///
/// # Example
///
/// ```
/// use attendance_engine::service::PunchOptions;
///
/// let options = PunchOptions::manual("admin_1", "2026-01-15 09:00")
///     .with_reason("badge reader offline");
/// assert!(options.manual_punch);
/// assert_eq!(options.custom_time.as_deref(), Some("2026-01-15 09:00"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunchOptions {
    /// Required for `BREAK_START`, an optional note otherwise.
    #[serde(default)]
    pub reason: Option<String>,
    /// Entered by an administrator on the employee's behalf.
    #[serde(default)]
    pub manual_punch: bool,
    /// The administrator entering a manual punch.
    #[serde(default)]
    pub punched_by: Option<String>,
    /// Caller-supplied local timestamp; manual punches only.
    #[serde(default)]
    pub custom_time: Option<String>,
    /// Off-site check-in.
    #[serde(default)]
    pub remote_punch: bool,
    /// Reference to a verification image.
    #[serde(default)]
    pub selfie_url: Option<String>,
}

impl PunchOptions {
    /// Options for a manual punch entered by `admin_id` at `custom_time`.
    pub fn manual(admin_id: impl Into<String>, custom_time: impl Into<String>) -> Self {
        Self {
            manual_punch: true,
            punched_by: Some(admin_id.into()),
            custom_time: Some(custom_time.into()),
            ..Self::default()
        }
    }

    /// Sets the reason.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Sets the off-site flag.
    pub fn with_remote(mut self, remote: bool) -> Self {
        self.remote_punch = remote;
        self
    }

    /// Sets the selfie reference.
    pub fn with_selfie(mut self, selfie_url: impl Into<String>) -> Self {
        self.selfie_url = Some(selfie_url.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_options() {
        let options: PunchOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, PunchOptions::default());
    }

    #[test]
    fn test_deserialize_manual_options() {
        let json = r#"{
            "manual_punch": true,
            "punched_by": "admin_1",
            "custom_time": "2026-01-15T09:00:00",
            "reason": "forgot"
        }"#;
        let options: PunchOptions = serde_json::from_str(json).unwrap();
        assert!(options.manual_punch);
        assert_eq!(options.punched_by.as_deref(), Some("admin_1"));
        assert_eq!(options.reason.as_deref(), Some("forgot"));
    }
}

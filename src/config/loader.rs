//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading store timings
//! from a YAML file.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{RawStoreTimings, StoreTimings};

/// File name of the store timings document inside a configuration directory.
pub const STORE_TIMINGS_FILE: &str = "store_timings.yaml";

/// Loads and validates the store timings configuration.
///
/// # Directory Structure
///
/// ```text
/// config/store/
/// └── store_timings.yaml   # morning/lunch/evening windows as HH:MM
/// ```
///
/// Loading fails fast: a missing file, invalid YAML, a missing key or a
/// malformed time is an error here rather than a silent default later.
///
/// # Example
///
/// ```no_run
/// use attendance_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/store")?;
/// println!("Store opens at {}", loader.timings().morning_start());
/// # Ok::<(), attendance_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    timings: StoreTimings,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let file = path.as_ref().join(STORE_TIMINGS_FILE);
        let path_str = file.display().to_string();

        let content = fs::read_to_string(&file).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse(&content, &path_str)
    }

    /// Parses an in-memory YAML document.
    ///
    /// # Example
    ///
    /// ```
    /// use attendance_engine::config::ConfigLoader;
    ///
    /// let yaml = r#"
    /// morningStart: "09:30"
    /// morningEnd: "13:00"
    /// lunchStart: "13:00"
    /// lunchEnd: "14:00"
    /// eveningStart: "14:00"
    /// eveningEnd: "21:00"
    /// "#;
    /// let loader = ConfigLoader::from_yaml_str(yaml)?;
    /// assert_eq!(loader.timings().evening_end_minutes(), 21 * 60);
    /// # Ok::<(), attendance_engine::error::EngineError>(())
    /// ```
    pub fn from_yaml_str(content: &str) -> EngineResult<Self> {
        Self::parse(content, "<inline>")
    }

    fn parse(content: &str, origin: &str) -> EngineResult<Self> {
        let raw: RawStoreTimings =
            serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
                path: origin.to_string(),
                message: e.to_string(),
            })?;

        let timings = StoreTimings::from_raw(&raw)?;
        Ok(Self { timings })
    }

    /// Returns the validated store timings.
    pub fn timings(&self) -> &StoreTimings {
        &self.timings
    }

    /// Consumes the loader and returns the store timings.
    pub fn into_timings(self) -> StoreTimings {
        self.timings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_path() -> &'static str {
        "./config/store"
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let timings = result.unwrap().into_timings();
        assert_eq!(timings.morning_start_minutes(), 9 * 60 + 30);
        assert_eq!(timings.evening_end_minutes(), 21 * 60);
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains(STORE_TIMINGS_FILE));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_yaml_returns_parse_error() {
        let result = ConfigLoader::from_yaml_str("morning_start: [unclosed");
        assert!(matches!(result, Err(EngineError::ConfigParseError { .. })));
    }

    #[test]
    fn test_snake_case_keys_are_accepted() {
        let yaml = r#"
morning_start: "08:00"
morning_end: "12:00"
lunch_start: "12:00"
lunch_end: "12:45"
evening_start: "12:45"
evening_end: "17:00"
"#;
        let loader = ConfigLoader::from_yaml_str(yaml).unwrap();
        assert_eq!(loader.timings().morning_start_minutes(), 480);
    }

    #[test]
    fn test_malformed_time_fails_fast() {
        let yaml = r#"
morningStart: "9.30"
morningEnd: "13:00"
lunchStart: "13:00"
lunchEnd: "14:00"
eveningStart: "14:00"
eveningEnd: "21:00"
"#;
        match ConfigLoader::from_yaml_str(yaml) {
            Err(EngineError::InvalidStoreTiming { key, value }) => {
                assert_eq!(key, "morning_start");
                assert_eq!(value, "9.30");
            }
            other => panic!("Expected InvalidStoreTiming, got {:?}", other),
        }
    }
}

//! Configuration loading for the attendance engine.
//!
//! This module loads the store opening hours used to classify arrivals and
//! departures.
//!
//! # Example
//!
//! ```no_run
//! use attendance_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/store").unwrap();
//! println!("Store closes at {}", config.timings().evening_end());
//! ```

mod loader;
mod types;

pub use loader::{ConfigLoader, STORE_TIMINGS_FILE};
pub use types::{
    RawStoreTimings, StoreTimings, TimeWindow, minutes_since_midnight, parse_hhmm,
};

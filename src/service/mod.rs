//! Punch recording and attendance reads.
//!
//! [`AttendanceService`] ties the calculation layer to a persistence boundary
//! ([`AttendanceStore`]) and a time source ([`Clock`]).
//!
//! # Example
//!
//! ```no_run
//! use attendance_engine::config::ConfigLoader;
//! use attendance_engine::models::PunchType;
//! use attendance_engine::service::{AttendanceService, InMemoryStore, PunchOptions};
//!
//! let config = ConfigLoader::load("./config/store").unwrap();
//! let service = AttendanceService::from_config(config, InMemoryStore::new());
//! let ledger = service
//!     .record_punch("emp_001", PunchType::In, PunchOptions::default())
//!     .unwrap();
//! println!("{} is {}", ledger.user_id(), ledger.state());
//! ```

mod clock;
mod recorder;
mod request;
mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use recorder::AttendanceService;
pub use request::PunchOptions;
pub use store::{AttendanceStore, InMemoryStore};

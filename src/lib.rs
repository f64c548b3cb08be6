//! Staff attendance engine.
//!
//! This crate records staff punches (IN, OUT, BREAK_START, BREAK_END) into
//! per-day ledgers and derives work and break minutes from them. It
//! classifies arrivals and departures against store hours, closes sessions
//! left open over midnight, validates administrator-entered punches and
//! computes leave deductions.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod service;

//! Shared building blocks for the campus energy dashboard.
//!
//! Holds the error taxonomy, the canonical reading table and its derived
//! rollup rows, timestamp parsing and calendar bucketing, number
//! formatting, and the command-line settings.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{EnergyError, Result};
pub use models::{BuildingSummary, DailyTotal, Reading, ReadingTable, WeeklyTotal};

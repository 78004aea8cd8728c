//! Ingestion and aggregation layer for the campus energy dashboard.
//!
//! Responsible for discovering and reading per-building CSV meter exports,
//! merging them into one reading table, computing daily, weekly and
//! per-building rollups, and running the top-level pipeline.

pub mod aggregator;
pub mod loader;
pub mod merger;
pub mod pipeline;

pub use energy_core as core;

//! Output side of the campus energy dashboard.
//!
//! Turns a finished [`energy_data::pipeline::AnalysisResult`] into the
//! cleaned-data and summary CSV files, the plain-text report and the SVG
//! dashboard chart.

pub mod chart;
pub mod writer;

pub use writer::{write_report, ReportOptions};

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::{EnergyError, Result};

/// Column holding the canonical reading time.
pub const TIMESTAMP_COLUMN: &str = "timestamp";
/// Column holding the metered energy quantity.
pub const KWH_COLUMN: &str = "kwh";
/// Column holding the building a reading belongs to.
pub const BUILDING_COLUMN: &str = "building";

/// A single meter reading, one row of a [`ReadingTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    /// Reading time as written in the source file (no timezone).
    pub timestamp: NaiveDateTime,
    /// Building tag assigned when the source file was loaded.
    pub building: String,
    /// Energy in kWh; `None` when the source cell or column is absent.
    pub kwh: Option<f64>,
    /// Any other source columns, kept verbatim.
    pub extra: BTreeMap<String, String>,
}

impl Reading {
    /// Text value of `column` for this row, or `None` when it is null.
    ///
    /// Timestamps render as `%Y-%m-%d %H:%M:%S`.
    pub fn value(&self, column: &str) -> Option<String> {
        match column {
            TIMESTAMP_COLUMN => Some(self.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()),
            BUILDING_COLUMN => Some(self.building.clone()),
            KWH_COLUMN => self.kwh.map(|v| v.to_string()),
            other => self.extra.get(other).cloned(),
        }
    }
}

/// An ordered column schema plus the rows conforming to it.
///
/// Rows are stored typed; the schema records which columns the table
/// actually carries so that aggregations can refuse a table lacking one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadingTable {
    columns: Vec<String>,
    rows: Vec<Reading>,
}

impl ReadingTable {
    /// A table with the given schema and no rows.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::default();
        for column in columns {
            table.add_column(column);
        }
        table
    }

    /// A table with the given schema and rows.
    pub fn from_parts<I, S>(columns: I, rows: Vec<Reading>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new(columns);
        table.rows = rows;
        table
    }

    /// The designated empty table: no columns, no rows.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append `column` to the schema unless it is already present.
    pub fn add_column(&mut self, column: impl Into<String>) {
        let column = column.into();
        if !self.has_column(&column) {
            self.columns.push(column);
        }
    }

    pub fn push(&mut self, reading: Reading) {
        self.rows.push(reading);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Reading] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Reading> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// `true` when the table holds no rows, whatever its schema.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Fail with [`EnergyError::MissingColumn`] for the first absent column.
    pub fn require_columns(&self, columns: &[&str]) -> Result<()> {
        match columns.iter().find(|c| !self.has_column(c)) {
            Some(missing) => Err(EnergyError::MissingColumn((*missing).to_string())),
            None => Ok(()),
        }
    }

    /// Distinct building tags in first-seen order.
    pub fn buildings(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !seen.contains(&row.building.as_str()) {
                seen.push(&row.building);
            }
        }
        seen
    }

    /// Total kWh across every row; nulls are skipped.
    pub fn total_kwh(&self) -> f64 {
        self.rows.iter().filter_map(|r| r.kwh).sum()
    }
}

// ── Derived tables ────────────────────────────────────────────────────────────

/// Summed consumption of one building on one calendar date.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub building: String,
    pub kwh: f64,
}

/// Summed consumption of one building in one ISO week number.
///
/// The key carries no year: week 1 of 2024 and week 1 of 2025 share a row.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyTotal {
    pub week: u32,
    pub building: String,
    pub kwh: f64,
}

/// Per-building statistics over all of its readings.
///
/// `mean`, `min` and `max` are `None` when the building has no non-null
/// reading; `sum` is then `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildingSummary {
    pub building: String,
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub sum: f64,
}

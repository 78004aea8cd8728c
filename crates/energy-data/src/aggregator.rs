//! Daily, weekly and per-building rollups over the unified reading table.
//!
//! Every function reads the table it is given and returns fresh rows; the
//! table itself is never extended with derived columns.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use energy_core::error::Result;
use energy_core::models::{
    BuildingSummary, DailyTotal, ReadingTable, WeeklyTotal, BUILDING_COLUMN, KWH_COLUMN,
    TIMESTAMP_COLUMN,
};
use energy_core::time_utils::{calendar_date, iso_week_number};

/// Columns every rollup needs.
const REQUIRED_COLUMNS: &[&str] = &[KWH_COLUMN, TIMESTAMP_COLUMN, BUILDING_COLUMN];

// ── KwhStats ──────────────────────────────────────────────────────────────────

/// Running statistics over the non-null readings of one group.
#[derive(Debug, Clone, Default)]
pub struct KwhStats {
    pub count: u64,
    pub sum: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl KwhStats {
    /// Fold one reading into the totals; nulls are ignored.
    pub fn add(&mut self, kwh: Option<f64>) {
        let Some(v) = kwh else {
            return;
        };
        self.count += 1;
        self.sum += v;
        self.min = Some(self.min.map_or(v, |m| m.min(v)));
        self.max = Some(self.max.map_or(v, |m| m.max(v)));
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

// ── ConsumptionAggregator ─────────────────────────────────────────────────────

/// Stateless helper that groups readings by building and time bucket.
pub struct ConsumptionAggregator;

impl ConsumptionAggregator {
    /// Sum `kwh` per (calendar date, building).
    ///
    /// Returns rows sorted by date, then building.
    pub fn daily_totals(table: &ReadingTable) -> Result<Vec<DailyTotal>> {
        let groups = Self::sum_by(table, calendar_date)?;
        Ok(groups
            .into_iter()
            .map(|((date, building), kwh)| DailyTotal {
                date,
                building,
                kwh,
            })
            .collect())
    }

    /// Sum `kwh` per (ISO week number, building).
    ///
    /// The year is not part of the key, so the same week number in two
    /// different years lands in one row.  Returns rows sorted by week, then
    /// building.
    pub fn weekly_totals(table: &ReadingTable) -> Result<Vec<WeeklyTotal>> {
        let groups = Self::sum_by(table, iso_week_number)?;
        Ok(groups
            .into_iter()
            .map(|((week, building), kwh)| WeeklyTotal {
                week,
                building,
                kwh,
            })
            .collect())
    }

    /// Mean, min, max and sum of `kwh` per building, sorted by building.
    pub fn summary(table: &ReadingTable) -> Result<Vec<BuildingSummary>> {
        table.require_columns(REQUIRED_COLUMNS)?;

        let mut groups: BTreeMap<&str, KwhStats> = BTreeMap::new();
        for row in table.rows() {
            groups.entry(&row.building).or_default().add(row.kwh);
        }

        Ok(groups
            .into_iter()
            .map(|(building, stats)| BuildingSummary {
                building: building.to_string(),
                mean: stats.mean(),
                min: stats.min,
                max: stats.max,
                sum: stats.sum,
            })
            .collect())
    }

    /// The building with the largest `sum`; the first one listed wins a tie.
    pub fn highest_consumer(summary: &[BuildingSummary]) -> Option<&BuildingSummary> {
        summary.iter().fold(None, |best, s| match best {
            Some(b) if b.sum >= s.sum => Some(b),
            _ => Some(s),
        })
    }

    /// Group rows by (`bucket(timestamp)`, building) and sum `kwh`.
    ///
    /// Groups whose readings are all null still appear, with a zero sum.
    fn sum_by<K, F>(table: &ReadingTable, bucket: F) -> Result<BTreeMap<(K, String), f64>>
    where
        K: Ord,
        F: Fn(&NaiveDateTime) -> K,
    {
        table.require_columns(REQUIRED_COLUMNS)?;

        let mut groups: BTreeMap<(K, String), f64> = BTreeMap::new();
        for row in table.rows() {
            let total = groups
                .entry((bucket(&row.timestamp), row.building.clone()))
                .or_insert(0.0);
            *total += row.kwh.unwrap_or(0.0);
        }
        Ok(groups)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

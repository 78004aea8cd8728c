//! Main analysis pipeline for the campus energy dashboard.
//!
//! Runs loading, merging and aggregation, returning either the finished
//! tables or the reason the run stopped before aggregating.

use std::path::{Path, PathBuf};

use energy_core::error::Result;
use energy_core::models::{BuildingSummary, DailyTotal, ReadingTable, WeeklyTotal};
use tracing::info;

use crate::aggregator::ConsumptionAggregator;
use crate::loader::{BuildingNamer, CsvLoader, FileFailure};
use crate::merger::merge_tables;

// ── Public types ──────────────────────────────────────────────────────────────

/// Why a run stopped before aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HaltReason {
    /// The source directory does not exist.
    SourceMissing(PathBuf),
    /// The directory held no loadable CSV file, or only header rows.
    NoDataLoaded(PathBuf),
}

impl std::fmt::Display for HaltReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HaltReason::SourceMissing(dir) => {
                write!(f, "The data directory '{}' was not found.", dir.display())
            }
            HaltReason::NoDataLoaded(dir) => write!(
                f,
                "No CSV files were successfully loaded from '{}'. Cannot continue analysis.",
                dir.display()
            ),
        }
    }
}

/// The complete output of a successful run.
#[derive(Debug)]
pub struct AnalysisResult {
    /// Every loaded reading, for charting and the cleaned-data export.
    pub readings: ReadingTable,
    pub daily: Vec<DailyTotal>,
    pub weekly: Vec<WeeklyTotal>,
    pub summary: Vec<BuildingSummary>,
    /// Files that were skipped while loading.
    pub skipped_files: Vec<FileFailure>,
}

impl AnalysisResult {
    /// Total kWh across all buildings.
    pub fn total_kwh(&self) -> f64 {
        self.readings.total_kwh()
    }

    /// The building with the largest summed consumption.
    pub fn highest_consumer(&self) -> Option<&BuildingSummary> {
        ConsumptionAggregator::highest_consumer(&self.summary)
    }
}

/// How a run ended, short of a fatal error.
#[derive(Debug)]
pub enum PipelineOutcome {
    Completed(AnalysisResult),
    Halted(HaltReason),
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Load and merge every CSV in `data_dir` into one table.
///
/// Returns the halt reason instead when nothing could be loaded.
pub fn load_unified<N: BuildingNamer>(
    data_dir: &Path,
    loader: &CsvLoader<N>,
) -> std::result::Result<(ReadingTable, Vec<FileFailure>), HaltReason> {
    let outcome = loader.load_dir(data_dir);
    if outcome.source_missing {
        return Err(HaltReason::SourceMissing(data_dir.to_path_buf()));
    }

    let unified = merge_tables(outcome.tables);
    if unified.is_empty() {
        return Err(HaltReason::NoDataLoaded(data_dir.to_path_buf()));
    }
    Ok((unified, outcome.failures))
}

/// Run the full pipeline.
///
/// 1. Load each CSV in `data_dir`, skipping files that fail.
/// 2. Merge them into one table; halt if it is empty.
/// 3. Compute daily, weekly and per-building rollups.
///
/// A missing directory or empty result is a [`PipelineOutcome::Halted`],
/// left unlogged for the caller to report; a table lacking a required
/// column is an `Err`.
pub fn run_pipeline<N: BuildingNamer>(
    data_dir: &Path,
    loader: &CsvLoader<N>,
) -> Result<PipelineOutcome> {
    // ── Step 1 + 2: Load and merge ────────────────────────────────────────────
    let (readings, skipped_files) = match load_unified(data_dir, loader) {
        Ok(loaded) => loaded,
        Err(reason) => return Ok(PipelineOutcome::Halted(reason)),
    };

    info!(
        "Loaded {} readings for {} buildings ({} files skipped)",
        readings.len(),
        readings.buildings().len(),
        skipped_files.len()
    );

    // ── Step 3: Aggregate ─────────────────────────────────────────────────────
    let daily = ConsumptionAggregator::daily_totals(&readings)?;
    let weekly = ConsumptionAggregator::weekly_totals(&readings)?;
    let summary = ConsumptionAggregator::summary(&readings)?;

    Ok(PipelineOutcome::Completed(AnalysisResult {
        readings,
        daily,
        weekly,
        summary,
        skipped_files,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use energy_core::error::EnergyError;
    use tempfile::TempDir;

    fn write_csv(dir: &Path, name: &str, contents: &str) {
        std::fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn test_run_pipeline_missing_dir_halts() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("data");

        let outcome = run_pipeline(&missing, &CsvLoader::new()).unwrap();
        match outcome {
            PipelineOutcome::Halted(HaltReason::SourceMissing(p)) => assert_eq!(p, missing),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_run_pipeline_all_files_bad_halts() {
        let dir = TempDir::new().unwrap();
        write_csv(dir.path(), "A.csv", "time,kwh\n2024-01-01,1\n");

        let outcome = run_pipeline(dir.path(), &CsvLoader::new()).unwrap();
        assert!(matches!(
            outcome,
            PipelineOutcome::Halted(HaltReason::NoDataLoaded(_))
        ));
    }

    #[test]
    fn test_run_pipeline_header_only_halts() {
        let dir = TempDir::new().unwrap();
        write_csv(dir.path(), "A.csv", "timestamp,kwh\n");

        let outcome = run_pipeline(dir.path(), &CsvLoader::new()).unwrap();
        assert!(matches!(
            outcome,
            PipelineOutcome::Halted(HaltReason::NoDataLoaded(_))
        ));
    }

    #[test]
    fn test_run_pipeline_missing_kwh_is_fatal() {
        let dir = TempDir::new().unwrap();
        write_csv(dir.path(), "A.csv", "timestamp,reading\n2024-01-01,1\n");

        let err = run_pipeline(dir.path(), &CsvLoader::new()).unwrap_err();
        assert!(matches!(err, EnergyError::MissingColumn(c) if c == "kwh"));
    }

    #[test]
    fn test_run_pipeline_completed_reports_skips() {
        let dir = TempDir::new().unwrap();
        write_csv(dir.path(), "A.csv", "timestamp,kwh\n2024-01-01T00:00,5\n");
        write_csv(dir.path(), "Broken.csv", "timestamp,kwh\nsoon,1\n");

        let outcome = run_pipeline(dir.path(), &CsvLoader::new()).unwrap();
        let PipelineOutcome::Completed(result) = outcome else {
            panic!("pipeline should complete");
        };
        assert_eq!(result.readings.len(), 1);
        assert_eq!(result.skipped_files.len(), 1);
        assert_eq!(result.total_kwh(), 5.0);
        assert_eq!(result.highest_consumer().map(|s| s.building.as_str()), Some("A"));
    }

    #[test]
    fn test_halt_reason_display() {
        let reason = HaltReason::SourceMissing(PathBuf::from("data"));
        assert_eq!(reason.to_string(), "The data directory 'data' was not found.");
    }
}

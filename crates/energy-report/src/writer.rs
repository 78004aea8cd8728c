//! Flat-file sink for a finished analysis run.

use std::fs;
use std::path::{Path, PathBuf};

use energy_core::error::{EnergyError, Result};
use energy_core::formatting::format_kwh;
use energy_core::models::{BuildingSummary, ReadingTable};
use energy_data::pipeline::AnalysisResult;
use tracing::{debug, info};

use crate::chart::render_dashboard;

pub const CLEANED_DATA_FILE: &str = "cleaned_energy_data.csv";
pub const BUILDING_SUMMARY_FILE: &str = "building_summary.csv";
pub const SUMMARY_TEXT_FILE: &str = "summary.txt";
pub const DASHBOARD_FILE: &str = "dashboard.svg";

/// What [`write_report`] should produce besides the CSV and text files.
#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    pub chart: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self { chart: true }
    }
}

/// Write every output file for `result` into `output_dir`.
///
/// The directory is created when missing.  Returns the written paths in
/// the order they were produced.
pub fn write_report(
    output_dir: &Path,
    result: &AnalysisResult,
    options: ReportOptions,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)?;
    let mut written = Vec::new();

    if options.chart {
        let path = output_dir.join(DASHBOARD_FILE);
        render_dashboard(&path, &result.daily)?;
        written.push(path);
    }

    let path = output_dir.join(CLEANED_DATA_FILE);
    write_cleaned_data(&path, &result.readings)?;
    written.push(path);

    let path = output_dir.join(BUILDING_SUMMARY_FILE);
    write_building_summary(&path, &result.summary)?;
    written.push(path);

    let path = output_dir.join(SUMMARY_TEXT_FILE);
    fs::write(&path, render_summary_text(result))?;
    written.push(path);

    info!(
        "Wrote {} output files to {}",
        written.len(),
        output_dir.display()
    );
    Ok(written)
}

/// Write the unified table in schema order; nulls become empty cells.
pub fn write_cleaned_data(path: &Path, table: &ReadingTable) -> Result<()> {
    let csv_err = |source: csv::Error| EnergyError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut wtr = csv::Writer::from_path(path).map_err(csv_err)?;
    wtr.write_record(table.columns()).map_err(csv_err)?;
    for row in table.rows() {
        let record: Vec<String> = table
            .columns()
            .iter()
            .map(|column| row.value(column).unwrap_or_default())
            .collect();
        wtr.write_record(&record).map_err(csv_err)?;
    }
    wtr.flush()?;

    debug!("Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

/// Write one `building,mean,min,max,sum` row per building.
pub fn write_building_summary(path: &Path, summary: &[BuildingSummary]) -> Result<()> {
    let csv_err = |source: csv::Error| EnergyError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut wtr = csv::Writer::from_path(path).map_err(csv_err)?;
    for row in summary {
        wtr.serialize(row).map_err(csv_err)?;
    }
    wtr.flush()?;
    Ok(())
}

/// The plain-text dashboard summary.
pub fn render_summary_text(result: &AnalysisResult) -> String {
    let top = result
        .highest_consumer()
        .map(|s| s.building.as_str())
        .unwrap_or("n/a");

    format!(
        "Campus Energy Dashboard Summary\n\
         --------------------------------\n\
         Total Energy Consumption: {}\n\
         Highest Use Building: {}\n",
        format_kwh(result.total_kwh()),
        top
    )
}

//! CSV discovery and loading for the campus energy dashboard.
//!
//! Reads one meter export per building from a flat source directory and
//! turns each file into a [`ReadingTable`] tagged with its building.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use energy_core::error::{EnergyError, Result};
use energy_core::models::{
    Reading, ReadingTable, BUILDING_COLUMN, KWH_COLUMN, TIMESTAMP_COLUMN,
};
use energy_core::time_utils::parse_timestamp;
use tracing::{debug, warn};

// ── Building naming ───────────────────────────────────────────────────────────

/// Maps a source file to the building tag its rows are filed under.
///
/// Two files mapping to the same tag are merged under that tag.
pub trait BuildingNamer {
    fn building_for(&self, path: &Path) -> String;
}

/// The default naming convention: the file name without its extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileStemNamer;

impl BuildingNamer for FileStemNamer {
    fn building_for(&self, path: &Path) -> String {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl<F> BuildingNamer for F
where
    F: Fn(&Path) -> String,
{
    fn building_for(&self, path: &Path) -> String {
        self(path)
    }
}

// ── Load results ──────────────────────────────────────────────────────────────

/// A source file that was skipped, with the reason.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: EnergyError,
}

/// Everything [`CsvLoader::load_dir`] produced.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    /// One table per successfully loaded file, in enumeration order.
    pub tables: Vec<ReadingTable>,
    /// Files that were skipped.
    pub failures: Vec<FileFailure>,
    /// Set when the source directory does not exist.
    pub source_missing: bool,
}

impl LoadOutcome {
    /// `true` when no file loaded, whatever the reason.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

// ── Discovery ─────────────────────────────────────────────────────────────────

/// Find the `.csv` files directly inside `dir`, sorted by path.
///
/// Sub-directories are not descended into and other extensions are ignored
/// without a diagnostic.  A `.csv` entry that cannot be inspected (a
/// dangling symlink, say) is still listed so that loading it fails with a
/// per-file diagnostic instead of it vanishing.
pub fn find_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(EnergyError::SourceMissing(dir.to_path_buf()));
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_file() => Some(entry.into_path()),
            Ok(_) => None,
            Err(err) => {
                debug!("Cannot inspect directory entry: {}", err);
                err.path().map(Path::to_path_buf)
            }
        })
        .filter(|path| path.extension().map(|ext| ext == "csv").unwrap_or(false))
        .collect();

    files.sort();
    Ok(files)
}

// ── CsvLoader ─────────────────────────────────────────────────────────────────

/// Loads per-building CSV exports.
#[derive(Debug, Clone, Default)]
pub struct CsvLoader<N = FileStemNamer> {
    namer: N,
}

impl CsvLoader<FileStemNamer> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<N: BuildingNamer> CsvLoader<N> {
    /// A loader that tags rows using `namer` instead of the file stem.
    pub fn with_namer(namer: N) -> Self {
        Self { namer }
    }

    /// Load every CSV file in `dir`.
    ///
    /// A missing directory yields an empty outcome with `source_missing`
    /// set; reporting it is left to the caller.  A file that fails to load
    /// is logged, recorded in [`LoadOutcome::failures`] and skipped; it
    /// never stops the others.
    pub fn load_dir(&self, dir: &Path) -> LoadOutcome {
        let mut outcome = LoadOutcome::default();

        let files = match find_csv_files(dir) {
            Ok(files) => files,
            Err(e) => {
                debug!("{}", e);
                outcome.source_missing = true;
                return outcome;
            }
        };

        for path in files {
            match self.load_file(&path) {
                Ok(table) => outcome.tables.push(table),
                Err(error) => {
                    warn!("Skipping {}: {}", display_name(&path), error);
                    outcome.failures.push(FileFailure { path, error });
                }
            }
        }

        debug!(
            "Loaded {} of {} CSV files from {}",
            outcome.tables.len(),
            outcome.tables.len() + outcome.failures.len(),
            dir.display()
        );

        outcome
    }

    /// Load a single CSV file into a table tagged with its building.
    ///
    /// The file must carry a `timestamp` column whose every cell parses;
    /// one bad cell rejects the whole file.  A `kwh` column is optional
    /// here, but when present every cell must be a number or a blank /
    /// `NA`-style marker (read as null); any other text rejects the file
    /// with [`EnergyError::InvalidReading`].
    pub fn load_file(&self, path: &Path) -> Result<ReadingTable> {
        let file = std::fs::File::open(path).map_err(|source| EnergyError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let csv_err = |source: csv::Error| EnergyError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_reader(file);

        let headers = reader.headers().map_err(csv_err)?.clone();
        let ts_idx = headers
            .iter()
            .position(|h| h == TIMESTAMP_COLUMN)
            .ok_or_else(|| EnergyError::FileMissingColumn {
                path: path.to_path_buf(),
                column: TIMESTAMP_COLUMN.to_string(),
            })?;
        let kwh_idx = headers.iter().position(|h| h == KWH_COLUMN);

        let building = self.namer.building_for(path);

        let mut table = ReadingTable::new(headers.iter());
        table.add_column(BUILDING_COLUMN);

        for (idx, record) in reader.records().enumerate() {
            let record = record.map_err(csv_err)?;
            // Header is line 1.
            let line = record
                .position()
                .map(|p| p.line())
                .unwrap_or(idx as u64 + 2);

            let raw_ts = record.get(ts_idx).unwrap_or("");
            let timestamp =
                parse_timestamp(raw_ts).ok_or_else(|| EnergyError::TimestampParse {
                    path: path.to_path_buf(),
                    line,
                    value: raw_ts.to_string(),
                })?;

            let kwh = match kwh_idx.and_then(|i| record.get(i)).map(str::trim) {
                None => None,
                Some(raw) if is_null_marker(raw) => None,
                Some(raw) => Some(raw.parse::<f64>().map_err(|_| {
                    EnergyError::InvalidReading {
                        path: path.to_path_buf(),
                        line,
                        column: KWH_COLUMN.to_string(),
                        value: raw.to_string(),
                    }
                })?),
            };

            let extra: BTreeMap<String, String> = headers
                .iter()
                .zip(record.iter())
                .filter(|(h, v)| {
                    !v.is_empty() && ![TIMESTAMP_COLUMN, KWH_COLUMN, BUILDING_COLUMN].contains(h)
                })
                .map(|(h, v)| (h.to_string(), v.to_string()))
                .collect();

            table.push(Reading {
                timestamp,
                building: building.clone(),
                kwh,
                extra,
            });
        }

        debug!(
            "File {}: {} readings for building {}",
            display_name(path),
            table.len(),
            building
        );

        Ok(table)
    }
}

/// Load every CSV file in `dir` with the default naming convention.
pub fn load_readings(dir: &Path) -> LoadOutcome {
    CsvLoader::new().load_dir(dir)
}

/// Cell texts read as a missing value rather than a number.
const NULL_MARKERS: &[&str] = &["", "NA", "N/A", "n/a", "NaN", "nan", "null", "NULL", "#N/A"];

fn is_null_marker(cell: &str) -> bool {
    NULL_MARKERS.contains(&cell)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

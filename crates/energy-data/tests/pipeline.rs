use std::path::Path;

use chrono::NaiveDate;
use energy_data::aggregator::ConsumptionAggregator;
use energy_data::loader::CsvLoader;
use energy_data::pipeline::{load_unified, run_pipeline, HaltReason, PipelineOutcome};
use tempfile::TempDir;

fn write_csv(dir: &Path, name: &str, contents: &str) {
    std::fs::write(dir.join(name), contents).unwrap();
}

/// Two buildings: A with two days of readings, B with one.
fn campus_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_csv(
        dir.path(),
        "A.csv",
        "timestamp,kwh\n2024-01-01T00:00,5\n2024-01-02T00:00,7\n",
    );
    write_csv(dir.path(), "B.csv", "timestamp,kwh\n2024-01-01T12:00,3\n");
    dir
}

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

#[test]
fn test_unified_table_tags_rows_by_file() {
    let dir = campus_dir();
    let (table, skipped) = load_unified(dir.path(), &CsvLoader::new()).unwrap();

    assert!(skipped.is_empty());
    let tags: Vec<&str> = table.rows().iter().map(|r| r.building.as_str()).collect();
    assert_eq!(tags, vec!["A", "A", "B"]);
    assert_eq!(table.columns(), ["timestamp", "kwh", "building"]);
}

#[test]
fn test_daily_totals_end_to_end() {
    let dir = campus_dir();
    let (table, _) = load_unified(dir.path(), &CsvLoader::new()).unwrap();

    let mut daily: Vec<(NaiveDate, String, f64)> = ConsumptionAggregator::daily_totals(&table)
        .unwrap()
        .into_iter()
        .map(|d| (d.date, d.building, d.kwh))
        .collect();
    daily.sort_by(|a, b| (a.1.as_str(), a.0).cmp(&(b.1.as_str(), b.0)));

    assert_eq!(
        daily,
        vec![
            (date(1), "A".to_string(), 5.0),
            (date(2), "A".to_string(), 7.0),
            (date(1), "B".to_string(), 3.0),
        ]
    );
}

#[test]
fn test_summary_end_to_end() {
    let dir = campus_dir();
    let outcome = run_pipeline(dir.path(), &CsvLoader::new()).unwrap();
    let PipelineOutcome::Completed(result) = outcome else {
        panic!("pipeline should complete");
    };

    let a = result.summary.iter().find(|s| s.building == "A").unwrap();
    assert_eq!((a.sum, a.mean, a.min, a.max), (12.0, Some(6.0), Some(5.0), Some(7.0)));
    let b = result.summary.iter().find(|s| s.building == "B").unwrap();
    assert_eq!((b.sum, b.mean, b.min, b.max), (3.0, Some(3.0), Some(3.0), Some(3.0)));

    assert_eq!(result.total_kwh(), 15.0);
    assert_eq!(result.highest_consumer().unwrap().building, "A");
}

#[test]
fn test_weekly_rollup_merges_days_of_one_iso_week() {
    let dir = TempDir::new().unwrap();
    write_csv(
        dir.path(),
        "Lab.csv",
        "timestamp,kwh\n2024-01-01T09:00,4\n2024-01-03T09:00,6\n",
    );

    let (table, _) = load_unified(dir.path(), &CsvLoader::new()).unwrap();
    let weekly = ConsumptionAggregator::weekly_totals(&table).unwrap();

    assert_eq!(weekly.len(), 1);
    assert_eq!(weekly[0].week, 1);
    assert_eq!(weekly[0].building, "Lab");
    assert_eq!(weekly[0].kwh, 10.0);
}

#[test]
fn test_bad_and_foreign_files_do_not_block_good_ones() {
    let dir = campus_dir();
    write_csv(dir.path(), "C.csv", "timestamp,kwh\nyesterday,9\n");
    write_csv(dir.path(), "D.csv", "date,kwh\n2024-01-01,9\n");
    write_csv(dir.path(), "notes.txt", "timestamp,kwh\n2024-01-01,100\n");

    let (table, skipped) = load_unified(dir.path(), &CsvLoader::new()).unwrap();

    assert_eq!(table.len(), 3);
    assert_eq!(table.buildings(), vec!["A", "B"]);
    let skipped_names: Vec<String> = skipped
        .iter()
        .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(skipped_names, vec!["C.csv", "D.csv"]);
}

#[test]
fn test_empty_and_missing_directories_halt_before_aggregation() {
    let dir = TempDir::new().unwrap();

    let empty = run_pipeline(dir.path(), &CsvLoader::new()).unwrap();
    assert!(matches!(
        empty,
        PipelineOutcome::Halted(HaltReason::NoDataLoaded(_))
    ));

    let missing = run_pipeline(&dir.path().join("data"), &CsvLoader::new()).unwrap();
    assert!(matches!(
        missing,
        PipelineOutcome::Halted(HaltReason::SourceMissing(_))
    ));
}

#[test]
fn test_reloading_is_idempotent() {
    let dir = campus_dir();
    write_csv(
        dir.path(),
        "C.csv",
        "meter,timestamp,kwh\nM9,2024-01-05 10:30:00,2.25\n",
    );

    let loader = CsvLoader::new();
    let (first, _) = load_unified(dir.path(), &loader).unwrap();
    let (second, _) = load_unified(dir.path(), &loader).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.columns(), ["timestamp", "kwh", "building", "meter"]);
}

#[test]
fn test_file_without_kwh_loads_but_fails_aggregation() {
    let dir = TempDir::new().unwrap();
    write_csv(dir.path(), "Annex.csv", "timestamp,temp_c\n2024-01-01,20\n");

    let (table, skipped) = load_unified(dir.path(), &CsvLoader::new()).unwrap();
    assert!(skipped.is_empty());
    assert_eq!(table.len(), 1);

    assert!(ConsumptionAggregator::daily_totals(&table).is_err());
    assert!(ConsumptionAggregator::weekly_totals(&table).is_err());
    assert!(ConsumptionAggregator::summary(&table).is_err());
}

#[test]
fn test_custom_namer_overrides_file_stem() {
    let dir = campus_dir();
    let loader = CsvLoader::with_namer(|path: &Path| {
        format!(
            "Building {}",
            path.file_stem().unwrap().to_string_lossy().to_lowercase()
        )
    });

    let (table, _) = load_unified(dir.path(), &loader).unwrap();
    assert_eq!(table.buildings(), vec!["Building a", "Building b"]);
}

//! Concatenation of per-file reading tables into one unified table.

use energy_core::models::ReadingTable;
use tracing::debug;

/// Concatenate `tables` in order into one table.
///
/// The schema is the union of the inputs' schemas in first-seen column
/// order; rows from a file lacking a column read as null there.  Rows are
/// never dropped or reordered; file order is whatever the caller passes,
/// which for [`crate::loader::CsvLoader::load_dir`] is sorted by path
/// rather than raw directory order.  No input yields [`ReadingTable::empty`],
/// which the caller is expected to check for before aggregating.
pub fn merge_tables(tables: Vec<ReadingTable>) -> ReadingTable {
    if tables.is_empty() {
        return ReadingTable::empty();
    }

    let file_count = tables.len();
    let mut merged = ReadingTable::empty();
    for table in tables {
        for column in table.columns() {
            merged.add_column(column.as_str());
        }
        for row in table.into_rows() {
            merged.push(row);
        }
    }

    debug!(
        "Merged {} tables into {} readings across {} columns",
        file_count,
        merged.len(),
        merged.columns().len()
    );

    merged
}

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the campus energy pipeline.
#[derive(Error, Debug)]
pub enum EnergyError {
    /// The source directory does not exist.
    #[error("Data directory not found: {0}")]
    SourceMissing(PathBuf),

    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file is not a well-formed delimited table.
    #[error("Failed to parse CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A file lacks a column the loader requires.
    #[error("File {path} has no `{column}` column")]
    FileMissingColumn { path: PathBuf, column: String },

    /// A timestamp cell did not match any recognised format.
    #[error("Invalid timestamp {value:?} in {path} line {line}")]
    TimestampParse {
        path: PathBuf,
        line: u64,
        value: String,
    },

    /// A numeric cell could not be read as a number.
    #[error("Invalid `{column}` value {value:?} in {path} line {line}")]
    InvalidReading {
        path: PathBuf,
        line: u64,
        column: String,
        value: String,
    },

    /// A column required by an aggregation is absent from the table.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// The dashboard chart could not be drawn.
    #[error("Chart error: {0}")]
    Chart(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the energy crates.
pub type Result<T> = std::result::Result<T, EnergyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = EnergyError::FileRead {
            path: PathBuf::from("/data/library.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/data/library.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_source_missing() {
        let err = EnergyError::SourceMissing(PathBuf::from("/missing/data"));
        assert_eq!(err.to_string(), "Data directory not found: /missing/data");
    }

    #[test]
    fn test_error_display_timestamp_parse() {
        let err = EnergyError::TimestampParse {
            path: PathBuf::from("hall.csv"),
            line: 3,
            value: "yesterday".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid timestamp \"yesterday\" in hall.csv line 3"
        );
    }

    #[test]
    fn test_error_display_missing_column() {
        let err = EnergyError::MissingColumn("kwh".to_string());
        assert_eq!(err.to_string(), "Missing required column: kwh");
    }

    #[test]
    fn test_error_display_file_missing_column() {
        let err = EnergyError::FileMissingColumn {
            path: PathBuf::from("gym.csv"),
            column: "timestamp".to_string(),
        };
        assert_eq!(err.to_string(), "File gym.csv has no `timestamp` column");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: EnergyError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }
}

//! Store error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading configuration, credentials or workbooks, or
/// while moving files between the working directories.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// No configuration file at the given path.
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// Credential database error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The credential query produced no usable credential.
    #[error("No API credentials found")]
    NoCredentials,

    /// The inbox directory holds more than one entry.
    #[error("Expected exactly one file in {}, found {count}", dir.display())]
    MultipleInputs {
        /// Inbox directory.
        dir: PathBuf,
        /// Entries found.
        count: usize,
    },

    /// The inbox entry is not an `.xlsx` workbook.
    #[error("Input is not an .xlsx file: {}", .0.display())]
    NotXlsx(PathBuf),

    /// The input workbook lacks the listings sheet.
    #[error("Worksheet '{0}' not found")]
    MissingWorksheet(String),

    /// The input workbook could not be read.
    #[error("Failed to read workbook: {0}")]
    Workbook(#[from] calamine::XlsxError),

    /// The report workbook could not be written.
    #[error("Failed to write report: {0}")]
    Report(#[from] rust_xlsxwriter::XlsxError),

    /// Moving the processed input failed.
    #[error("Failed to archive {} to {}: {source}", from.display(), to.display())]
    Archive {
        /// File being archived.
        from: PathBuf,
        /// Intended destination.
        to: PathBuf,
        /// Underlying failure.
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_paths() {
        let err = StoreError::MultipleInputs {
            dir: PathBuf::from("XLSX_ML"),
            count: 2,
        };
        assert_eq!(err.to_string(), "Expected exactly one file in XLSX_ML, found 2");

        let err = StoreError::NotXlsx(PathBuf::from("XLSX_ML/listings.csv"));
        assert!(err.to_string().contains("listings.csv"));
    }

    #[test]
    fn test_archive_error_keeps_source() {
        use std::error::Error as _;

        let err = StoreError::Archive {
            from: PathBuf::from("a.xlsx"),
            to: PathBuf::from("done/a.xlsx"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(err.source().is_some());
    }
}

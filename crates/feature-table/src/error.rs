//! Feature Table Error Types

use std::path::PathBuf;
use thiserror::Error;

/// Errors persisting or reading feature tables
#[derive(Debug, Error)]
pub enum TableError {
    /// Filesystem error
    #[error("I/O error on {}: {reason}", path.display())]
    Io { path: PathBuf, reason: String },

    /// CSV encoding/decoding error
    #[error("CSV error on {}: {reason}", path.display())]
    Csv { path: PathBuf, reason: String },

    /// Header does not match the feature table columns
    #[error("Unexpected header in {}: expected {expected}, found {found}", path.display())]
    HeaderMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },

    /// A cell could not be parsed
    #[error("Invalid '{column}' at row {row} of {}: {reason}", path.display())]
    InvalidCell {
        path: PathBuf,
        row: usize,
        column: &'static str,
        reason: String,
    },

    /// Row stored in a table of another split
    #[error("Row {row} of {} has split '{found}', table is '{expected}'", path.display())]
    SplitMismatch {
        path: PathBuf,
        row: usize,
        expected: String,
        found: String,
    },
}

impl TableError {
    pub(crate) fn csv(path: &std::path::Path, err: csv::Error) -> Self {
        TableError::Csv {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }
    }
}

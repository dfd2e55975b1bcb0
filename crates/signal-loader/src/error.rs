//! Signal Loading Error Types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a segment waveform.
///
/// Every variant carries the resolved file path so the caller can report
/// which record was skipped.
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    /// Waveform file does not exist
    #[error("Waveform file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// File exists but could not be opened or decoded
    #[error("Failed to read {}: {reason}", path.display())]
    Unreadable { path: PathBuf, reason: String },

    /// Waveform column absent from the stored columns
    #[error("Column '{column}' not found in {}", path.display())]
    MissingColumn { path: PathBuf, column: String },

    /// Extension is neither parquet nor csv
    #[error("Unsupported waveform format: {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    /// A cell in the waveform column is not numeric
    #[error("Invalid value in {} at row {row}: {reason}", path.display())]
    InvalidValue {
        path: PathBuf,
        row: usize,
        reason: String,
    },
}

impl LoadError {
    /// Resolved path of the file that failed to load
    pub fn path(&self) -> &PathBuf {
        match self {
            LoadError::NotFound { path }
            | LoadError::Unreadable { path, .. }
            | LoadError::MissingColumn { path, .. }
            | LoadError::UnsupportedFormat { path }
            | LoadError::InvalidValue { path, .. } => path,
        }
    }

    pub(crate) fn unreadable(path: &std::path::Path, err: impl ToString) -> Self {
        LoadError::Unreadable {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }
    }
}

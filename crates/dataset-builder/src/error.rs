//! Dataset Assembly Error Types

use std::path::PathBuf;
use thiserror::Error;

/// Pipeline-level errors that abort dataset assembly
#[derive(Debug, Error)]
pub enum DatasetError {
    /// No metadata tables were supplied
    #[error("No metadata tables configured")]
    NoMetadata,

    /// A metadata table could not be opened or parsed
    #[error("Failed to read metadata table {}: {reason}", path.display())]
    MetadataUnreadable { path: PathBuf, reason: String },

    /// Metadata header does not match the declared schema
    #[error("Metadata table {} is missing required column '{column}'", path.display())]
    SchemaMismatch { path: PathBuf, column: String },

    /// Every row failed to load
    #[error("No waveforms loaded: {failed} of {attempted} metadata rows failed")]
    NoRecordsLoaded { attempted: usize, failed: usize },
}

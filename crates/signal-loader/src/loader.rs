//! Segment Waveform Loader

use crate::error::LoadError;
use crate::{csv_source, parquet_source};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Ordered amplitude samples of one segment/channel
pub type Waveform = Vec<f64>;

/// Which sensor channel to load
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSpec {
    /// Metadata column holding the waveform file reference
    pub reference_column: String,
    /// Column inside the waveform file holding the amplitudes
    pub waveform_column: String,
}

impl Default for ChannelSpec {
    fn default() -> Self {
        Self::microphone()
    }
}

impl ChannelSpec {
    /// IMP23ABSU microphone channel
    pub fn microphone() -> Self {
        Self {
            reference_column: "imp23absu_mic".to_string(),
            waveform_column: "MIC [Waveform]".to_string(),
        }
    }

    /// Build a channel spec from explicit column names
    pub fn new(reference_column: impl Into<String>, waveform_column: impl Into<String>) -> Self {
        Self {
            reference_column: reference_column.into(),
            waveform_column: waveform_column.into(),
        }
    }
}

/// On-disk waveform formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveformFormat {
    Parquet,
    Csv,
}

impl WaveformFormat {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "parquet" => Some(Self::Parquet),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

/// Loads the configured channel of a segment from its waveform file
#[derive(Debug, Clone, Default)]
pub struct SignalLoader {
    channel: ChannelSpec,
}

impl SignalLoader {
    /// Create a loader for the given channel
    pub fn new(channel: ChannelSpec) -> Self {
        Self { channel }
    }

    /// Channel this loader reads
    pub fn channel(&self) -> &ChannelSpec {
        &self.channel
    }

    /// Resolve a file reference against a split root.
    /// Absolute references are returned unchanged.
    pub fn resolve(root: &Path, reference: &str) -> PathBuf {
        let reference = Path::new(reference.trim());
        if reference.is_absolute() {
            reference.to_path_buf()
        } else {
            root.join(reference)
        }
    }

    /// Load the waveform column of the referenced file
    pub fn load(&self, root: &Path, reference: &str) -> Result<Waveform, LoadError> {
        let path = Self::resolve(root, reference);
        self.load_path(&path)
    }

    /// Load the waveform column from an already resolved path
    pub fn load_path(&self, path: &Path) -> Result<Waveform, LoadError> {
        if !path.is_file() {
            return Err(LoadError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let format = WaveformFormat::from_path(path).ok_or_else(|| LoadError::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;

        debug!("Loading {:?} waveform from {}", format, path.display());

        match format {
            WaveformFormat::Parquet => parquet_source::read_column(path, &self.channel.waveform_column),
            WaveformFormat::Csv => csv_source::read_column(path, &self.channel.waveform_column),
        }
    }
}

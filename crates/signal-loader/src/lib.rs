//! Segment Signal Loading
//!
//! Resolves segment file references and reads one sensor channel from
//! parquet or CSV waveform logs.

mod csv_source;
mod error;
mod loader;
mod parquet_source;

pub use error::LoadError;
pub use loader::{ChannelSpec, SignalLoader, Waveform, WaveformFormat};

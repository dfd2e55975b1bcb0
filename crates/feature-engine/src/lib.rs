//! Feature Engineering Engine
//!
//! Z-score normalization followed by statistical and frequency domain
//! feature extraction for segment waveforms.

mod features;
mod fft;
mod normalize;
mod statistics;

pub use features::{FeatureExtractor, FeatureVector, FEATURE_DIMENSION, FEATURE_NAMES};
pub use fft::{FftAnalyzer, SpectralFeatures};
pub use normalize::{zscore, NORMALIZATION_EPSILON};
pub use statistics::StatisticalFeatures;

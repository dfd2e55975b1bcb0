//! Feature Vector Assembly

use crate::fft::FftAnalyzer;
use crate::normalize;
use crate::statistics::StatisticalFeatures;
use tracing::trace;

/// Number of features in the vector
pub const FEATURE_DIMENSION: usize = 8;

/// Feature column names, in vector order
pub const FEATURE_NAMES: [&str; FEATURE_DIMENSION] = [
    "mean",
    "std",
    "skew",
    "kurt",
    "max",
    "min",
    "freq_peak",
    "signal_energy",
];

/// Per-segment feature vector. Undefined features are NaN, never absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    /// Mean of the normalized signal (≈0)
    pub mean: f64,
    /// Standard deviation of the normalized signal (≈1)
    pub std: f64,
    /// Skewness of the normalized signal
    pub skew: f64,
    /// Excess kurtosis of the normalized signal
    pub kurtosis: f64,
    /// Maximum normalized amplitude
    pub max: f64,
    /// Minimum normalized amplitude
    pub min: f64,
    /// Index of the dominant DFT bin
    pub freq_peak: f64,
    /// Sum of squared DFT magnitudes
    pub signal_energy: f64,
}

impl FeatureVector {
    /// Every feature set to the undefined marker
    pub fn undefined() -> Self {
        Self {
            mean: f64::NAN,
            std: f64::NAN,
            skew: f64::NAN,
            kurtosis: f64::NAN,
            max: f64::NAN,
            min: f64::NAN,
            freq_peak: f64::NAN,
            signal_energy: f64::NAN,
        }
    }

    /// Feature values in [`FEATURE_NAMES`] order
    pub fn values(&self) -> [f64; FEATURE_DIMENSION] {
        [
            self.mean,
            self.std,
            self.skew,
            self.kurtosis,
            self.max,
            self.min,
            self.freq_peak,
            self.signal_energy,
        ]
    }

    /// True when every feature is the undefined marker
    pub fn is_undefined(&self) -> bool {
        self.values().iter().all(|v| v.is_nan())
    }

    /// Bitwise equality, treating NaN as equal to NaN
    pub fn bit_eq(&self, other: &Self) -> bool {
        self.values()
            .iter()
            .zip(other.values().iter())
            .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

/// Feature extractor for segment waveforms
#[derive(Default)]
pub struct FeatureExtractor {
    /// FFT analyzer
    fft_analyzer: FftAnalyzer,
}

impl FeatureExtractor {
    /// Create a new feature extractor
    pub fn new() -> Self {
        Self {
            fft_analyzer: FftAnalyzer::new(),
        }
    }

    /// Extract the feature vector of one waveform.
    ///
    /// Empty waveforms, and waveforms holding any non-finite sample, yield
    /// [`FeatureVector::undefined`].
    pub fn extract(&mut self, waveform: &[f64]) -> FeatureVector {
        if waveform.is_empty() || waveform.iter().any(|v| !v.is_finite()) {
            trace!("Degenerate waveform ({} samples)", waveform.len());
            return FeatureVector::undefined();
        }

        let normalized = normalize::zscore(waveform);
        // Finite samples can still overflow the running sums
        if normalized.iter().any(|v| !v.is_finite()) {
            trace!("Waveform overflows during normalization ({} samples)", waveform.len());
            return FeatureVector::undefined();
        }

        let stats = StatisticalFeatures::compute(&normalized);

        // A constant input normalizes to (near) zero; its shape moments are undefined
        let constant = waveform.iter().all(|&v| v == waveform[0]);
        let (skew, kurtosis) = if constant {
            (f64::NAN, f64::NAN)
        } else {
            (stats.skewness, stats.kurtosis)
        };

        let (freq_peak, signal_energy) = match self.fft_analyzer.analyze(&normalized) {
            Some(spectral) => (spectral.peak_bin as f64, spectral.energy),
            None => (f64::NAN, f64::NAN),
        };

        FeatureVector {
            mean: stats.mean,
            std: stats.std_dev,
            skew,
            kurtosis,
            max: stats.max,
            min: stats.min,
            freq_peak,
            signal_energy,
        }
    }
}

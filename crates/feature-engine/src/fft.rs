//! FFT-based Frequency Analysis

use rustfft::{num_complex::Complex, FftPlanner};

/// Spectrum summary of a signal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralFeatures {
    /// Index of the largest-magnitude DFT bin (first on ties)
    pub peak_bin: usize,
    /// Sum of squared magnitudes over all bins
    pub energy: f64,
}

/// FFT analyzer for frequency domain features
pub struct FftAnalyzer {
    /// FFT planner, reused across signals of equal length
    planner: FftPlanner<f64>,
}

impl Default for FftAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl FftAnalyzer {
    /// Create a new FFT analyzer
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
        }
    }

    /// Magnitudes |X[k]| of the full-length forward DFT
    pub fn magnitudes(&mut self, signal: &[f64]) -> Vec<f64> {
        if signal.is_empty() {
            return Vec::new();
        }

        let mut buffer: Vec<Complex<f64>> = signal.iter().map(|&v| Complex::new(v, 0.0)).collect();

        let fft = self.planner.plan_fft_forward(signal.len());
        fft.process(&mut buffer);

        buffer.iter().map(|c| c.norm()).collect()
    }

    /// Compute spectral features, or None for an empty signal
    pub fn analyze(&mut self, signal: &[f64]) -> Option<SpectralFeatures> {
        let magnitudes = self.magnitudes(signal);
        if magnitudes.is_empty() {
            return None;
        }

        let mut peak_bin = 0;
        let mut peak = magnitudes[0];
        for (i, &m) in magnitudes.iter().enumerate().skip(1) {
            if m > peak {
                peak = m;
                peak_bin = i;
            }
        }

        let energy = magnitudes.iter().map(|m| m * m).sum();

        Some(SpectralFeatures { peak_bin, energy })
    }
}

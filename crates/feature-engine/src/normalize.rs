//! Per-segment Z-score Normalization

use crate::statistics;

/// Added to the standard deviation so constant signals do not divide by zero
pub const NORMALIZATION_EPSILON: f64 = 1e-8;

/// Z-score normalize a signal: `(x - mean) / (std + 1e-8)`.
///
/// Uses the population standard deviation of the signal itself, which makes
/// downstream shape features independent of the recording gain.
pub fn zscore(signal: &[f64]) -> Vec<f64> {
    if signal.is_empty() {
        return Vec::new();
    }

    let mean = statistics::mean(signal);
    let scale = statistics::std_dev(signal, mean) + NORMALIZATION_EPSILON;

    signal.iter().map(|&v| (v - mean) / scale).collect()
}

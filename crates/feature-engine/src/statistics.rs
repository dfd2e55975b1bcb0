//! Statistical Features Computation

/// Moment-based statistics of a signal.
///
/// All moments are biased (population) estimates. Undefined values are NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatisticalFeatures {
    /// Mean value
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Skewness: E[(X-μ)³] / σ³
    pub skewness: f64,
    /// Excess kurtosis: E[(X-μ)⁴] / σ⁴ - 3
    pub kurtosis: f64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
}

impl StatisticalFeatures {
    /// All statistics undefined
    pub fn undefined() -> Self {
        Self {
            mean: f64::NAN,
            std_dev: f64::NAN,
            skewness: f64::NAN,
            kurtosis: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
        }
    }

    /// Compute statistical features from a slice of values
    pub fn compute(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::undefined();
        }

        let n = values.len() as f64;
        let mean = mean(values);

        let min = values.iter().cloned().fold(f64::INFINITY, nan_min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, nan_max);

        let mut m2 = 0.0;
        let mut m3 = 0.0;
        let mut m4 = 0.0;
        for &v in values {
            let d = v - mean;
            let d2 = d * d;
            m2 += d2;
            m3 += d2 * d;
            m4 += d2 * d2;
        }
        m2 /= n;
        m3 /= n;
        m4 /= n;

        let std_dev = m2.sqrt();

        // Higher moments are undefined without spread
        let (skewness, kurtosis) = if m2 > 0.0 {
            (m3 / m2.powf(1.5), m4 / (m2 * m2) - 3.0)
        } else {
            (f64::NAN, f64::NAN)
        };

        Self {
            mean,
            std_dev,
            skewness,
            kurtosis,
            min,
            max,
        }
    }
}

// `f64::min`/`f64::max` ignore NaN, which would leak the fold seed
fn nan_min(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}

fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}

/// Arithmetic mean; NaN for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation around a known mean
pub fn std_dev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

//! Summary statistics for chart series
//!
//! Provides the summaries fact scoring relies on:
//! - Count, sum, min, max
//! - Mean, population and sample (ddof = 1) variance
//! - Z-scores against the sample standard deviation

use serde::{Deserialize, Serialize};

/// Standard deviations below this are treated as zero variance
pub const MIN_STD_DEV: f64 = 1e-8;

/// Summary statistics for a numeric series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Number of finite values
    pub count: usize,
    /// Number of missing/NaN values
    pub missing: usize,
    /// Sum of values
    pub sum: f64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
    /// Mean (average)
    pub mean: f64,
    /// Population variance
    pub variance: f64,
    /// Sample variance (n - 1 denominator), NaN below two values
    pub sample_variance: f64,
}

impl SummaryStats {
    /// Compute summary statistics from data
    pub fn from_data(data: &[f64]) -> Self {
        let finite: Vec<f64> = data.iter().copied().filter(|x| x.is_finite()).collect();
        let missing = data.len() - finite.len();

        if finite.is_empty() {
            return Self::empty(missing);
        }

        let count = finite.len();
        let sum: f64 = finite.iter().sum();
        let mean = sum / count as f64;

        let squared: f64 = finite.iter().map(|x| (x - mean).powi(2)).sum();
        let variance = squared / count as f64;
        let sample_variance = if count > 1 {
            squared / (count - 1) as f64
        } else {
            f64::NAN
        };

        let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Self {
            count,
            missing,
            sum,
            min,
            max,
            mean,
            variance,
            sample_variance,
        }
    }

    /// Create empty statistics (all NaN)
    fn empty(missing: usize) -> Self {
        Self {
            count: 0,
            missing,
            sum: 0.0,
            min: f64::NAN,
            max: f64::NAN,
            mean: f64::NAN,
            variance: f64::NAN,
            sample_variance: f64::NAN,
        }
    }

    /// Population standard deviation
    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }

    /// Sample standard deviation (ddof = 1)
    pub fn sample_std_dev(&self) -> f64 {
        self.sample_variance.sqrt()
    }

    /// Get the range (max - min)
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// True when the series has fewer than two values or (near) zero spread
    pub fn is_degenerate(&self) -> bool {
        self.count < 2 || !(self.sample_std_dev() >= MIN_STD_DEV)
    }

    /// Z-score of a value against the sample standard deviation.
    ///
    /// Returns `None` for degenerate series.
    pub fn zscore(&self, x: f64) -> Option<f64> {
        if self.is_degenerate() {
            return None;
        }
        Some((x - self.mean) / self.sample_std_dev())
    }
}

//! Aggregate error statistics for labelled evaluations.

use serde::Serialize;

/// Error statistics over `(predicted, actual)` pairs, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ErrorMetrics {
    pub count: usize,
    /// Mean absolute error.
    pub mae: f64,
    /// Mean squared error.
    pub mse: f64,
    /// Root mean squared error.
    pub rmse: f64,
    /// Largest absolute error.
    pub max_error: f64,
}

impl ErrorMetrics {
    /// Returns `None` for an empty slice.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Option<Self> {
        if pairs.is_empty() {
            return None;
        }

        let n = pairs.len() as f64;
        let (mut abs_sum, mut sq_sum, mut max_error) = (0.0, 0.0, 0.0f64);
        for &(predicted, actual) in pairs {
            let err = (predicted - actual).abs();
            abs_sum += err;
            sq_sum += err * err;
            max_error = max_error.max(err);
        }

        let mse = sq_sum / n;
        Some(Self {
            count: pairs.len(),
            mae: abs_sum / n,
            mse,
            rmse: mse.sqrt(),
            max_error,
        })
    }
}

//! Savitzky-Golay smoothing
//!
//! Least-squares fit of a low-degree polynomial over a sliding window. Peak
//! heights and widths survive much better than with a moving average.
//! Edge samples are taken from the polynomial fitted to the first and last
//! full window, so the output has the same length as the input.

use nalgebra::DMatrix;

use crate::error::{AnalysisError, Result};

/// Precomputed Savitzky-Golay filter for one (window, degree) pair
#[derive(Debug, Clone)]
pub struct SavitzkyGolay {
    window: usize,
    degree: usize,
    /// Row `i` evaluates the window's fitted polynomial at window position `i`
    projection: DMatrix<f64>,
}

impl SavitzkyGolay {
    /// Build the filter
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidParameter` if `window` is zero or even,
    /// or if `degree >= window`.
    pub fn new(window: usize, degree: usize) -> Result<Self> {
        if window == 0 || window % 2 == 0 {
            return Err(AnalysisError::invalid_parameter("smoothing_window", window));
        }
        if degree >= window {
            return Err(AnalysisError::invalid_parameter("smoothing_degree", degree));
        }

        let half = window / 2;
        let scale = half.max(1) as f64;
        let terms = degree + 1;

        // Vandermonde matrix over window positions scaled into [-1, 1]
        let vandermonde = DMatrix::<f64>::from_fn(window, terms, |i, k| {
            ((i as f64 - half as f64) / scale).powi(k as i32)
        });

        let gram = vandermonde.transpose() * &vandermonde;
        let gram_inv = gram
            .try_inverse()
            .ok_or_else(|| AnalysisError::invalid_parameter("smoothing_degree", degree))?;

        // Hat matrix: row i evaluates the least-squares fit at position i
        let projection = &vandermonde * gram_inv * vandermonde.transpose();

        Ok(Self {
            window,
            degree,
            projection,
        })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Smoothing coefficients applied to interior samples
    pub fn coefficients(&self) -> Vec<f64> {
        self.projection.row(self.window / 2).iter().copied().collect()
    }

    /// Smooth `data`
    ///
    /// Returns `None` when `data` is shorter than the window; callers decide
    /// whether to fall back to the raw samples.
    pub fn smooth(&self, data: &[f64]) -> Option<Vec<f64>> {
        let n = data.len();
        if n < self.window {
            return None;
        }

        let half = self.window / 2;
        let smoothed = (0..n)
            .map(|i| {
                let (start, row) = if i < half {
                    (0, i)
                } else if i >= n - half {
                    (n - self.window, i + self.window - n)
                } else {
                    (i - half, half)
                };
                self.projection
                    .row(row)
                    .iter()
                    .zip(&data[start..start + self.window])
                    .map(|(c, v)| c * v)
                    .sum()
            })
            .collect();

        Some(smoothed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_quadratic_five_point_coefficients() {
        // Classic tabulated values: [-3, 12, 17, 12, -3] / 35
        let filter = SavitzkyGolay::new(5, 2).unwrap();
        let expected = [-3.0, 12.0, 17.0, 12.0, -3.0].map(|c| c / 35.0);
        for (c, e) in filter.coefficients().iter().zip(expected) {
            assert_relative_eq!(*c, e, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_cubic_preserved_including_edges() {
        let filter = SavitzkyGolay::new(15, 3).unwrap();
        let data: Vec<f64> = (0..40)
            .map(|i| {
                let x = i as f64 / 10.0;
                0.5 - x + 0.3 * x * x - 0.05 * x * x * x
            })
            .collect();

        let smoothed = filter.smooth(&data).unwrap();
        assert_eq!(smoothed.len(), data.len());
        for (s, d) in smoothed.iter().zip(&data) {
            assert_relative_eq!(*s, *d, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_short_input_not_smoothed() {
        let filter = SavitzkyGolay::new(15, 3).unwrap();
        assert!(filter.smooth(&[1.0; 14]).is_none());
        assert!(filter.smooth(&[]).is_none());
        assert!(filter.smooth(&[1.0; 15]).is_some());
    }

    #[test]
    fn test_alternating_noise_reduced() {
        let filter = SavitzkyGolay::new(15, 3).unwrap();
        let data: Vec<f64> = (0..60).map(|i| if i % 2 == 0 { 0.6 } else { 0.4 }).collect();

        let smoothed = filter.smooth(&data).unwrap();
        for value in &smoothed[7..53] {
            assert!((value - 0.5).abs() < 0.02, "interior value {} not smoothed", value);
        }
    }

    #[test]
    fn test_window_one_is_identity() {
        let filter = SavitzkyGolay::new(1, 0).unwrap();
        let data = [0.3, 0.9, 0.1];
        assert_eq!(filter.smooth(&data).unwrap(), data.to_vec());
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(SavitzkyGolay::new(0, 0).is_err());
        assert!(SavitzkyGolay::new(14, 3).is_err());
        assert!(SavitzkyGolay::new(5, 5).is_err());
    }
}

//! Skew angle estimation.
//!
//! Runs the edge detector, votes for near-horizontal lines within the skew
//! window and averages their normal angles. The correction angle is the
//! signed offset of that mean from upright:
//!
//! ```text
//! fixed_angle = -(upright - mean_angle)      (upright = 90°)
//! ```
//!
//! so a mean of 90° needs no correction and a mean of 86° gives -4°.
//! An image with no qualifying lines yields `(0, 0)`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::edges::{detect_edges_with, EdgeConfig, EdgeMap};
use crate::error::{Result, SkewError};
use crate::hough::{vote_lines, HoughConfig, HoughLine};
use crate::raster::RasterImage;

/// Normal angle of an unskewed text line, in degrees.
pub const UPRIGHT_DEGREES: f64 = 90.0;

/// Full estimator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkewConfig {
    pub edges: EdgeConfig,
    pub voting: HoughConfig,
    /// Angle the mean is compared against.
    pub upright_degrees: f64,
}

impl Default for SkewConfig {
    fn default() -> Self {
        Self {
            edges: EdgeConfig::default(),
            voting: HoughConfig::default(),
            upright_degrees: UPRIGHT_DEGREES,
        }
    }
}

impl SkewConfig {
    pub fn validate(&self) -> Result<()> {
        self.edges.thresholds.validate()?;
        self.voting.validate()?;
        if !self.upright_degrees.is_finite() {
            return Err(SkewError::InvalidVotingConfig(format!(
                "upright angle must be finite, got {}",
                self.upright_degrees
            )));
        }
        Ok(())
    }
}

/// Result of a skew estimate, angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SkewEstimate {
    /// Arithmetic mean of the detected lines' normal angles.
    pub mean_angle: f64,
    /// Signed correction relative to upright.
    pub fixed_angle: f64,
    /// Number of lines averaged.
    pub line_count: usize,
}

impl SkewEstimate {
    /// Aggregate line angles (degrees). An empty slice gives the zero
    /// estimate.
    pub fn from_line_angles(angles_degrees: &[f64], upright_degrees: f64) -> Self {
        if angles_degrees.is_empty() {
            return Self::default();
        }
        let mean_angle = angles_degrees.iter().sum::<f64>() / angles_degrees.len() as f64;
        Self {
            mean_angle,
            fixed_angle: -(upright_degrees - mean_angle),
            line_count: angles_degrees.len(),
        }
    }

    /// Aggregate detected lines.
    pub fn from_lines(lines: &[HoughLine], upright_degrees: f64) -> Self {
        let angles: Vec<f64> = lines.iter().map(HoughLine::theta_degrees).collect();
        Self::from_line_angles(&angles, upright_degrees)
    }

    /// True when no line contributed.
    pub fn is_empty(&self) -> bool {
        self.line_count == 0
    }
}

/// Estimate skew with the default configuration.
///
/// # Arguments
/// * `image` - Grayscale or RGB raster
///
/// # Returns
/// The mean line angle and the correction angle, both in degrees.
///
/// # Errors
/// Returns an error if the image buffer is inconsistent with its dimensions
/// or has an unsupported channel count.
pub fn estimate_angle(image: &RasterImage) -> Result<SkewEstimate> {
    estimate_angle_with(image, &SkewConfig::default())
}

/// Estimate skew with explicit settings.
pub fn estimate_angle_with(image: &RasterImage, config: &SkewConfig) -> Result<SkewEstimate> {
    config.validate()?;
    let edges = detect_edges_with(image, &config.edges)?;
    estimate_from_edges(&edges, config)
}

/// Estimate skew from a precomputed edge map. Only the voting settings and
/// upright angle of `config` are used.
pub fn estimate_from_edges(edges: &EdgeMap, config: &SkewConfig) -> Result<SkewEstimate> {
    let lines = vote_lines(edges, &config.voting)?;
    let estimate = SkewEstimate::from_lines(&lines, config.upright_degrees);

    debug!(
        lines = estimate.line_count,
        mean_angle = estimate.mean_angle,
        fixed_angle = estimate.fixed_angle,
        "skew estimated"
    );

    Ok(estimate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edges::test_images::*;
    use crate::hough::AngleRange;

    #[test]
    fn test_blank_image_gives_zero() {
        let est = estimate_angle(&blank(120, 80, 255)).unwrap();
        assert_eq!(est, SkewEstimate::default());
        assert_eq!(est.mean_angle, 0.0);
        assert_eq!(est.fixed_angle, 0.0);
        assert!(est.is_empty());
    }

    #[test]
    fn test_horizontal_line_is_upright() {
        let est = estimate_angle(&tilted_band(200, 90.0, 0.5)).unwrap();
        assert!(est.line_count >= 1);
        assert!((est.mean_angle - 90.0).abs() < 1e-9, "mean {}", est.mean_angle);
        assert!(est.fixed_angle.abs() < 1e-9, "fixed {}", est.fixed_angle);
    }

    #[test]
    fn test_tilted_line_gives_negative_correction() {
        let est = estimate_angle(&tilted_band(300, 86.0, 0.5)).unwrap();
        assert!(est.line_count >= 1);
        assert!(
            est.fixed_angle > -5.5 && est.fixed_angle < -2.5,
            "fixed {}",
            est.fixed_angle
        );
    }

    #[test]
    fn test_line_outside_window_is_ignored() {
        let est = estimate_angle(&tilted_band(200, 80.0, 0.5)).unwrap();
        assert_eq!(est, SkewEstimate::default());
    }

    #[test]
    fn test_retargeted_window() {
        let config = SkewConfig {
            voting: HoughConfig {
                angles: AngleRange {
                    min_degrees: 74.0,
                    max_degrees: 86.0,
                    step_degrees: 1.0,
                },
                ..HoughConfig::default()
            },
            upright_degrees: 80.0,
            ..SkewConfig::default()
        };
        let est = estimate_angle_with(&tilted_band(300, 80.0, 0.5), &config).unwrap();
        assert!(est.line_count >= 1);
        assert!(est.fixed_angle.abs() < 1.5, "fixed {}", est.fixed_angle);
    }

    #[test]
    fn test_from_line_angles() {
        let est = SkewEstimate::from_line_angles(&[80.0], UPRIGHT_DEGREES);
        assert_eq!(est.mean_angle, 80.0);
        assert_eq!(est.fixed_angle, -10.0);
        assert_eq!(est.line_count, 1);

        let est = SkewEstimate::from_line_angles(&[88.0, 92.0, 93.0], UPRIGHT_DEGREES);
        assert!((est.mean_angle - 91.0).abs() < 1e-12);
        assert!((est.fixed_angle - 1.0).abs() < 1e-12);

        assert_eq!(
            SkewEstimate::from_line_angles(&[], UPRIGHT_DEGREES),
            SkewEstimate::default()
        );
    }

    #[test]
    fn test_deterministic() {
        let img = tilted_band(200, 88.0, 1.0);
        let a = estimate_angle(&img).unwrap();
        let b = estimate_angle(&img).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rgb_matches_gray() {
        let gray = tilted_band(200, 90.0, 0.5);
        let rgb = to_rgb(&gray);
        assert_eq!(estimate_angle(&gray).unwrap(), estimate_angle(&rgb).unwrap());
    }

    #[test]
    fn test_invalid_input_is_error() {
        let mut img = blank(10, 10, 0);
        img.pixels.pop();
        let err = estimate_angle(&img).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_invalid_config_is_error() {
        let config = SkewConfig {
            upright_degrees: f64::NAN,
            ..SkewConfig::default()
        };
        assert!(estimate_angle_with(&blank(10, 10, 255), &config).is_err());
    }

    #[test]
    fn test_oversized_angle_grid_is_rejected() {
        let mut config = SkewConfig::default();
        config.voting.angles = AngleRange {
            min_degrees: 0.0,
            max_degrees: 180.0,
            step_degrees: 1e-7,
        };
        assert!(matches!(
            config.validate(),
            Err(SkewError::InvalidVotingConfig(_))
        ));
        assert!(matches!(
            estimate_angle_with(&tilted_band(200, 90.0, 0.5), &config),
            Err(SkewError::InvalidVotingConfig(_))
        ));
    }

    #[test]
    fn test_from_edges_matches_full_pipeline() {
        let img = tilted_band(200, 90.0, 0.5);
        let config = SkewConfig::default();
        let edges = detect_edges_with(&img, &config.edges).unwrap();
        assert_eq!(
            estimate_from_edges(&edges, &config).unwrap(),
            estimate_angle_with(&img, &config).unwrap()
        );
    }
}

//! Straight-line voting over a binary edge map.
//!
//! Lines are parameterized by their normal: `rho = x * cos(theta) + y * sin(theta)`
//! with `x` to the right, `y` downward and `theta` measured from the x axis.
//! `theta = 90°` is therefore a horizontal line (vertical normal) and
//! `theta = 0°` a vertical one.
//!
//! # Modes
//!
//! - **Bounded** ([`AngleRange::SKEW_WINDOW`], 84°..=96°): the 13 candidate
//!   angles used by the skew estimator.
//! - **Unbounded** ([`AngleRange::FULL`], 0°..180°): every orientation at 1°,
//!   used for visualization only.

mod accumulator;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SkewError};

pub use accumulator::{vote_lines, Accumulator};

/// Default accumulator rho resolution in pixels.
pub const DEFAULT_RHO_RESOLUTION: f64 = 1.0;

/// Default vote threshold; a cell must collect more votes than this.
pub const DEFAULT_VOTE_THRESHOLD: u32 = 100;

/// Upper bound on candidate angles per range (0.05° over the full half-turn).
pub const MAX_ANGLE_CANDIDATES: usize = 3600;

/// An inclusive range of candidate normal angles, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleRange {
    pub min_degrees: f64,
    pub max_degrees: f64,
    pub step_degrees: f64,
}

impl Default for AngleRange {
    fn default() -> Self {
        Self::SKEW_WINDOW
    }
}

impl AngleRange {
    /// 12° band centred on 90°, in 1° steps.
    pub const SKEW_WINDOW: AngleRange = AngleRange {
        min_degrees: 84.0,
        max_degrees: 96.0,
        step_degrees: 1.0,
    };

    /// Every orientation at 1° resolution.
    pub const FULL: AngleRange = AngleRange {
        min_degrees: 0.0,
        max_degrees: 180.0,
        step_degrees: 1.0,
    };

    /// Check that the range describes at least one angle within `[0°, 180°]`
    /// and no more than [`MAX_ANGLE_CANDIDATES`].
    pub fn validate(&self) -> Result<()> {
        let finite = self.min_degrees.is_finite()
            && self.max_degrees.is_finite()
            && self.step_degrees.is_finite();
        if !finite || self.step_degrees <= 0.0 {
            return Err(SkewError::InvalidVotingConfig(format!(
                "angle step must be a positive number, got {}",
                self.step_degrees
            )));
        }
        if self.min_degrees < 0.0 || self.max_degrees > 180.0 || self.min_degrees > self.max_degrees
        {
            return Err(SkewError::InvalidVotingConfig(format!(
                "angle range {}..={} must lie within 0..=180 with min <= max",
                self.min_degrees, self.max_degrees
            )));
        }
        let span = (self.max_degrees - self.min_degrees) / self.step_degrees;
        if !span.is_finite()
            || span > MAX_ANGLE_CANDIDATES as f64
            || self.candidate_count() > MAX_ANGLE_CANDIDATES
        {
            return Err(SkewError::InvalidVotingConfig(format!(
                "angle step {} gives more than {} candidate angles",
                self.step_degrees, MAX_ANGLE_CANDIDATES
            )));
        }
        Ok(())
    }

    /// Number of candidate angles.
    ///
    /// When the last candidate is the first one turned by 180° it describes
    /// the same lines and is dropped.
    pub fn candidate_count(&self) -> usize {
        let span = (self.max_degrees - self.min_degrees) / self.step_degrees;
        let mut count = (span + 1e-9).floor() as usize + 1;
        let last = self.min_degrees + (count - 1) as f64 * self.step_degrees;
        if count > 1 && (last - self.min_degrees - 180.0).abs() < self.step_degrees / 2.0 {
            count -= 1;
        }
        count
    }

    /// Candidate angles in radians, ascending.
    pub fn candidates(&self) -> Vec<f64> {
        (0..self.candidate_count())
            .map(|n| (self.min_degrees + n as f64 * self.step_degrees).to_radians())
            .collect()
    }
}

/// Line-voting parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoughConfig {
    /// Distance resolution of the accumulator, in pixels.
    pub rho_resolution: f64,
    /// A cell must collect strictly more votes than this to emit a line.
    pub vote_threshold: u32,
    /// Candidate normal angles.
    pub angles: AngleRange,
    /// Keep only the strongest `n` lines.
    pub max_lines: Option<usize>,
}

impl Default for HoughConfig {
    fn default() -> Self {
        Self {
            rho_resolution: DEFAULT_RHO_RESOLUTION,
            vote_threshold: DEFAULT_VOTE_THRESHOLD,
            angles: AngleRange::SKEW_WINDOW,
            max_lines: None,
        }
    }
}

impl HoughConfig {
    /// Full 0°..180° search, otherwise default parameters.
    pub fn unbounded() -> Self {
        Self {
            angles: AngleRange::FULL,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.rho_resolution.is_finite() || self.rho_resolution <= 0.0 {
            return Err(SkewError::InvalidVotingConfig(format!(
                "rho resolution must be a positive number, got {}",
                self.rho_resolution
            )));
        }
        self.angles.validate()
    }
}

/// A detected line in normal form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoughLine {
    /// Signed distance from the top-left origin, in pixels.
    pub rho: f64,
    /// Normal angle in radians.
    pub theta: f64,
    /// Accumulator votes.
    pub votes: u32,
}

impl HoughLine {
    #[inline]
    pub fn theta_degrees(&self) -> f64 {
        self.theta.to_degrees()
    }

    /// Two points on the line, `reach` pixels either side of the foot of the
    /// normal from the origin.
    pub fn endpoints(&self, reach: f64) -> ((f64, f64), (f64, f64)) {
        let (b, a) = self.theta.sin_cos();
        let (x0, y0) = (a * self.rho, b * self.rho);
        (
            (x0 - reach * b, y0 + reach * a),
            (x0 + reach * b, y0 - reach * a),
        )
    }
}

//! Double thresholding of the suppressed magnitude field.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SkewError};
use crate::grid::Grid;

/// Default lower threshold.
pub const DEFAULT_LOW_THRESHOLD: f64 = 50.0;

/// Default upper threshold.
pub const DEFAULT_HIGH_THRESHOLD: f64 = 150.0;

/// Tri-state pixel label. The discriminants are the conventional 8-bit
/// display values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum EdgeClass {
    #[default]
    None = 0,
    Weak = 128,
    Strong = 255,
}

impl EdgeClass {
    #[inline]
    pub fn value(self) -> u8 {
        self as u8
    }
}

/// The `(low, high)` threshold pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeThresholds {
    pub low: f64,
    pub high: f64,
}

impl Default for EdgeThresholds {
    fn default() -> Self {
        Self {
            low: DEFAULT_LOW_THRESHOLD,
            high: DEFAULT_HIGH_THRESHOLD,
        }
    }
}

impl EdgeThresholds {
    /// Create a validated threshold pair.
    pub fn new(low: f64, high: f64) -> Result<Self> {
        let thresholds = Self { low, high };
        thresholds.validate()?;
        Ok(thresholds)
    }

    /// Both values must be finite and `low <= high`.
    pub fn validate(&self) -> Result<()> {
        if !self.low.is_finite() || !self.high.is_finite() || self.low > self.high {
            return Err(SkewError::InvalidThresholds {
                low: self.low,
                high: self.high,
            });
        }
        Ok(())
    }

    /// Label a single magnitude.
    #[inline]
    pub fn classify(&self, magnitude: f64) -> EdgeClass {
        if magnitude >= self.high {
            EdgeClass::Strong
        } else if magnitude >= self.low {
            EdgeClass::Weak
        } else {
            EdgeClass::None
        }
    }
}

/// Label every interior pixel; the one-pixel border is always `None`.
pub fn classify(suppressed: &Grid<f64>, thresholds: &EdgeThresholds) -> Grid<EdgeClass> {
    let (w, h) = suppressed.dimensions();
    let mut classes = Grid::new(w, h, EdgeClass::None);

    for (x, y, magnitude) in suppressed.iter_cells() {
        if suppressed.is_interior(x, y) {
            classes.set(x, y, thresholds.classify(magnitude));
        }
    }

    classes
}

//! Error types shared by every pipeline stage.

use thiserror::Error;

/// Errors that can occur while detecting edges or estimating skew.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SkewError {
    /// The pixel buffer is empty.
    #[error("Image has no pixel data")]
    EmptyImage,

    /// Width or height is zero.
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Pixel data length doesn't match the declared dimensions.
    #[error("Invalid pixel data: expected {expected} bytes (width * height * channels), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Only single-channel and three-channel images are accepted.
    #[error("Unsupported channel count: {0} (expected 1 or 3)")]
    UnsupportedChannels(u8),

    /// Thresholds are not finite or `low > high`.
    #[error("Invalid thresholds: low ({low}) must not exceed high ({high}) and both must be finite")]
    InvalidThresholds { low: f64, high: f64 },

    /// The line-voting parameters cannot describe an accumulator.
    #[error("Invalid voting configuration: {0}")]
    InvalidVotingConfig(String),
}

impl SkewError {
    /// Returns true for errors caused by the input image itself.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            SkewError::EmptyImage
                | SkewError::InvalidDimensions { .. }
                | SkewError::InvalidPixelData { .. }
                | SkewError::UnsupportedChannels(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SkewError>;

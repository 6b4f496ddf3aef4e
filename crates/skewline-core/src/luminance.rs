//! Grayscale conversion using ITU-R BT.601 coefficients.
//!
//! These are the weights conventionally used for RGB-to-gray conversion ahead
//! of edge detection, so that a three-channel image and its pre-converted gray
//! version feed identical intensities into the gradient stage.

/// ITU-R BT.601 coefficient for red channel.
pub const LUMA_R: f64 = 0.299;

/// ITU-R BT.601 coefficient for green channel.
pub const LUMA_G: f64 = 0.587;

/// ITU-R BT.601 coefficient for blue channel.
pub const LUMA_B: f64 = 0.114;

/// Calculate gray intensity from u8 RGB values (0 to 255).
///
/// # Arguments
/// * `r` - Red channel value (0-255)
/// * `g` - Green channel value (0-255)
/// * `b` - Blue channel value (0-255)
///
/// # Returns
/// Gray value (0-255), rounded to nearest
#[inline]
pub fn luma_u8(r: u8, g: u8, b: u8) -> u8 {
    let y = LUMA_R * r as f64 + LUMA_G * g as f64 + LUMA_B * b as f64;
    y.clamp(0.0, 255.0).round() as u8
}

//! Core raster types for pipeline input.

use image::{DynamicImage, GrayImage, RgbImage};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SkewError};
use crate::grid::Grid;
use crate::luminance::luma_u8;

/// Channel layout of a raster image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Channels {
    /// Single-channel intensity.
    Gray,
    /// Interleaved red, green, blue.
    #[default]
    Rgb,
}

impl Channels {
    /// Number of bytes per pixel.
    #[inline]
    pub fn count(self) -> usize {
        match self {
            Channels::Gray => 1,
            Channels::Rgb => 3,
        }
    }
}

impl TryFrom<u8> for Channels {
    type Error = SkewError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Channels::Gray),
            3 => Ok(Channels::Rgb),
            other => Err(SkewError::UnsupportedChannels(other)),
        }
    }
}

/// A decoded raster image handed to the edge detector.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Pixel layout.
    pub channels: Channels,
    /// Pixel data in row-major order, `channels.count()` bytes per pixel.
    pub pixels: Vec<u8>,
}

impl RasterImage {
    /// Create a validated image.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimensions` for a zero width or height, `EmptyImage`
    /// for an empty buffer and `InvalidPixelData` when the buffer length
    /// doesn't match `width * height * channels`.
    pub fn new(width: u32, height: u32, channels: Channels, pixels: Vec<u8>) -> Result<Self> {
        let image = Self {
            width,
            height,
            channels,
            pixels,
        };
        image.validate()?;
        Ok(image)
    }

    /// Create a validated image from a raw channel count (1 or 3).
    pub fn from_raw(width: u32, height: u32, channels: u8, pixels: Vec<u8>) -> Result<Self> {
        Self::new(width, height, Channels::try_from(channels)?, pixels)
    }

    /// Create a single-channel image from an `image::GrayImage`.
    pub fn from_gray_image(img: GrayImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            channels: Channels::Gray,
            pixels: img.into_raw(),
        }
    }

    /// Create a three-channel image from an `image::RgbImage`.
    pub fn from_rgb_image(img: RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            channels: Channels::Rgb,
            pixels: img.into_raw(),
        }
    }

    /// Convert any decoded image.
    ///
    /// Luma images (with or without alpha, any bit depth) stay single-channel;
    /// everything else is flattened to 8-bit RGB.
    pub fn from_dynamic(img: DynamicImage) -> Self {
        if img.color().has_color() {
            return Self::from_rgb_image(img.into_rgb8());
        }
        match img {
            DynamicImage::ImageLuma8(gray) => Self::from_gray_image(gray),
            other => Self::from_gray_image(other.into_luma8()),
        }
    }

    /// Check dimensions and buffer length.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SkewError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.pixels.is_empty() {
            return Err(SkewError::EmptyImage);
        }
        let expected = self.pixel_count() * self.channels.count();
        if self.pixels.len() != expected {
            return Err(SkewError::InvalidPixelData {
                expected,
                actual: self.pixels.len(),
            });
        }
        Ok(())
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }

    /// Produce the single-channel intensity grid used by the edge detector.
    ///
    /// Gray input is copied unchanged; RGB input goes through BT.601 weights.
    pub fn to_gray_grid(&self) -> Result<Grid<u8>> {
        self.validate()?;
        let (w, h) = (self.width as usize, self.height as usize);
        let data = match self.channels {
            Channels::Gray => self.pixels.clone(),
            Channels::Rgb => self
                .pixels
                .chunks_exact(3)
                .map(|px| luma_u8(px[0], px[1], px[2]))
                .collect(),
        };
        Grid::from_vec(w, h, data).ok_or(SkewError::InvalidPixelData {
            expected: w * h,
            actual: self.pixels.len() / self.channels.count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels_from_u8() {
        assert_eq!(Channels::try_from(1).unwrap(), Channels::Gray);
        assert_eq!(Channels::try_from(3).unwrap(), Channels::Rgb);
        assert_eq!(
            Channels::try_from(4).unwrap_err(),
            SkewError::UnsupportedChannels(4)
        );
        assert_eq!(
            Channels::try_from(0).unwrap_err(),
            SkewError::UnsupportedChannels(0)
        );
    }

    #[test]
    fn test_new_validates_dimensions() {
        let err = RasterImage::new(0, 10, Channels::Gray, vec![]).unwrap_err();
        assert_eq!(
            err,
            SkewError::InvalidDimensions {
                width: 0,
                height: 10
            }
        );
    }

    #[test]
    fn test_new_validates_empty_buffer() {
        let err = RasterImage::new(2, 2, Channels::Gray, vec![]).unwrap_err();
        assert_eq!(err, SkewError::EmptyImage);
    }

    #[test]
    fn test_new_validates_buffer_length() {
        let err = RasterImage::new(2, 2, Channels::Rgb, vec![0; 4]).unwrap_err();
        assert_eq!(
            err,
            SkewError::InvalidPixelData {
                expected: 12,
                actual: 4
            }
        );
    }

    #[test]
    fn test_from_raw_rejects_rgba() {
        let err = RasterImage::from_raw(1, 1, 4, vec![0; 4]).unwrap_err();
        assert_eq!(err, SkewError::UnsupportedChannels(4));
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_gray_grid_passthrough() {
        let img = RasterImage::new(3, 1, Channels::Gray, vec![5, 6, 7]).unwrap();
        let grid = img.to_gray_grid().unwrap();
        assert_eq!(grid.dimensions(), (3, 1));
        assert_eq!(grid.as_slice(), &[5, 6, 7]);
    }

    #[test]
    fn test_rgb_grid_conversion() {
        let img = RasterImage::new(
            2,
            1,
            Channels::Rgb,
            vec![255, 255, 255, 0, 255, 0],
        )
        .unwrap();
        let grid = img.to_gray_grid().unwrap();
        assert_eq!(grid.as_slice(), &[255, 150]);
    }

    #[test]
    fn test_from_dynamic_keeps_luma_single_channel() {
        let gray = GrayImage::from_pixel(4, 2, image::Luma([42]));
        let img = RasterImage::from_dynamic(DynamicImage::ImageLuma8(gray));
        assert_eq!(img.channels, Channels::Gray);
        assert_eq!(img.pixels.len(), 8);

        let rgba = image::RgbaImage::from_pixel(4, 2, image::Rgba([1, 2, 3, 255]));
        let img = RasterImage::from_dynamic(DynamicImage::ImageRgba8(rgba));
        assert_eq!(img.channels, Channels::Rgb);
        assert_eq!(&img.pixels[..3], &[1, 2, 3]);
        assert!(img.validate().is_ok());
    }

    #[test]
    fn test_field_literal_is_revalidated() {
        let img = RasterImage {
            width: 3,
            height: 3,
            channels: Channels::Gray,
            pixels: vec![0; 5],
        };
        assert!(img.to_gray_grid().is_err());
    }
}

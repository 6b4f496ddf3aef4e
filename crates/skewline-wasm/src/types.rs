//! WASM-compatible wrapper types for image data.

use skewline_core::{EdgeMap, RasterImage, SkewEstimate};
use wasm_bindgen::prelude::*;

/// A raster image for JavaScript.
///
/// Pixels are row-major and interleaved: 1 byte per pixel for grayscale,
/// 3 for RGB.
#[wasm_bindgen]
pub struct JsRasterImage {
    width: u32,
    height: u32,
    channels: u8,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsRasterImage {
    /// Create an image from dimensions, channel count (1 or 3) and pixels.
    ///
    /// The buffer is validated when the image is first processed.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, channels: u8, pixels: Vec<u8>) -> JsRasterImage {
        JsRasterImage {
            width,
            height,
            channels,
            pixels,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[wasm_bindgen(getter)]
    pub fn channels(&self) -> u8 {
        self.channels
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns pixel data as Uint8Array (copied).
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }
}

impl JsRasterImage {
    pub(crate) fn to_raster(&self) -> skewline_core::Result<RasterImage> {
        RasterImage::from_raw(self.width, self.height, self.channels, self.pixels.clone())
    }

    pub(crate) fn from_edge_map(edges: &EdgeMap) -> Self {
        let img = edges.to_gray_image();
        Self {
            width: img.width(),
            height: img.height(),
            channels: 1,
            pixels: img.into_raw(),
        }
    }

    pub(crate) fn from_rgb(img: skewline_core::render::RgbImage) -> Self {
        Self {
            width: img.width(),
            height: img.height(),
            channels: 3,
            pixels: img.into_raw(),
        }
    }
}

/// Skew estimate for JavaScript, angles in degrees.
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsSkewEstimate {
    inner: SkewEstimate,
}

#[wasm_bindgen]
impl JsSkewEstimate {
    /// Mean normal angle of the detected lines.
    #[wasm_bindgen(getter)]
    pub fn mean_angle(&self) -> f64 {
        self.inner.mean_angle
    }

    /// Rotation that straightens the page.
    #[wasm_bindgen(getter)]
    pub fn fixed_angle(&self) -> f64 {
        self.inner.fixed_angle
    }

    #[wasm_bindgen(getter)]
    pub fn line_count(&self) -> usize {
        self.inner.line_count
    }
}

impl From<SkewEstimate> for JsSkewEstimate {
    fn from(inner: SkewEstimate) -> Self {
        Self { inner }
    }
}

//! Skew estimation WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { JsRasterImage, estimate_skew } from '@skewline/wasm';
//!
//! const image = new JsRasterImage(width, height, 3, rgbBytes);
//! const estimate = estimate_skew(image);
//! console.log(`rotate by ${estimate.fixed_angle}°`);
//! ```

use skewline_core::render::{estimate_and_render, render_lines, RenderOptions, LINE_COLOR};
use skewline_core::{detect_edges_with, estimate_angle_with, EdgeConfig, SkewConfig};
use wasm_bindgen::prelude::*;

use crate::types::{JsRasterImage, JsSkewEstimate};

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn config_from_js(config: JsValue) -> Result<SkewConfig, JsValue> {
    if config.is_undefined() || config.is_null() {
        return Ok(SkewConfig::default());
    }
    serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))
}

/// Estimate skew with default settings.
///
/// # Errors
/// Returns an error if the pixel buffer does not match the dimensions or the
/// channel count is not 1 or 3.
#[wasm_bindgen]
pub fn estimate_skew(image: &JsRasterImage) -> Result<JsSkewEstimate, JsValue> {
    let raster = image.to_raster().map_err(to_js_error)?;
    estimate_angle_with(&raster, &SkewConfig::default())
        .map(JsSkewEstimate::from)
        .map_err(to_js_error)
}

/// Estimate skew with a partial configuration object, e.g.
/// `{ edges: { thresholds: { low: 40, high: 120 } } }`. Missing fields take
/// their defaults.
#[wasm_bindgen]
pub fn estimate_skew_with_config(
    image: &JsRasterImage,
    config: JsValue,
) -> Result<JsSkewEstimate, JsValue> {
    let config = config_from_js(config)?;
    let raster = image.to_raster().map_err(to_js_error)?;
    estimate_angle_with(&raster, &config)
        .map(JsSkewEstimate::from)
        .map_err(to_js_error)
}

/// Binary edge map as a single-channel image (255 = edge).
#[wasm_bindgen]
pub fn detect_edges(image: &JsRasterImage, low: f64, high: f64) -> Result<JsRasterImage, JsValue> {
    let config = EdgeConfig::new(low, high).map_err(to_js_error)?;
    let raster = image.to_raster().map_err(to_js_error)?;
    let edges = detect_edges_with(&raster, &config).map_err(to_js_error)?;
    Ok(JsRasterImage::from_edge_map(&edges))
}

/// RGB overlay of the `max_lines` strongest lines at any angle, drawn over
/// the edge map.
#[wasm_bindgen]
pub fn render_line_overlay(
    image: &JsRasterImage,
    max_lines: usize,
) -> Result<JsRasterImage, JsValue> {
    let raster = image.to_raster().map_err(to_js_error)?;
    let options = RenderOptions {
        max_lines,
        ..RenderOptions::default()
    };
    let rendered =
        estimate_and_render(&raster, &SkewConfig::default(), &options).map_err(to_js_error)?;
    Ok(JsRasterImage::from_rgb(rendered.overlay))
}

/// Edge map of `image` with no lines drawn, as RGB.
#[wasm_bindgen]
pub fn render_edge_background(image: &JsRasterImage) -> Result<JsRasterImage, JsValue> {
    let raster = image.to_raster().map_err(to_js_error)?;
    let edges = detect_edges_with(&raster, &EdgeConfig::default()).map_err(to_js_error)?;
    Ok(JsRasterImage::from_rgb(render_lines(&edges, &[], LINE_COLOR, 1)))
}

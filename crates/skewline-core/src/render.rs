//! Line overlays for visual inspection.
//!
//! Lines are drawn onto the edge map, not the source image, using an
//! unbounded 0°..180° search. The overlay is diagnostic only and plays no
//! part in the skew estimate.

pub use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::edges::{detect_edges_with, EdgeMap};
use crate::error::Result;
use crate::estimate::{estimate_from_edges, SkewConfig, SkewEstimate};
use crate::hough::{vote_lines, AngleRange, HoughConfig, HoughLine};
use crate::raster::RasterImage;

/// Default number of overlaid lines.
pub const DEFAULT_RENDER_LINES: usize = 10;

/// Default overlay colour.
pub const LINE_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Default overlay thickness in pixels.
pub const LINE_THICKNESS: u32 = 2;

/// Overlay settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub max_lines: usize,
    pub color: [u8; 3],
    pub thickness: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_lines: DEFAULT_RENDER_LINES,
            color: LINE_COLOR.0,
            thickness: LINE_THICKNESS,
        }
    }
}

/// An estimate together with its diagnostic overlay.
#[derive(Debug, Clone)]
pub struct RenderedEstimate {
    pub estimate: SkewEstimate,
    /// Lines drawn on the overlay, strongest first.
    pub lines: Vec<HoughLine>,
    pub overlay: RgbImage,
}

/// Draw `lines` over the edge map (edges white on black).
///
/// Each line is extended well past the image on both sides and clipped while
/// drawing.
pub fn render_lines(
    edges: &EdgeMap,
    lines: &[HoughLine],
    color: Rgb<u8>,
    thickness: u32,
) -> RgbImage {
    let (w, h) = edges.dimensions();
    let mut img = RgbImage::from_fn(w as u32, h as u32, |x, y| {
        let v = if edges.get(x as usize, y as usize) { 255 } else { 0 };
        Rgb([v, v, v])
    });

    let reach = (w + h) as f64;
    for line in lines {
        let (from, to) = line.endpoints(reach);
        draw_segment(&mut img, from, to, color, thickness);
    }

    img
}

/// Draws `thickness` parallel one-pixel segments, offset across the major
/// axis of the line. Pixels outside the image are skipped.
fn draw_segment(
    img: &mut RgbImage,
    from: (f64, f64),
    to: (f64, f64),
    color: Rgb<u8>,
    thickness: u32,
) {
    let from = (from.0.round() as f32, from.1.round() as f32);
    let to = (to.0.round() as f32, to.1.round() as f32);
    let mostly_horizontal = (to.0 - from.0).abs() >= (to.1 - from.1).abs();

    let thickness = thickness.max(1) as i32;
    for offset in -(thickness - 1) / 2..=thickness / 2 {
        let (ox, oy) = if mostly_horizontal {
            (0.0, offset as f32)
        } else {
            (offset as f32, 0.0)
        };
        draw_line_segment_mut(img, (from.0 + ox, from.1 + oy), (to.0 + ox, to.1 + oy), color);
    }
}

/// Estimate skew and produce an overlay of the strongest lines at any angle.
///
/// The estimate uses `config` unchanged. The overlay reuses the same edge map
/// with a full 0°..180° search capped at `options.max_lines`.
pub fn estimate_and_render(
    image: &RasterImage,
    config: &SkewConfig,
    options: &RenderOptions,
) -> Result<RenderedEstimate> {
    config.validate()?;
    let edges = detect_edges_with(image, &config.edges)?;
    let estimate = estimate_from_edges(&edges, config)?;

    let overlay_config = HoughConfig {
        angles: AngleRange::FULL,
        max_lines: Some(options.max_lines),
        ..config.voting
    };
    let lines = vote_lines(&edges, &overlay_config)?;
    let overlay = render_lines(&edges, &lines, Rgb(options.color), options.thickness);

    debug!(drawn = lines.len(), "overlay rendered");

    Ok(RenderedEstimate {
        estimate,
        lines,
        overlay,
    })
}

//! Edge detection: smoothing, gradients, thinning, thresholding, linking.
//!
//! # Pipeline
//!
//! 1. Grayscale conversion (three-channel input only)
//! 2. 5x5 Gaussian blur, σ = 1.4 ([`gradient`])
//! 3. Sobel magnitude and direction ([`gradient`])
//! 4. Non-maximum suppression ([`nms`])
//! 5. Double threshold into none / weak / strong ([`threshold`])
//! 6. Hysteresis linking ([`hysteresis`])
//!
//! Every stage is a pure function from grids to a fresh grid of the same
//! dimensions; nothing is mutated after it has been handed to the next stage
//! and no state survives between calls.
//!
//! This is a deliberately small detector tuned for the skew estimator. In the
//! default [`HysteresisMode::SinglePass`] mode it does not follow chains of
//! weak pixels, so its output differs from a textbook Canny on faint edges.

pub mod gradient;
pub mod hysteresis;
pub mod nms;
pub mod threshold;

use image::{GrayImage, Luma};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::grid::Grid;
use crate::raster::RasterImage;

pub use gradient::{compute_gradient_field, gaussian_blur, sobel_gradients, GradientField};
pub use hysteresis::{link_connected, link_edges, link_single_pass, HysteresisMode};
pub use nms::{suppress_non_maxima, GradientSector};
pub use threshold::{classify, EdgeClass, EdgeThresholds};

/// Binary edge map: `true` marks an edge pixel.
pub type EdgeMap = Grid<bool>;

impl Grid<bool> {
    /// Number of edge pixels.
    pub fn edge_count(&self) -> usize {
        self.as_slice().iter().filter(|&&e| e).count()
    }

    /// Render as an 8-bit image, 255 for edges and 0 elsewhere.
    pub fn to_gray_image(&self) -> GrayImage {
        let (w, h) = self.dimensions();
        GrayImage::from_fn(w as u32, h as u32, |x, y| {
            Luma([if self.get(x as usize, y as usize) { 255 } else { 0 }])
        })
    }
}

/// Edge detector settings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeConfig {
    /// Double-threshold cutoffs.
    pub thresholds: EdgeThresholds,
    /// Weak pixel resolution strategy.
    pub hysteresis: HysteresisMode,
}

impl EdgeConfig {
    /// Single-pass detector with the given thresholds.
    pub fn new(low: f64, high: f64) -> Result<Self> {
        Ok(Self {
            thresholds: EdgeThresholds::new(low, high)?,
            hysteresis: HysteresisMode::SinglePass,
        })
    }
}

/// Every intermediate grid of one detector run.
#[derive(Debug, Clone)]
pub struct EdgeTrace {
    pub gray: Grid<u8>,
    pub blurred: Grid<u8>,
    pub gradient: GradientField,
    pub suppressed: Grid<f64>,
    pub classified: Grid<EdgeClass>,
    pub linked: Grid<EdgeClass>,
    pub edges: EdgeMap,
}

/// Run the detector and keep every intermediate result.
///
/// # Errors
///
/// Fails on an invalid image or invalid thresholds; nothing is computed in
/// that case.
pub fn trace_edges(image: &RasterImage, config: &EdgeConfig) -> Result<EdgeTrace> {
    config.thresholds.validate()?;
    let gray = image.to_gray_grid()?;

    let blurred = gaussian_blur(&gray);
    let gradient = sobel_gradients(&blurred);
    let suppressed = suppress_non_maxima(&gradient);
    let classified = classify(&suppressed, &config.thresholds);
    let linked = link_edges(&classified, config.hysteresis);
    let edges = linked.map(|c| c == EdgeClass::Strong);

    debug!(
        width = image.width,
        height = image.height,
        low = config.thresholds.low,
        high = config.thresholds.high,
        hysteresis = ?config.hysteresis,
        edge_pixels = edges.edge_count(),
        "Edge detection complete"
    );

    Ok(EdgeTrace {
        gray,
        blurred,
        gradient,
        suppressed,
        classified,
        linked,
        edges,
    })
}

/// Detect edges with the given configuration.
pub fn detect_edges_with(image: &RasterImage, config: &EdgeConfig) -> Result<EdgeMap> {
    trace_edges(image, config).map(|trace| trace.edges)
}

/// Detect edges with single-pass hysteresis and the given thresholds.
///
/// # Arguments
///
/// * `image` - Gray or RGB raster
/// * `low` - Lower magnitude threshold (weak pixels)
/// * `high` - Upper magnitude threshold (strong pixels), `low <= high`
///
/// # Returns
///
/// An edge map with the same dimensions as `image`.
pub fn detect_edges(image: &RasterImage, low: f64, high: f64) -> Result<EdgeMap> {
    detect_edges_with(image, &EdgeConfig::new(low, high)?)
}

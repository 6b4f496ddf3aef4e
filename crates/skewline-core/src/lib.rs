//! Skewline Core - Document skew estimation library
//!
//! This crate finds the dominant near-horizontal line orientation in a
//! scanned page: a Canny-style edge detector feeds a line voter restricted to
//! a narrow window around horizontal, and the mean detected angle gives the
//! rotation needed to straighten the page.

pub mod edges;
pub mod error;
pub mod estimate;
pub mod grid;
pub mod hough;
pub mod luminance;
pub mod raster;
pub mod render;

pub use edges::{detect_edges, detect_edges_with, trace_edges, EdgeConfig, EdgeMap, EdgeTrace};
pub use error::{Result, SkewError};
pub use estimate::{
    estimate_angle, estimate_angle_with, estimate_from_edges, SkewConfig, SkewEstimate,
    UPRIGHT_DEGREES,
};
pub use grid::Grid;
pub use hough::{vote_lines, AngleRange, HoughConfig, HoughLine, MAX_ANGLE_CANDIDATES};
pub use raster::{Channels, RasterImage};
pub use render::{estimate_and_render, render_lines, RenderOptions, RenderedEstimate};

//! Raster input for the edge detection pipeline.
//!
//! Decoding is left to the caller (the `image` crate, a browser canvas, ...);
//! this module only describes an already decoded grid of pixels and turns it
//! into the single-channel intensity grid the gradient stage works on.
//!
//! Accepted layouts are single-channel gray and interleaved RGB. Anything else,
//! as well as zero-sized or mis-sized buffers, is rejected up front rather than
//! silently producing an all-zero edge map.

mod types;

pub use types::{Channels, RasterImage};

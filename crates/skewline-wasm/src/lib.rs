//! Skewline WASM - WebAssembly bindings for Skewline
//!
//! This crate exposes skewline-core skew estimation to JavaScript/TypeScript
//! applications.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrappers for rasters and estimates
//! - `estimate` - Skew estimation, edge maps and line overlays
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsRasterImage, estimate_skew } from '@skewline/wasm';
//!
//! await init();
//!
//! const image = new JsRasterImage(width, height, 1, grayBytes);
//! const { mean_angle, fixed_angle } = estimate_skew(image);
//! ```

use wasm_bindgen::prelude::*;

mod estimate;
mod types;

pub use estimate::{
    detect_edges, estimate_skew, estimate_skew_with_config, render_edge_background,
    render_line_overlay,
};
pub use types::{JsRasterImage, JsSkewEstimate};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }
}

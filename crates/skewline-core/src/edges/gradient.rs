//! Gaussian smoothing and Sobel gradients.
//!
//! The intensity grid is first smoothed with a fixed 5x5 Gaussian (σ = 1.4),
//! applied as two separable 5-tap passes with a mirrored border
//! (`dcb|abcd|cba`, the edge pixel is not repeated). The smoothed values are
//! rounded back to 8 bits, matching an 8-bit blur.
//!
//! Derivatives use the 3x3 Sobel pair:
//!
//! ```text
//!       [-1 0 1]         [-1 -2 -1]
//! Gx =  [-2 0 2]    Gy = [ 0  0  0]
//!       [-1 0 1]         [ 1  2  1]
//! ```
//!
//! with `y` growing downward. Only interior pixels are evaluated; the
//! one-pixel border keeps magnitude 0 and direction 0.

use crate::grid::Grid;

/// Gaussian kernel size (taps per axis).
pub const GAUSSIAN_KERNEL_SIZE: usize = 5;

/// Gaussian standard deviation.
pub const GAUSSIAN_SIGMA: f64 = 1.4;

/// Per-pixel gradient magnitude and direction.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientField {
    /// `sqrt(gx^2 + gy^2)`, always >= 0.
    pub magnitude: Grid<f64>,
    /// `atan2(gy, gx)` in radians, within (-π, π].
    pub direction: Grid<f64>,
}

impl GradientField {
    pub fn dimensions(&self) -> (usize, usize) {
        self.magnitude.dimensions()
    }
}

/// Normalized 1D Gaussian weights.
pub fn gaussian_kernel() -> [f64; GAUSSIAN_KERNEL_SIZE] {
    let radius = (GAUSSIAN_KERNEL_SIZE / 2) as f64;
    let denom = 2.0 * GAUSSIAN_SIGMA * GAUSSIAN_SIGMA;

    let mut kernel = [0.0; GAUSSIAN_KERNEL_SIZE];
    for (i, k) in kernel.iter_mut().enumerate() {
        let d = i as f64 - radius;
        *k = (-(d * d) / denom).exp();
    }
    let sum: f64 = kernel.iter().sum();
    for k in kernel.iter_mut() {
        *k /= sum;
    }
    kernel
}

/// Mirror an out-of-range index back into `0..len` without repeating the edge.
#[inline]
fn reflect_101(i: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let period = 2 * (len as isize - 1);
    let i = i.rem_euclid(period);
    if i >= len as isize {
        (period - i) as usize
    } else {
        i as usize
    }
}

/// Smooth an intensity grid with the fixed 5x5 Gaussian.
pub fn gaussian_blur(gray: &Grid<u8>) -> Grid<u8> {
    let (w, h) = gray.dimensions();
    let kernel = gaussian_kernel();
    let radius = (GAUSSIAN_KERNEL_SIZE / 2) as isize;

    // Horizontal pass
    let mut horizontal = Grid::new(w, h, 0.0f64);
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0;
            for (k, weight) in kernel.iter().enumerate() {
                let sx = reflect_101(x as isize + k as isize - radius, w);
                acc += weight * gray.get(sx, y) as f64;
            }
            horizontal.set(x, y, acc);
        }
    }

    // Vertical pass
    let mut blurred = Grid::new(w, h, 0u8);
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0;
            for (k, weight) in kernel.iter().enumerate() {
                let sy = reflect_101(y as isize + k as isize - radius, h);
                acc += weight * horizontal.get(x, sy);
            }
            blurred.set(x, y, acc.clamp(0.0, 255.0).round() as u8);
        }
    }

    blurred
}

/// Sobel magnitude and direction for every interior pixel.
pub fn sobel_gradients(image: &Grid<u8>) -> GradientField {
    let (w, h) = image.dimensions();
    let mut magnitude = Grid::new(w, h, 0.0f64);
    let mut direction = Grid::new(w, h, 0.0f64);

    if w < 3 || h < 3 {
        return GradientField {
            magnitude,
            direction,
        };
    }

    let p = |x: usize, y: usize| image.get(x, y) as f64;

    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let gx = (p(x + 1, y - 1) + 2.0 * p(x + 1, y) + p(x + 1, y + 1))
                - (p(x - 1, y - 1) + 2.0 * p(x - 1, y) + p(x - 1, y + 1));
            let gy = (p(x - 1, y + 1) + 2.0 * p(x, y + 1) + p(x + 1, y + 1))
                - (p(x - 1, y - 1) + 2.0 * p(x, y - 1) + p(x + 1, y - 1));

            magnitude.set(x, y, (gx * gx + gy * gy).sqrt());
            direction.set(x, y, gy.atan2(gx));
        }
    }

    GradientField {
        magnitude,
        direction,
    }
}

/// Blur followed by Sobel.
pub fn compute_gradient_field(gray: &Grid<u8>) -> GradientField {
    sobel_gradients(&gaussian_blur(gray))
}

//! Non-maximum suppression along the gradient direction.
//!
//! Gradient directions are folded into `[0°, 180°)` (a direction and its
//! opposite describe the same edge) and bucketed into four 45°-wide sectors
//! centred on 0°, 45°, 90° and 135°. A pixel survives only if its magnitude is
//! at least as large as both neighbours lying along its sector's axis.
//!
//! With `y` growing downward, a 45° gradient points toward `(+x, +y)`, so the
//! diagonal sector compares against the top-left/bottom-right pair and the
//! anti-diagonal sector against top-right/bottom-left.

use super::gradient::GradientField;
use crate::grid::Grid;

/// Quantized gradient orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientSector {
    /// `[0°, 22.5°) ∪ [157.5°, 180°)`: compare left and right.
    Horizontal,
    /// `[22.5°, 67.5°)`: compare top-left and bottom-right.
    Diagonal,
    /// `[67.5°, 112.5°)`: compare above and below.
    Vertical,
    /// `[112.5°, 157.5°)`: compare top-right and bottom-left.
    AntiDiagonal,
}

impl GradientSector {
    /// Bucket a gradient direction given in radians.
    pub fn from_direction(radians: f64) -> Self {
        let degrees = fold_degrees(radians);
        if !(22.5..157.5).contains(&degrees) {
            GradientSector::Horizontal
        } else if degrees < 67.5 {
            GradientSector::Diagonal
        } else if degrees < 112.5 {
            GradientSector::Vertical
        } else {
            GradientSector::AntiDiagonal
        }
    }

    /// `(dx, dy)` offsets of the two neighbours compared against.
    pub fn neighbor_offsets(self) -> [(isize, isize); 2] {
        match self {
            GradientSector::Horizontal => [(-1, 0), (1, 0)],
            GradientSector::Diagonal => [(-1, -1), (1, 1)],
            GradientSector::Vertical => [(0, -1), (0, 1)],
            GradientSector::AntiDiagonal => [(1, -1), (-1, 1)],
        }
    }
}

/// Fold a direction in radians into degrees within `[0, 180)`.
#[inline]
pub fn fold_degrees(radians: f64) -> f64 {
    let folded = (radians.to_degrees() + 180.0) % 180.0;
    // `% 180` of a value that rounds to exactly 180 can still land on 180
    if folded >= 180.0 {
        0.0
    } else {
        folded
    }
}

/// Thin the magnitude field to single-pixel ridges.
///
/// Interior pixels keep their magnitude unchanged when it is `>=` both
/// neighbours along the gradient axis and become 0 otherwise. Border pixels
/// are always 0.
pub fn suppress_non_maxima(field: &GradientField) -> Grid<f64> {
    let magnitude = &field.magnitude;
    let (w, h) = magnitude.dimensions();
    let mut suppressed = Grid::new(w, h, 0.0f64);

    if w < 3 || h < 3 {
        return suppressed;
    }

    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let mag = magnitude.get(x, y);
            let sector = GradientSector::from_direction(field.direction.get(x, y));
            let is_peak = sector.neighbor_offsets().iter().all(|&(dx, dy)| {
                let nx = (x as isize + dx) as usize;
                let ny = (y as isize + dy) as usize;
                mag >= magnitude.get(nx, ny)
            });
            if is_peak {
                suppressed.set(x, y, mag);
            }
        }
    }

    suppressed
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    fn field_from(magnitude: Grid<f64>, direction: f64) -> GradientField {
        let (w, h) = magnitude.dimensions();
        GradientField {
            magnitude,
            direction: Grid::new(w, h, direction),
        }
    }

    #[test]
    fn test_fold_degrees() {
        assert!((fold_degrees(0.0) - 0.0).abs() < 1e-12);
        assert!((fold_degrees(FRAC_PI_2) - 90.0).abs() < 1e-12);
        assert!((fold_degrees(-FRAC_PI_2) - 90.0).abs() < 1e-12);
        assert!((fold_degrees(-FRAC_PI_4) - 135.0).abs() < 1e-12);
        assert!(fold_degrees(PI) < 1e-9 || fold_degrees(PI) == 0.0);
        assert!(fold_degrees(-PI) < 1e-9);
    }

    #[test]
    fn test_sector_boundaries() {
        let sector = |deg: f64| GradientSector::from_direction(deg.to_radians());
        assert_eq!(sector(0.0), GradientSector::Horizontal);
        assert_eq!(sector(22.0), GradientSector::Horizontal);
        assert_eq!(sector(23.0), GradientSector::Diagonal);
        assert_eq!(sector(45.0), GradientSector::Diagonal);
        assert_eq!(sector(67.0), GradientSector::Diagonal);
        assert_eq!(sector(68.0), GradientSector::Vertical);
        assert_eq!(sector(90.0), GradientSector::Vertical);
        assert_eq!(sector(-90.0), GradientSector::Vertical);
        assert_eq!(sector(112.0), GradientSector::Vertical);
        assert_eq!(sector(113.0), GradientSector::AntiDiagonal);
        assert_eq!(sector(135.0), GradientSector::AntiDiagonal);
        assert_eq!(sector(-45.0), GradientSector::AntiDiagonal);
        assert_eq!(sector(-135.0), GradientSector::Diagonal);
        assert_eq!(sector(158.0), GradientSector::Horizontal);
        assert_eq!(sector(180.0), GradientSector::Horizontal);
    }

    #[test]
    fn test_horizontal_sector_keeps_column_peak() {
        // Magnitude ridge along column 2, gradient pointing along x
        let mut mag = Grid::new(5, 5, 0.0);
        for y in 0..5 {
            mag.set(1, y, 50.0);
            mag.set(2, y, 100.0);
            mag.set(3, y, 50.0);
        }
        let suppressed = suppress_non_maxima(&field_from(mag, 0.0));
        for y in 1..4 {
            assert_eq!(suppressed.get(1, y), 0.0);
            assert_eq!(suppressed.get(2, y), 100.0);
            assert_eq!(suppressed.get(3, y), 0.0);
        }
    }

    #[test]
    fn test_vertical_sector_ignores_horizontal_neighbors() {
        // Same ridge, but gradient points along y: every pixel in a column
        // is compared to equal neighbours above and below and survives
        let mut mag = Grid::new(5, 5, 0.0);
        for y in 0..5 {
            mag.set(1, y, 50.0);
            mag.set(2, y, 100.0);
            mag.set(3, y, 50.0);
        }
        let suppressed = suppress_non_maxima(&field_from(mag, FRAC_PI_2));
        assert_eq!(suppressed.get(1, 2), 50.0);
        assert_eq!(suppressed.get(2, 2), 100.0);
    }

    #[test]
    fn test_diagonal_sector_axis() {
        let mut mag = Grid::new(3, 3, 0.0);
        mag.set(1, 1, 10.0);
        // Larger neighbour along the anti-diagonal does not matter for 45°
        mag.set(2, 0, 20.0);
        mag.set(0, 2, 20.0);
        let kept = suppress_non_maxima(&field_from(mag.clone(), FRAC_PI_4));
        assert_eq!(kept.get(1, 1), 10.0);

        // ...but it does for 135°
        let dropped = suppress_non_maxima(&field_from(mag, 3.0 * FRAC_PI_4));
        assert_eq!(dropped.get(1, 1), 0.0);
    }

    #[test]
    fn test_ties_are_kept() {
        let mag = Grid::new(4, 4, 7.0);
        let suppressed = suppress_non_maxima(&field_from(mag, 0.0));
        assert_eq!(suppressed.get(1, 1), 7.0);
        assert_eq!(suppressed.get(2, 2), 7.0);
        // Border is never kept
        assert_eq!(suppressed.get(0, 0), 0.0);
        assert_eq!(suppressed.get(3, 1), 0.0);
    }
}

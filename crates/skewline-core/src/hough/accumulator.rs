//! Vote accumulation and peak extraction.

use tracing::debug;

use super::{HoughConfig, HoughLine};
use crate::edges::EdgeMap;
use crate::error::Result;

/// A `(angle, rho)` vote table.
///
/// Cells are stored with one row and one column of zero padding on every
/// side so the peak test can read all four neighbours without bounds checks.
#[derive(Debug, Clone)]
pub struct Accumulator {
    angles: Vec<f64>,
    rho_resolution: f64,
    num_rho: usize,
    stride: usize,
    cells: Vec<u32>,
}

impl Accumulator {
    /// Cast one vote per edge pixel per candidate angle.
    pub fn build(edges: &EdgeMap, config: &HoughConfig) -> Result<Self> {
        config.validate()?;

        let (w, h) = edges.dimensions();
        let angles = config.angles.candidates();
        let num_rho = ((((w + h) * 2 + 1) as f64 / config.rho_resolution).round() as usize).max(1);
        let stride = num_rho + 2;
        let mut cells = vec![0u32; (angles.len() + 2) * stride];

        let trig: Vec<(f64, f64)> = angles
            .iter()
            .map(|theta| {
                let (sin, cos) = theta.sin_cos();
                (cos / config.rho_resolution, sin / config.rho_resolution)
            })
            .collect();
        let offset = ((num_rho - 1) / 2) as i64;

        for (x, y, is_edge) in edges.iter_cells() {
            if !is_edge {
                continue;
            }
            for (n, &(cos, sin)) in trig.iter().enumerate() {
                let r = (x as f64 * cos + y as f64 * sin).round() as i64 + offset;
                if (0..num_rho as i64).contains(&r) {
                    cells[(n + 1) * stride + r as usize + 1] += 1;
                }
            }
        }

        Ok(Self {
            angles,
            rho_resolution: config.rho_resolution,
            num_rho,
            stride,
            cells,
        })
    }

    /// Number of candidate angles.
    pub fn num_angles(&self) -> usize {
        self.angles.len()
    }

    /// Number of rho bins.
    pub fn num_rho(&self) -> usize {
        self.num_rho
    }

    /// Votes in cell `(angle_index, rho_index)`.
    #[inline]
    pub fn votes(&self, angle_index: usize, rho_index: usize) -> u32 {
        self.cells[self.cell(angle_index, rho_index)]
    }

    /// Signed distance represented by a rho bin.
    pub fn rho_at(&self, rho_index: usize) -> f64 {
        (rho_index as f64 - ((self.num_rho - 1) / 2) as f64) * self.rho_resolution
    }

    #[inline]
    fn cell(&self, angle_index: usize, rho_index: usize) -> usize {
        (angle_index + 1) * self.stride + rho_index + 1
    }

    /// Local maxima with strictly more than `threshold` votes, strongest
    /// first.
    ///
    /// A cell is a peak when it beats the lower-rho and lower-angle
    /// neighbours strictly and the higher ones or ties them, so a plateau of
    /// equal cells yields exactly one peak. Equal vote counts keep the
    /// angle-major scan order.
    pub fn peaks(&self, threshold: u32) -> Vec<HoughLine> {
        let mut found = Vec::new();

        for n in 0..self.angles.len() {
            for r in 0..self.num_rho {
                let base = self.cell(n, r);
                let v = self.cells[base];
                let is_peak = v > threshold
                    && v > self.cells[base - 1]
                    && v >= self.cells[base + 1]
                    && v > self.cells[base - self.stride]
                    && v >= self.cells[base + self.stride];
                if is_peak {
                    found.push(HoughLine {
                        rho: self.rho_at(r),
                        theta: self.angles[n],
                        votes: v,
                    });
                }
            }
        }

        // stable: ties stay in scan order
        found.sort_by(|a, b| b.votes.cmp(&a.votes));
        found
    }
}

/// Detect straight lines in an edge map.
///
/// # Arguments
/// * `edges` - Binary edge map
/// * `config` - Resolution, vote threshold, candidate angles and line cap
///
/// # Returns
/// Lines ordered by decreasing votes, truncated to `config.max_lines`.
///
/// # Errors
/// Returns `SkewError::InvalidVotingConfig` if the configuration is invalid.
pub fn vote_lines(edges: &EdgeMap, config: &HoughConfig) -> Result<Vec<HoughLine>> {
    let accumulator = Accumulator::build(edges, config)?;
    let mut lines = accumulator.peaks(config.vote_threshold);
    if let Some(max) = config.max_lines {
        lines.truncate(max);
    }

    debug!(
        edge_pixels = edges.edge_count(),
        angles = accumulator.num_angles(),
        rho_bins = accumulator.num_rho(),
        lines = lines.len(),
        "line voting complete"
    );

    Ok(lines)
}

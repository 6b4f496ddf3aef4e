//! Resolution of weak pixels into edges or background.
//!
//! Two modes are provided:
//!
//! - [`HysteresisMode::SinglePass`] (default): one pass over interior pixels.
//!   A weak pixel becomes strong iff one of its 8 neighbours was strong in the
//!   classification *before* the pass; otherwise it is dropped. Neighbours are
//!   read from the input grid and results written to a fresh grid, so the
//!   outcome does not depend on visiting order. Chains of weak pixels are not
//!   followed: a weak pixel touching only another weak pixel is dropped even if
//!   that one touches a strong pixel.
//! - [`HysteresisMode::Connected`]: classic edge tracking. Every weak pixel
//!   8-connected to a strong pixel through other weak pixels is kept.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::threshold::EdgeClass;
use crate::grid::Grid;

/// How weak pixels are linked to strong ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HysteresisMode {
    /// One non-iterated neighbour check.
    #[default]
    SinglePass,
    /// Flood fill through weak pixels.
    Connected,
}

const NEIGHBORS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

#[inline]
fn offset(x: usize, y: usize, dx: isize, dy: isize) -> (usize, usize) {
    ((x as isize + dx) as usize, (y as isize + dy) as usize)
}

fn has_strong_neighbor(classes: &Grid<EdgeClass>, x: usize, y: usize) -> bool {
    NEIGHBORS.iter().any(|&(dx, dy)| {
        let (nx, ny) = offset(x, y, dx, dy);
        classes.get(nx, ny) == EdgeClass::Strong
    })
}

/// Single-pass linking reading from a snapshot of `classes`.
///
/// The result only ever contains `None` and `Strong`.
pub fn link_single_pass(classes: &Grid<EdgeClass>) -> Grid<EdgeClass> {
    let (w, h) = classes.dimensions();
    let mut linked = Grid::new(w, h, EdgeClass::None);

    for (x, y, class) in classes.iter_cells() {
        if !classes.is_interior(x, y) {
            continue;
        }
        let resolved = match class {
            EdgeClass::Strong => EdgeClass::Strong,
            EdgeClass::Weak if has_strong_neighbor(classes, x, y) => EdgeClass::Strong,
            _ => EdgeClass::None,
        };
        linked.set(x, y, resolved);
    }

    linked
}

/// Flood-fill linking: keep weak pixels reachable from a strong pixel.
pub fn link_connected(classes: &Grid<EdgeClass>) -> Grid<EdgeClass> {
    let (w, h) = classes.dimensions();
    let mut linked = Grid::new(w, h, EdgeClass::None);
    let mut queue = VecDeque::new();

    for (x, y, class) in classes.iter_cells() {
        if class == EdgeClass::Strong && classes.is_interior(x, y) {
            linked.set(x, y, EdgeClass::Strong);
            queue.push_back((x, y));
        }
    }

    while let Some((x, y)) = queue.pop_front() {
        for &(dx, dy) in &NEIGHBORS {
            let (nx, ny) = offset(x, y, dx, dy);
            if !classes.is_interior(nx, ny) {
                continue;
            }
            if classes.get(nx, ny) == EdgeClass::Weak && linked.get(nx, ny) == EdgeClass::None {
                linked.set(nx, ny, EdgeClass::Strong);
                queue.push_back((nx, ny));
            }
        }
    }

    linked
}

/// Resolve weak pixels with the given mode.
pub fn link_edges(classes: &Grid<EdgeClass>, mode: HysteresisMode) -> Grid<EdgeClass> {
    match mode {
        HysteresisMode::SinglePass => link_single_pass(classes),
        HysteresisMode::Connected => link_connected(classes),
    }
}

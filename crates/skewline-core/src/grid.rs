//! Dense row-major 2D grid shared by all pipeline stages.

/// A `width x height` grid of values stored in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T: Copy> Grid<T> {
    /// Create a grid filled with `fill`.
    pub fn new(width: usize, height: usize, fill: T) -> Self {
        Self {
            width,
            height,
            data: vec![fill; width * height],
        }
    }

    /// Wrap an existing row-major buffer.
    ///
    /// Returns `None` if the buffer length doesn't equal `width * height`.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Option<Self> {
        if data.len() != width * height {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Value at column `x`, row `y`. Panics when out of bounds.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        debug_assert!(x < self.width && y < self.height);
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        debug_assert!(x < self.width && y < self.height);
        self.data[y * self.width + x] = value;
    }

    /// True if `(x, y)` has a full 3x3 neighborhood inside the grid.
    #[inline]
    pub fn is_interior(&self, x: usize, y: usize) -> bool {
        x >= 1 && y >= 1 && x + 1 < self.width && y + 1 < self.height
    }

    /// Apply `f` to every cell, producing a grid of the same shape.
    pub fn map<U: Copy>(&self, f: impl Fn(T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Iterate `(x, y, value)` over every cell in row-major order.
    pub fn iter_cells(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        let width = self.width;
        self.data
            .iter()
            .enumerate()
            .map(move |(i, &v)| (i % width, i / width, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_access() {
        let mut grid = Grid::new(4, 3, 0u8);
        assert_eq!(grid.dimensions(), (4, 3));
        grid.set(3, 2, 9);
        assert_eq!(grid.get(3, 2), 9);
        assert_eq!(grid.as_slice()[2 * 4 + 3], 9);
    }

    #[test]
    fn test_from_vec_length_check() {
        assert!(Grid::from_vec(2, 2, vec![1, 2, 3, 4]).is_some());
        assert!(Grid::from_vec(2, 2, vec![1, 2, 3]).is_none());
    }

    #[test]
    fn test_interior() {
        let grid = Grid::new(3, 3, 0u8);
        assert!(grid.is_interior(1, 1));
        assert!(!grid.is_interior(0, 1));
        assert!(!grid.is_interior(1, 2));

        // Nothing is interior in a 2-wide grid
        let thin = Grid::new(2, 5, 0u8);
        assert!((0..5).all(|y| (0..2).all(|x| !thin.is_interior(x, y))));
    }

    #[test]
    fn test_map_preserves_shape() {
        let grid = Grid::from_vec(3, 1, vec![1u8, 2, 3]).unwrap();
        let doubled = grid.map(|v| v as u16 * 2);
        assert_eq!(doubled.dimensions(), (3, 1));
        assert_eq!(doubled.as_slice(), &[2, 4, 6]);
    }

    #[test]
    fn test_iter_cells_coordinates() {
        let grid = Grid::from_vec(2, 2, vec![10, 11, 12, 13]).unwrap();
        let cells: Vec<_> = grid.iter_cells().collect();
        assert_eq!(cells, vec![(0, 0, 10), (1, 0, 11), (0, 1, 12), (1, 1, 13)]);
    }
}

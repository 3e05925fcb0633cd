//! Dense 2D grid with coordinate-offset addressing
//!
//! Logical coordinates may be negative; the grid's offset translates them into
//! zero-based storage. All layout generators store their cells in a `Grid`.

use glam::IVec2;

use crate::error::{LayoutError, Result};

/// Fixed-size 2D array of cell values, stored row-major
///
/// A logical coordinate `pos` addresses storage cell `pos + offset`. Indexing
/// through [`Grid::get`] and [`Grid::set`] does not check bounds beyond the
/// underlying slice; check [`Grid::in_bounds`] first.
///
/// # Example
///
/// ```
/// use rust_library_dungeon::Grid;
/// use glam::IVec2;
///
/// // Logical coordinates -2..2 on both axes
/// let mut grid = Grid::new(IVec2::new(4, 4), IVec2::new(2, 2), 0u8).unwrap();
/// assert!(grid.in_bounds(IVec2::new(-2, -2)));
/// assert!(!grid.in_bounds(IVec2::new(2, 0)));
///
/// grid.set(IVec2::new(-1, 1), 7);
/// assert_eq!(*grid.get(IVec2::new(-1, 1)), 7);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    cells: Vec<T>,
    size: IVec2,
    offset: IVec2,
}

impl<T: Clone> Grid<T> {
    /// Create a grid of `size.x * size.y` copies of `default`
    ///
    /// # Errors
    ///
    /// Returns `InvalidGridSize` if either dimension is <= 0
    pub fn new(size: IVec2, offset: IVec2, default: T) -> Result<Self> {
        if size.x <= 0 || size.y <= 0 {
            return Err(LayoutError::InvalidGridSize {
                width: size.x,
                height: size.y,
            });
        }

        let len = size.x as usize * size.y as usize;
        Ok(Self {
            cells: vec![default; len],
            size,
            offset,
        })
    }
}

impl<T> Grid<T> {
    /// Grid dimensions
    #[inline]
    pub fn size(&self) -> IVec2 {
        self.size
    }

    /// Offset added to logical coordinates before indexing
    #[inline]
    pub fn offset(&self) -> IVec2 {
        self.offset
    }

    /// Number of cells
    #[inline]
    pub fn area(&self) -> usize {
        self.cells.len()
    }

    /// Whether the offset-adjusted coordinate lies inside the grid
    #[inline]
    pub fn in_bounds(&self, pos: IVec2) -> bool {
        let p = pos + self.offset;
        p.x >= 0 && p.y >= 0 && p.x < self.size.x && p.y < self.size.y
    }

    #[inline]
    fn index(&self, pos: IVec2) -> usize {
        let p = pos + self.offset;
        p.y as usize * self.size.x as usize + p.x as usize
    }

    /// Cell at `pos`; the caller must have checked `in_bounds`
    #[inline]
    pub fn get(&self, pos: IVec2) -> &T {
        &self.cells[self.index(pos)]
    }

    /// Mutable cell at `pos`; the caller must have checked `in_bounds`
    #[inline]
    pub fn get_mut(&mut self, pos: IVec2) -> &mut T {
        let index = self.index(pos);
        &mut self.cells[index]
    }

    /// Overwrite the cell at `pos`; the caller must have checked `in_bounds`
    #[inline]
    pub fn set(&mut self, pos: IVec2, value: T) {
        let index = self.index(pos);
        self.cells[index] = value;
    }

    /// Bounds-checked access
    pub fn try_get(&self, pos: IVec2) -> Option<&T> {
        if self.in_bounds(pos) {
            Some(self.get(pos))
        } else {
            None
        }
    }

    /// Logical coordinate of a storage index
    #[inline]
    fn coord_of(&self, index: usize) -> IVec2 {
        let x = (index % self.size.x as usize) as i32;
        let y = (index / self.size.x as usize) as i32;
        IVec2::new(x, y) - self.offset
    }

    /// Iterate cells in storage order together with their logical coordinates
    pub fn iter(&self) -> impl Iterator<Item = (IVec2, &T)> {
        self.cells
            .iter()
            .enumerate()
            .map(move |(index, cell)| (self.coord_of(index), cell))
    }

    /// All cells in row-major storage order
    #[inline]
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    /// Count the cells matching a predicate
    pub fn count(&self, mut pred: impl FnMut(&T) -> bool) -> usize {
        self.cells.iter().filter(|cell| pred(cell)).count()
    }
}

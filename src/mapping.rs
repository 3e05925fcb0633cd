//! World ↔ grid coordinate mapping
//!
//! A room of grid size `size` covers the world rectangle
//! `[origin - size, origin + size]`, so each cell spans
//! `2 * size / (size - 1)` world units per axis. Grid coordinate 0 sits on
//! the lower world edge and `size - 1` on the upper one.

use glam::{IVec2, Vec2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};

/// One of the four axis-aligned directions a boss room can attach on
///
/// North is +y in grid space, East is +x.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    North,
    South,
    East,
    West,
}

impl Direction {
    /// All directions
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Unit grid offset for this direction
    #[inline]
    pub fn offset(self) -> IVec2 {
        match self {
            Direction::North => IVec2::Y,
            Direction::South => IVec2::NEG_Y,
            Direction::East => IVec2::X,
            Direction::West => IVec2::NEG_X,
        }
    }

    /// Unit world vector for this direction
    #[inline]
    pub fn vector(self) -> Vec2 {
        self.offset().as_vec2()
    }

    /// The opposite direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Whether the direction runs along the y axis
    #[inline]
    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::North | Direction::South)
    }

    /// Parse an axis-aligned unit vector
    ///
    /// # Errors
    ///
    /// Returns `InvalidDirection` for anything other than (0, ±1) or (±1, 0)
    pub fn from_vector(v: Vec2) -> Result<Self> {
        const EPS: f32 = 1e-4;
        let near = |a: f32, b: f32| (a - b).abs() < EPS;

        if near(v.x, 0.0) && near(v.y, 1.0) {
            Ok(Direction::North)
        } else if near(v.x, 0.0) && near(v.y, -1.0) {
            Ok(Direction::South)
        } else if near(v.x, 1.0) && near(v.y, 0.0) {
            Ok(Direction::East)
        } else if near(v.x, -1.0) && near(v.y, 0.0) {
            Ok(Direction::West)
        } else {
            Err(LayoutError::InvalidDirection { x: v.x, y: v.y })
        }
    }
}

/// Affine transform between world space and a room's grid
///
/// # Example
///
/// ```
/// use rust_library_dungeon::GridMapping;
/// use glam::{IVec2, Vec2};
///
/// let mapping = GridMapping::new(Vec2::new(100.0, 0.0), IVec2::new(11, 11));
/// let cell = mapping.world_to_grid(Vec2::new(100.0, 0.0));
/// assert_eq!(cell, IVec2::new(5, 5));
/// let back = mapping.grid_to_world(cell);
/// assert!((back - Vec2::new(100.0, 0.0)).length() < 1e-4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridMapping {
    origin: Vec2,
    size: IVec2,
    scale: Vec2,
}

impl GridMapping {
    /// Build the mapping for a room centered on `origin`
    ///
    /// Both dimensions must be at least 2; the configuration builders enforce
    /// this before a mapping is created.
    pub fn new(origin: Vec2, size: IVec2) -> Self {
        let extent = size.as_vec2();
        let scale = 2.0 * extent / (extent - Vec2::ONE);
        Self {
            origin,
            size,
            scale,
        }
    }

    /// World-space center of the room
    #[inline]
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Grid size the mapping was built for
    #[inline]
    pub fn size(&self) -> IVec2 {
        self.size
    }

    /// World units per grid cell on each axis
    #[inline]
    pub fn cell_extent(&self) -> Vec2 {
        self.scale
    }

    /// Grid column of a world-space x coordinate
    pub fn world_to_grid_x(&self, x: f32) -> i32 {
        ((x - self.origin.x + self.size.x as f32) / self.scale.x).round() as i32
    }

    /// Grid row of a world-space y coordinate
    pub fn world_to_grid_y(&self, y: f32) -> i32 {
        ((y - self.origin.y + self.size.y as f32) / self.scale.y).round() as i32
    }

    /// World-space x coordinate of a grid column's center
    pub fn grid_to_world_x(&self, x: i32) -> f32 {
        self.origin.x - self.size.x as f32 + x as f32 * self.scale.x
    }

    /// World-space y coordinate of a grid row's center
    pub fn grid_to_world_y(&self, y: i32) -> f32 {
        self.origin.y - self.size.y as f32 + y as f32 * self.scale.y
    }

    /// Nearest grid cell to a world position (may be out of bounds)
    pub fn world_to_grid(&self, world: Vec2) -> IVec2 {
        IVec2::new(self.world_to_grid_x(world.x), self.world_to_grid_y(world.y))
    }

    /// World position of a grid cell's center
    pub fn grid_to_world(&self, cell: IVec2) -> Vec2 {
        Vec2::new(self.grid_to_world_x(cell.x), self.grid_to_world_y(cell.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_direction_offsets() {
        for dir in Direction::ALL {
            assert_eq!(dir.offset() + dir.opposite().offset(), IVec2::ZERO);
            assert_eq!(dir.offset().abs().element_sum(), 1);
        }
        assert!(Direction::North.is_vertical());
        assert!(!Direction::West.is_vertical());
    }

    #[test]
    fn test_direction_from_vector() {
        assert_eq!(Direction::from_vector(Vec2::Y).unwrap(), Direction::North);
        assert_eq!(Direction::from_vector(Vec2::NEG_X).unwrap(), Direction::West);
        assert!(Direction::from_vector(Vec2::new(0.7, 0.7)).is_err());
        assert!(Direction::from_vector(Vec2::ZERO).is_err());
        assert!(Direction::from_vector(Vec2::new(0.0, 2.0)).is_err());
    }

    #[test]
    fn test_mapping_extremes() {
        let mapping = GridMapping::new(Vec2::new(10.0, -5.0), IVec2::new(20, 30));

        assert_relative_eq!(mapping.grid_to_world_x(0), 10.0 - 20.0);
        assert_relative_eq!(mapping.grid_to_world_x(19), 10.0 + 20.0, epsilon = 1e-4);
        assert_relative_eq!(mapping.grid_to_world_y(0), -5.0 - 30.0);
        assert_relative_eq!(mapping.grid_to_world_y(29), -5.0 + 30.0, epsilon = 1e-4);
    }

    #[test]
    fn test_grid_round_trip_is_exact() {
        let mapping = GridMapping::new(Vec2::new(3.5, 7.0), IVec2::new(25, 17));
        for y in 0..17 {
            for x in 0..25 {
                let cell = IVec2::new(x, y);
                assert_eq!(mapping.world_to_grid(mapping.grid_to_world(cell)), cell);
            }
        }
    }

    #[test]
    fn test_world_round_trip_within_one_cell() {
        let origin = Vec2::new(-12.0, 40.0);
        let size = IVec2::new(40, 24);
        let mapping = GridMapping::new(origin, size);
        let extent = mapping.cell_extent();

        let steps = 97;
        for i in 0..=steps {
            for j in 0..=steps {
                let t = Vec2::new(i as f32, j as f32) / steps as f32;
                let p = origin - size.as_vec2() + t * 2.0 * size.as_vec2();
                let back = mapping.grid_to_world(mapping.world_to_grid(p));
                assert!((back.x - p.x).abs() <= extent.x, "x drift at {p}");
                assert!((back.y - p.y).abs() <= extent.y, "y drift at {p}");
            }
        }
    }
}

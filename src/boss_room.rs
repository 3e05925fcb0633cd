//! Circular boss room generation
//!
//! The room is an ellipse inscribed in its grid: a floor disc, a thick
//! border ring, and two openings. The entrance faces back toward the library
//! and the exit faces away from it. Each opening is walled off to the grid
//! edge by a short corridor.

use glam::{IVec2, Vec2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::cell::{BorderType, BossRoomCell, BossRoomCellType, CellTransform, ObjectType};
use crate::config::BossRoomConfig;
use crate::error::Result;
use crate::grid::Grid;
use crate::mapping::{Direction, GridMapping};

/// Ellipse radius as a fraction of the grid size per axis
pub const RADIUS_FACTOR: f32 = 0.35;

/// Largest ellipse value still counted as floor
pub const FLOOR_MAX: f32 = 0.85;

/// Smallest ellipse value on the border ring
pub const RING_MIN: f32 = 0.95;

/// Largest ellipse value on the border ring
pub const RING_MAX: f32 = 1.15;

/// Chance that a ring cell holds a pillar instead of a wall shelf
const PILLAR_CHANCE: f64 = 0.2;

/// Where a point falls relative to the room ellipse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RingBand {
    /// Inside the floor disc
    Interior,
    /// Between the floor and the ring, left empty
    Gap,
    /// On the border ring
    Border,
    /// Beyond the ring
    Outside,
}

/// Which opening a gap cell belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Opening {
    Entrance,
    Exit,
}

impl Opening {
    fn kind(self) -> BossRoomCellType {
        match self {
            Opening::Entrance => BossRoomCellType::Entrance,
            Opening::Exit => BossRoomCellType::Exit,
        }
    }

    fn border(self, middle: bool) -> BorderType {
        match (self, middle) {
            (Opening::Entrance, true) => BorderType::EntranceMiddle,
            (Opening::Entrance, false) => BorderType::EntranceSide,
            (Opening::Exit, true) => BorderType::ExitMiddle,
            (Opening::Exit, false) => BorderType::ExitSide,
        }
    }
}

/// Generator and owner of a boss room layout
///
/// # Example
///
/// ```
/// use rust_library_dungeon::*;
///
/// let config = BossRoomConfigBuilder::new()
///     .seed(7)
///     .direction(Direction::East)
///     .build()
///     .unwrap();
///
/// let room = BossRoomGen::generate(config).unwrap();
/// assert!(!room.entrance_cells().is_empty());
/// assert!(!room.exit_cells().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct BossRoomGen {
    config: BossRoomConfig,
    grid: Grid<BossRoomCell>,
    mapping: GridMapping,
    center: Vec2,
    radii: Vec2,
    entrance_cells: Vec<IVec2>,
    exit_cells: Vec<IVec2>,
}

impl BossRoomGen {
    /// Generate the boss room layout
    ///
    /// # Errors
    ///
    /// Returns `InvalidGridSize` if the configured size is not positive
    pub fn generate(config: BossRoomConfig) -> Result<Self> {
        let size = config.size;
        let mut room = Self {
            grid: Grid::new(size, IVec2::ZERO, BossRoomCell::default())?,
            mapping: GridMapping::new(config.origin, size),
            center: (size - IVec2::ONE).as_vec2() / 2.0,
            radii: size.as_vec2() * RADIUS_FACTOR,
            entrance_cells: Vec::new(),
            exit_cells: Vec::new(),
            config,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed as u64);

        info!(
            seed = config.seed,
            width = size.x,
            height = size.y,
            direction = ?config.direction,
            "generating boss room"
        );

        room.place_ring(&mut rng);
        room.carve_opening(config.direction.opposite(), Opening::Entrance);
        room.carve_opening(config.direction, Opening::Exit);

        info!(
            entrance = room.entrance_cells.len(),
            exit = room.exit_cells.len(),
            "boss room generated"
        );
        Ok(room)
    }

    /// Configuration the room was generated from
    #[inline]
    pub fn config(&self) -> &BossRoomConfig {
        &self.config
    }

    /// The generated cells
    #[inline]
    pub fn grid(&self) -> &Grid<BossRoomCell> {
        &self.grid
    }

    /// World ↔ grid mapping of this room
    #[inline]
    pub fn mapping(&self) -> &GridMapping {
        &self.mapping
    }

    /// Ellipse center in grid coordinates
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.center
    }

    /// Ellipse radii in grid cells
    #[inline]
    pub fn radii(&self) -> Vec2 {
        self.radii
    }

    /// Cells of the opening facing the library
    #[inline]
    pub fn entrance_cells(&self) -> &[IVec2] {
        &self.entrance_cells
    }

    /// Cells of the opening facing away from the library
    #[inline]
    pub fn exit_cells(&self) -> &[IVec2] {
        &self.exit_cells
    }

    /// World position at the middle of the entrance, if it has any cells
    pub fn entrance_world_position(&self) -> Option<Vec2> {
        self.mean_world_position(&self.entrance_cells)
    }

    /// World position at the middle of the exit, if it has any cells
    pub fn exit_world_position(&self) -> Option<Vec2> {
        self.mean_world_position(&self.exit_cells)
    }

    fn mean_world_position(&self, cells: &[IVec2]) -> Option<Vec2> {
        if cells.is_empty() {
            return None;
        }
        let sum: Vec2 = cells
            .iter()
            .map(|&cell| self.mapping.grid_to_world(cell))
            .sum();
        Some(sum / cells.len() as f32)
    }

    /// Normalized ellipse value: 0 at the center, 1 on the ellipse
    pub fn ellipse_value(&self, point: Vec2) -> f32 {
        let d = (point - self.center) / self.radii;
        d.dot(d)
    }

    /// Band of a grid-space point
    pub fn classify(&self, point: Vec2) -> RingBand {
        let v = self.ellipse_value(point);
        if v <= FLOOR_MAX {
            RingBand::Interior
        } else if v < RING_MIN {
            RingBand::Gap
        } else if v <= RING_MAX {
            RingBand::Border
        } else {
            RingBand::Outside
        }
    }

    /// Lay down the floor disc and the border ring
    fn place_ring(&mut self, rng: &mut ChaCha8Rng) {
        let size = self.grid.size();
        let mut pillars = 0usize;

        for y in 0..size.y {
            for x in 0..size.x {
                let pos = IVec2::new(x, y);
                let cell = match self.classify(pos.as_vec2()) {
                    RingBand::Interior => BossRoomCell::with_kind(BossRoomCellType::Floor),
                    RingBand::Border => {
                        let radial = pos.as_vec2() - self.center;
                        let rotation = radial.x.atan2(-radial.y).to_degrees();
                        let object = if rng.gen_bool(PILLAR_CHANCE) {
                            pillars += 1;
                            ObjectType::Pillar
                        } else {
                            ObjectType::WallShelf
                        };
                        BossRoomCell {
                            kind: BossRoomCellType::Border,
                            border: BorderType::Circle,
                            object,
                            transform: CellTransform::rotated(rotation),
                            ..Default::default()
                        }
                    }
                    RingBand::Gap | RingBand::Outside => continue,
                };
                self.grid.set(pos, cell);
            }
        }

        debug!(pillars, "border ring placed");
    }

    /// Open the ring on the `side` half and wall the approach to the grid edge
    fn carve_opening(&mut self, side: Direction, opening: Opening) {
        let size = self.grid.size();
        let (center_line, perpendicular): (i32, fn(IVec2) -> i32) = if side.is_vertical() {
            (size.x / 2, |p: IVec2| p.x)
        } else {
            (size.y / 2, |p: IVec2| p.y)
        };
        let outward = side.vector();

        let gap: Vec<IVec2> = self
            .grid
            .iter()
            .filter(|(pos, cell)| {
                cell.kind == BossRoomCellType::Border
                    && (pos.as_vec2() - self.center).dot(outward) > 0.0
                    && (perpendicular(*pos) - center_line).abs() <= 1
            })
            .map(|(pos, _)| pos)
            .collect();

        for &pos in &gap {
            let offset = perpendicular(pos) - center_line;
            self.grid.set(
                pos,
                BossRoomCell {
                    kind: opening.kind(),
                    border: opening.border(offset == 0),
                    ..Default::default()
                },
            );
        }

        for &pos in &gap {
            let offset = perpendicular(pos) - center_line;
            let lane = if offset == 0 {
                BossRoomCell::with_kind(BossRoomCellType::Floor)
            } else {
                let wall = corridor_wall(side, offset);
                BossRoomCell {
                    kind: BossRoomCellType::Border,
                    border: wall,
                    object: ObjectType::WallShelf,
                    transform: CellTransform::rotated(corridor_rotation(wall)),
                    ..Default::default()
                }
            };

            let mut next = pos + side.offset();
            while self.grid.in_bounds(next) {
                if self.grid.get(next).is_empty() {
                    self.grid.set(next, lane);
                }
                next += side.offset();
            }
        }

        debug!(side = ?side, cells = gap.len(), "opening carved");
        match opening {
            Opening::Entrance => self.entrance_cells = gap,
            Opening::Exit => self.exit_cells = gap,
        }
    }
}

/// Straight wall type of a corridor side
fn corridor_wall(side: Direction, offset: i32) -> BorderType {
    match (side.is_vertical(), offset < 0) {
        (true, true) => BorderType::Left,
        (true, false) => BorderType::Right,
        (false, true) => BorderType::Bottom,
        (false, false) => BorderType::Top,
    }
}

fn corridor_rotation(wall: BorderType) -> f32 {
    match wall {
        BorderType::Right => 90.0,
        BorderType::Top => 180.0,
        BorderType::Left => 270.0,
        _ => 0.0,
    }
}

//! Layout configuration and builders
//!
//! This module provides validated configuration types for the library room and
//! the boss room. A configuration plus its seed fully determines the generated
//! layout.

use glam::{IVec2, Vec2};
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::cell::ClusterType;
use crate::error::{LayoutError, Result};
use crate::mapping::Direction;

/// Smallest room dimension: a border on both sides plus one interior cell
pub const MIN_ROOM_SIZE: i32 = 3;

fn validate_size(what: &str, width: i32, height: i32) -> Result<IVec2> {
    if width < MIN_ROOM_SIZE || height < MIN_ROOM_SIZE {
        return Err(LayoutError::InvalidConfig(format!(
            "{} size must be at least {}x{} (got {}x{})",
            what, MIN_ROOM_SIZE, MIN_ROOM_SIZE, width, height
        )));
    }
    Ok(IVec2::new(width, height))
}

fn validate_point(what: &str, point: Vec2) -> Result<Vec2> {
    if !point.is_finite() {
        return Err(LayoutError::InvalidConfig(format!(
            "{} must be finite (got {})",
            what, point
        )));
    }
    Ok(point)
}

/// Configuration for the rectangular library room
///
/// Spacing and cap tables are only partially populated: an archetype without
/// an entry has no spacing constraint or no cap. Use [`LibraryConfig::min_spacing`]
/// and [`LibraryConfig::cap`], which make the missing case explicit.
///
/// # Example
///
/// ```rust
/// use rust_library_dungeon::*;
///
/// let config = LibraryConfigBuilder::new()
///     .seed(42)
///     .size(30, 24)
///     .unwrap()
///     .boss_direction(Direction::East)
///     .cluster_count(12)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.size, glam::IVec2::new(30, 24));
/// assert_eq!(config.cap(ClusterType::Lectern), Some(1));
/// assert_eq!(config.min_spacing(ClusterType::Bookshelf), None);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct LibraryConfig {
    /// Random seed for cluster placement
    pub seed: u32,

    /// Grid dimensions in cells
    pub size: IVec2,

    /// World-space center of the room
    pub origin: Vec2,

    /// World-space player spawn point
    pub spawn: Vec2,

    /// Side of the room the boss room attaches to
    pub boss_direction: Direction,

    /// Number of clusters to attempt to place
    pub cluster_count: usize,

    /// Run triangulation and path carving after cluster placement
    pub connect_clusters: bool,

    /// Run shelf wall insertion after cluster placement
    pub shelf_walls: bool,

    /// Number of shelf walls to attempt when `shelf_walls` is set
    pub shelf_wall_count: usize,

    /// Minimum distance (in cells) an archetype keeps from other clusters,
    /// grid edges and avoid points
    pub spacing: HashMap<ClusterType, f32>,

    /// Maximum number of placements per archetype
    pub caps: HashMap<ClusterType, u32>,

    /// Relative draw weights for random archetype selection
    pub weights: Vec<(ClusterType, u32)>,
}

impl LibraryConfig {
    /// Required spacing for an archetype, `None` when unconstrained
    #[inline]
    pub fn min_spacing(&self, cluster: ClusterType) -> Option<f32> {
        self.spacing.get(&cluster).copied()
    }

    /// Placement cap for an archetype, `None` when uncapped
    #[inline]
    pub fn cap(&self, cluster: ClusterType) -> Option<u32> {
        self.caps.get(&cluster).copied()
    }

    /// Number of grid cells
    #[inline]
    pub fn area(&self) -> usize {
        self.size.x as usize * self.size.y as usize
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        LibraryConfigBuilder::new().seed(0).build_unchecked()
    }
}

/// Builder for [`LibraryConfig`] with validation
///
/// Defaults:
/// - seed: random (generated with `rand::random`)
/// - size: 40x40, origin and spawn at the world origin
/// - boss direction: North
/// - 30 clusters, optional stages disabled, 12 shelf walls when enabled
#[derive(Debug, Clone)]
pub struct LibraryConfigBuilder {
    seed: Option<u32>,
    size: IVec2,
    origin: Vec2,
    spawn: Vec2,
    boss_direction: Direction,
    cluster_count: usize,
    connect_clusters: bool,
    shelf_walls: bool,
    shelf_wall_count: usize,
    spacing: HashMap<ClusterType, f32>,
    caps: HashMap<ClusterType, u32>,
    weights: Vec<(ClusterType, u32)>,
}

impl LibraryConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        let spacing = HashMap::from([
            (ClusterType::Lectern, 4.0),
            (ClusterType::ShelfRow, 3.0),
            (ClusterType::ReadingTable, 3.0),
            (ClusterType::ShelfCorner, 4.0),
            (ClusterType::StudyCircle, 5.0),
            (ClusterType::ShelfWall, 3.0),
        ]);
        let caps = HashMap::from([
            (ClusterType::Lectern, 1),
            (ClusterType::ShelfCorner, 4),
            (ClusterType::StudyCircle, 3),
        ]);
        let weights = vec![
            (ClusterType::Bookshelf, 5),
            (ClusterType::Candelabra, 2),
            (ClusterType::ShelfRow, 4),
            (ClusterType::ReadingTable, 3),
            (ClusterType::ShelfCorner, 2),
            (ClusterType::StudyCircle, 1),
        ];

        Self {
            seed: None,
            size: IVec2::new(40, 40),
            origin: Vec2::ZERO,
            spawn: Vec2::ZERO,
            boss_direction: Direction::North,
            cluster_count: 30,
            connect_clusters: false,
            shelf_walls: false,
            shelf_wall_count: 12,
            spacing,
            caps,
            weights,
        }
    }

    /// Set the random seed
    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the grid size
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if either dimension is below [`MIN_ROOM_SIZE`]
    pub fn size(mut self, width: i32, height: i32) -> Result<Self> {
        self.size = validate_size("library", width, height)?;
        Ok(self)
    }

    /// Set the world-space room center
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for non-finite coordinates
    pub fn origin(mut self, origin: Vec2) -> Result<Self> {
        self.origin = validate_point("origin", origin)?;
        Ok(self)
    }

    /// Set the world-space spawn point
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for non-finite coordinates
    pub fn spawn(mut self, spawn: Vec2) -> Result<Self> {
        self.spawn = validate_point("spawn", spawn)?;
        Ok(self)
    }

    /// Set the side the boss room attaches to
    pub fn boss_direction(mut self, direction: Direction) -> Self {
        self.boss_direction = direction;
        self
    }

    /// Set the number of clusters to attempt
    pub fn cluster_count(mut self, count: usize) -> Self {
        self.cluster_count = count;
        self
    }

    /// Enable or disable triangulation-driven path carving
    pub fn connect_clusters(mut self, enabled: bool) -> Self {
        self.connect_clusters = enabled;
        self
    }

    /// Enable shelf wall insertion with the given attempt count
    pub fn shelf_walls(mut self, count: usize) -> Self {
        self.shelf_walls = count > 0;
        self.shelf_wall_count = count;
        self
    }

    /// Set the minimum spacing of an archetype
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the spacing is negative or not finite
    pub fn spacing(mut self, cluster: ClusterType, spacing: f32) -> Result<Self> {
        if !spacing.is_finite() || spacing < 0.0 {
            return Err(LayoutError::InvalidConfig(format!(
                "spacing for {:?} must be a finite non-negative number (got {})",
                cluster, spacing
            )));
        }
        self.spacing.insert(cluster, spacing);
        Ok(self)
    }

    /// Remove the spacing constraint of an archetype
    pub fn clear_spacing(mut self, cluster: ClusterType) -> Self {
        self.spacing.remove(&cluster);
        self
    }

    /// Cap the number of placements of an archetype
    pub fn cap(mut self, cluster: ClusterType, cap: u32) -> Self {
        self.caps.insert(cluster, cap);
        self
    }

    /// Remove the cap of an archetype
    pub fn clear_cap(mut self, cluster: ClusterType) -> Self {
        self.caps.remove(&cluster);
        self
    }

    /// Set the draw weight of an archetype (0 removes it from the draw)
    pub fn weight(mut self, cluster: ClusterType, weight: u32) -> Self {
        self.weights.retain(|(ty, _)| *ty != cluster);
        if weight > 0 {
            self.weights.push((cluster, weight));
        }
        self
    }

    /// Build the configuration
    ///
    /// If no seed was provided, generates a random seed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if no archetype has a positive draw weight, or
    /// if the starter archetype is capped at zero.
    pub fn build(self) -> Result<LibraryConfig> {
        if !self.weights.iter().any(|&(_, weight)| weight > 0) {
            return Err(LayoutError::InvalidConfig(
                "at least one archetype needs a positive weight".to_string(),
            ));
        }
        if self.caps.get(&ClusterType::STARTER) == Some(&0) {
            return Err(LayoutError::InvalidConfig(format!(
                "starter archetype {:?} cannot be capped at zero",
                ClusterType::STARTER
            )));
        }
        Ok(self.build_unchecked())
    }

    fn build_unchecked(self) -> LibraryConfig {
        let seed = self.seed.unwrap_or_else(|| rand::random());

        LibraryConfig {
            seed,
            size: self.size,
            origin: self.origin,
            spawn: self.spawn,
            boss_direction: self.boss_direction,
            cluster_count: self.cluster_count,
            connect_clusters: self.connect_clusters,
            shelf_walls: self.shelf_walls,
            shelf_wall_count: self.shelf_wall_count,
            spacing: self.spacing,
            caps: self.caps,
            weights: self.weights,
        }
    }
}

impl Default for LibraryConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for the circular boss room
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BossRoomConfig {
    /// Random seed for decorative choices along the ring
    pub seed: u32,

    /// Grid dimensions in cells
    pub size: IVec2,

    /// World-space center of the room
    pub origin: Vec2,

    /// Direction from the library towards this room
    pub direction: Direction,
}

impl BossRoomConfig {
    /// World origin of a boss room attached to a library room
    ///
    /// The room is pushed out along `direction` so the two world rectangles
    /// touch: the offset is the library's half extent plus the boss room's.
    pub fn adjoining_origin(
        library_origin: Vec2,
        library_size: IVec2,
        boss_size: IVec2,
        direction: Direction,
    ) -> Vec2 {
        let reach = if direction.is_vertical() {
            (library_size.y + boss_size.y) as f32
        } else {
            (library_size.x + boss_size.x) as f32
        };
        library_origin + direction.vector() * reach
    }
}

impl Default for BossRoomConfig {
    fn default() -> Self {
        BossRoomConfigBuilder::new().seed(0).build_unchecked()
    }
}

/// Builder for [`BossRoomConfig`]
///
/// Defaults: random seed, 30x30 cells, centered on the world origin, entered
/// from the south (direction North).
#[derive(Debug, Clone)]
pub struct BossRoomConfigBuilder {
    seed: Option<u32>,
    size: IVec2,
    origin: Vec2,
    direction: Direction,
    library: Option<(Vec2, IVec2)>,
}

impl BossRoomConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            seed: None,
            size: IVec2::new(30, 30),
            origin: Vec2::ZERO,
            direction: Direction::North,
            library: None,
        }
    }

    /// Set the random seed
    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the grid size
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if either dimension is below [`MIN_ROOM_SIZE`]
    pub fn size(mut self, width: i32, height: i32) -> Result<Self> {
        self.size = validate_size("boss room", width, height)?;
        Ok(self)
    }

    /// Set the world-space room center explicitly
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for non-finite coordinates
    pub fn origin(mut self, origin: Vec2) -> Result<Self> {
        self.origin = validate_point("origin", origin)?;
        self.library = None;
        Ok(self)
    }

    /// Set the direction from the library towards this room
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Attach the room to a library room
    ///
    /// The origin is derived at build time from the library's origin and size,
    /// offset along `direction`.
    pub fn adjoining(mut self, library_origin: Vec2, library_size: IVec2, direction: Direction) -> Self {
        self.library = Some((library_origin, library_size));
        self.direction = direction;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Currently infallible; kept fallible for parity with the library builder.
    pub fn build(self) -> Result<BossRoomConfig> {
        Ok(self.build_unchecked())
    }

    fn build_unchecked(self) -> BossRoomConfig {
        let seed = self.seed.unwrap_or_else(|| rand::random());
        let origin = match self.library {
            Some((library_origin, library_size)) => BossRoomConfig::adjoining_origin(
                library_origin,
                library_size,
                self.size,
                self.direction,
            ),
            None => self.origin,
        };

        BossRoomConfig {
            seed,
            size: self.size,
            origin,
            direction: self.direction,
        }
    }
}

impl Default for BossRoomConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_builder_defaults() {
        let config = LibraryConfigBuilder::new().build().unwrap();
        assert_eq!(config.size, IVec2::new(40, 40));
        assert_eq!(config.boss_direction, Direction::North);
        assert_eq!(config.cluster_count, 30);
        assert!(!config.connect_clusters);
        assert!(!config.shelf_walls);
        // seed is random, just verify it exists
        let _seed = config.seed;
    }

    #[test]
    fn test_library_builder_custom() {
        let config = LibraryConfigBuilder::new()
            .seed(7)
            .size(20, 16)
            .unwrap()
            .origin(Vec2::new(5.0, -3.0))
            .unwrap()
            .spawn(Vec2::new(1.0, 1.0))
            .unwrap()
            .boss_direction(Direction::West)
            .cluster_count(8)
            .connect_clusters(true)
            .shelf_walls(4)
            .build()
            .unwrap();

        assert_eq!(config.seed, 7);
        assert_eq!(config.size, IVec2::new(20, 16));
        assert_eq!(config.origin, Vec2::new(5.0, -3.0));
        assert_eq!(config.spawn, Vec2::new(1.0, 1.0));
        assert_eq!(config.boss_direction, Direction::West);
        assert_eq!(config.cluster_count, 8);
        assert!(config.connect_clusters);
        assert!(config.shelf_walls);
        assert_eq!(config.shelf_wall_count, 4);
        assert_eq!(config.area(), 320);
    }

    #[test]
    fn test_library_builder_rejects_small_size() {
        assert!(LibraryConfigBuilder::new().size(2, 10).is_err());
        assert!(LibraryConfigBuilder::new().size(10, 0).is_err());
        assert!(LibraryConfigBuilder::new().size(-4, 10).is_err());
        assert!(LibraryConfigBuilder::new().size(3, 3).is_ok());
    }

    #[test]
    fn test_library_builder_rejects_non_finite_points() {
        assert!(LibraryConfigBuilder::new().origin(Vec2::new(f32::NAN, 0.0)).is_err());
        assert!(LibraryConfigBuilder::new().spawn(Vec2::new(0.0, f32::INFINITY)).is_err());
    }

    #[test]
    fn test_missing_table_entries_mean_unconstrained() {
        let config = LibraryConfigBuilder::new()
            .seed(1)
            .clear_spacing(ClusterType::ShelfRow)
            .clear_cap(ClusterType::StudyCircle)
            .build()
            .unwrap();

        assert_eq!(config.min_spacing(ClusterType::ShelfRow), None);
        assert_eq!(config.min_spacing(ClusterType::Candelabra), None);
        assert_eq!(config.min_spacing(ClusterType::StudyCircle), Some(5.0));
        assert_eq!(config.cap(ClusterType::StudyCircle), None);
        assert_eq!(config.cap(ClusterType::Lectern), Some(1));
    }

    #[test]
    fn test_spacing_validation() {
        assert!(LibraryConfigBuilder::new().spacing(ClusterType::Bookshelf, -1.0).is_err());
        assert!(LibraryConfigBuilder::new().spacing(ClusterType::Bookshelf, f32::NAN).is_err());

        let config = LibraryConfigBuilder::new()
            .spacing(ClusterType::Bookshelf, 2.5)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.min_spacing(ClusterType::Bookshelf), Some(2.5));
    }

    #[test]
    fn test_weights_must_be_positive() {
        let mut builder = LibraryConfigBuilder::new();
        for cluster in ClusterType::PLACEABLE {
            builder = builder.weight(cluster, 0);
        }
        assert!(builder.build().is_err());

        let config = LibraryConfigBuilder::new()
            .weight(ClusterType::Bookshelf, 9)
            .build()
            .unwrap();
        assert!(config.weights.contains(&(ClusterType::Bookshelf, 9)));
        assert_eq!(
            config
                .weights
                .iter()
                .filter(|(ty, _)| *ty == ClusterType::Bookshelf)
                .count(),
            1
        );
    }

    #[test]
    fn test_starter_cannot_be_capped_at_zero() {
        let result = LibraryConfigBuilder::new().cap(ClusterType::Lectern, 0).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_boss_room_adjoining_origin() {
        let origin = BossRoomConfig::adjoining_origin(
            Vec2::new(10.0, 20.0),
            IVec2::new(40, 30),
            IVec2::new(24, 24),
            Direction::North,
        );
        assert_eq!(origin, Vec2::new(10.0, 20.0 + 30.0 + 24.0));

        let origin = BossRoomConfig::adjoining_origin(
            Vec2::ZERO,
            IVec2::new(40, 30),
            IVec2::new(24, 20),
            Direction::West,
        );
        assert_eq!(origin, Vec2::new(-64.0, 0.0));
    }

    #[test]
    fn test_boss_room_builder_adjoining() {
        let config = BossRoomConfigBuilder::new()
            .seed(3)
            .adjoining(Vec2::ZERO, IVec2::new(40, 40), Direction::East)
            .size(20, 20)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.direction, Direction::East);
        assert_eq!(config.origin, Vec2::new(60.0, 0.0));
        assert_eq!(config.seed, 3);
    }

    #[test]
    fn test_boss_room_explicit_origin_overrides_library() {
        let config = BossRoomConfigBuilder::new()
            .adjoining(Vec2::ZERO, IVec2::new(40, 40), Direction::East)
            .origin(Vec2::new(1.0, 2.0))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.origin, Vec2::new(1.0, 2.0));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serialization() {
        let config = LibraryConfigBuilder::new()
            .seed(12345)
            .boss_direction(Direction::South)
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        let restored: LibraryConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);

        let boss = BossRoomConfigBuilder::new().seed(9).build().unwrap();
        let json = serde_json::to_string(&boss).unwrap();
        let restored: BossRoomConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(boss, restored);
    }
}

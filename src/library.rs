//! Rectangular library room generation
//!
//! A generation pass runs these stages in order:
//!
//! 1. [`LibraryGen::place_border`]: outer walls plus a two-cell gap facing the boss room
//! 2. [`LibraryGen::place_spawn`]: reserve the player's spawn cell
//! 3. [`LibraryGen::place_clusters`]: randomized placement under spacing and cap constraints
//! 4. [`LibraryGen::triangulate_clusters`] and [`LibraryGen::generate_paths`]:
//!    carve paths along the Delaunay edges between cluster centers (optional)
//! 5. [`LibraryGen::add_shelf_walls`]: wall shelves along the border (optional)
//!
//! The optional stages run when enabled in [`LibraryConfig`], and every stage
//! can also be called directly on a generator built with [`LibraryGen::new`].

use glam::{DVec2, IVec2, Vec2};
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

use crate::cell::{BorderType, CellTransform, ClusterType, LibraryCell, LibraryCellType};
use crate::config::{BossRoomConfigBuilder, LibraryConfig};
use crate::error::Result;
use crate::generation::{oriented_footprint, triangulate, Pathfinder, Triangulation};
use crate::grid::Grid;
use crate::mapping::{Direction, GridMapping};

#[cfg(feature = "spatial-index")]
use crate::spatial::ClusterIndex;

/// Clusters never have their center closer than this to the spawn cell
pub const SPAWN_CLEARANCE: f32 = 3.0;

/// Step cost over open floor while carving paths
const FLOOR_STEP_COST: f32 = 2.0;

/// Step cost over an existing path, so later paths merge into earlier ones
const PATH_STEP_COST: f32 = 1.0;

/// A cluster committed to the grid
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedCluster {
    /// Footprint center
    pub center: IVec2,
    /// Archetype
    pub cluster_type: ClusterType,
    /// Quarter turns applied to the footprint
    pub orientation: u8,
    /// Cells written for this cluster (footprint clipped to the grid)
    pub cells: Vec<IVec2>,
}

/// Rotation of a straight border piece, so it faces the room interior
fn border_rotation(border: BorderType) -> f32 {
    match border {
        BorderType::Right => 90.0,
        BorderType::Top => 180.0,
        BorderType::Left => 270.0,
        _ => 0.0,
    }
}

/// Edge classification of a border coordinate; columns take the corners
fn border_type_at(pos: IVec2, size: IVec2) -> Option<BorderType> {
    if pos.x == 0 {
        Some(BorderType::Left)
    } else if pos.x == size.x - 1 {
        Some(BorderType::Right)
    } else if pos.y == 0 {
        Some(BorderType::Bottom)
    } else if pos.y == size.y - 1 {
        Some(BorderType::Top)
    } else {
        None
    }
}

/// The two gap cells centered on the edge facing `direction`
pub fn boss_entrance_cells(size: IVec2, direction: Direction) -> [IVec2; 2] {
    let mid = size / 2;
    match direction {
        Direction::North => [
            IVec2::new(mid.x - 1, size.y - 1),
            IVec2::new(mid.x, size.y - 1),
        ],
        Direction::South => [IVec2::new(mid.x - 1, 0), IVec2::new(mid.x, 0)],
        Direction::East => [
            IVec2::new(size.x - 1, mid.y - 1),
            IVec2::new(size.x - 1, mid.y),
        ],
        Direction::West => [IVec2::new(0, mid.y - 1), IVec2::new(0, mid.y)],
    }
}

#[inline]
fn distance(a: IVec2, b: IVec2) -> f32 {
    a.as_vec2().distance(b.as_vec2())
}

/// Generator and owner of a library room layout
///
/// # Example
///
/// ```
/// use rust_library_dungeon::*;
///
/// let config = LibraryConfigBuilder::new()
///     .seed(42)
///     .size(32, 32)
///     .unwrap()
///     .cluster_count(10)
///     .build()
///     .unwrap();
///
/// let library = LibraryGen::generate(config).unwrap();
/// assert!(!library.clusters().is_empty());
/// assert_eq!(library.clusters()[0].cluster_type, ClusterType::Lectern);
/// ```
#[derive(Debug, Clone)]
pub struct LibraryGen {
    config: LibraryConfig,
    grid: Grid<LibraryCell>,
    mapping: GridMapping,
    rng: ChaCha8Rng,
    clusters: Vec<PlacedCluster>,
    avoid_points: Vec<IVec2>,
    reserved: HashSet<IVec2>,
    spawn_cell: Option<IVec2>,
    placement_counts: HashMap<ClusterType, u32>,
    starter_pending: bool,
}

impl LibraryGen {
    /// Create a generator with an empty grid
    ///
    /// No stage has run yet; call the stages individually or use
    /// [`LibraryGen::generate`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidGridSize` if the configured size is not positive
    pub fn new(config: LibraryConfig) -> Result<Self> {
        let grid = Grid::new(config.size, IVec2::ZERO, LibraryCell::default())?;
        let mapping = GridMapping::new(config.origin, config.size);
        let rng = ChaCha8Rng::seed_from_u64(config.seed as u64);

        Ok(Self {
            config,
            grid,
            mapping,
            rng,
            clusters: Vec::new(),
            avoid_points: Vec::new(),
            reserved: HashSet::new(),
            spawn_cell: None,
            placement_counts: HashMap::new(),
            starter_pending: true,
        })
    }

    /// Generate a complete library room
    ///
    /// # Errors
    ///
    /// Returns `InvalidGridSize` if the configured size is not positive
    pub fn generate(config: LibraryConfig) -> Result<Self> {
        let mut library = Self::new(config)?;

        info!(
            seed = library.config.seed,
            width = library.config.size.x,
            height = library.config.size.y,
            "generating library"
        );

        library.place_border();
        library.place_spawn();
        let placed = library.place_clusters(library.config.cluster_count);

        if library.config.connect_clusters {
            let triangulation = library.triangulate_clusters();
            library.generate_paths(&triangulation);
        }
        if library.config.shelf_walls {
            library.add_shelf_walls(library.config.shelf_wall_count);
        }

        info!(
            clusters = placed,
            requested = library.config.cluster_count,
            spawn = ?library.spawn_cell,
            "library generated"
        );
        Ok(library)
    }

    /// Configuration the generator was created with
    #[inline]
    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    /// Seed of the generator's random stream
    #[inline]
    pub fn seed(&self) -> u32 {
        self.config.seed
    }

    /// The generated cells
    #[inline]
    pub fn grid(&self) -> &Grid<LibraryCell> {
        &self.grid
    }

    /// World ↔ grid mapping of this room
    #[inline]
    pub fn mapping(&self) -> &GridMapping {
        &self.mapping
    }

    /// Clusters in placement order
    #[inline]
    pub fn clusters(&self) -> &[PlacedCluster] {
        &self.clusters
    }

    /// Grid coordinates randomized placement keeps its distance from
    #[inline]
    pub fn avoid_points(&self) -> &[IVec2] {
        &self.avoid_points
    }

    /// The reserved spawn cell, if the spawn point mapped inside the grid
    #[inline]
    pub fn spawn_cell(&self) -> Option<IVec2> {
        self.spawn_cell
    }

    /// Number of placements per archetype
    #[inline]
    pub fn placement_counts(&self) -> &HashMap<ClusterType, u32> {
        &self.placement_counts
    }

    /// Nearest grid cell to a world position
    #[inline]
    pub fn world_to_grid(&self, world: Vec2) -> IVec2 {
        self.mapping.world_to_grid(world)
    }

    /// World position of a grid cell
    #[inline]
    pub fn grid_to_world(&self, cell: IVec2) -> Vec2 {
        self.mapping.grid_to_world(cell)
    }

    /// Builder for a boss room attached on this room's boss side
    ///
    /// The boss room's seed is derived from this room's seed.
    pub fn boss_room_config_builder(&self) -> BossRoomConfigBuilder {
        BossRoomConfigBuilder::new()
            .seed(self.config.seed.wrapping_add(1))
            .adjoining(
                self.mapping.origin(),
                self.grid.size(),
                self.config.boss_direction,
            )
    }

    /// Mark the outer rows and columns as border and carve the boss entrance
    pub fn place_border(&mut self) {
        let size = self.grid.size();

        for y in 0..size.y {
            for x in 0..size.x {
                let pos = IVec2::new(x, y);
                let Some(border) = border_type_at(pos, size) else {
                    continue;
                };
                self.grid.set(
                    pos,
                    LibraryCell {
                        kind: LibraryCellType::Border,
                        border,
                        transform: CellTransform::rotated(border_rotation(border)),
                        ..Default::default()
                    },
                );
            }
        }

        for pos in boss_entrance_cells(size, self.config.boss_direction) {
            let cell = self.grid.get_mut(pos);
            cell.kind = LibraryCellType::BossEntrance;
            self.avoid_points.push(pos);
            self.reserved.insert(pos);
        }

        debug!(
            direction = ?self.config.boss_direction,
            avoid_points = self.avoid_points.len(),
            "border placed"
        );
    }

    /// Reserve the spawn cell
    ///
    /// A spawn point outside the grid, or on an occupied cell, is logged and
    /// generation continues without a spawn cell.
    pub fn place_spawn(&mut self) -> Option<IVec2> {
        let cell = self.mapping.world_to_grid(self.config.spawn);

        if !self.grid.in_bounds(cell) {
            warn!(
                spawn = %self.config.spawn,
                cell = %cell,
                "spawn point maps outside the grid, no spawn cell placed"
            );
            return None;
        }
        if !self.grid.get(cell).is_empty() {
            warn!(
                cell = %cell,
                kind = ?self.grid.get(cell).kind,
                "spawn cell is occupied, no spawn cell placed"
            );
            return None;
        }

        self.grid
            .set(cell, LibraryCell::with_kind(LibraryCellType::Spawn));
        self.reserved.insert(cell);
        self.spawn_cell = Some(cell);
        Some(cell)
    }

    /// Draw an archetype: the starter while it is pending, then weighted among
    /// those under cap
    fn draw_archetype(&mut self) -> Option<ClusterType> {
        if self.starter_pending && !self.at_cap(ClusterType::STARTER) {
            return Some(ClusterType::STARTER);
        }

        let candidates: Vec<(ClusterType, u32)> = self
            .config
            .weights
            .iter()
            .copied()
            .filter(|&(ty, weight)| weight > 0 && !self.at_cap(ty))
            .collect();

        let dist = WeightedIndex::new(candidates.iter().map(|&(_, weight)| weight)).ok()?;
        Some(candidates[dist.sample(&mut self.rng)].0)
    }

    fn at_cap(&self, cluster: ClusterType) -> bool {
        match self.config.cap(cluster) {
            Some(cap) => self.placement_counts.get(&cluster).copied().unwrap_or(0) >= cap,
            None => false,
        }
    }

    /// Spacing and reservation checks for a candidate cluster center
    fn position_allowed(&self, pos: IVec2, cluster: ClusterType) -> bool {
        if self.reserved.contains(&pos) {
            return false;
        }
        if let Some(spawn) = self.spawn_cell {
            if distance(pos, spawn) < SPAWN_CLEARANCE {
                return false;
            }
        }

        let Some(spacing) = self.config.min_spacing(cluster) else {
            return true;
        };

        let size = self.grid.size();
        let edge_distance = pos
            .x
            .min(pos.y)
            .min(size.x - 1 - pos.x)
            .min(size.y - 1 - pos.y) as f32;
        if edge_distance < spacing {
            return false;
        }

        let near_cluster = self
            .clusters
            .iter()
            .any(|placed| distance(placed.center, pos) < spacing);
        let near_avoid = self
            .avoid_points
            .iter()
            .any(|&avoid| distance(avoid, pos) < spacing);

        !near_cluster && !near_avoid
    }

    /// Reserve-then-commit a footprint
    ///
    /// Every in-bounds footprint cell must be empty; otherwise nothing is
    /// written and the placement fails. Out-of-bounds cells are dropped.
    fn try_stamp(&mut self, center: IVec2, cluster: ClusterType, orientation: u8) -> bool {
        let footprint: Vec<_> = oriented_footprint(cluster, orientation)
            .filter(|cell| self.grid.in_bounds(center + cell.offset))
            .collect();

        if footprint.is_empty()
            || footprint
                .iter()
                .any(|cell| !self.grid.get(center + cell.offset).is_empty())
        {
            return false;
        }

        let mut cells = Vec::with_capacity(footprint.len());
        for cell in &footprint {
            let pos = center + cell.offset;
            self.grid.set(
                pos,
                LibraryCell {
                    kind: LibraryCellType::Cluster,
                    cluster,
                    object: cell.object,
                    transform: CellTransform::rotated(cell.rotation),
                    ..Default::default()
                },
            );
            cells.push(pos);
        }

        self.clusters.push(PlacedCluster {
            center,
            cluster_type: cluster,
            orientation,
            cells,
        });
        *self.placement_counts.entry(cluster).or_insert(0) += 1;
        true
    }

    /// Attempt budget between two successful placements
    fn attempt_budget(&self) -> usize {
        self.grid.area() / 5
    }

    /// Randomly place up to `count` clusters
    ///
    /// The first placement is the starter archetype. If the starter finds no
    /// room within a full attempt budget it is skipped and the weighted draw
    /// takes over with a fresh budget, so a cramped room still gets furnished.
    ///
    /// Returns the number placed. Running out of attempts before reaching
    /// `count` is not an error.
    pub fn place_clusters(&mut self, count: usize) -> usize {
        let size = self.grid.size();
        let max_attempts = self.attempt_budget();
        let mut attempts = 0usize;
        let mut placed = 0usize;

        while placed < count {
            if attempts >= max_attempts {
                if !self.starter_pending {
                    break;
                }
                debug!(
                    starter = ?ClusterType::STARTER,
                    attempts,
                    "starter archetype does not fit, falling back to the weighted draw"
                );
                self.starter_pending = false;
                attempts = 0;
            }
            attempts += 1;

            let pos = IVec2::new(self.rng.gen_range(0..size.x), self.rng.gen_range(0..size.y));
            let orientation = self.rng.gen_range(0..4u8);
            let Some(cluster) = self.draw_archetype() else {
                debug!(placed, "every archetype reached its cap");
                break;
            };

            if !self.position_allowed(pos, cluster) || !self.try_stamp(pos, cluster, orientation) {
                continue;
            }

            if cluster == ClusterType::STARTER {
                self.starter_pending = false;
            }
            placed += 1;
            attempts = 0;
        }

        if placed < count {
            debug!(placed, requested = count, "cluster placement ran out of attempts");
        } else {
            debug!(placed, "clusters placed");
        }
        placed
    }

    /// Delaunay triangulation of the placed cluster centers
    ///
    /// Vertex indices match [`LibraryGen::clusters`].
    pub fn triangulate_clusters(&self) -> Triangulation {
        let points: Vec<DVec2> = self
            .clusters
            .iter()
            .map(|cluster| cluster.center.as_dvec2())
            .collect();
        triangulate(&points)
    }

    /// Carve paths along triangulation edges between cluster centers
    ///
    /// Paths avoid the border and foreign clusters, may cross the two
    /// endpoint clusters, and prefer reusing existing path cells. Returns
    /// the number of edges that were connected.
    pub fn generate_paths(&mut self, triangulation: &Triangulation) -> usize {
        let mut pathfinder = Pathfinder::new();
        let mut connected = 0usize;

        for edge in &triangulation.edges {
            let (Some(a), Some(b)) = (self.clusters.get(edge.a()), self.clusters.get(edge.b()))
            else {
                continue;
            };

            let start = a.center;
            let end = b.center;
            let endpoints: HashSet<IVec2> = a.cells.iter().chain(&b.cells).copied().collect();
            let grid = &self.grid;

            let result = pathfinder.find_path(start, end, |_, to| {
                if !grid.in_bounds(to) {
                    return None;
                }
                match grid.get(to).kind {
                    LibraryCellType::None | LibraryCellType::Spawn => Some(FLOOR_STEP_COST),
                    LibraryCellType::Path => Some(PATH_STEP_COST),
                    LibraryCellType::Cluster if endpoints.contains(&to) => Some(FLOOR_STEP_COST),
                    _ => None,
                }
            });

            if result.is_empty() {
                debug!(from = %start, to = %end, "no path between clusters");
                continue;
            }

            for &pos in &result.path {
                if self.grid.get(pos).is_empty() {
                    self.grid
                        .set(pos, LibraryCell::with_kind(LibraryCellType::Path));
                }
            }
            connected += 1;
        }

        debug!(
            connected,
            edges = triangulation.edge_count(),
            "paths generated"
        );
        connected
    }

    /// Empty interior cells next to a straight border cell, with that border
    fn shelf_wall_candidates(&self) -> Vec<(IVec2, BorderType)> {
        const NEIGHBORS: [IVec2; 4] = [IVec2::X, IVec2::NEG_X, IVec2::Y, IVec2::NEG_Y];

        self.grid
            .iter()
            .filter(|(_, cell)| cell.is_empty())
            .filter_map(|(pos, _)| {
                NEIGHBORS.iter().find_map(|&step| {
                    let next = pos + step;
                    let cell = self.grid.try_get(next)?;
                    (cell.kind == LibraryCellType::Border).then_some((pos, cell.border))
                })
            })
            .collect()
    }

    /// Place up to `count` wall shelves along the border
    ///
    /// Each shelf turns to face the room interior and keeps the `ShelfWall`
    /// spacing from other wall shelves and from avoid points. Uses the same
    /// attempt budget as [`LibraryGen::place_clusters`]. Returns the number
    /// placed.
    pub fn add_shelf_walls(&mut self, count: usize) -> usize {
        let candidates = self.shelf_wall_candidates();
        if candidates.is_empty() {
            debug!("no free cells along the border for shelf walls");
            return 0;
        }

        let spacing = self.config.min_spacing(ClusterType::ShelfWall);
        let max_attempts = self.attempt_budget();
        let mut attempts = 0usize;
        let mut placed = 0usize;

        while placed < count && attempts < max_attempts {
            attempts += 1;

            let Some(&(pos, border)) = candidates.choose(&mut self.rng) else {
                break;
            };
            if self.reserved.contains(&pos) {
                continue;
            }
            if let Some(spawn) = self.spawn_cell {
                if distance(pos, spawn) < SPAWN_CLEARANCE {
                    continue;
                }
            }
            if let Some(spacing) = spacing {
                let crowded = self
                    .clusters
                    .iter()
                    .filter(|c| c.cluster_type == ClusterType::ShelfWall)
                    .map(|c| c.center)
                    .chain(self.avoid_points.iter().copied())
                    .any(|other| distance(other, pos) < spacing);
                if crowded {
                    continue;
                }
            }

            let orientation = (border_rotation(border) / 90.0) as u8;
            if !self.try_stamp(pos, ClusterType::ShelfWall, orientation) {
                continue;
            }
            placed += 1;
            attempts = 0;
        }

        debug!(placed, requested = count, "shelf walls placed");
        placed
    }

    /// KD-tree over the placed cluster centers in world space
    #[cfg(feature = "spatial-index")]
    pub fn cluster_index(&self) -> ClusterIndex {
        let centers: Vec<Vec2> = self
            .clusters
            .iter()
            .map(|cluster| self.mapping.grid_to_world(cluster.center))
            .collect();
        ClusterIndex::new(&centers)
    }

    /// Cluster whose center is nearest to a world position
    #[cfg(feature = "spatial-index")]
    pub fn find_nearest_cluster(&self, world: Vec2) -> Option<&PlacedCluster> {
        self.cluster_index()
            .find_nearest(world)
            .and_then(|index| self.clusters.get(index))
    }
}

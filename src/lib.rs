//! Procedural library dungeon layout generation
//!
//! A standalone library for laying out a rectangular library room full of
//! furniture clusters and the circular boss room attached to it. Layouts are
//! plain grids of typed cells, suitable for any game engine to instantiate.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use rust_library_dungeon::*;
//!
//! // Generate the library room
//! let config = LibraryConfigBuilder::new()
//!     .seed(42)
//!     .size(40, 40).unwrap()
//!     .boss_direction(Direction::North)
//!     .connect_clusters(true)
//!     .build().unwrap();
//!
//! let library = LibraryGen::generate(config).unwrap();
//!
//! // Attach the boss room on the boss side
//! let boss_config = library.boss_room_config_builder().build().unwrap();
//! let boss_room = BossRoomGen::generate(boss_config).unwrap();
//!
//! println!(
//!     "Placed {} clusters, boss entrance at {:?}",
//!     library.clusters().len(),
//!     boss_room.entrance_world_position()
//! );
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): Enables O(log n) nearest-cluster lookups using KD-tree
//! - `serde`: Enables serialization support for configuration types

// Modules
pub mod error;
pub mod config;
pub mod cell;
pub mod grid;
pub mod mapping;
pub mod generation;
pub mod library;
pub mod boss_room;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{LayoutError, Result};
pub use config::{BossRoomConfig, BossRoomConfigBuilder, LibraryConfig, LibraryConfigBuilder};
pub use cell::{
    BorderType, BossRoomCell, BossRoomCellType, Cell, CellKind, CellTransform, ClusterType,
    LibraryCell, LibraryCellType, ObjectType,
};
pub use grid::Grid;
pub use mapping::{Direction, GridMapping};
pub use generation::{find_path, triangulate, PathResult, Pathfinder, Triangulation};
pub use library::{LibraryGen, PlacedCluster};
pub use boss_room::{BossRoomGen, RingBand};

#[cfg(feature = "spatial-index")]
pub use spatial::ClusterIndex;

// Re-export glam vector types for convenience
pub use glam::{IVec2, Vec2};

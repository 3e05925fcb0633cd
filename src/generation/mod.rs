//! Layout algorithms shared by the room generators
//!
//! Bowyer–Watson Delaunay triangulation over cluster centers, grid A* with a
//! pluggable step cost, and the cluster archetype footprints.

pub mod clusters;
mod delaunay;
mod pathfind;

pub use clusters::{footprint, oriented_footprint, rotate_offset, FootprintCell};
pub use delaunay::{triangulate, DelaunayEdge, DelaunayTriangle, DelaunayVertex, Triangulation};
pub use pathfind::{find_path, PathResult, Pathfinder};

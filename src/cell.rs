//! Grid cell record
//!
//! Each grid location stores one [`Cell`]. The generators write cells once
//! during generation; rendering and gameplay code read them afterwards to decide
//! which prop, collider or navigation anchor to spawn at each location.

use glam::Vec2;

/// Cell classification used by the rectangular library room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LibraryCellType {
    /// Open floor, nothing placed
    #[default]
    None,
    /// Part of a cluster footprint
    Cluster,
    /// Carved traversal path between clusters
    Path,
    /// Player spawn cell
    Spawn,
    /// Outer wall
    Border,
    /// Gap in the outer wall leading to the boss room
    BossEntrance,
}

/// Cell classification used by the circular boss room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BossRoomCellType {
    /// Outside the arena
    #[default]
    None,
    /// Open arena floor
    Floor,
    /// Arena wall (ring or approach corridor)
    Border,
    /// Gap the player enters through
    Entrance,
    /// Gap leading onwards after the fight
    Exit,
}

/// Trait implemented by the per-room cell enumerations
pub trait CellKind: Copy + PartialEq + Default {
    /// Whether this kind marks an unoccupied cell
    fn is_none(self) -> bool {
        self == Self::default()
    }
}

impl CellKind for LibraryCellType {}
impl CellKind for BossRoomCellType {}

/// Cluster archetypes
///
/// Each archetype has a fixed relative footprint, see
/// [`crate::generation::clusters::footprint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClusterType {
    /// Not part of a cluster
    #[default]
    None,
    /// Lectern with a candelabra, always the first cluster placed
    Lectern,
    /// A single freestanding bookshelf
    Bookshelf,
    /// A single candelabra
    Candelabra,
    /// Three bookshelves in a row
    ShelfRow,
    /// Table flanked by two chairs
    ReadingTable,
    /// L-shaped run of bookshelves around a book pile
    ShelfCorner,
    /// Table surrounded by chairs with candelabras and a globe
    StudyCircle,
    /// Wall-mounted shelf placed along the border
    ShelfWall,
}

impl ClusterType {
    /// Archetypes eligible for random placement
    pub const PLACEABLE: [ClusterType; 7] = [
        ClusterType::Lectern,
        ClusterType::Bookshelf,
        ClusterType::Candelabra,
        ClusterType::ShelfRow,
        ClusterType::ReadingTable,
        ClusterType::ShelfCorner,
        ClusterType::StudyCircle,
    ];

    /// Archetype forced for the first successful placement
    pub const STARTER: ClusterType = ClusterType::Lectern;
}

/// Sub-classification of border cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BorderType {
    /// Not a border cell
    #[default]
    None,
    /// Straight wall along the top edge
    Top,
    /// Straight wall along the bottom edge
    Bottom,
    /// Straight wall along the left edge
    Left,
    /// Straight wall along the right edge
    Right,
    /// Curved ring wall of the circular room
    Circle,
    /// Entrance gap cell on the room's center line
    EntranceMiddle,
    /// Entrance gap cell beside the center line
    EntranceSide,
    /// Exit gap cell on the room's center line
    ExitMiddle,
    /// Exit gap cell beside the center line
    ExitSide,
}

/// Concrete decorative object at a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ObjectType {
    /// No object
    #[default]
    None,
    /// Free-standing bookshelf
    Bookshelf,
    /// Reading table
    Table,
    /// Chair, usually facing a table
    Chair,
    /// Standing candelabra
    Candelabra,
    /// Lectern
    Lectern,
    /// Pile of books on the floor
    BookPile,
    /// Globe on a stand
    Globe,
    /// Shelf set against a wall
    WallShelf,
    /// Pillar on the boss room ring
    Pillar,
}

/// Local transform applied to the object placed at a cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellTransform {
    /// Rotation around the vertical axis, in degrees
    pub rotation: f32,
    /// Position offset inside the cell, in world units
    pub offset: Vec2,
    /// Scale applied to the object
    pub scale: Vec2,
}

impl CellTransform {
    /// No rotation, no offset, unit scale
    pub const IDENTITY: CellTransform = CellTransform {
        rotation: 0.0,
        offset: Vec2::ZERO,
        scale: Vec2::ONE,
    };

    /// Identity transform rotated by `degrees`
    pub fn rotated(degrees: f32) -> Self {
        Self {
            rotation: degrees,
            ..Self::IDENTITY
        }
    }
}

impl Default for CellTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A single grid cell
///
/// Generic over the room's cell-type enumeration so the library and the boss
/// room share one record layout.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cell<K> {
    /// Primary classification
    pub kind: K,
    /// Archetype occupying this cell when `kind` is a cluster
    pub cluster: ClusterType,
    /// Border sub-classification
    pub border: BorderType,
    /// Object to render here
    pub object: ObjectType,
    /// Local transform of the object
    pub transform: CellTransform,
}

/// Cell of the rectangular library room
pub type LibraryCell = Cell<LibraryCellType>;

/// Cell of the circular boss room
pub type BossRoomCell = Cell<BossRoomCellType>;

impl<K: CellKind> Cell<K> {
    /// Cell with the given kind and everything else default
    pub fn with_kind(kind: K) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Whether nothing has been placed on this cell
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cell_is_empty() {
        let cell = LibraryCell::default();
        assert!(cell.is_empty());
        assert_eq!(cell.cluster, ClusterType::None);
        assert_eq!(cell.border, BorderType::None);
        assert_eq!(cell.object, ObjectType::None);
        assert_eq!(cell.transform, CellTransform::IDENTITY);
    }

    #[test]
    fn test_with_kind() {
        let cell = BossRoomCell::with_kind(BossRoomCellType::Floor);
        assert!(!cell.is_empty());
        assert_eq!(cell.kind, BossRoomCellType::Floor);
    }

    #[test]
    fn test_rotated_transform() {
        let t = CellTransform::rotated(90.0);
        assert_eq!(t.rotation, 90.0);
        assert_eq!(t.scale, Vec2::ONE);
        assert_eq!(t.offset, Vec2::ZERO);
    }

    #[test]
    fn test_starter_is_placeable() {
        assert!(ClusterType::PLACEABLE.contains(&ClusterType::STARTER));
        assert!(!ClusterType::PLACEABLE.contains(&ClusterType::ShelfWall));
    }
}

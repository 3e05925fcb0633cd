//! Cluster archetype footprints
//!
//! Every archetype stamps a fixed pattern of 1 to 7 cells relative to its
//! center. Each footprint cell carries the object to render and its local
//! rotation; a placement can turn the whole footprint by quarter turns.

use glam::IVec2;

use crate::cell::{ClusterType, ObjectType};

/// One cell of an archetype footprint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FootprintCell {
    /// Offset from the cluster center
    pub offset: IVec2,
    /// Object placed at this cell
    pub object: ObjectType,
    /// Local rotation in degrees, before the placement orientation is applied
    pub rotation: f32,
}

const fn cell(x: i32, y: i32, object: ObjectType, rotation: f32) -> FootprintCell {
    FootprintCell {
        offset: IVec2::new(x, y),
        object,
        rotation,
    }
}

const LECTERN: &[FootprintCell] = &[
    cell(0, 0, ObjectType::Lectern, 0.0),
    cell(1, 0, ObjectType::Candelabra, 0.0),
];

const BOOKSHELF: &[FootprintCell] = &[cell(0, 0, ObjectType::Bookshelf, 0.0)];

const CANDELABRA: &[FootprintCell] = &[cell(0, 0, ObjectType::Candelabra, 0.0)];

const SHELF_ROW: &[FootprintCell] = &[
    cell(-1, 0, ObjectType::Bookshelf, 0.0),
    cell(0, 0, ObjectType::Bookshelf, 0.0),
    cell(1, 0, ObjectType::Bookshelf, 0.0),
];

const READING_TABLE: &[FootprintCell] = &[
    cell(0, 0, ObjectType::Table, 0.0),
    cell(-1, 0, ObjectType::Chair, 90.0),
    cell(1, 0, ObjectType::Chair, 270.0),
];

const SHELF_CORNER: &[FootprintCell] = &[
    cell(0, 0, ObjectType::BookPile, 0.0),
    cell(-1, 1, ObjectType::Bookshelf, 180.0),
    cell(0, 1, ObjectType::Bookshelf, 180.0),
    cell(1, 1, ObjectType::Bookshelf, 180.0),
    cell(-1, 0, ObjectType::Bookshelf, 90.0),
];

const STUDY_CIRCLE: &[FootprintCell] = &[
    cell(0, 0, ObjectType::Table, 0.0),
    cell(0, 1, ObjectType::Chair, 180.0),
    cell(0, -1, ObjectType::Chair, 0.0),
    cell(-1, 0, ObjectType::Chair, 90.0),
    cell(1, 0, ObjectType::Chair, 270.0),
    cell(-1, -1, ObjectType::Candelabra, 0.0),
    cell(1, 1, ObjectType::Globe, 0.0),
];

const SHELF_WALL: &[FootprintCell] = &[cell(0, 0, ObjectType::WallShelf, 0.0)];

/// Footprint of an archetype, unrotated
///
/// `ClusterType::None` has an empty footprint.
pub fn footprint(cluster: ClusterType) -> &'static [FootprintCell] {
    match cluster {
        ClusterType::None => &[],
        ClusterType::Lectern => LECTERN,
        ClusterType::Bookshelf => BOOKSHELF,
        ClusterType::Candelabra => CANDELABRA,
        ClusterType::ShelfRow => SHELF_ROW,
        ClusterType::ReadingTable => READING_TABLE,
        ClusterType::ShelfCorner => SHELF_CORNER,
        ClusterType::StudyCircle => STUDY_CIRCLE,
        ClusterType::ShelfWall => SHELF_WALL,
    }
}

/// Rotate an offset counter-clockwise by `quarter_turns * 90` degrees
pub fn rotate_offset(offset: IVec2, quarter_turns: u8) -> IVec2 {
    match quarter_turns % 4 {
        0 => offset,
        1 => IVec2::new(-offset.y, offset.x),
        2 => -offset,
        _ => IVec2::new(offset.y, -offset.x),
    }
}

/// Footprint cells turned by a placement orientation
///
/// Offsets are rotated about the center and `rotation` is advanced by the same
/// angle, normalized to `[0, 360)`.
pub fn oriented_footprint(
    cluster: ClusterType,
    quarter_turns: u8,
) -> impl Iterator<Item = FootprintCell> {
    let turn_degrees = 90.0 * (quarter_turns % 4) as f32;
    footprint(cluster).iter().map(move |cell| FootprintCell {
        offset: rotate_offset(cell.offset, quarter_turns),
        object: cell.object,
        rotation: (cell.rotation + turn_degrees).rem_euclid(360.0),
    })
}

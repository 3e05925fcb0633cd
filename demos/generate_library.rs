//! Complete workflow demonstration for rust_library_dungeon
//!
//! Generates a library room and its boss room, then prints both as ASCII.

use rust_library_dungeon::*;

fn library_glyph(cell: &LibraryCell) -> char {
    match cell.kind {
        LibraryCellType::None => '.',
        LibraryCellType::Path => ':',
        LibraryCellType::Spawn => '@',
        LibraryCellType::Border => '#',
        LibraryCellType::BossEntrance => 'B',
        LibraryCellType::Cluster => match cell.cluster {
            ClusterType::Lectern => 'L',
            ClusterType::Bookshelf => 'b',
            ClusterType::Candelabra => 'c',
            ClusterType::ShelfRow => 'r',
            ClusterType::ReadingTable => 't',
            ClusterType::ShelfCorner => 'k',
            ClusterType::StudyCircle => 'o',
            ClusterType::ShelfWall => 'w',
            ClusterType::None => '?',
        },
    }
}

fn boss_glyph(cell: &BossRoomCell) -> char {
    match cell.kind {
        BossRoomCellType::None => ' ',
        BossRoomCellType::Floor => '.',
        BossRoomCellType::Border if cell.object == ObjectType::Pillar => 'O',
        BossRoomCellType::Border => '#',
        BossRoomCellType::Entrance => 'E',
        BossRoomCellType::Exit => 'X',
    }
}

/// Print a grid with +y pointing up
fn print_grid<T>(grid: &Grid<T>, glyph: impl Fn(&T) -> char) {
    let size = grid.size();
    for y in (0..size.y).rev() {
        let row: String = (0..size.x).map(|x| glyph(grid.get(IVec2::new(x, y)))).collect();
        println!("  {}", row);
    }
}

fn main() -> Result<()> {
    println!("=== rust_library_dungeon Demo ===\n");

    // Step 1: Configure the library
    println!("Step 1: Configuring library...");
    let config = LibraryConfigBuilder::new()
        .seed(12345)
        .size(40, 32)?
        .boss_direction(Direction::North)
        .cluster_count(30)
        .connect_clusters(true)
        .shelf_walls(12)
        .build()?;

    println!("  Seed: {}", config.seed);
    println!("  Size: {}x{}", config.size.x, config.size.y);
    println!("  Boss direction: {:?}", config.boss_direction);

    // Step 2: Generate the library
    println!("\nStep 2: Generating library...");
    let library = LibraryGen::generate(config)?;
    println!("  Placed {} clusters", library.clusters().len());
    println!("  Spawn cell: {:?}", library.spawn_cell());

    let mut counts: Vec<_> = library.placement_counts().iter().collect();
    counts.sort_by_key(|(cluster, _)| format!("{:?}", cluster));
    for (cluster, count) in counts {
        println!("  {:?}: {}", cluster, count);
    }
    let paths = library.grid().count(|cell| cell.kind == LibraryCellType::Path);
    println!("  Path cells: {}", paths);

    println!();
    print_grid(library.grid(), library_glyph);

    // Step 3: Nearest cluster query
    #[cfg(feature = "spatial-index")]
    {
        println!("\nStep 3: Spatial queries:");
        let query = Vec2::new(10.0, 10.0);
        if let Some(cluster) = library.find_nearest_cluster(query) {
            println!(
                "  Nearest cluster to {:?}: {:?} at {:?}",
                query, cluster.cluster_type, cluster.center
            );
        }
    }

    // Step 4: Boss room
    println!("\nStep 4: Generating boss room...");
    let boss_config = library.boss_room_config_builder().build()?;
    let boss_room = BossRoomGen::generate(boss_config)?;
    println!("  Origin: {:?}", boss_room.mapping().origin());
    println!("  Entrance: {:?}", boss_room.entrance_world_position());
    println!("  Exit: {:?}", boss_room.exit_world_position());

    println!();
    print_grid(boss_room.grid(), boss_glyph);

    println!("\n=== Demo Complete ===");
    Ok(())
}

//! # Streaming Scenario Tests
//!
//! End-to-end behaviour of `WorldScheduler`: queue ordering, neighbour
//! gating, edits, eviction and bounded progress across ticks.

use std::sync::Arc;

use strata::rendering::{ChunkMesh, LightingSolver, MeshBuilder, NeighborGrid};
use strata::shared::{Block, BlockShape, BlockType, ChunkCoord, ChunkSize, IVec3, Vec3, VoxelTable};
use strata::{ChunkState, WorldConfig, WorldEvent, WorldScheduler};

const CENTER: ChunkCoord = ChunkCoord::new(0, 0, 0);

fn small_config() -> WorldConfig {
    WorldConfig {
        chunk_size: ChunkSize::new(8, 64, 8),
        spawn_radius: 2,
        max_generate_per_tick: 5,
        max_concurrent: 2,
        workers: 2,
        event_capacity: 4096,
        ..WorldConfig::default()
    }
}

fn inner_ring() -> Vec<ChunkCoord> {
    let mut coords = Vec::new();
    for dx in -1..=1 {
        for dz in -1..=1 {
            coords.push(ChunkCoord::new(dx, 0, dz));
        }
    }
    coords
}

/// A world streamed around the origin until the inner 3×3 chunks are meshed
/// and the centre has a collider.
fn streamed_world() -> WorldScheduler {
    let config = small_config();
    let max_in_flight = config.max_concurrent + 1;
    let mut world = WorldScheduler::new(config, VoxelTable::standard()).unwrap();
    world.on_observer_moved(Vec3::new(4.5, 63.2, 4.5));

    for _ in 0..400 {
        let stats = world.tick();
        assert!(stats.in_flight <= max_in_flight, "throttle exceeded: {stats:?}");

        let meshed = inner_ring()
            .into_iter()
            .all(|c| world.chunk_state(c) == Some(ChunkState::Meshed));
        let collided = world.chunk(CENTER).is_some_and(|c| c.collider().is_some());
        if meshed && collided {
            return world;
        }
    }
    panic!("world did not settle in 400 ticks");
}

/// Ticks until every listed chunk is meshed again.
fn settle(world: &mut WorldScheduler, coords: &[ChunkCoord]) {
    for _ in 0..20 {
        world.tick();
        if coords
            .iter()
            .all(|&c| world.chunk_state(c) == Some(ChunkState::Meshed))
        {
            return;
        }
    }
    panic!("chunks did not settle");
}

/// Rebuilds a chunk's mesh from the current voxels of it and all 26 neighbours.
fn fresh_mesh(world: &WorldScheduler, coord: ChunkCoord) -> ChunkMesh {
    let size = world.config().chunk_size;
    let center = world.chunk(coord).unwrap().snapshot();
    let mut neighbors: Vec<(IVec3, Arc<Vec<Block>>)> = Vec::new();
    for dx in -1..=1 {
        for dy in -1..=1 {
            for dz in -1..=1 {
                if let Some(chunk) = world.chunk(coord.offset(dx, dy, dz)) {
                    if (dx, dy, dz) != (0, 0, 0) && chunk.is_initialized() {
                        neighbors.push((IVec3::new(dx, dy, dz), chunk.snapshot()));
                    }
                }
            }
        }
    }

    let mut grid = NeighborGrid::new(&center);
    for (offset, voxels) in &neighbors {
        grid.set(*offset, Some(voxels.as_slice()));
    }
    let ao = LightingSolver::new(world.table()).compute(&grid, size);
    MeshBuilder::new(world.table()).build(&center, &ao, size)
}

/// Topmost voxel with a cube shape in a world column.
fn surface(world: &WorldScheduler, x: i32, z: i32) -> IVec3 {
    (0..64)
        .rev()
        .map(|y| IVec3::new(x, y, z))
        .find(|&p| {
            world
                .block_at(p)
                .is_some_and(|b| world.table().shape(b.block_type) == BlockShape::Block)
        })
        .expect("solid column")
}

/// Test: Moving the observer rescores pending requests and inverts dequeue order.
#[test]
fn test_queue_reprioritization() {
    let config = WorldConfig {
        chunk_size: ChunkSize::new(4, 8, 4),
        spawn_radius: 8,
        workers: 1,
        ..WorldConfig::default()
    };
    let mut world = WorldScheduler::new(config, VoxelTable::standard()).unwrap();

    let near = ChunkCoord::new(0, 0, 0);
    let far = ChunkCoord::new(5, 0, 0);
    assert!(world.enqueue(near));
    assert!(world.enqueue(far));
    assert_eq!(world.pending_priority(near), Some(0));
    assert_eq!(world.pending_priority(far), Some(25));

    world.move_observer(far);

    assert_eq!(world.pending_priority(near), Some(25));
    assert_eq!(world.pending_priority(far), Some(0));
    assert_eq!(world.drain_queue(1), vec![far]);

    let observer = far;
    let order = world.drain_queue(512);
    let distances: Vec<i64> = order.iter().map(|&c| observer.distance_squared(c)).collect();
    assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    assert!(order.contains(&near));
}

/// Test: A chunk without initialised planar neighbours never starts meshing.
#[test]
fn test_neighbor_gating() {
    let config = WorldConfig {
        spawn_radius: 0,
        ..small_config()
    };
    let mut world = WorldScheduler::new(config, VoxelTable::standard()).unwrap();
    world.move_observer(CENTER);

    for _ in 0..30 {
        let stats = world.tick();
        assert_eq!(stats.meshing_started, 0);
        assert_eq!(stats.in_flight, 0);
    }

    let chunk = world.chunk(CENTER).expect("registered");
    assert_eq!(chunk.state(), ChunkState::Ready);
    assert!(chunk.is_dirty());
    assert!(chunk.mesh().is_none());
}

/// Test: Streaming generates the whole square, meshes only gated-in chunks.
#[test]
fn test_streaming_end_to_end() {
    let world = streamed_world();

    assert_eq!(world.chunk_count(), 25);
    assert_eq!(world.pending_count(), 0);
    let center = world.chunk(CENTER).unwrap();
    assert!(!center.mesh().unwrap().is_empty());
    assert_eq!(center.collider().unwrap().revision, center.revision());

    // The outer ring lacks neighbours and keeps waiting.
    let edge = world.chunk(ChunkCoord::new(2, 0, 0)).unwrap();
    assert_eq!(edge.state(), ChunkState::Ready);
    assert!(edge.is_dirty());
}

/// Test: An edit rebuilds its chunk and collider within a single tick.
#[test]
fn test_edit_remeshes_urgently() {
    let mut world = streamed_world();
    let target = surface(&world, 1, 1);
    let before = world.chunk(CENTER).unwrap().revision();

    assert!(world.set_block(target, BlockType::Air));
    assert!(world.chunk(CENTER).unwrap().is_urgent());

    let stats = world.tick();
    assert!(stats.meshed >= 1);

    let chunk = world.chunk(CENTER).unwrap();
    assert_eq!(chunk.state(), ChunkState::Meshed);
    assert_eq!(chunk.revision(), before + 1);
    assert_eq!(chunk.collider().unwrap().revision, chunk.revision());
    assert_eq!(world.block_at(target).unwrap().block_type, BlockType::Air);
}

/// Test: Writing the type already present succeeds and dirties nothing.
#[test]
fn test_same_type_edit_is_idempotent() {
    let mut world = streamed_world();
    let target = surface(&world, 2, 5);
    let current = world.block_at(target).unwrap().block_type;

    assert!(world.set_block(target, current));
    for coord in inner_ring() {
        let chunk = world.chunk(coord).unwrap();
        assert!(!chunk.is_dirty(), "{coord} dirtied");
        assert_eq!(chunk.state(), ChunkState::Meshed);
    }
}

/// Test: The observer's voxel and the one above it cannot be edited.
#[test]
fn test_observer_voxel_rejected() {
    let mut world = streamed_world();
    let events = world.events();
    events.drain();

    assert!(!world.set_block(IVec3::new(4, 63, 4), BlockType::Stone));
    assert!(!world.set_block(IVec3::new(4, 64, 4), BlockType::Stone));
    assert!(events.drain().is_empty());

    assert!(world.set_block(IVec3::new(4, 62, 4), BlockType::Glowstone));
}

/// Test: Clearing the ground under a grass tuft clears the tuft.
#[test]
fn test_grass_cleared_with_ground() {
    let mut world = streamed_world();
    let ground = IVec3::new(2, 60, 2);
    let tuft = ground + IVec3::UP;

    assert!(world.set_block(ground, BlockType::Stone));
    assert!(world.set_block(tuft, BlockType::Grass));
    let events = world.events();
    events.drain();

    assert!(world.set_block(ground, BlockType::Air));

    assert_eq!(world.block_at(tuft).unwrap().block_type, BlockType::Air);
    assert!(events.drain().contains(&WorldEvent::BlockChanged {
        position: tuft,
        from: BlockType::Grass,
        to: BlockType::Air,
    }));
}

/// Test: An edit on a chunk face also dirties the chunk across that face.
#[test]
fn test_boundary_edit_dirties_neighbor() {
    let mut world = streamed_world();

    assert!(world.set_block(IVec3::new(0, 60, 3), BlockType::Glowstone));

    let west = world.chunk(ChunkCoord::new(-1, 0, 0)).unwrap();
    assert!(west.is_dirty());
    assert_eq!(west.state(), ChunkState::Ready);
    assert!(!world.chunk(ChunkCoord::new(1, 0, 0)).unwrap().is_dirty());
}

/// Test: A corner edit rebuilds the diagonal chunk whose AO it changes.
#[test]
fn test_corner_edit_rebuilds_diagonal() {
    let mut world = streamed_world();
    let diagonal = ChunkCoord::new(-1, 0, -1);
    let block = [CENTER, diagonal, ChunkCoord::new(-1, 0, 0), ChunkCoord::new(0, 0, -1)];

    assert!(world.set_block(IVec3::new(-1, 40, -1), BlockType::Stone));
    assert!(world.set_block(IVec3::new(0, 40, -1), BlockType::Air));
    assert!(world.set_block(IVec3::new(0, 40, 0), BlockType::Air));
    settle(&mut world, &block);
    let before = world.chunk(diagonal).unwrap().revision();

    assert!(world.set_block(IVec3::new(0, 40, 0), BlockType::Stone));
    let corner = world.chunk(diagonal).unwrap();
    assert!(corner.is_dirty());
    assert!(corner.is_urgent());

    settle(&mut world, &block);
    assert!(world.chunk(diagonal).unwrap().revision() > before);
    assert_eq!(world.chunk(diagonal).unwrap().mesh(), Some(&fresh_mesh(&world, diagonal)));
}

/// Test: A chunk generated above a meshed chunk triggers its rebuild.
#[test]
fn test_vertical_neighbor_redirties() {
    let mut world = streamed_world();
    let before = world.chunk(CENTER).unwrap().revision();

    assert!(world.enqueue(ChunkCoord::new(0, 1, 0)));
    for _ in 0..50 {
        world.tick();
        if world.chunk(CENTER).unwrap().revision() > before {
            break;
        }
    }

    assert_eq!(world.chunk_state(ChunkCoord::new(0, 1, 0)), Some(ChunkState::Ready));
    assert!(world.chunk(CENTER).unwrap().revision() > before);
}

/// Test: Evicting a chunk removes it and invalidates its neighbours.
#[test]
fn test_evict() {
    let mut world = streamed_world();
    let events = world.events();
    events.drain();

    assert!(world.evict(ChunkCoord::new(1, 0, 1)));
    assert!(world.chunk(ChunkCoord::new(1, 0, 1)).is_none());
    assert!(world.chunk(CENTER).unwrap().is_dirty());
    assert!(events
        .drain()
        .contains(&WorldEvent::ChunkEvicted { coord: ChunkCoord::new(1, 0, 1) }));
    assert!(!world.evict(ChunkCoord::new(1, 0, 1)));
}

/// Test: Chunks beyond the eviction radius leave the registry on the next tick.
#[test]
fn test_eviction_radius() {
    let config = WorldConfig {
        spawn_radius: 1,
        eviction_radius: Some(1),
        max_generate_per_tick: 9,
        ..small_config()
    };
    let mut world = WorldScheduler::new(config, VoxelTable::standard()).unwrap();
    world.move_observer(CENTER);
    world.tick();
    assert_eq!(world.chunk_count(), 9);

    world.move_observer(ChunkCoord::new(5, 0, 0));
    let stats = world.tick();

    assert_eq!(stats.evicted, 9);
    assert!(world.chunk(CENTER).is_none());
}

/// Test: The shipped data files load and match the built-in defaults.
#[test]
fn test_data_files_load() {
    let table = VoxelTable::from_toml_str(include_str!("../data/blocks.toml")).unwrap();
    assert_eq!(table, VoxelTable::standard());

    let config = WorldConfig::from_toml_str(include_str!("../data/world.toml")).unwrap();
    assert_eq!(config.terrain.seed, 12345);
    assert_eq!(config.chunk_size, ChunkSize::new(16, 128, 16));
    assert_eq!(config.budgets, WorldConfig::default().budgets);
}

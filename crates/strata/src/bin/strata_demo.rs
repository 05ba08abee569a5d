//! # STRATA Demo
//!
//! Walks an observer across the world, digs one block, and prints what
//! each tick did.
//!
//! ```bash
//! strata_demo [world.toml] [blocks.toml] [ticks]
//! ```
//!
//! Without arguments it uses built-in defaults and 200 ticks.

use std::process::ExitCode;
use std::time::Instant;

use strata::shared::{BlockShape, BlockType, IVec3, Vec3, VoxelTable};
use strata::{TickStats, WorldConfig, WorldEvent, WorldResult, WorldScheduler};

const DEFAULT_TICKS: u64 = 200;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("   ✗ FATAL: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> WorldResult<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let config = match args.first() {
        Some(path) => WorldConfig::from_file(path)?,
        None => WorldConfig::default(),
    };
    let table = match args.get(1) {
        Some(path) => {
            let source = std::fs::read_to_string(path).map_err(|source| strata::WorldError::Io {
                path: path.clone(),
                source,
            })?;
            VoxelTable::from_toml_str(&source)?
        }
        None => VoxelTable::standard(),
    };
    let ticks = args
        .get(2)
        .and_then(|t| t.parse().ok())
        .unwrap_or(DEFAULT_TICKS);

    println!("═══════════════════════════════════════════════════════════════════");
    println!("                         STRATA DEMO");
    println!("═══════════════════════════════════════════════════════════════════");
    println!("  Seed:          {}", config.terrain.seed);
    println!("  Chunk size:    {:?}", config.chunk_size);
    println!("  Spawn radius:  {}", config.spawn_radius);
    println!("  Workers:       {}", config.workers);
    println!();

    let size = config.chunk_size;
    let mut world = WorldScheduler::new(config, table)?;
    let events = world.events();
    let mut totals = TickStats::default();
    let mut edited = false;
    let start = Instant::now();

    for tick in 0..ticks {
        // Walk one voxel along +x per tick.
        #[allow(clippy::cast_precision_loss)]
        let position = Vec3::new(tick as f32, 90.0, 8.0);
        if world.on_observer_moved(position) {
            println!("  → observer entered {:?}", world.observer());
        }

        let stats = world.tick();
        accumulate(&mut totals, &stats);

        if !edited {
            edited = dig_near(&mut world, position.floor(), size.y);
        }
        for event in events.drain() {
            if let WorldEvent::BlockChanged { position, from, to } = event {
                println!("  ✎ {position:?}: {from:?} → {to:?}");
            }
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("  Ticks:             {ticks} in {elapsed:.2?}");
    println!("  Dequeued:          {}", totals.dequeued);
    println!("  Generated:         {}", totals.generated);
    println!("  Meshing started:   {}", totals.meshing_started);
    println!("  Meshed:            {}", totals.meshed);
    println!("  Colliders:         {}", totals.colliders_installed);
    println!("  Forced joins:      {}", totals.forced_joins);
    println!("  Evicted:           {}", totals.evicted);
    println!("  Still pending:     {}", world.pending_count());
    println!("  Registered chunks: {}", world.chunk_count());
    Ok(())
}

/// Removes the topmost solid block of the column next to the observer.
fn dig_near(world: &mut WorldScheduler, observer: IVec3, height: usize) -> bool {
    let column = observer + IVec3::new(2, 0, 0);
    let top = i32::try_from(height).unwrap_or(i32::MAX) - 1;
    for y in (0..=top).rev() {
        let target = IVec3::new(column.x, y, column.z);
        let Some(block) = world.block_at(target) else {
            return false;
        };
        if world.table().shape(block.block_type) == BlockShape::Block {
            return world.set_block(target, BlockType::Air);
        }
    }
    false
}

fn accumulate(totals: &mut TickStats, stats: &TickStats) {
    totals.dequeued += stats.dequeued;
    totals.generated += stats.generated;
    totals.meshing_started += stats.meshing_started;
    totals.meshed += stats.meshed;
    totals.colliders_installed += stats.colliders_installed;
    totals.forced_joins += stats.forced_joins;
    totals.evicted += stats.evicted;
}

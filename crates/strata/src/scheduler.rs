//! # World Scheduler
//!
//! Owns the chunk registry and the pending-request queue, and advances
//! every chunk one step per [`WorldScheduler::tick`]:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │ 1. Evict chunks beyond the eviction radius                       │
//! │ 2. Dequeue the nearest requests into generation jobs             │
//! │ 3. Poll generation  → Ready(dirty)                               │
//! │ 4. Start lighting for dirty chunks whose 8 planar neighbours     │
//! │    are initialised, while the throttle allows                    │
//! │ 5. Poll lighting → start meshing; poll meshing → install mesh    │
//! │ 6. Poll the collider sink and install baked colliders            │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All registry and queue mutation happens on the thread calling `tick`.
//! Workers only see the snapshot buffers they were handed.

use std::collections::HashMap;
use std::sync::Arc;

use strata_procedural::TerrainGenerator;
use strata_rendering::{AoBuffer, ChunkMesh, LightingSolver, MeshBuilder, NeighborGrid};
use strata_shared::{Block, BlockType, ChunkCoord, ChunkSize, IVec3, Vec3, VoxelTable};

use crate::chunk::{Chunk, ChunkState};
use crate::collider::{BatchedColliderSink, ColliderMesh, ColliderRequest, ColliderSink};
use crate::config::WorldConfig;
use crate::error::WorldResult;
use crate::events::{EventBus, EventReceiver, EventSender, WorldEvent};
use crate::jobs::{BudgetedJob, JobPoll, JobPool};
use crate::priority_queue::PriorityQueue;

/// Horizontal neighbours that must be initialised before a chunk meshes.
const PLANAR_NEIGHBORS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

type Snapshot = Arc<Vec<Block>>;

enum MeshPhase {
    Lighting(BudgetedJob<AoBuffer>),
    Meshing(BudgetedJob<ChunkMesh>),
}

struct MeshTask {
    snapshot: Snapshot,
    urgent: bool,
    phase: MeshPhase,
}

enum Step {
    Wait,
    Lit(AoBuffer, bool),
    Built(ChunkMesh, bool),
    Failed,
}

/// Counters of one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Tick number, starting at 1.
    pub tick: u64,
    /// Requests dequeued into generation.
    pub dequeued: usize,
    /// Chunks whose terrain finished.
    pub generated: usize,
    /// Chunks that started lighting.
    pub meshing_started: usize,
    /// Meshes installed.
    pub meshed: usize,
    /// Colliders installed.
    pub colliders_installed: usize,
    /// Polls that had to block.
    pub forced_joins: usize,
    /// Chunks evicted.
    pub evicted: usize,
    /// Requests still queued after the tick.
    pub pending: usize,
    /// Chunks mid-rebuild after the tick.
    pub in_flight: usize,
}

/// Streams chunks around an observer.
pub struct WorldScheduler {
    config: WorldConfig,
    table: Arc<VoxelTable>,
    terrain: Arc<TerrainGenerator>,
    pool: JobPool,
    chunks: HashMap<ChunkCoord, Chunk>,
    queue: PriorityQueue<ChunkCoord>,
    generating: HashMap<ChunkCoord, BudgetedJob<Vec<Block>>>,
    meshing: HashMap<ChunkCoord, MeshTask>,
    updating: usize,
    observer: Option<ChunkCoord>,
    observer_voxel: Option<IVec3>,
    sink: Box<dyn ColliderSink>,
    bus: EventBus,
    events: EventSender,
    ticks: u64,
}

impl WorldScheduler {
    /// Creates a world with the batching collider sink.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or workers cannot start.
    pub fn new(config: WorldConfig, table: VoxelTable) -> WorldResult<Self> {
        let sink = Box::new(BatchedColliderSink::new(config.collider));
        Self::with_sink(config, table, sink)
    }

    /// Creates a world with a custom collider sink.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or workers cannot start.
    pub fn with_sink(
        config: WorldConfig,
        table: VoxelTable,
        sink: Box<dyn ColliderSink>,
    ) -> WorldResult<Self> {
        config.validate()?;
        let pool = JobPool::new(config.workers)?;
        let terrain = Arc::new(TerrainGenerator::new(config.terrain.clone()));
        let bus = EventBus::new(config.event_capacity);
        let events = bus.sender();
        tracing::info!(
            "world started: radius {} chunks, chunk size {:?}",
            config.spawn_radius,
            config.chunk_size
        );

        Ok(Self {
            config,
            table: Arc::new(table),
            terrain,
            pool,
            chunks: HashMap::new(),
            queue: PriorityQueue::new(),
            generating: HashMap::new(),
            meshing: HashMap::new(),
            updating: 0,
            observer: None,
            observer_voxel: None,
            sink,
            bus,
            events,
            ticks: 0,
        })
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Block descriptor table.
    #[must_use]
    pub fn table(&self) -> &VoxelTable {
        &self.table
    }

    /// A receiver for world events.
    #[must_use]
    pub fn events(&self) -> EventReceiver {
        self.bus.receiver()
    }

    /// Chunk the observer is in.
    #[must_use]
    pub fn observer(&self) -> Option<ChunkCoord> {
        self.observer
    }

    /// A registered chunk.
    #[must_use]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Lifecycle state of a registered chunk.
    #[must_use]
    pub fn chunk_state(&self, coord: ChunkCoord) -> Option<ChunkState> {
        self.chunks.get(&coord).map(Chunk::state)
    }

    /// Every registered chunk.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    /// Number of registered chunks.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Queued priority of a coordinate.
    #[must_use]
    pub fn pending_priority(&self, coord: ChunkCoord) -> Option<i64> {
        self.queue.priority(&coord)
    }

    /// Number of queued requests.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Chunks mid-rebuild.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.updating
    }

    /// Whether the throttle admits another rebuild.
    #[inline]
    #[must_use]
    pub fn can_update(&self) -> bool {
        self.updating <= self.config.max_concurrent
    }

    /// Block at a world voxel, if its chunk is initialised.
    #[must_use]
    pub fn block_at(&self, world: IVec3) -> Option<Block> {
        let size = self.config.chunk_size;
        let coord = ChunkCoord::from_world(world, size);
        let chunk = self.chunks.get(&coord).filter(|c| c.is_initialized())?;
        chunk.voxels().get(size.index(size.to_grid(world, coord))).copied()
    }

    // =========================================================================
    // STREAMING
    // =========================================================================

    /// Feeds a new observer position.
    ///
    /// Returns true if the observer changed chunk.
    pub fn on_observer_moved(&mut self, position: Vec3) -> bool {
        let voxel = position.floor();
        self.observer_voxel = Some(voxel);
        self.move_observer(ChunkCoord::from_world(voxel, self.config.chunk_size))
    }

    /// Moves the observer to a chunk: reprioritises and trims the queue,
    /// then queues every unregistered coordinate in range.
    ///
    /// A no-op if the observer is already there.
    pub fn move_observer(&mut self, observer: ChunkCoord) -> bool {
        if self.observer == Some(observer) {
            return false;
        }
        self.observer = Some(observer);

        let (radius, vertical) = (self.config.spawn_radius, self.config.vertical_radius);
        let dropped = self.queue.reprioritize(|&coord| {
            in_range(observer, coord, radius, vertical).then(|| observer.distance_squared(coord))
        });

        let mut added = 0;
        for y in -vertical..=vertical {
            for dz in -radius..=radius {
                for dx in -radius..=radius {
                    let coord = ChunkCoord::new(observer.x + dx, y, observer.z + dz);
                    if !self.chunks.contains_key(&coord)
                        && self.queue.push(coord, observer.distance_squared(coord))
                    {
                        added += 1;
                    }
                }
            }
        }

        tracing::debug!("observer entered {observer}: queued {added}, dropped {dropped}");
        true
    }

    /// Queues one coordinate at its distance to the observer.
    ///
    /// Returns false if it is already registered.
    pub fn enqueue(&mut self, coord: ChunkCoord) -> bool {
        if self.chunks.contains_key(&coord) {
            return false;
        }
        let priority = self.observer.unwrap_or_default().distance_squared(coord);
        self.queue.push(coord, priority);
        true
    }

    /// Pops up to `max` nearest requests and starts generating them.
    pub fn drain_queue(&mut self, max: usize) -> Vec<ChunkCoord> {
        let mut started = Vec::with_capacity(max.min(self.queue.len()));
        while started.len() < max {
            let Some((coord, _)) = self.queue.pop() else {
                break;
            };
            if self.chunks.contains_key(&coord) {
                continue;
            }
            self.start_generation(coord);
            started.push(coord);
        }
        started
    }

    /// Removes a chunk or pending request and everything in flight for it.
    ///
    /// Returns false if the coordinate was unknown.
    pub fn evict(&mut self, coord: ChunkCoord) -> bool {
        let queued = self.queue.remove(&coord).is_some();
        let registered = self.chunks.remove(&coord).is_some();
        self.generating.remove(&coord);
        if self.meshing.remove(&coord).is_some() {
            self.updating = self.updating.saturating_sub(1);
        }
        self.sink.discard(coord);

        if !registered {
            return queued;
        }
        for (dx, dz) in PLANAR_NEIGHBORS {
            if let Some(neighbor) = self.chunks.get_mut(&coord.offset(dx, 0, dz)) {
                neighbor.mark_dirty(false);
            }
        }
        self.events.send(WorldEvent::ChunkEvicted { coord });
        tracing::debug!("evicted {coord}");
        true
    }

    // =========================================================================
    // EDITING
    // =========================================================================

    /// Changes one voxel.
    ///
    /// Fails on the observer's voxel, the voxel above it, and chunks that
    /// are not initialised. Setting the type already present succeeds
    /// without dirtying anything. Clearing the voxel under a grass tuft
    /// clears the tuft too.
    pub fn set_block(&mut self, world: IVec3, block_type: BlockType) -> bool {
        if let Some(observer) = self.observer_voxel {
            if world == observer || world == observer + IVec3::UP {
                tracing::debug!("edit at {world:?} rejected: observer occupies it");
                return false;
            }
        }
        let Some(current) = self.block_at(world) else {
            tracing::debug!("edit at {world:?} rejected: chunk not initialised");
            return false;
        };
        if current.block_type == block_type {
            return true;
        }

        let block = Block::new(block_type, self.terrain.tint_at(world.x, world.z));
        self.write_block(world, block);
        self.events.send(WorldEvent::BlockChanged {
            position: world,
            from: current.block_type,
            to: block_type,
        });

        if block_type == BlockType::Air {
            let above = world + IVec3::UP;
            if self.block_at(above).is_some_and(|b| b.block_type == BlockType::Grass) {
                self.write_block(above, Block::AIR);
                self.events.send(WorldEvent::BlockChanged {
                    position: above,
                    from: BlockType::Grass,
                    to: BlockType::Air,
                });
            }
        }
        true
    }

    /// Writes a voxel and dirties its chunk plus every chunk holding one of
    /// its 26 neighbours, since those voxels feed their AO.
    fn write_block(&mut self, world: IVec3, block: Block) {
        let size = self.config.chunk_size;
        let coord = ChunkCoord::from_world(world, size);
        let Some(chunk) = self.chunks.get_mut(&coord) else {
            return;
        };
        chunk.write(size.index(size.to_grid(world, coord)), block);
        chunk.mark_dirty(true);

        for neighbor in touched_chunks(world, size) {
            if let Some(chunk) = self.chunks.get_mut(&neighbor) {
                chunk.mark_dirty(true);
            }
        }
    }

    /// Dirties every initialised chunk in the 3×3×3 block around `coord`.
    fn dirty_surrounding(&mut self, coord: ChunkCoord) {
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    if (dx, dy, dz) == (0, 0, 0) {
                        continue;
                    }
                    if let Some(chunk) = self.chunks.get_mut(&coord.offset(dx, dy, dz)) {
                        chunk.mark_dirty(false);
                    }
                }
            }
        }
    }

    // =========================================================================
    // TICK
    // =========================================================================

    /// Advances the world by one tick.
    pub fn tick(&mut self) -> TickStats {
        self.ticks += 1;
        let mut stats = TickStats {
            tick: self.ticks,
            ..TickStats::default()
        };

        stats.evicted = self.evict_distant();
        stats.dequeued = self.drain_queue(self.config.max_generate_per_tick).len();
        self.poll_generation(&mut stats);
        self.start_meshing(&mut stats);
        self.poll_meshing(&mut stats);
        self.install_colliders(&mut stats);

        stats.pending = self.queue.len();
        stats.in_flight = self.updating;
        tracing::trace!("tick {}: {stats:?}", self.ticks);
        stats
    }

    fn evict_distant(&mut self) -> usize {
        let (Some(radius), Some(observer)) = (self.config.eviction_radius, self.observer) else {
            return 0;
        };
        let mut distant: Vec<ChunkCoord> = self
            .chunks
            .keys()
            .copied()
            .filter(|&c| horizontal_distance(observer, c) > radius)
            .collect();
        distant.sort_unstable();
        distant.into_iter().filter(|&c| self.evict(c)).count()
    }

    fn start_generation(&mut self, coord: ChunkCoord) {
        self.chunks.insert(coord, Chunk::generating(coord));
        let terrain = Arc::clone(&self.terrain);
        let size = self.config.chunk_size;
        let handle = self.pool.spawn(move || terrain.generate(coord, size));
        self.generating
            .insert(coord, BudgetedJob::new(handle, self.config.budgets.generation));
        tracing::debug!("generating {coord}");
    }

    fn poll_generation(&mut self, stats: &mut TickStats) {
        let mut coords: Vec<ChunkCoord> = self.generating.keys().copied().collect();
        coords.sort_unstable();

        for coord in coords {
            let Some(job) = self.generating.get_mut(&coord) else {
                continue;
            };
            match job.poll(false) {
                JobPoll::Pending => {}
                JobPoll::Ready { value, forced } => {
                    self.generating.remove(&coord);
                    if forced {
                        stats.forced_joins += 1;
                        tracing::debug!("generation of {coord} force-joined");
                    }
                    if let Some(chunk) = self.chunks.get_mut(&coord) {
                        chunk.install_voxels(value);
                        stats.generated += 1;
                        self.events.send(WorldEvent::ChunkGenerated { coord });
                        self.dirty_surrounding(coord);
                    }
                }
                JobPoll::Failed => {
                    self.generating.remove(&coord);
                    self.chunks.remove(&coord);
                    tracing::warn!("generation of {coord} failed, requeueing");
                    self.enqueue(coord);
                }
            }
        }
    }

    fn neighbors_initialized(&self, coord: ChunkCoord) -> bool {
        PLANAR_NEIGHBORS.iter().all(|&(dx, dz)| {
            self.chunks
                .get(&coord.offset(dx, 0, dz))
                .is_some_and(Chunk::is_initialized)
        })
    }

    fn start_meshing(&mut self, stats: &mut TickStats) {
        let observer = self.observer.unwrap_or_default();
        let mut candidates: Vec<(bool, i64, ChunkCoord)> = self
            .chunks
            .values()
            .filter(|c| c.state() == ChunkState::Ready && c.is_dirty())
            .map(|c| (!c.is_urgent(), observer.distance_squared(c.coord()), c.coord()))
            .collect();
        candidates.sort_unstable();

        for (_, _, coord) in candidates {
            if !self.can_update() {
                break;
            }
            if !self.neighbors_initialized(coord) {
                continue;
            }
            self.begin_lighting(coord);
            stats.meshing_started += 1;
        }
    }

    fn begin_lighting(&mut self, coord: ChunkCoord) {
        let mut neighbors: Vec<(IVec3, Snapshot)> = Vec::with_capacity(26);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    if (dx, dy, dz) == (0, 0, 0) {
                        continue;
                    }
                    if let Some(neighbor) = self.chunks.get(&coord.offset(dx, dy, dz)) {
                        if neighbor.is_initialized() {
                            neighbors.push((IVec3::new(dx, dy, dz), neighbor.snapshot()));
                        }
                    }
                }
            }
        }

        let Some(chunk) = self.chunks.get_mut(&coord) else {
            return;
        };
        let urgent = chunk.begin_meshing();
        let snapshot = chunk.snapshot();

        let center = Arc::clone(&snapshot);
        let table = Arc::clone(&self.table);
        let size = self.config.chunk_size;
        let handle = self.pool.spawn(move || {
            let mut grid = NeighborGrid::new(&center);
            for (offset, voxels) in &neighbors {
                grid.set(*offset, Some(voxels.as_slice()));
            }
            LightingSolver::new(&table).compute(&grid, size)
        });

        self.meshing.insert(
            coord,
            MeshTask {
                snapshot,
                urgent,
                phase: MeshPhase::Lighting(BudgetedJob::new(handle, self.config.budgets.lighting)),
            },
        );
        self.updating += 1;
        tracing::debug!("meshing {coord} (urgent: {urgent})");
    }

    fn begin_mesh_phase(&mut self, coord: ChunkCoord, ao: AoBuffer) {
        let Some(task) = self.meshing.get_mut(&coord) else {
            return;
        };
        let voxels = Arc::clone(&task.snapshot);
        let table = Arc::clone(&self.table);
        let size = self.config.chunk_size;
        let handle = self
            .pool
            .spawn(move || MeshBuilder::new(&table).build(&voxels, &ao, size));
        task.phase = MeshPhase::Meshing(BudgetedJob::new(handle, self.config.budgets.meshing));
    }

    fn poll_meshing(&mut self, stats: &mut TickStats) {
        let mut coords: Vec<ChunkCoord> = self.meshing.keys().copied().collect();
        coords.sort_unstable();

        for coord in coords {
            // Urgent chunks run both phases to completion in one tick.
            loop {
                let Some(task) = self.meshing.get_mut(&coord) else {
                    break;
                };
                let urgent = task.urgent;
                let step = match &mut task.phase {
                    MeshPhase::Lighting(job) => match job.poll(urgent) {
                        JobPoll::Pending => Step::Wait,
                        JobPoll::Ready { value, forced } => Step::Lit(value, forced),
                        JobPoll::Failed => Step::Failed,
                    },
                    MeshPhase::Meshing(job) => match job.poll(urgent) {
                        JobPoll::Pending => Step::Wait,
                        JobPoll::Ready { value, forced } => Step::Built(value, forced),
                        JobPoll::Failed => Step::Failed,
                    },
                };

                match step {
                    Step::Wait => break,
                    Step::Lit(ao, forced) => {
                        stats.forced_joins += usize::from(forced);
                        self.begin_mesh_phase(coord, ao);
                        if !urgent {
                            break;
                        }
                    }
                    Step::Built(mesh, forced) => {
                        stats.forced_joins += usize::from(forced);
                        self.meshing.remove(&coord);
                        self.finish_meshing(coord, mesh, urgent, stats);
                        break;
                    }
                    Step::Failed => {
                        self.meshing.remove(&coord);
                        self.updating = self.updating.saturating_sub(1);
                        if let Some(chunk) = self.chunks.get_mut(&coord) {
                            chunk.abort_meshing();
                        }
                        tracing::warn!("meshing of {coord} failed, will retry");
                        break;
                    }
                }
            }
        }
    }

    fn finish_meshing(&mut self, coord: ChunkCoord, mesh: ChunkMesh, urgent: bool, stats: &mut TickStats) {
        self.updating = self.updating.saturating_sub(1);
        let Some(chunk) = self.chunks.get_mut(&coord) else {
            return;
        };

        let faces = mesh.face_count();
        let mesh = Arc::new(mesh);
        let revision = chunk.install_mesh(Arc::clone(&mesh));
        stats.meshed += 1;
        self.events.send(WorldEvent::ChunkMeshed { coord, revision, faces });

        if urgent {
            if chunk.install_collider(ColliderMesh::bake(coord, revision, &mesh)) {
                stats.colliders_installed += 1;
                self.events.send(WorldEvent::ColliderInstalled { coord, revision });
            }
        } else {
            self.sink.enqueue(ColliderRequest { coord, revision, mesh });
        }
    }

    fn install_colliders(&mut self, stats: &mut TickStats) {
        for collider in self.sink.poll(&self.pool) {
            let (coord, revision) = (collider.coord, collider.revision);
            if let Some(chunk) = self.chunks.get_mut(&coord) {
                if chunk.install_collider(collider) {
                    stats.colliders_installed += 1;
                    self.events.send(WorldEvent::ColliderInstalled { coord, revision });
                }
            }
        }
    }
}

/// Chebyshev distance in the horizontal plane.
#[inline]
fn horizontal_distance(a: ChunkCoord, b: ChunkCoord) -> i32 {
    (a.x - b.x).abs().max((a.z - b.z).abs())
}

/// Chunks other than the voxel's own that contain one of its 26 neighbours.
fn touched_chunks(world: IVec3, size: ChunkSize) -> Vec<ChunkCoord> {
    let home = ChunkCoord::from_world(world, size);
    let mut touched = Vec::new();
    for dx in -1..=1 {
        for dy in -1..=1 {
            for dz in -1..=1 {
                let coord = ChunkCoord::from_world(world + IVec3::new(dx, dy, dz), size);
                if coord != home && !touched.contains(&coord) {
                    touched.push(coord);
                }
            }
        }
    }
    touched
}

#[inline]
fn in_range(observer: ChunkCoord, coord: ChunkCoord, radius: i32, vertical: i32) -> bool {
    horizontal_distance(observer, coord) <= radius && coord.y.abs() <= vertical
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world(radius: i32) -> WorldScheduler {
        let config = WorldConfig {
            spawn_radius: radius,
            workers: 1,
            ..WorldConfig::default()
        };
        WorldScheduler::new(config, VoxelTable::standard()).unwrap()
    }

    #[test]
    fn test_observer_move_is_idempotent() {
        let mut world = world(1);
        assert!(world.move_observer(ChunkCoord::new(0, 0, 0)));
        assert_eq!(world.pending_count(), 9);
        assert!(!world.move_observer(ChunkCoord::new(0, 0, 0)));
        assert_eq!(world.pending_count(), 9);
    }

    #[test]
    fn test_move_drops_out_of_range() {
        let mut world = world(1);
        world.move_observer(ChunkCoord::new(0, 0, 0));
        world.move_observer(ChunkCoord::new(10, 0, 0));
        assert_eq!(world.pending_count(), 9);
        assert_eq!(world.pending_priority(ChunkCoord::new(0, 0, 0)), None);
        assert_eq!(world.pending_priority(ChunkCoord::new(10, 0, 0)), Some(0));
    }

    #[test]
    fn test_drain_pops_nearest_and_registers() {
        let mut world = world(2);
        world.move_observer(ChunkCoord::new(0, 0, 0));
        let started = world.drain_queue(1);
        assert_eq!(started, vec![ChunkCoord::new(0, 0, 0)]);
        assert_eq!(world.chunk_state(ChunkCoord::new(0, 0, 0)), Some(ChunkState::Generating));
        assert!(!world.enqueue(ChunkCoord::new(0, 0, 0)));
    }

    #[test]
    fn test_range_is_square_and_flat() {
        let observer = ChunkCoord::new(0, 0, 0);
        assert!(in_range(observer, ChunkCoord::new(2, 0, -2), 2, 0));
        assert!(!in_range(observer, ChunkCoord::new(3, 0, 0), 2, 0));
        assert!(!in_range(observer, ChunkCoord::new(0, 1, 0), 2, 0));
        assert!(in_range(observer, ChunkCoord::new(0, -1, 0), 2, 1));
    }

    #[test]
    fn test_touched_chunks() {
        let size = ChunkSize::new(8, 64, 8);
        assert!(touched_chunks(IVec3::new(3, 30, 3), size).is_empty());
        assert_eq!(touched_chunks(IVec3::new(0, 30, 3), size), vec![ChunkCoord::new(-1, 0, 0)]);

        let corner = touched_chunks(IVec3::new(0, 30, 0), size);
        assert_eq!(corner.len(), 3);
        assert!(corner.contains(&ChunkCoord::new(-1, 0, -1)));

        assert_eq!(touched_chunks(IVec3::new(7, 63, 7), size).len(), 7);
    }

    #[test]
    fn test_drain_with_huge_limit() {
        let mut world = world(1);
        world.move_observer(ChunkCoord::new(0, 0, 0));
        assert_eq!(world.drain_queue(usize::MAX).len(), 9);
    }

    #[test]
    fn test_edit_before_generation_fails() {
        let mut world = world(1);
        assert!(!world.set_block(IVec3::new(1, 1, 1), BlockType::Stone));
        world.move_observer(ChunkCoord::new(0, 0, 0));
        world.drain_queue(1);
        assert!(!world.set_block(IVec3::new(1, 1, 1), BlockType::Stone));
    }
}

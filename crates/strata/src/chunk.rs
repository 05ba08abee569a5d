//! # Chunk Lifecycle
//!
//! ```text
//! Generating ──> Ready(dirty) ──> Meshing ──> Meshed
//!                    ^                           │
//!                    └────── self / neighbour edit
//! ```
//!
//! Voxels live behind an `Arc` so lighting and meshing jobs can hold a
//! read-only snapshot. An edit during such a window copies the buffer
//! instead of mutating what the job reads.

use std::sync::Arc;

use strata_rendering::ChunkMesh;
use strata_shared::{Block, ChunkCoord};

use crate::collider::ColliderMesh;

/// Lifecycle state of a registered chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChunkState {
    /// Terrain job in flight; no voxels yet.
    Generating,
    /// Voxels valid; mesh missing or stale if dirty.
    Ready,
    /// Lighting or meshing job in flight.
    Meshing,
    /// Mesh reflects the voxels.
    Meshed,
}

impl ChunkState {
    /// Returns true once voxels are valid.
    #[inline]
    #[must_use]
    pub const fn is_initialized(self) -> bool {
        !matches!(self, Self::Generating)
    }
}

/// One registered chunk.
#[derive(Debug)]
pub struct Chunk {
    coord: ChunkCoord,
    state: ChunkState,
    voxels: Arc<Vec<Block>>,
    dirty: bool,
    urgent: bool,
    revision: u64,
    mesh: Option<Arc<ChunkMesh>>,
    collider: Option<ColliderMesh>,
}

impl Chunk {
    /// Registers a chunk whose terrain is being generated.
    #[must_use]
    pub fn generating(coord: ChunkCoord) -> Self {
        Self {
            coord,
            state: ChunkState::Generating,
            voxels: Arc::new(Vec::new()),
            dirty: false,
            urgent: false,
            revision: 0,
            mesh: None,
            collider: None,
        }
    }

    /// Chunk coordinate.
    #[inline]
    #[must_use]
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Lifecycle state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> ChunkState {
        self.state
    }

    /// Returns true once voxels are valid.
    #[inline]
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.state.is_initialized()
    }

    /// Returns true if the mesh no longer matches the voxels.
    #[inline]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns true if the pending rebuild was caused by an edit.
    #[inline]
    #[must_use]
    pub fn is_urgent(&self) -> bool {
        self.urgent
    }

    /// Voxel buffer (empty while generating).
    #[inline]
    #[must_use]
    pub fn voxels(&self) -> &[Block] {
        &self.voxels
    }

    /// Shared read-only handle to the voxels.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Vec<Block>> {
        Arc::clone(&self.voxels)
    }

    /// Number of meshes installed so far.
    #[inline]
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Render mesh, once meshed.
    #[must_use]
    pub fn mesh(&self) -> Option<&ChunkMesh> {
        self.mesh.as_deref()
    }

    /// Collision mesh, once baked.
    #[must_use]
    pub fn collider(&self) -> Option<&ColliderMesh> {
        self.collider.as_ref()
    }

    /// Finishes generation: `Generating → Ready(dirty)`.
    pub(crate) fn install_voxels(&mut self, voxels: Vec<Block>) {
        self.voxels = Arc::new(voxels);
        self.state = ChunkState::Ready;
        self.dirty = true;
    }

    /// Writes one voxel. Copies the buffer if a job holds a snapshot.
    pub(crate) fn write(&mut self, index: usize, block: Block) {
        if let Some(slot) = Arc::make_mut(&mut self.voxels).get_mut(index) {
            *slot = block;
        }
    }

    /// Flags the mesh stale. `Meshed` falls back to `Ready`.
    pub(crate) fn mark_dirty(&mut self, urgent: bool) {
        if !self.is_initialized() {
            return;
        }
        self.dirty = true;
        self.urgent |= urgent;
        if self.state == ChunkState::Meshed {
            self.state = ChunkState::Ready;
        }
    }

    /// Starts a rebuild: clears the dirty flags and returns whether it was urgent.
    pub(crate) fn begin_meshing(&mut self) -> bool {
        let urgent = self.urgent;
        self.dirty = false;
        self.urgent = false;
        self.state = ChunkState::Meshing;
        urgent
    }

    /// Installs a finished mesh and returns its revision.
    ///
    /// A chunk dirtied while meshing goes back to `Ready`.
    pub(crate) fn install_mesh(&mut self, mesh: Arc<ChunkMesh>) -> u64 {
        self.mesh = Some(mesh);
        self.revision += 1;
        self.state = if self.dirty { ChunkState::Ready } else { ChunkState::Meshed };
        self.revision
    }

    /// Abandons a failed rebuild; the chunk retries later.
    pub(crate) fn abort_meshing(&mut self) {
        self.dirty = true;
        self.state = ChunkState::Ready;
    }

    /// Installs a baked collision mesh if it matches the current mesh.
    pub(crate) fn install_collider(&mut self, collider: ColliderMesh) -> bool {
        if collider.revision != self.revision {
            return false;
        }
        self.collider = Some(collider);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_shared::{BlockType, Rgba8};

    fn ready() -> Chunk {
        let mut chunk = Chunk::generating(ChunkCoord::new(0, 0, 0));
        chunk.install_voxels(vec![Block::AIR; 8]);
        chunk
    }

    #[test]
    fn test_generation_marks_dirty() {
        let mut chunk = Chunk::generating(ChunkCoord::new(1, 0, 2));
        assert!(!chunk.is_initialized());
        chunk.mark_dirty(true);
        assert!(!chunk.is_dirty());

        chunk.install_voxels(vec![Block::AIR; 4]);
        assert_eq!(chunk.state(), ChunkState::Ready);
        assert!(chunk.is_dirty());
        assert!(!chunk.is_urgent());
    }

    #[test]
    fn test_mesh_cycle() {
        let mut chunk = ready();
        assert!(!chunk.begin_meshing());
        assert!(!chunk.is_dirty());
        assert_eq!(chunk.install_mesh(Arc::new(ChunkMesh::new())), 1);
        assert_eq!(chunk.state(), ChunkState::Meshed);

        chunk.mark_dirty(true);
        assert_eq!(chunk.state(), ChunkState::Ready);
        assert!(chunk.begin_meshing());
    }

    #[test]
    fn test_edit_during_meshing_requeues() {
        let mut chunk = ready();
        chunk.begin_meshing();
        chunk.mark_dirty(false);
        assert_eq!(chunk.state(), ChunkState::Meshing);
        chunk.install_mesh(Arc::new(ChunkMesh::new()));
        assert_eq!(chunk.state(), ChunkState::Ready);
        assert!(chunk.is_dirty());
    }

    #[test]
    fn test_write_does_not_touch_snapshot() {
        let mut chunk = ready();
        let snapshot = chunk.snapshot();
        let stone = Block::new(BlockType::Stone, Rgba8::WHITE);
        chunk.write(3, stone);
        assert_eq!(chunk.voxels()[3], stone);
        assert_eq!(snapshot[3], Block::AIR);
    }

    #[test]
    fn test_stale_collider_rejected() {
        let mut chunk = ready();
        chunk.begin_meshing();
        chunk.install_mesh(Arc::new(ChunkMesh::new()));
        let stale = ColliderMesh::bake(chunk.coord(), 0, &ChunkMesh::new());
        assert!(!chunk.install_collider(stale));
        let current = ColliderMesh::bake(chunk.coord(), 1, &ChunkMesh::new());
        assert!(chunk.install_collider(current));
        assert!(chunk.collider().is_some());
    }
}

//! # Collision Meshes
//!
//! Finished render meshes are reduced to triangle soups for physics. Only
//! the opaque block bucket collides; leaves, foliage and liquids do not.
//!
//! Edit-driven rebuilds bake inline. Everything else goes through a
//! [`ColliderSink`], which may batch and bake on worker threads and hands
//! results back whenever they are ready, in any order.

use std::collections::HashSet;
use std::sync::Arc;

use rayon::prelude::*;
use strata_rendering::{ChunkMesh, MeshBucket};
use strata_shared::ChunkCoord;

use crate::config::ColliderConfig;
use crate::jobs::{BudgetedJob, JobPool, JobPoll};

/// Baked collision geometry of one chunk, in chunk-local space.
#[derive(Clone, Debug, PartialEq)]
pub struct ColliderMesh {
    /// Owning chunk.
    pub coord: ChunkCoord,
    /// Mesh revision this was baked from.
    pub revision: u64,
    /// Vertex positions.
    pub vertices: Vec<[f32; 3]>,
    /// Non-degenerate triangles.
    pub triangles: Vec<[u32; 3]>,
    /// Bounding box minimum.
    pub min: [f32; 3],
    /// Bounding box maximum.
    pub max: [f32; 3],
}

impl ColliderMesh {
    /// Bakes the block bucket of a render mesh.
    #[must_use]
    pub fn bake(coord: ChunkCoord, revision: u64, mesh: &ChunkMesh) -> Self {
        let vertices = &mesh.vertices;
        let triangles: Vec<[u32; 3]> = mesh
            .indices(MeshBucket::Block)
            .par_chunks_exact(3)
            .map(|t| [t[0], t[1], t[2]])
            .filter(|&tri| !is_degenerate(vertices, tri))
            .collect();

        let mut min = [f32::MAX; 3];
        let mut max = [f32::MIN; 3];
        for &index in triangles.iter().flatten() {
            let v = vertices[index as usize];
            for axis in 0..3 {
                min[axis] = min[axis].min(v[axis]);
                max[axis] = max[axis].max(v[axis]);
            }
        }
        if triangles.is_empty() {
            min = [0.0; 3];
            max = [0.0; 3];
        }

        Self {
            coord,
            revision,
            vertices: vertices.clone(),
            triangles,
            min,
            max,
        }
    }

    /// Returns true if nothing collides.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

/// A zero-area triangle or one with an index outside the vertex array.
fn is_degenerate(vertices: &[[f32; 3]], [a, b, c]: [u32; 3]) -> bool {
    let (Some(a), Some(b), Some(c)) = (
        vertices.get(a as usize),
        vertices.get(b as usize),
        vertices.get(c as usize),
    ) else {
        return true;
    };
    let ab = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let ac = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let cross = [
        ab[1] * ac[2] - ab[2] * ac[1],
        ab[2] * ac[0] - ab[0] * ac[2],
        ab[0] * ac[1] - ab[1] * ac[0],
    ];
    cross.iter().map(|c| c * c).sum::<f32>() <= f32::EPSILON
}

// =============================================================================
// SINK
// =============================================================================

/// A finished non-urgent mesh waiting for collision baking.
#[derive(Clone, Debug)]
pub struct ColliderRequest {
    /// Owning chunk.
    pub coord: ChunkCoord,
    /// Mesh revision.
    pub revision: u64,
    /// The render mesh.
    pub mesh: Arc<ChunkMesh>,
}

/// Receives meshes and eventually returns their colliders.
pub trait ColliderSink: Send {
    /// Hands over a finished mesh. A newer request for the same chunk
    /// supersedes an older one still waiting.
    fn enqueue(&mut self, request: ColliderRequest);

    /// Advances one tick and returns every collider finished so far.
    fn poll(&mut self, pool: &JobPool) -> Vec<ColliderMesh>;

    /// Forgets a chunk; nothing for it is returned afterwards.
    fn discard(&mut self, coord: ChunkCoord);

    /// Requests not yet returned.
    fn pending(&self) -> usize;
}

/// A batch handed to the pool.
struct InFlight {
    job: BudgetedJob<Vec<ColliderMesh>>,
    coords: HashSet<ChunkCoord>,
    /// Coordinates discarded after the batch left. Results for them are
    /// dropped even if the chunk was requested again in the meantime.
    discarded: HashSet<ChunkCoord>,
}

/// Batches requests and bakes each batch as one pool job.
pub struct BatchedColliderSink {
    config: ColliderConfig,
    waiting: Vec<ColliderRequest>,
    waited: u32,
    baking: Option<InFlight>,
}

impl BatchedColliderSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new(config: ColliderConfig) -> Self {
        Self {
            config,
            waiting: Vec::new(),
            waited: 0,
            baking: None,
        }
    }

    fn flush(&mut self, pool: &JobPool) {
        let batch = std::mem::take(&mut self.waiting);
        let coords = batch.iter().map(|r| r.coord).collect();
        self.waited = 0;
        tracing::debug!("baking {} colliders", batch.len());

        let handle = pool.spawn(move || {
            batch
                .into_par_iter()
                .map(|r| ColliderMesh::bake(r.coord, r.revision, &r.mesh))
                .collect()
        });
        self.baking = Some(InFlight {
            job: BudgetedJob::new(handle, self.config.bake_budget),
            coords,
            discarded: HashSet::new(),
        });
    }
}

impl ColliderSink for BatchedColliderSink {
    fn enqueue(&mut self, request: ColliderRequest) {
        self.waiting.retain(|r| r.coord != request.coord);
        self.waiting.push(request);
    }

    fn poll(&mut self, pool: &JobPool) -> Vec<ColliderMesh> {
        let mut finished = Vec::new();

        match self.baking.as_mut().map(|batch| batch.job.poll(false)) {
            None | Some(JobPoll::Pending) => {}
            Some(JobPoll::Ready { value, forced }) => {
                if forced {
                    tracing::debug!("collider bake force-joined");
                }
                if let Some(batch) = self.baking.take() {
                    finished = value
                        .into_iter()
                        .filter(|c| !batch.discarded.contains(&c.coord))
                        .collect();
                }
            }
            Some(JobPoll::Failed) => {
                tracing::warn!("collider bake failed, batch dropped");
                self.baking = None;
            }
        }

        if !self.waiting.is_empty() {
            self.waited += 1;
            let full = self.waiting.len() >= self.config.batch_size;
            if self.baking.is_none() && (full || self.waited >= self.config.max_wait_ticks) {
                self.flush(pool);
            }
        }
        finished
    }

    fn discard(&mut self, coord: ChunkCoord) {
        self.waiting.retain(|r| r.coord != coord);
        if let Some(batch) = self.baking.as_mut() {
            if batch.coords.contains(&coord) {
                batch.discarded.insert(coord);
            }
        }
    }

    fn pending(&self) -> usize {
        self.waiting.len() + self.baking.as_ref().map_or(0, |batch| batch.coords.len())
    }
}

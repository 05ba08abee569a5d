//! Ambient occlusion.
//!
//! For every non-empty voxel and every face, four corner values are taken
//! from the ring of eight cells in front of the face:
//!
//! ```text
//!   top-left   top   top-right
//!   left      [face]     right
//!   left-down  down  right-down
//! ```
//!
//! A corner reads its two sides and its diagonal. Both sides occluding
//! gives 0; otherwise the value is the unoccluded share of the three.
//! Cells outside the chunk are read from the neighbouring chunk; a missing
//! neighbour never occludes.

use rayon::prelude::*;
use strata_shared::{Block, BlockShape, ChunkSize, Direction, IVec3, VoxelTable, AO_CORNERS_PER_BLOCK};

use super::tables::{AO_NEIGHBOR_OFFSETS, AO_RING};

// =============================================================================
// PER-VOXEL LIGHT
// =============================================================================

/// Corner AO of all six faces of one voxel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlockLight {
    /// `direction * 4 + corner`, corners ordered left-down, right-down,
    /// left-top, right-top. 1 is fully lit, 0 fully occluded.
    pub ambient: [f32; AO_CORNERS_PER_BLOCK],
}

impl BlockLight {
    /// All corners at zero, the value of empty voxels.
    pub const DARK: Self = Self {
        ambient: [0.0; AO_CORNERS_PER_BLOCK],
    };

    /// The four corners of one face.
    #[inline]
    #[must_use]
    pub fn face(&self, direction: Direction) -> [f32; 4] {
        let base = direction.index() * 4;
        [
            self.ambient[base],
            self.ambient[base + 1],
            self.ambient[base + 2],
            self.ambient[base + 3],
        ]
    }

    /// Returns true if both voxels light one face identically.
    #[inline]
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn compare_face(&self, other: &Self, direction: Direction) -> bool {
        self.face(direction) == other.face(direction)
    }
}

impl Default for BlockLight {
    fn default() -> Self {
        Self::DARK
    }
}

/// AO of every voxel in a chunk, indexed like the voxel buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct AoBuffer {
    lights: Vec<BlockLight>,
}

impl AoBuffer {
    /// Light of the voxel at a flat index.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> &BlockLight {
        &self.lights[index]
    }

    /// Number of voxels covered.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.lights.len()
    }

    /// Returns true if the buffer covers no voxels.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }
}

// =============================================================================
// NEIGHBOUR GRID
// =============================================================================

/// Read-only voxel buffers of a chunk and its 26 neighbours.
///
/// Slot `(dx + 1) * 9 + (dy + 1) * 3 + (dz + 1)` holds the chunk at offset
/// `(dx, dy, dz)`; the centre slot is always present.
#[derive(Clone, Copy, Debug)]
pub struct NeighborGrid<'a> {
    slots: [Option<&'a [Block]>; 27],
}

impl<'a> NeighborGrid<'a> {
    const CENTER: usize = 13;

    /// Creates a grid holding only the centre chunk.
    #[must_use]
    pub fn new(center: &'a [Block]) -> Self {
        let mut slots = [None; 27];
        slots[Self::CENTER] = Some(center);
        Self { slots }
    }

    /// Installs (or clears) the neighbour at a chunk offset in `[-1, 1]^3`.
    /// Offsets outside that cube are ignored, as is the centre.
    pub fn set(&mut self, offset: IVec3, voxels: Option<&'a [Block]>) {
        if let Some(slot) = Self::slot(offset) {
            if slot != Self::CENTER {
                self.slots[slot] = voxels;
            }
        }
    }

    /// Builder form of [`NeighborGrid::set`].
    #[must_use]
    pub fn with(mut self, offset: IVec3, voxels: &'a [Block]) -> Self {
        self.set(offset, Some(voxels));
        self
    }

    /// Voxels of the chunk at an offset, if present.
    #[inline]
    #[must_use]
    pub fn get(&self, offset: IVec3) -> Option<&'a [Block]> {
        Self::slot(offset).and_then(|slot| self.slots[slot])
    }

    /// The centre chunk's voxels.
    #[inline]
    #[must_use]
    pub fn center(&self) -> &'a [Block] {
        self.slots[Self::CENTER].unwrap_or(&[])
    }

    /// Resolves a centre-local position that may lie in a neighbour.
    ///
    /// Returns `None` when the owning neighbour is absent.
    #[must_use]
    pub fn resolve(&self, size: ChunkSize, grid: IVec3) -> Option<Block> {
        let dims = size.as_ivec3();
        let chunk = IVec3::new(
            grid.x.div_euclid(dims.x),
            grid.y.div_euclid(dims.y),
            grid.z.div_euclid(dims.z),
        );
        let local = IVec3::new(
            grid.x.rem_euclid(dims.x),
            grid.y.rem_euclid(dims.y),
            grid.z.rem_euclid(dims.z),
        );
        self.get(chunk)
            .and_then(|voxels| size.try_index(local).and_then(|i| voxels.get(i)))
            .copied()
    }

    #[inline]
    #[allow(clippy::cast_sign_loss)]
    fn slot(offset: IVec3) -> Option<usize> {
        let in_range = |v: i32| (-1..=1).contains(&v);
        if in_range(offset.x) && in_range(offset.y) && in_range(offset.z) {
            Some(((offset.x + 1) * 9 + (offset.y + 1) * 3 + (offset.z + 1)) as usize)
        } else {
            None
        }
    }
}

// =============================================================================
// SOLVER
// =============================================================================

/// Computes an [`AoBuffer`] for one chunk.
#[derive(Clone, Copy, Debug)]
pub struct LightingSolver<'t> {
    table: &'t VoxelTable,
}

impl<'t> LightingSolver<'t> {
    /// Creates a solver over a descriptor table.
    #[must_use]
    pub const fn new(table: &'t VoxelTable) -> Self {
        Self { table }
    }

    /// Computes AO for every voxel of the centre chunk.
    ///
    /// Work is split into one x-slab per rayon task; each task writes only
    /// its own slab.
    #[must_use]
    pub fn compute(&self, grid: &NeighborGrid<'_>, size: ChunkSize) -> AoBuffer {
        let center = grid.center();
        let mut lights = vec![BlockLight::DARK; size.volume()];
        let slab = size.y * size.z;
        if slab == 0 || center.len() != size.volume() {
            tracing::warn!("lighting skipped: buffer of {} voxels for size {:?}", center.len(), size);
            return AoBuffer { lights };
        }

        lights.par_chunks_mut(slab).enumerate().for_each(|(x, out)| {
            for (offset, light) in out.iter_mut().enumerate() {
                let index = x * slab + offset;
                if self.table.shape(center[index].block_type) == BlockShape::Empty {
                    continue;
                }
                let position = size.position(index);
                for direction in Direction::ALL {
                    let corners = self.face_ao(grid, size, position, direction);
                    let base = direction.index() * 4;
                    light.ambient[base..base + 4].copy_from_slice(&corners);
                }
            }
        });

        AoBuffer { lights }
    }

    /// AO of the four corners of one face.
    #[must_use]
    pub fn face_ao(
        &self,
        grid: &NeighborGrid<'_>,
        size: ChunkSize,
        position: IVec3,
        direction: Direction,
    ) -> [f32; 4] {
        let front = position.offset_axis(direction.aligned_z(), direction.sign());
        let (ax, ay) = (direction.aligned_x(), direction.aligned_y());

        let mut occluded = [false; 8];
        for (slot, &(dx, dy)) in occluded.iter_mut().zip(AO_RING.iter()) {
            let sample = front.offset_axis(ax, dx).offset_axis(ay, dy);
            *slot = self.occludes(grid, size, sample);
        }

        let mut corners = [0.0; 4];
        for (corner, [side1, diagonal, side2]) in corners.iter_mut().zip(AO_NEIGHBOR_OFFSETS) {
            *corner = corner_ao(occluded[side1], occluded[diagonal], occluded[side2]);
        }
        corners
    }

    #[inline]
    fn occludes(&self, grid: &NeighborGrid<'_>, size: ChunkSize, sample: IVec3) -> bool {
        grid.resolve(size, sample)
            .is_some_and(|block| self.table.is_occluder(block.block_type))
    }
}

/// AO of one corner from its two sides and its diagonal.
#[inline]
#[must_use]
pub fn corner_ao(side1: bool, diagonal: bool, side2: bool) -> f32 {
    if side1 && side2 {
        return 0.0;
    }
    let lit = [side1, diagonal, side2].iter().filter(|&&occluded| !occluded).count();
    match lit {
        3 => 1.0,
        2 => 2.0 / 3.0,
        1 => 1.0 / 3.0,
        _ => 0.0,
    }
}

//! Greedy meshing.
//!
//! Reduces the quad count by merging adjacent faces that look identical.
//!
//! ## Algorithm
//!
//! 1. For each of the six directions:
//! 2. Sweep layers along the direction's depth axis; inside a layer walk
//!    aligned X, then aligned Y, skipping cells already covered
//! 3. A visible face grows along aligned Y while the next cell has the
//!    same type, colour and face AO, then along aligned X one full column
//!    at a time
//! 4. Emit one quad for the rectangle into its material bucket
//!
//! Directions are independent, so each sweep runs as its own rayon task
//! and the six partial meshes are concatenated in direction order.

use rayon::prelude::*;
use strata_shared::{Block, BlockShape, ChunkSize, Direction, IVec3, VoxelTable};

use super::lighting::{AoBuffer, BlockLight};
use super::mesh::{ChunkMesh, MeshBucket};
use super::tables::{
    CUBE_CROSS_INDICES, CUBE_FACES, CUBE_FLIPPED_INDICES, CUBE_INDICES, CUBE_UVS, CUBE_VERTICES,
};

/// Liquid surfaces sit this far below the voxel top.
const LIQUID_DROP: f32 = 0.13;
/// Cross shapes sink this far into the ground.
const FOLIAGE_DROP: f32 = 0.04;
/// Cross shapes sample one quarter of their texture sheet.
const FOLIAGE_TILE: f32 = 0.25;

/// Builds a [`ChunkMesh`] from voxels and their AO.
#[derive(Clone, Copy, Debug)]
pub struct MeshBuilder<'t> {
    table: &'t VoxelTable,
    greedy: bool,
}

/// Per-sweep inputs.
struct Sweep<'a> {
    voxels: &'a [Block],
    ao: &'a AoBuffer,
    size: ChunkSize,
    direction: Direction,
}

impl<'t> MeshBuilder<'t> {
    /// Creates a merging builder.
    #[must_use]
    pub const fn new(table: &'t VoxelTable) -> Self {
        Self { table, greedy: true }
    }

    /// Creates a builder that emits one quad per visible face.
    #[must_use]
    pub const fn unmerged(table: &'t VoxelTable) -> Self {
        Self { table, greedy: false }
    }

    /// Meshes one chunk.
    #[must_use]
    pub fn build(&self, voxels: &[Block], ao: &AoBuffer, size: ChunkSize) -> ChunkMesh {
        if voxels.len() != size.volume() || ao.len() != size.volume() {
            tracing::warn!(
                "mesh skipped: {} voxels, {} lights for size {:?}",
                voxels.len(),
                ao.len(),
                size
            );
            return ChunkMesh::new();
        }

        let partials: Vec<ChunkMesh> = Direction::ALL
            .par_iter()
            .map(|&direction| {
                self.sweep(&Sweep {
                    voxels,
                    ao,
                    size,
                    direction,
                })
            })
            .collect();

        let mut mesh = ChunkMesh::new();
        for partial in partials {
            mesh.append(partial);
        }
        tracing::trace!(
            "meshed {} faces ({} triangles)",
            mesh.face_count(),
            mesh.triangle_count()
        );
        mesh
    }

    fn sweep(&self, sweep: &Sweep<'_>) -> ChunkMesh {
        let direction = sweep.direction;
        let (ax, ay, az) = (direction.aligned_x(), direction.aligned_y(), direction.aligned_z());
        let (nx, ny, nz) = (sweep.size.axis(ax), sweep.size.axis(ay), sweep.size.axis(az));

        let mut mesh = ChunkMesh::new();
        let mut visited = vec![false; nx * ny];

        for depth in 0..nz {
            visited.fill(false);
            for x in 0..nx {
                let mut y = 0;
                while y < ny {
                    let position = IVec3::ZERO
                        .with_axis(ax, to_i32(x))
                        .with_axis(ay, to_i32(y))
                        .with_axis(az, to_i32(depth));
                    let index = sweep.size.index(position);
                    let block = sweep.voxels[index];
                    let shape = self.table.shape(block.block_type);

                    if visited[x * ny + y] || !self.emits(sweep, position, shape) {
                        y += 1;
                        continue;
                    }
                    visited[x * ny + y] = true;

                    let light = sweep.ao.get(index);
                    let (width, height) = if self.greedy && shape != BlockShape::Foliage {
                        self.grow(sweep, &mut visited, (x, y, depth), block, light)
                    } else {
                        (1, 1)
                    };

                    match shape {
                        BlockShape::Block | BlockShape::Transparent => {
                            self.add_face(&mut mesh, sweep, block, light, position, width, height);
                        }
                        BlockShape::Liquid => add_liquid(&mut mesh, block, position, width, height),
                        BlockShape::Foliage => add_cross(&mut mesh, block, position),
                        BlockShape::Empty => {}
                    }

                    y += height;
                }
            }
        }

        mesh
    }

    /// Grows a rectangle from `(x, y)` in layer `depth`, marking covered
    /// cells visited. Returns `(width, height)` in aligned axes.
    fn grow(
        &self,
        sweep: &Sweep<'_>,
        visited: &mut [bool],
        (x, y, depth): (usize, usize, usize),
        block: Block,
        light: &BlockLight,
    ) -> (usize, usize) {
        let direction = sweep.direction;
        let (ax, ay, az) = (direction.aligned_x(), direction.aligned_y(), direction.aligned_z());
        let (nx, ny) = (sweep.size.axis(ax), sweep.size.axis(ay));
        let layer = IVec3::ZERO.with_axis(az, to_i32(depth));

        let matches = |visited: &[bool], px: usize, py: usize| -> bool {
            if visited[px * ny + py] {
                return false;
            }
            let position = layer.with_axis(ax, to_i32(px)).with_axis(ay, to_i32(py));
            let index = sweep.size.index(position);
            let next = sweep.voxels[index];
            next.block_type == block.block_type
                && next.color == block.color
                && sweep.ao.get(index).compare_face(light, direction)
                && self.emits(sweep, position, self.table.shape(next.block_type))
        };

        let mut height = 1;
        while y + height < ny && matches(visited, x, y + height) {
            visited[x * ny + y + height] = true;
            height += 1;
        }

        let mut width = 1;
        while x + width < nx && (0..height).all(|dy| matches(visited, x + width, y + dy)) {
            for dy in 0..height {
                visited[(x + width) * ny + y + dy] = true;
            }
            width += 1;
        }

        (width, height)
    }

    /// Returns true if this voxel emits geometry for the sweep direction.
    fn emits(&self, sweep: &Sweep<'_>, position: IVec3, shape: BlockShape) -> bool {
        let direction = sweep.direction;
        match shape {
            BlockShape::Empty => return false,
            BlockShape::Liquid | BlockShape::Foliage if direction != Direction::Top => return false,
            _ => {}
        }

        let neighbor = self.block_at(sweep, position + direction.offset());
        if neighbor.is_some_and(|n| self.table.is_occluder(n.block_type)) {
            return false;
        }

        if shape == BlockShape::Liquid {
            let above = neighbor.map(|n| self.table.shape(n.block_type));
            return above != Some(BlockShape::Liquid);
        }

        true
    }

    #[inline]
    fn block_at(&self, sweep: &Sweep<'_>, position: IVec3) -> Option<Block> {
        sweep.size.try_index(position).map(|i| sweep.voxels[i])
    }

    /// One quad of a cube face, scaled over the grown rectangle.
    #[allow(clippy::too_many_arguments)]
    fn add_face(
        &self,
        mesh: &mut ChunkMesh,
        sweep: &Sweep<'_>,
        block: Block,
        light: &BlockLight,
        position: IVec3,
        width: usize,
        height: usize,
    ) {
        let direction = sweep.direction;
        let d = direction.index();
        let (ax, ay) = (direction.aligned_x(), direction.aligned_y());
        let (w, h) = (to_f32(width), to_f32(height));
        let origin = to_vec(position);
        let normal = to_vec(direction.offset());
        let atlas = self.table.lookup(block.block_type).atlas_uv(direction);
        let [r, g, b] = block.color.rgb_f32();
        let ao = light.face(direction);

        let base = mesh.allocate(1);
        for (i, &corner) in ao.iter().enumerate() {
            let mut vertex = CUBE_VERTICES[CUBE_FACES[d * 4 + i]];
            vertex[ax] *= w;
            vertex[ay] *= h;
            let uv = CUBE_UVS[i];
            mesh.push_vertex(
                add(vertex, origin),
                normal,
                [uv[0] * w, uv[1] * h, f32::from(atlas.x), f32::from(atlas.y)],
                [r, g, b, corner],
            );
        }

        let indices = if ao[0] + ao[3] < ao[1] + ao[2] {
            &CUBE_FLIPPED_INDICES[d * 6..d * 6 + 6]
        } else {
            &CUBE_INDICES[d * 6..d * 6 + 6]
        };
        let bucket = if self.table.shape(block.block_type) == BlockShape::Transparent {
            MeshBucket::Transparent
        } else {
            MeshBucket::Block
        };
        mesh.push_indices(bucket, base, indices);
    }
}

/// Liquid top surface over the grown rectangle.
fn add_liquid(mesh: &mut ChunkMesh, block: Block, position: IVec3, width: usize, height: usize) {
    let top = Direction::Top.index();
    let origin = add(to_vec(position), [0.0, -LIQUID_DROP, 0.0]);
    let [r, g, b] = block.color.rgb_f32();

    let base = mesh.allocate(1);
    for i in 0..4 {
        let mut vertex = CUBE_VERTICES[CUBE_FACES[top * 4 + i]];
        vertex[0] *= to_f32(width);
        vertex[2] *= to_f32(height);
        mesh.push_vertex(add(vertex, origin), [0.0, 1.0, 0.0], [1.0, 1.0, 0.0, 0.0], [r, g, b, 1.0]);
    }
    mesh.push_indices(MeshBucket::Liquid, base, &CUBE_FLIPPED_INDICES[top * 6..top * 6 + 6]);
}

/// Two diagonal planes through the voxel.
fn add_cross(mesh: &mut ChunkMesh, block: Block, position: IVec3) {
    let origin = add(to_vec(position), [0.0, -FOLIAGE_DROP, 0.0]);
    let [r, g, b] = block.color.rgb_f32();

    let base = mesh.allocate(2);
    for (i, &corner) in CUBE_FACES.iter().take(8).enumerate() {
        let [u, v] = CUBE_UVS[i % 4];
        let normal = if i < 4 { [0.7, 0.0, 0.7] } else { [-0.7, 0.0, 0.7] };
        mesh.push_vertex(
            add(CUBE_VERTICES[corner], origin),
            normal,
            [u * FOLIAGE_TILE, 1.0 - v * FOLIAGE_TILE, 0.0, 0.0],
            [r, g, b, 1.0],
        );
    }
    mesh.push_indices(MeshBucket::Foliage, base, &CUBE_CROSS_INDICES);
}

#[inline]
fn add(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

#[inline]
#[allow(clippy::cast_precision_loss)]
fn to_vec(v: IVec3) -> [f32; 3] {
    [v.x as f32, v.y as f32, v.z as f32]
}

#[inline]
#[allow(clippy::cast_precision_loss)]
fn to_f32(v: usize) -> f32 {
    v as f32
}

#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn to_i32(v: usize) -> i32 {
    v as i32
}

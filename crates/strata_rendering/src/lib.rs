//! # STRATA Rendering
//!
//! CPU side of chunk rendering: ambient occlusion and greedy meshing.
//!
//! ## Pipeline
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │  Voxels + 26 neighbours → LightingSolver → AoBuffer       │
//! │                                 ↓                         │
//! │  Voxels + AoBuffer → MeshBuilder → ChunkMesh (4 buckets)  │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules
//!
//! - Neighbour chunks are only read, never written
//! - Merging never changes the set of visible faces
//! - Output is plain arrays; any GPU API can upload them
//!
//! ## Example
//!
//! ```
//! use strata_rendering::{LightingSolver, MeshBuilder, NeighborGrid};
//! use strata_shared::{Block, BlockType, ChunkSize, Rgba8, VoxelTable};
//!
//! let table = VoxelTable::standard();
//! let size = ChunkSize::new(2, 2, 2);
//! let voxels = vec![Block::new(BlockType::Stone, Rgba8::WHITE); size.volume()];
//!
//! let ao = LightingSolver::new(&table).compute(&NeighborGrid::new(&voxels), size);
//! let mesh = MeshBuilder::new(&table).build(&voxels, &ao, size);
//! assert_eq!(mesh.face_count(), 6);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod voxel;

pub use voxel::{
    AoBuffer, BlockLight, ChunkMesh, LightingSolver, MeshBucket, MeshBuilder, NeighborGrid,
};

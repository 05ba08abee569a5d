//! Voxel lighting and meshing.
//!
//! Lighting runs first and produces one [`BlockLight`] per voxel. The mesher
//! reads those values to shade vertices and to decide which faces may merge.

mod greedy_mesh;
mod lighting;
mod mesh;
pub mod tables;

pub use greedy_mesh::MeshBuilder;
pub use lighting::{corner_ao, AoBuffer, BlockLight, LightingSolver, NeighborGrid};
pub use mesh::{ChunkMesh, MeshBucket};

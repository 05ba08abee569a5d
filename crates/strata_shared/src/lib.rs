//! # STRATA Shared
//!
//! Common types used by terrain generation, lighting, meshing and the
//! world scheduler.
//!
//! ## Contents
//!
//! - `block`: block types, shape classes, per-voxel colour
//! - `table`: packed 64-bit block descriptors and the `VoxelTable`
//! - `math`: integer/float vectors, chunk coordinates and sizes
//! - `direction`: the six face directions and their aligned axes
//!
//! ## CRITICAL RULE
//!
//! This crate must stay free of generation and meshing logic. If a type is
//! only needed by one stage, it belongs in that stage's crate.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod block;
pub mod constants;
pub mod direction;
pub mod error;
pub mod math;
pub mod table;

pub use block::{Block, BlockShape, BlockType, Rgba8};
pub use constants::{AO_CORNERS_PER_BLOCK, ATLAS_SIZE, DEFAULT_CHUNK_SIZE, FACES_PER_BLOCK};
pub use direction::Direction;
pub use error::{TableResult, VoxelTableError};
pub use math::{ChunkCoord, ChunkSize, IVec3, Vec3};
pub use table::{AtlasUv, BlockDefinition, BlockDescriptor, VoxelTable};

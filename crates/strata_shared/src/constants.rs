//! # World Constants
//!
//! Values shared by every stage of the voxel pipeline.

use crate::math::ChunkSize;

/// Default chunk dimensions (width x height x depth).
pub const DEFAULT_CHUNK_SIZE: ChunkSize = ChunkSize::new(16, 128, 16);

/// Number of cells per texture atlas axis.
///
/// Atlas coordinates are packed into 4 bits per axis.
pub const ATLAS_SIZE: u8 = 16;

/// Number of faces on a cube.
pub const FACES_PER_BLOCK: usize = 6;

/// Number of AO corners stored per voxel (6 faces x 4 corners).
pub const AO_CORNERS_PER_BLOCK: usize = FACES_PER_BLOCK * 4;

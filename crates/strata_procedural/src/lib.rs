//! # STRATA Procedural Generation
//!
//! Deterministic terrain for an unbounded, reproducible voxel world.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed always produces the same chunk
//! 2. **Chunked**: The world is generated one fixed-size chunk at a time
//! 3. **Pure**: `TerrainGenerator::generate` reads nothing but its inputs
//!
//! ## Core Components
//!
//! - `SimplexNoise`: 2D/3D noise generation
//! - `BiomeClassifier`: Voronoi biome cells and their tint
//! - `TerrainGenerator`: base, carve and decoration passes
//!
//! ## Example
//!
//! ```rust
//! use strata_procedural::{TerrainConfig, TerrainGenerator};
//! use strata_shared::{BlockType, ChunkCoord, ChunkSize};
//!
//! let generator = TerrainGenerator::new(TerrainConfig::default());
//! let size = ChunkSize::new(16, 128, 16);
//! let voxels = generator.generate(ChunkCoord::new(0, 0, 0), size);
//!
//! // The floor is always bedrock.
//! assert_eq!(voxels[0].block_type, BlockType::Bedrock);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod biome;
pub mod noise;
pub mod terrain;

pub use biome::{Biome, BiomeClassifier};
pub use noise::{SimplexNoise, WorldSeed};
pub use terrain::{TerrainConfig, TerrainGenerator};

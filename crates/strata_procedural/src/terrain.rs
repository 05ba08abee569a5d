//! # Terrain Generation
//!
//! Fills one chunk's flat voxel buffer in three ordered passes:
//!
//! 1. **Base**: column rules from a fractal height field (bedrock, stone,
//!    dirt/grass on land, sand/sandstone in lake basins, water, air).
//! 2. **Carve**: a 3D noise field clears `Stone` voxels to `Air`.
//! 3. **Decorate**: surface `GrassDirt` grows trees or grass tufts.
//!
//! Generation is a pure function of `(seed, chunk coordinate, chunk size)`.
//! Base and carve run in parallel over voxels; decoration is sequential
//! because trees write into neighbouring columns.
//!
//! ## Randomness
//!
//! Every coin flip draws from a `ChaCha8Rng` seeded with the world seed
//! plus `index + |world|²` of the voxel asking. Every gate (tree, tuft,
//! cave) is a seeded simplex field. There is no other random source.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use strata_shared::{Block, BlockType, ChunkCoord, ChunkSize, IVec3, Rgba8};

use crate::biome::BiomeClassifier;
use crate::noise::{SimplexNoise, WorldSeed};

/// Terrain tuning. Every field has a default; TOML may override any subset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// World seed.
    pub seed: u64,
    /// Sea level. Columns whose surface is at or below it are lake basins.
    pub water_level: i32,
    /// Bedrock reaches up to a random height in `[0, bedrock_band)`.
    pub bedrock_band: i32,
    /// Frequency of the cave field.
    pub cave_scale: f64,
    /// Stone is carved where the clamped cave field exceeds this.
    pub cave_threshold: f64,
    /// Basin columns turn sandy where the sand field exceeds this.
    pub sand_threshold: f64,
    /// Trees never root within this many voxels of a chunk border.
    pub tree_margin: i32,
    /// Frequency of the tree gate.
    pub tree_scale: f64,
    /// Trees grow where the clamped tree gate exceeds this.
    pub tree_threshold: f64,
    /// Grass tufts never grow within this many voxels of a chunk border.
    pub grass_margin: i32,
    /// Tufts are eligible where the clamped grass gate exceeds this.
    pub grass_threshold: f64,
    /// Voronoi cells per voxel for biome tint.
    pub biome_scale: f64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            seed: WorldSeed::default().value(),
            water_level: 55,
            bedrock_band: 5,
            cave_scale: 0.15,
            cave_threshold: 0.8,
            sand_threshold: 0.2,
            tree_margin: 3,
            tree_scale: 0.45,
            tree_threshold: 0.88,
            grass_margin: 1,
            grass_threshold: 0.5,
            biome_scale: 0.005,
        }
    }
}

/// Per-column values shared by every voxel of the column.
#[derive(Clone, Copy, Debug)]
struct Column {
    height: i32,
    sandy: bool,
    tint: Rgba8,
}

/// Deterministic chunk generator.
///
/// # Example
///
/// ```rust
/// use strata_procedural::{TerrainConfig, TerrainGenerator};
/// use strata_shared::{ChunkCoord, ChunkSize};
///
/// let generator = TerrainGenerator::new(TerrainConfig::default());
/// let size = ChunkSize::new(8, 96, 8);
/// let voxels = generator.generate(ChunkCoord::new(0, 0, 0), size);
/// assert_eq!(voxels.len(), size.volume());
/// ```
pub struct TerrainGenerator {
    config: TerrainConfig,
    height_noise: SimplexNoise,
    cave_noise: SimplexNoise,
    tree_noise: SimplexNoise,
    grass_noise: SimplexNoise,
    biomes: BiomeClassifier,
}

impl TerrainGenerator {
    /// Creates a generator.
    #[must_use]
    pub fn new(config: TerrainConfig) -> Self {
        let seed = WorldSeed::new(config.seed);
        Self {
            height_noise: SimplexNoise::new(seed.derive(1)),
            cave_noise: SimplexNoise::new(seed.derive(2)),
            tree_noise: SimplexNoise::new(seed.derive(3)),
            grass_noise: SimplexNoise::new(seed.derive(4)),
            biomes: BiomeClassifier::new(seed, config.biome_scale),
            config,
        }
    }

    /// Active configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Generates the voxel buffer of one chunk.
    #[must_use]
    pub fn generate(&self, coord: ChunkCoord, size: ChunkSize) -> Vec<Block> {
        let origin = coord.origin(size);
        let columns = self.columns(origin, size);

        let mut blocks = vec![Block::AIR; size.volume()];

        // Pass 1: base
        blocks.par_iter_mut().enumerate().for_each(|(index, block)| {
            let grid = size.position(index);
            let world = origin + grid;
            let column = columns[column_index(size, grid)];
            let bedrock_roll = self.voxel_rng(index, world).gen_range(0..self.config.bedrock_band.max(1));
            let block_type = self.column_block(world.y, column.height, column.sandy, bedrock_roll);
            *block = Block::new(block_type, column.tint);
        });

        // Pass 2: carve
        blocks.par_iter_mut().enumerate().for_each(|(index, block)| {
            if block.block_type == BlockType::Stone {
                let world = origin + size.position(index);
                if self.is_cave(world) {
                    *block = Block::AIR;
                }
            }
        });

        // Pass 3: decorate
        self.decorate(&mut blocks, coord, size);

        tracing::trace!("generated chunk {} ({} voxels)", coord, blocks.len());
        blocks
    }

    /// Surface height of a world column.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn surface_height(&self, x: i32, z: i32) -> i32 {
        let (x, z) = (f64::from(x), f64::from(z));
        let n = &self.height_noise;
        let raw = n.fractal(x + 9.0, z + 0.5, 0.008, 2) * 5.0
            + n.fractal(x + 0.2, z + 7.5, 0.022, 3) * 4.5
            + n.fractal(x + 5.3, z + 0.2, 0.001, 4) * 30.0;
        raw.floor() as i32 + self.config.water_level
    }

    /// Biome tint of a world column. Used to colour placed blocks.
    #[inline]
    #[must_use]
    pub fn tint_at(&self, x: i32, z: i32) -> Rgba8 {
        self.biomes.tint(f64::from(x), f64::from(z))
    }

    /// The base-pass column rule.
    ///
    /// `height` is the column's surface, `sandy` whether a basin column
    /// takes the sand layering, `bedrock_roll` the voxel's random bedrock
    /// ceiling.
    #[must_use]
    pub fn column_block(&self, y: i32, height: i32, sandy: bool, bedrock_roll: i32) -> BlockType {
        let water_level = self.config.water_level;
        let basin = height <= water_level;

        if y <= 0 || y < bedrock_roll {
            BlockType::Bedrock
        } else if basin && y >= height - 5 && y <= height {
            if sandy {
                if y >= height - 3 {
                    BlockType::Sand
                } else {
                    BlockType::SandStone
                }
            } else if y > height - 3 {
                if y == height && y >= water_level {
                    BlockType::GrassDirt
                } else {
                    BlockType::Dirt
                }
            } else {
                BlockType::Stone
            }
        } else if y < height - 3 {
            BlockType::Stone
        } else if basin && y <= water_level {
            BlockType::Water
        } else if y < height {
            BlockType::Dirt
        } else if y == height && y > water_level {
            BlockType::GrassDirt
        } else {
            BlockType::Air
        }
    }

    /// Decoration pass over an already filled buffer.
    ///
    /// Writes that would leave the buffer are dropped, so trees near a
    /// border may be clipped but never spill.
    pub fn decorate(&self, blocks: &mut [Block], coord: ChunkCoord, size: ChunkSize) {
        let origin = coord.origin(size);
        let dims = size.as_ivec3();
        let cfg = &self.config;

        let candidates: Vec<usize> = blocks
            .iter()
            .enumerate()
            .filter(|(_, block)| block.block_type == BlockType::GrassDirt)
            .map(|(index, _)| index)
            .collect();

        let mut trees = 0usize;
        let mut tufts = 0usize;
        for index in candidates {
            // An earlier tree may have covered this voxel.
            let base = blocks[index];
            if base.block_type != BlockType::GrassDirt {
                continue;
            }
            let grid = size.position(index);
            let world = origin + grid;
            let mut rng = self.voxel_rng(index, world);
            let (wx, wz) = (f64::from(world.x), f64::from(world.z));

            if inside_margin(grid, dims, cfg.tree_margin)
                && self.tree_noise.clamped(wx, wz, cfg.tree_scale) > cfg.tree_threshold
            {
                let height = if rng.gen_bool(0.5) { 6 } else { 7 };
                plant_tree(blocks, size, grid, height, base.color);
                trees += 1;
            } else if inside_margin(grid, dims, cfg.grass_margin)
                && self.grass_noise.clamped(wx + 10.0, wz + 2.0, cfg.tree_scale) > cfg.grass_threshold
                && rng.gen_bool(0.5)
            {
                let above = grid + IVec3::UP;
                if let Some(slot) = size.try_index(above) {
                    if blocks[slot].is_air() {
                        blocks[slot] = Block::new(BlockType::Grass, base.color);
                        tufts += 1;
                    }
                }
            }
        }

        if trees + tufts > 0 {
            tracing::trace!("decorated chunk {}: {} trees, {} tufts", coord, trees, tufts);
        }
    }

    fn columns(&self, origin: IVec3, size: ChunkSize) -> Vec<Column> {
        (0..size.x * size.z)
            .into_par_iter()
            .map(|i| {
                let (x, z) = (i / size.z, i % size.z);
                let grid = IVec3::new(to_i32(x), 0, to_i32(z));
                let world = origin + grid;
                let (wx, wz) = (f64::from(world.x), f64::from(world.z));
                Column {
                    height: self.surface_height(world.x, world.z),
                    sandy: self.height_noise.fractal(wx + 0.2, wz + 7.5, 0.02, 3)
                        > self.config.sand_threshold,
                    tint: self.biomes.tint(wx, wz),
                }
            })
            .collect()
    }

    fn is_cave(&self, world: IVec3) -> bool {
        self.cave_noise.clamped3(
            f64::from(world.x),
            f64::from(world.y),
            f64::from(world.z),
            self.config.cave_scale,
        ) > self.config.cave_threshold
    }

    #[allow(clippy::cast_sign_loss)]
    fn voxel_rng(&self, index: usize, world: IVec3) -> ChaCha8Rng {
        let mix = (index as u64).wrapping_add(world.length_squared() as u64);
        ChaCha8Rng::seed_from_u64(self.config.seed.wrapping_add(mix))
    }
}

/// Stamps a tree rooted on the grass voxel at `root`.
fn plant_tree(blocks: &mut [Block], size: ChunkSize, root: IVec3, height: i32, color: Rgba8) {
    let leaves = Block::new(BlockType::OakLeaves, color);
    let log = Block::new(BlockType::OakLog, color);

    for dx in -2..=2 {
        for dz in -2..=2 {
            place(blocks, size, root + IVec3::new(dx, height - 3, dz), leaves);
            place(blocks, size, root + IVec3::new(dx, height - 2, dz), leaves);
        }
    }
    for dx in -1..=1 {
        for dz in -1..=1 {
            place(blocks, size, root + IVec3::new(dx, height - 1, dz), leaves);
        }
    }
    for d in -1..=1 {
        place(blocks, size, root + IVec3::new(d, height, 0), leaves);
        place(blocks, size, root + IVec3::new(0, height, d), leaves);
    }
    for y in 1..height {
        place(blocks, size, root + IVec3::new(0, y, 0), log);
    }
}

#[inline]
fn place(blocks: &mut [Block], size: ChunkSize, grid: IVec3, block: Block) {
    if let Some(index) = size.try_index(grid) {
        blocks[index] = block;
    }
}

#[inline]
fn inside_margin(grid: IVec3, dims: IVec3, margin: i32) -> bool {
    grid.x > margin && grid.x < dims.x - margin && grid.z > margin && grid.z < dims.z - margin
}

#[inline]
#[allow(clippy::cast_sign_loss)]
fn column_index(size: ChunkSize, grid: IVec3) -> usize {
    grid.x as usize * size.z + grid.z as usize
}

#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn to_i32(value: usize) -> i32 {
    value as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> TerrainGenerator {
        TerrainGenerator::new(TerrainConfig::default())
    }

    #[test]
    fn test_basin_column_fills_with_water() {
        let terrain = generator();
        for sandy in [false, true] {
            for y in 51..=55 {
                assert_eq!(terrain.column_block(y, 50, sandy, 0), BlockType::Water, "y = {y}");
            }
            assert_eq!(terrain.column_block(56, 50, sandy, 0), BlockType::Air);
            for y in 1..128 {
                let block = terrain.column_block(y, 50, sandy, 0);
                if y > 55 {
                    assert_ne!(block, BlockType::GrassDirt);
                }
            }
        }
    }

    #[test]
    fn test_basin_surface_layers() {
        let terrain = generator();
        assert_eq!(terrain.column_block(50, 50, true, 0), BlockType::Sand);
        assert_eq!(terrain.column_block(47, 50, true, 0), BlockType::Sand);
        assert_eq!(terrain.column_block(46, 50, true, 0), BlockType::SandStone);
        assert_eq!(terrain.column_block(45, 50, true, 0), BlockType::SandStone);
        assert_eq!(terrain.column_block(44, 50, true, 0), BlockType::Stone);

        assert_eq!(terrain.column_block(50, 50, false, 0), BlockType::Dirt);
        assert_eq!(terrain.column_block(48, 50, false, 0), BlockType::Dirt);
        assert_eq!(terrain.column_block(47, 50, false, 0), BlockType::Stone);
    }

    #[test]
    fn test_shore_column_at_water_level_is_grass() {
        let terrain = generator();
        assert_eq!(terrain.column_block(55, 55, false, 0), BlockType::GrassDirt);
        assert_eq!(terrain.column_block(56, 55, false, 0), BlockType::Air);
    }

    #[test]
    fn test_dry_land_column() {
        let terrain = generator();
        assert_eq!(terrain.column_block(70, 70, false, 0), BlockType::GrassDirt);
        assert_eq!(terrain.column_block(69, 70, false, 0), BlockType::Dirt);
        assert_eq!(terrain.column_block(67, 70, false, 0), BlockType::Dirt);
        assert_eq!(terrain.column_block(66, 70, false, 0), BlockType::Stone);
        assert_eq!(terrain.column_block(71, 70, false, 0), BlockType::Air);
        // Dry land never takes the sand layering.
        assert_eq!(terrain.column_block(70, 70, true, 0), BlockType::GrassDirt);
    }

    #[test]
    fn test_bedrock_floor() {
        let terrain = generator();
        assert_eq!(terrain.column_block(0, 70, false, 0), BlockType::Bedrock);
        assert_eq!(terrain.column_block(-3, 70, false, 0), BlockType::Bedrock);
        assert_eq!(terrain.column_block(3, 70, false, 4), BlockType::Bedrock);
        assert_eq!(terrain.column_block(4, 70, false, 4), BlockType::Stone);
    }

    #[test]
    fn test_generate_is_deterministic() {
        let terrain = generator();
        let size = ChunkSize::new(8, 80, 8);
        let coord = ChunkCoord::new(3, 0, -2);
        assert_eq!(terrain.generate(coord, size), terrain.generate(coord, size));
    }

    #[test]
    fn test_air_is_transparent_after_generation() {
        let terrain = generator();
        let size = ChunkSize::new(8, 128, 8);
        for block in terrain.generate(ChunkCoord::new(0, 0, 0), size) {
            if block.is_air() {
                assert_eq!(block.color, Rgba8::TRANSPARENT);
            }
        }
    }

    #[test]
    fn test_floor_is_bedrock() {
        let terrain = generator();
        let size = ChunkSize::new(4, 64, 4);
        let blocks = terrain.generate(ChunkCoord::new(0, 0, 0), size);
        for x in 0..4 {
            for z in 0..4 {
                let index = size.index(IVec3::new(x, 0, z));
                assert_eq!(blocks[index].block_type, BlockType::Bedrock);
            }
        }
    }

    fn grass_plateau(size: ChunkSize, surface: i32) -> Vec<Block> {
        let mut blocks = vec![Block::AIR; size.volume()];
        let dims = size.as_ivec3();
        for x in 0..dims.x {
            for z in 0..dims.z {
                for y in 0..=surface {
                    let block_type = if y == surface { BlockType::GrassDirt } else { BlockType::Dirt };
                    blocks[size.index(IVec3::new(x, y, z))] = Block::new(block_type, Rgba8::WHITE);
                }
            }
        }
        blocks
    }

    #[test]
    fn test_trees_respect_border_margin() {
        let terrain = TerrainGenerator::new(TerrainConfig {
            tree_threshold: -1.0,
            grass_threshold: -1.0,
            ..TerrainConfig::default()
        });
        let size = ChunkSize::new(8, 16, 8);
        let mut blocks = grass_plateau(size, 5);
        terrain.decorate(&mut blocks, ChunkCoord::new(0, 0, 0), size);

        for (index, block) in blocks.iter().enumerate() {
            let grid = size.position(index);
            if block.block_type == BlockType::OakLog {
                assert_eq!((grid.x, grid.z), (4, 4), "trunk outside margin at {grid:?}");
            }
        }
        // The column at (1, 5, 1) may only carry a tuft.
        let above = blocks[size.index(IVec3::new(1, 6, 1))].block_type;
        assert!(matches!(above, BlockType::Grass | BlockType::Air | BlockType::OakLeaves));
        assert_ne!(above, BlockType::OakLog);
    }

    #[test]
    fn test_tree_shape() {
        let terrain = TerrainGenerator::new(TerrainConfig {
            tree_threshold: -1.0,
            grass_threshold: 2.0,
            ..TerrainConfig::default()
        });
        let size = ChunkSize::new(8, 16, 8);
        let mut blocks = grass_plateau(size, 5);
        terrain.decorate(&mut blocks, ChunkCoord::new(0, 0, 0), size);

        let at = |x, y, z| blocks[size.index(IVec3::new(x, y, z))].block_type;
        let trunk: Vec<i32> = (6..16).filter(|&y| at(4, y, 4) == BlockType::OakLog).collect();
        assert!(trunk.len() == 5 || trunk.len() == 6, "trunk {trunk:?}");
        let top = 5 + i32::try_from(trunk.len()).unwrap_or(0) + 1;
        assert_eq!(at(4, top, 4), BlockType::OakLeaves);
        assert_eq!(at(2, top - 2, 2), BlockType::OakLeaves);
        assert_eq!(at(6, top - 3, 6), BlockType::OakLeaves);
        assert_eq!(at(5, top, 5), BlockType::Air);
        assert_eq!(at(4, 5, 4), BlockType::GrassDirt);
    }

    #[test]
    fn test_clipped_tree_near_top_does_not_panic() {
        let terrain = TerrainGenerator::new(TerrainConfig {
            tree_threshold: -1.0,
            ..TerrainConfig::default()
        });
        let size = ChunkSize::new(8, 14, 8);
        let mut blocks = grass_plateau(size, 11);
        terrain.decorate(&mut blocks, ChunkCoord::new(0, 0, 0), size);
        assert_eq!(blocks.len(), size.volume());
        assert_eq!(blocks[size.index(IVec3::new(4, 12, 4))].block_type, BlockType::OakLog);
    }

    #[test]
    fn test_no_decoration_when_gates_closed() {
        let terrain = TerrainGenerator::new(TerrainConfig {
            tree_threshold: 2.0,
            grass_threshold: 2.0,
            ..TerrainConfig::default()
        });
        let size = ChunkSize::new(8, 16, 8);
        let mut blocks = grass_plateau(size, 5);
        let before = blocks.clone();
        terrain.decorate(&mut blocks, ChunkCoord::new(0, 0, 0), size);
        assert_eq!(blocks, before);
    }

    #[test]
    fn test_tint_matches_generated_colour() {
        let terrain = generator();
        let size = ChunkSize::new(4, 128, 4);
        let coord = ChunkCoord::new(1, 0, 1);
        let blocks = terrain.generate(coord, size);
        let origin = coord.origin(size);
        let bottom = blocks[size.index(IVec3::new(2, 0, 3))];
        assert_eq!(bottom.color, terrain.tint_at(origin.x + 2, origin.z + 3));
    }
}

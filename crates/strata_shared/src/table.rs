//! # Voxel Table
//!
//! Per-block-type descriptors packed into one `u64` each, so the hot
//! loops of lighting and meshing read a single word per voxel.
//!
//! ## Packed layout
//!
//! ```text
//! bit 63        56 55      48 47    40 39    32 31    24 23    16 15     8 7      0
//!    [   shape    ][ hardness ][ right ][ left  ][  top  ][bottom ][ front ][ back  ]
//! ```
//!
//! Each face byte is an atlas cell: `(x & 0xF) << 4 | (y & 0xF)`.
//!
//! The table is built once at startup and is read-only afterwards.

use serde::{Deserialize, Serialize};

use crate::block::{BlockShape, BlockType};
use crate::constants::{ATLAS_SIZE, FACES_PER_BLOCK};
use crate::direction::Direction;
use crate::error::{TableResult, VoxelTableError};

/// Atlas cell coordinate (4 bits per axis).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AtlasUv {
    /// Column.
    pub x: u8,
    /// Row.
    pub y: u8,
}

impl AtlasUv {
    /// Creates an atlas coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Packs into one byte.
    #[inline]
    #[must_use]
    pub const fn pack(self) -> u8 {
        ((self.x & 0xF) << 4) | (self.y & 0xF)
    }

    /// Unpacks from one byte.
    #[inline]
    #[must_use]
    pub const fn unpack(byte: u8) -> Self {
        Self::new((byte >> 4) & 0xF, byte & 0xF)
    }
}

/// Packed descriptor of one block type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BlockDescriptor(u64);

impl BlockDescriptor {
    /// Descriptor of a type with no definition: `Empty`, hardness 0.
    pub const EMPTY: Self = Self(0);

    const SHAPE_SHIFT: u32 = 56;
    const HARDNESS_SHIFT: u32 = 48;
    const FIRST_FACE_SHIFT: u32 = 40;

    /// Packs shape, hardness and the six face atlas cells.
    #[must_use]
    pub const fn pack(shape: BlockShape, hardness: u8, atlas: [AtlasUv; FACES_PER_BLOCK]) -> Self {
        let mut data = (shape as u64) << Self::SHAPE_SHIFT;
        data |= (hardness as u64) << Self::HARDNESS_SHIFT;
        let mut face = 0;
        while face < FACES_PER_BLOCK {
            let shift = Self::FIRST_FACE_SHIFT - 8 * face as u32;
            data |= (atlas[face].pack() as u64) << shift;
            face += 1;
        }
        Self(data)
    }

    /// Raw packed word.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Shape class.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn shape(self) -> BlockShape {
        match BlockShape::from_u8((self.0 >> Self::SHAPE_SHIFT) as u8) {
            Some(shape) => shape,
            None => BlockShape::Empty,
        }
    }

    /// Mining hardness.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn hardness(self) -> u8 {
        (self.0 >> Self::HARDNESS_SHIFT) as u8
    }

    /// Atlas cell of one face.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn atlas_uv(self, direction: Direction) -> AtlasUv {
        let shift = (5 - direction.index() as u32) * 8;
        AtlasUv::unpack((self.0 >> shift) as u8)
    }
}

/// One block definition record, as loaded from data files.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDefinition {
    /// Block type this record describes.
    pub block: BlockType,
    /// Shape class.
    pub shape: BlockShape,
    /// Mining hardness (0-255).
    #[serde(default)]
    pub hardness: u8,
    /// Atlas cell per face: right, left, top, bottom, front, back.
    pub atlas: Vec<[u8; 2]>,
}

impl BlockDefinition {
    /// Creates a definition with the same atlas cell on every face.
    #[must_use]
    pub fn uniform(block: BlockType, shape: BlockShape, hardness: u8, atlas: [u8; 2]) -> Self {
        Self {
            block,
            shape,
            hardness,
            atlas: vec![atlas; FACES_PER_BLOCK],
        }
    }
}

#[derive(Deserialize)]
struct DefinitionFile {
    #[serde(rename = "block", default)]
    blocks: Vec<BlockDefinition>,
}

/// Read-only descriptor table indexed by block type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoxelTable {
    descriptors: [BlockDescriptor; BlockType::COUNT],
}

impl VoxelTable {
    /// Builds the table from a set of definitions.
    ///
    /// Types without a definition keep the `Empty` descriptor.
    ///
    /// # Errors
    ///
    /// Returns an error on any malformed definition: wrong atlas count,
    /// atlas coordinate out of range, duplicate type, or non-empty `Air`.
    pub fn build<I>(definitions: I) -> TableResult<Self>
    where
        I: IntoIterator<Item = BlockDefinition>,
    {
        let mut descriptors = [BlockDescriptor::EMPTY; BlockType::COUNT];
        let mut defined = [false; BlockType::COUNT];

        for definition in definitions {
            let block = definition.block;
            if definition.atlas.len() != FACES_PER_BLOCK {
                return Err(VoxelTableError::AtlasCount {
                    block,
                    found: definition.atlas.len(),
                });
            }
            if defined[block.index()] {
                return Err(VoxelTableError::Duplicate(block));
            }
            if block == BlockType::Air && definition.shape != BlockShape::Empty {
                return Err(VoxelTableError::AirNotEmpty);
            }

            let mut atlas = [AtlasUv::default(); FACES_PER_BLOCK];
            for (slot, &[x, y]) in atlas.iter_mut().zip(&definition.atlas) {
                if x >= ATLAS_SIZE || y >= ATLAS_SIZE {
                    return Err(VoxelTableError::AtlasOutOfRange { block, x, y });
                }
                *slot = AtlasUv::new(x, y);
            }

            descriptors[block.index()] =
                BlockDescriptor::pack(definition.shape, definition.hardness, atlas);
            defined[block.index()] = true;
        }

        for block in BlockType::ALL.into_iter().skip(1) {
            if !defined[block.index()] {
                tracing::warn!("no definition for {:?}, treating it as empty", block);
            }
        }

        Ok(Self { descriptors })
    }

    /// Parses a TOML `[[block]]` list and builds the table.
    ///
    /// # Errors
    ///
    /// Returns [`VoxelTableError::Parse`] for malformed TOML or unknown
    /// names, and any validation error from [`VoxelTable::build`].
    pub fn from_toml_str(source: &str) -> TableResult<Self> {
        let file: DefinitionFile =
            toml::from_str(source).map_err(|e| VoxelTableError::Parse(e.to_string()))?;
        tracing::info!("loaded {} block definitions", file.blocks.len());
        Self::build(file.blocks)
    }

    /// The built-in table covering every block type.
    #[must_use]
    pub fn standard() -> Self {
        let mut descriptors = [BlockDescriptor::EMPTY; BlockType::COUNT];
        for (block, shape, hardness, atlas) in STANDARD_BLOCKS {
            let atlas = atlas.map(|[x, y]| AtlasUv::new(x, y));
            descriptors[block.index()] = BlockDescriptor::pack(shape, hardness, atlas);
        }
        Self { descriptors }
    }

    /// The built-in definitions as data records.
    #[must_use]
    pub fn standard_definitions() -> Vec<BlockDefinition> {
        STANDARD_BLOCKS
            .iter()
            .map(|&(block, shape, hardness, atlas)| BlockDefinition {
                block,
                shape,
                hardness,
                atlas: atlas.to_vec(),
            })
            .collect()
    }

    /// Descriptor lookup, O(1).
    #[inline]
    #[must_use]
    pub fn lookup(&self, block: BlockType) -> BlockDescriptor {
        self.descriptors[block.index()]
    }

    /// Shape class lookup.
    #[inline]
    #[must_use]
    pub fn shape(&self, block: BlockType) -> BlockShape {
        self.lookup(block).shape()
    }

    /// Returns true if voxels of this type occlude their neighbours.
    #[inline]
    #[must_use]
    pub fn is_occluder(&self, block: BlockType) -> bool {
        self.shape(block).is_occluder()
    }
}

impl Default for VoxelTable {
    fn default() -> Self {
        Self::standard()
    }
}

type StandardBlock = (BlockType, BlockShape, u8, [[u8; 2]; FACES_PER_BLOCK]);

/// Face order: right, left, top, bottom, front, back.
const STANDARD_BLOCKS: [StandardBlock; BlockType::COUNT] = [
    (BlockType::Air, BlockShape::Empty, 0, [[0, 0]; 6]),
    (BlockType::Dirt, BlockShape::Block, 5, [[2, 0]; 6]),
    (BlockType::GrassDirt, BlockShape::Block, 6, [[3, 0], [3, 0], [0, 0], [2, 0], [3, 0], [3, 0]]),
    (BlockType::Stone, BlockShape::Block, 15, [[1, 0]; 6]),
    (BlockType::Sand, BlockShape::Block, 5, [[2, 1]; 6]),
    (BlockType::SandStone, BlockShape::Block, 8, [[0, 11], [0, 11], [0, 12], [0, 13], [0, 11], [0, 11]]),
    (BlockType::Bedrock, BlockShape::Block, 255, [[1, 1]; 6]),
    (BlockType::CoalOre, BlockShape::Block, 30, [[2, 2]; 6]),
    (BlockType::IronOre, BlockShape::Block, 35, [[1, 2]; 6]),
    (BlockType::GoldOre, BlockShape::Block, 40, [[0, 2]; 6]),
    (BlockType::DiamondOre, BlockShape::Block, 50, [[2, 3]; 6]),
    (BlockType::Water, BlockShape::Liquid, 0, [[13, 12]; 6]),
    (BlockType::Glowstone, BlockShape::Block, 3, [[9, 6]; 6]),
    (BlockType::OakLog, BlockShape::Block, 10, [[4, 1], [4, 1], [5, 1], [5, 1], [4, 1], [4, 1]]),
    (BlockType::OakPlanks, BlockShape::Block, 10, [[4, 0]; 6]),
    (BlockType::OakLeaves, BlockShape::Transparent, 2, [[4, 3]; 6]),
    (BlockType::Foliage, BlockShape::Foliage, 0, [[7, 2]; 6]),
    (BlockType::Grass, BlockShape::Foliage, 0, [[7, 2]; 6]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_packing_layout() {
        let atlas = [
            AtlasUv::new(1, 2),
            AtlasUv::new(3, 4),
            AtlasUv::new(5, 6),
            AtlasUv::new(7, 8),
            AtlasUv::new(9, 10),
            AtlasUv::new(11, 12),
        ];
        let descriptor = BlockDescriptor::pack(BlockShape::Liquid, 200, atlas);

        assert_eq!(descriptor.raw() >> 56, BlockShape::Liquid as u64);
        assert_eq!((descriptor.raw() >> 48) & 0xFF, 200);
        assert_eq!((descriptor.raw() >> 40) & 0xFF, 0x12);
        assert_eq!(descriptor.raw() & 0xFF, 0xBC);
        assert_eq!(descriptor.shape(), BlockShape::Liquid);
        assert_eq!(descriptor.hardness(), 200);
        for (face, direction) in Direction::ALL.into_iter().enumerate() {
            assert_eq!(descriptor.atlas_uv(direction), atlas[face]);
        }
    }

    #[test]
    fn test_standard_table_matches_definitions() {
        let built = VoxelTable::build(VoxelTable::standard_definitions());
        assert_eq!(built, Ok(VoxelTable::standard()));
    }

    #[test]
    fn test_air_is_empty() {
        let table = VoxelTable::standard();
        assert_eq!(table.shape(BlockType::Air), BlockShape::Empty);
        assert_eq!(table.shape(BlockType::Water), BlockShape::Liquid);
        assert_eq!(table.shape(BlockType::OakLeaves), BlockShape::Transparent);
        assert_eq!(table.shape(BlockType::Grass), BlockShape::Foliage);
        assert!(table.is_occluder(BlockType::Stone));
        assert!(!table.is_occluder(BlockType::Water));
    }

    #[test]
    fn test_rejects_wrong_atlas_count() {
        let mut definition = BlockDefinition::uniform(BlockType::Stone, BlockShape::Block, 1, [0, 0]);
        definition.atlas.pop();
        assert_eq!(
            VoxelTable::build([definition]),
            Err(VoxelTableError::AtlasCount {
                block: BlockType::Stone,
                found: 5
            })
        );
    }

    #[test]
    fn test_rejects_duplicates() {
        let definition = BlockDefinition::uniform(BlockType::Dirt, BlockShape::Block, 1, [0, 0]);
        assert_eq!(
            VoxelTable::build([definition.clone(), definition]),
            Err(VoxelTableError::Duplicate(BlockType::Dirt))
        );
    }

    #[test]
    fn test_rejects_solid_air() {
        let definition = BlockDefinition::uniform(BlockType::Air, BlockShape::Block, 0, [0, 0]);
        assert_eq!(VoxelTable::build([definition]), Err(VoxelTableError::AirNotEmpty));
    }

    #[test]
    fn test_rejects_atlas_out_of_range() {
        let definition = BlockDefinition::uniform(BlockType::Sand, BlockShape::Block, 0, [16, 0]);
        assert!(matches!(
            VoxelTable::build([definition]),
            Err(VoxelTableError::AtlasOutOfRange { x: 16, .. })
        ));
    }

    #[test]
    fn test_missing_types_are_empty() {
        let table = VoxelTable::build([BlockDefinition::uniform(
            BlockType::Stone,
            BlockShape::Block,
            15,
            [1, 0],
        )])
        .unwrap();
        assert_eq!(table.shape(BlockType::Stone), BlockShape::Block);
        assert_eq!(table.shape(BlockType::Dirt), BlockShape::Empty);
    }

    #[test]
    fn test_from_toml() {
        let source = r#"
            [[block]]
            block = "Stone"
            shape = "Block"
            hardness = 15
            atlas = [[1, 0], [1, 0], [1, 0], [1, 0], [1, 0], [1, 0]]

            [[block]]
            block = "Water"
            shape = "Liquid"
            atlas = [[13, 12], [13, 12], [13, 12], [13, 12], [13, 12], [13, 12]]
        "#;
        let table = VoxelTable::from_toml_str(source).unwrap();
        assert_eq!(table.shape(BlockType::Water), BlockShape::Liquid);
        assert_eq!(table.lookup(BlockType::Stone).hardness(), 15);
        assert_eq!(table.lookup(BlockType::Water).hardness(), 0);
    }

    #[test]
    fn test_from_toml_rejects_unknown_block() {
        let source = r#"
            [[block]]
            block = "Obsidian"
            shape = "Block"
            atlas = [[0, 0], [0, 0], [0, 0], [0, 0], [0, 0], [0, 0]]
        "#;
        assert!(matches!(
            VoxelTable::from_toml_str(source),
            Err(VoxelTableError::Parse(_))
        ));
    }
}

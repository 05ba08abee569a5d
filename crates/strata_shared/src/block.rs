//! Block types and per-voxel data.
//!
//! A voxel is a [`Block`]: a material ([`BlockType`]) plus a baked biome
//! tint. How a material is drawn and whether it hides its neighbours is
//! decided by its [`BlockShape`], looked up through the `VoxelTable`.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Voxel material.
///
/// `Air` is the empty sentinel. The discriminant doubles as the index into
/// the descriptor table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum BlockType {
    /// Empty space.
    #[default]
    Air = 0,
    /// Plain dirt.
    Dirt = 1,
    /// Dirt with a grass top, the dry-land surface block.
    GrassDirt = 2,
    /// Stone.
    Stone = 3,
    /// Sand, found in lake basins.
    Sand = 4,
    /// Compacted sand under the sand layer.
    SandStone = 5,
    /// Indestructible floor.
    Bedrock = 6,
    /// Coal ore.
    CoalOre = 7,
    /// Iron ore.
    IronOre = 8,
    /// Gold ore.
    GoldOre = 9,
    /// Diamond ore.
    DiamondOre = 10,
    /// Water.
    Water = 11,
    /// Glowstone.
    Glowstone = 12,
    /// Tree trunk.
    OakLog = 13,
    /// Crafted planks.
    OakPlanks = 14,
    /// Tree canopy.
    OakLeaves = 15,
    /// Generic foliage.
    Foliage = 16,
    /// Grass tuft decoration, drawn as a cross.
    Grass = 17,
}

impl BlockType {
    /// Number of block types.
    pub const COUNT: usize = 18;

    /// Every block type in discriminant order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Air,
        Self::Dirt,
        Self::GrassDirt,
        Self::Stone,
        Self::Sand,
        Self::SandStone,
        Self::Bedrock,
        Self::CoalOre,
        Self::IronOre,
        Self::GoldOre,
        Self::DiamondOre,
        Self::Water,
        Self::Glowstone,
        Self::OakLog,
        Self::OakPlanks,
        Self::OakLeaves,
        Self::Foliage,
        Self::Grass,
    ];

    /// Returns the table index of this type.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Converts from u8, returning `None` for unknown ids.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        if (value as usize) < Self::COUNT {
            Some(Self::ALL[value as usize])
        } else {
            None
        }
    }
}

/// Shape class of a block type.
///
/// Governs meshing (which bucket, which geometry) and occlusion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum BlockShape {
    /// Nothing to draw, never occludes.
    #[default]
    Empty = 0,
    /// Opaque cube.
    Block = 1,
    /// Cube with alpha-tested texture (leaves). Still occludes.
    Transparent = 2,
    /// Cross-shaped decoration. Never occludes.
    Foliage = 3,
    /// Fluid surface. Never occludes.
    Liquid = 4,
}

impl BlockShape {
    /// Converts from the packed shape byte.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Empty),
            1 => Some(Self::Block),
            2 => Some(Self::Transparent),
            3 => Some(Self::Foliage),
            4 => Some(Self::Liquid),
            _ => None,
        }
    }

    /// Returns true if a voxel of this shape hides the faces and darkens
    /// the corners of its neighbours.
    #[inline]
    #[must_use]
    pub const fn is_occluder(self) -> bool {
        !matches!(self, Self::Empty | Self::Foliage | Self::Liquid)
    }
}

/// 8-bit RGBA colour.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Fully transparent black. The colour of every `Air` voxel.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque white, the neutral tint.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    /// Creates a colour.
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Returns the RGB channels normalised to `[0, 1]`.
    #[inline]
    #[must_use]
    pub fn rgb_f32(self) -> [f32; 3] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        ]
    }
}

/// A single voxel.
///
/// Invariant: an `Air` block always carries [`Rgba8::TRANSPARENT`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Block {
    /// Material.
    pub block_type: BlockType,
    /// Baked biome tint.
    pub color: Rgba8,
}

impl Block {
    /// The empty voxel.
    pub const AIR: Self = Self {
        block_type: BlockType::Air,
        color: Rgba8::TRANSPARENT,
    };

    /// Creates a block. `Air` always gets a transparent colour.
    #[inline]
    #[must_use]
    pub const fn new(block_type: BlockType, color: Rgba8) -> Self {
        let color = if matches!(block_type, BlockType::Air) {
            Rgba8::TRANSPARENT
        } else {
            color
        };
        Self { block_type, color }
    }

    /// Returns true if this is an air block.
    #[inline]
    #[must_use]
    pub const fn is_air(self) -> bool {
        matches!(self.block_type, BlockType::Air)
    }
}

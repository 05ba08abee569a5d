//! # Block Table Errors
//!
//! Everything that can go wrong while building the `VoxelTable`.
//! All of these are startup-time failures.

use thiserror::Error;

use crate::block::BlockType;

/// Errors raised while building a `VoxelTable` from block definitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VoxelTableError {
    /// A definition did not list exactly one atlas slot per face.
    #[error("block {block:?}: expected 6 atlas entries, found {found}")]
    AtlasCount {
        /// Offending block type.
        block: BlockType,
        /// Number of entries supplied.
        found: usize,
    },

    /// An atlas coordinate does not fit the 4-bit packing.
    #[error("block {block:?}: atlas coordinate ({x}, {y}) out of range")]
    AtlasOutOfRange {
        /// Offending block type.
        block: BlockType,
        /// Supplied X.
        x: u8,
        /// Supplied Y.
        y: u8,
    },

    /// Two definitions target the same block type.
    #[error("block {0:?} defined more than once")]
    Duplicate(BlockType),

    /// `Air` must always be `Empty`.
    #[error("air must have the Empty shape")]
    AirNotEmpty,

    /// The TOML document could not be parsed.
    #[error("invalid block definition file: {0}")]
    Parse(String),
}

/// Result type for table construction.
pub type TableResult<T> = Result<T, VoxelTableError>;

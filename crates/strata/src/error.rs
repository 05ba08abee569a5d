//! # World Errors
//!
//! Startup failures of the world. Once a `WorldScheduler` is running,
//! nothing it does returns an error: rejected edits return `false`,
//! missing neighbours are transparent, and overrun budgets force a join.

use thiserror::Error;

use strata_shared::VoxelTableError;

/// Errors raised while configuring or starting a world.
#[derive(Error, Debug)]
pub enum WorldError {
    /// The configuration file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// File that failed.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration document is not valid TOML for `WorldConfig`.
    #[error("invalid world config: {0}")]
    Parse(String),

    /// A configuration value is out of range.
    #[error("invalid world config: {field} {reason}")]
    InvalidConfig {
        /// Offending key.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// The block definition table is malformed.
    #[error(transparent)]
    Table(#[from] VoxelTableError),

    /// A worker thread could not be started.
    #[error("failed to spawn worker {index}: {source}")]
    WorkerSpawn {
        /// Worker number.
        index: usize,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type for world setup.
pub type WorldResult<T> = Result<T, WorldError>;

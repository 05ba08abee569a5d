//! # World Configuration
//!
//! Every knob of the streaming world, loaded once at startup from TOML.
//! All keys are optional; a missing key keeps its default.
//!
//! ```toml
//! spawn_radius = 8
//! max_generate_per_tick = 1
//!
//! [budgets]
//! generation = 4
//!
//! [terrain]
//! seed = 42
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use strata_procedural::TerrainConfig;
use strata_shared::{ChunkSize, DEFAULT_CHUNK_SIZE};

use crate::error::{WorldError, WorldResult};

/// Per-phase tick budgets.
///
/// A phase is polled once per tick and force-joined once it has been
/// pending for more than its budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseBudgets {
    /// Terrain generation.
    pub generation: u32,
    /// Ambient occlusion.
    pub lighting: u32,
    /// Greedy meshing.
    pub meshing: u32,
}

impl Default for PhaseBudgets {
    fn default() -> Self {
        Self {
            generation: 4,
            lighting: 3,
            meshing: 4,
        }
    }
}

/// Collision batching.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColliderConfig {
    /// Flush once this many meshes are waiting.
    pub batch_size: usize,
    /// Flush once the oldest mesh has waited this many ticks.
    pub max_wait_ticks: u32,
    /// Tick budget of one bake.
    pub bake_budget: u32,
}

impl Default for ColliderConfig {
    fn default() -> Self {
        Self {
            batch_size: 5,
            max_wait_ticks: 4,
            bake_budget: 4,
        }
    }
}

/// Configuration of a `WorldScheduler`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Voxels per chunk.
    pub chunk_size: ChunkSize,
    /// Horizontal streaming radius in chunks (square).
    pub spawn_radius: i32,
    /// Vertical streaming radius in chunk rows.
    pub vertical_radius: i32,
    /// Requests dequeued into generation per tick.
    pub max_generate_per_tick: usize,
    /// Throttle on chunks meshing at once.
    pub max_concurrent: usize,
    /// Registered chunks beyond this horizontal radius are evicted.
    pub eviction_radius: Option<i32>,
    /// Worker threads in the job pool.
    pub workers: usize,
    /// Capacity of the world event channel.
    pub event_capacity: usize,
    /// Per-phase tick budgets.
    pub budgets: PhaseBudgets,
    /// Collision batching.
    pub collider: ColliderConfig,
    /// Terrain generation.
    pub terrain: TerrainConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            spawn_radius: 8,
            vertical_radius: 0,
            max_generate_per_tick: 1,
            max_concurrent: 1,
            eviction_radius: None,
            workers: 2,
            event_capacity: 1024,
            budgets: PhaseBudgets::default(),
            collider: ColliderConfig::default(),
            terrain: TerrainConfig::default(),
        }
    }
}

impl WorldConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Parse`] for malformed TOML and
    /// [`WorldError::InvalidConfig`] for out-of-range values.
    pub fn from_toml_str(source: &str) -> WorldResult<Self> {
        let config: Self = toml::from_str(source).map_err(|e| WorldError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Io`] if the file cannot be read, otherwise as
    /// [`WorldConfig::from_toml_str`].
    pub fn from_file(path: impl AsRef<Path>) -> WorldResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| WorldError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::info!("loaded world config from {}", path.display());
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidConfig`] naming the first bad key.
    pub fn validate(&self) -> WorldResult<()> {
        let invalid = |field, reason| Err(WorldError::InvalidConfig { field, reason });

        if self.chunk_size.volume() == 0 {
            return invalid("chunk_size", "must be non-empty on every axis");
        }
        if self.spawn_radius < 0 {
            return invalid("spawn_radius", "must not be negative");
        }
        if self.vertical_radius < 0 {
            return invalid("vertical_radius", "must not be negative");
        }
        if self.max_generate_per_tick == 0 {
            return invalid("max_generate_per_tick", "must be at least 1");
        }
        if self.workers == 0 {
            return invalid("workers", "must be at least 1");
        }
        if self.event_capacity == 0 {
            return invalid("event_capacity", "must be at least 1");
        }
        if self.collider.batch_size == 0 {
            return invalid("collider.batch_size", "must be at least 1");
        }
        if let Some(radius) = self.eviction_radius {
            if radius < self.spawn_radius {
                return invalid("eviction_radius", "must not be smaller than spawn_radius");
            }
        }
        Ok(())
    }
}

//! # STRATA
//!
//! Streaming voxel world: decides which chunks exist, generates them on
//! worker threads, lights and meshes them once their neighbours are in,
//! and hands finished meshes to collision baking.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          WorldScheduler                             │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │  observer ─> PriorityQueue ─> JobPool: TerrainGenerator             │
//! │                                   │                                 │
//! │                          Chunk: Ready(dirty)                        │
//! │                                   │  8 planar neighbours ready      │
//! │                          JobPool: LightingSolver ─> MeshBuilder     │
//! │                                   │                                 │
//! │              urgent ─> bake inline │ otherwise ─> ColliderSink       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `config`: `WorldConfig` loaded from TOML
//! - `scheduler`: the tick loop and chunk registry
//! - `jobs`: worker pool and tick-budgeted handles
//! - `collider`: collision baking behind the `ColliderSink` trait
//! - `events`: bounded world event channel
//!
//! ## Example
//!
//! ```no_run
//! use strata::{WorldConfig, WorldScheduler};
//! use strata::shared::{Vec3, VoxelTable};
//!
//! let mut world = WorldScheduler::new(WorldConfig::default(), VoxelTable::standard())?;
//! world.on_observer_moved(Vec3::new(8.0, 80.0, 8.0));
//! for _ in 0..100 {
//!     let stats = world.tick();
//!     if stats.pending == 0 && stats.in_flight == 0 {
//!         break;
//!     }
//! }
//! # Ok::<(), strata::WorldError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod chunk;
pub mod collider;
pub mod config;
pub mod error;
pub mod events;
pub mod jobs;
pub mod priority_queue;
pub mod scheduler;

// Re-export the layers below
pub use strata_procedural as procedural;
pub use strata_rendering as rendering;
pub use strata_shared as shared;

pub use chunk::{Chunk, ChunkState};
pub use collider::{BatchedColliderSink, ColliderMesh, ColliderRequest, ColliderSink};
pub use config::{ColliderConfig, PhaseBudgets, WorldConfig};
pub use error::{WorldError, WorldResult};
pub use events::{EventBus, EventReceiver, EventSender, WorldEvent};
pub use jobs::{BudgetedJob, JobHandle, JobPoll, JobPool};
pub use priority_queue::PriorityQueue;
pub use scheduler::{TickStats, WorldScheduler};

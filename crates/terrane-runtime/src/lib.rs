//! Chunk store and generation scheduler.
#![forbid(unsafe_code)]

mod config;
mod error;
mod permits;
mod render;
mod scheduler;
mod terrain;

pub use config::{RuntimeConfig, load_runtime_config};
pub use error::TerrainError;
pub use permits::{GenerationPermits, Permit};
pub use render::{DrawCounts, RenderSink, ViewWindow};
pub use scheduler::{INIT_SCENE_EXTENT, Job, JobKind, JobOut, Runtime};
pub use terrain::{ChunkEntry, EntrySlot, Terrain, TerrainStats, WorldInit};

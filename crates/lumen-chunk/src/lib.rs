//! Chunk voxel and light storage, per-chunk locking, and the chunk store.
#![forbid(unsafe_code)]

mod chunk;
mod light;
mod storage;
mod store;
mod voxel;

pub use chunk::{Chunk, ChunkData, ChunkGuard, ChunkLockError};
pub use light::{LightChannel, MAX_LIGHT, MAX_SUNLIGHT, MAX_SUNLIGHT_REGEN};
pub use storage::LightStorage;
pub use store::{ChunkProvider, ChunkStatus, ChunkStore};
pub use voxel::{Opacity, Voxel};

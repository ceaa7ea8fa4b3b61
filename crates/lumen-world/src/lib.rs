//! Chunk and voxel coordinates, face sides, and world sizing.
#![forbid(unsafe_code)]

mod chunk_coord;
mod config;
mod dims;
mod side;
mod voxel_pos;

pub use chunk_coord::ChunkCoord;
pub use config::WorldConfig;
pub use dims::ChunkDims;
pub use side::Side;
pub use voxel_pos::VoxelPos;

use std::sync::{Mutex, MutexGuard};

use lumen_world::{ChunkCoord, ChunkDims};
use thiserror::Error;

use crate::{LightChannel, LightStorage, Voxel};

/// Voxels and the three light channels of one chunk.
#[derive(Clone, Debug)]
pub struct ChunkData {
    pub coord: ChunkCoord,
    pub dims: ChunkDims,
    voxels: Vec<Voxel>,
    block_light: LightStorage,
    sunlight: LightStorage,
    sunlight_regen: LightStorage,
}

impl ChunkData {
    /// An all-air chunk with every light channel dark.
    pub fn new(coord: ChunkCoord, dims: ChunkDims) -> Self {
        let n = dims.volume();
        Self {
            coord,
            dims,
            voxels: vec![Voxel::AIR; n],
            block_light: LightStorage::uniform(n, 0),
            sunlight: LightStorage::uniform(n, 0),
            sunlight_regen: LightStorage::uniform(n, 0),
        }
    }

    /// Input that does not match `dims` is cut short or padded with air.
    pub fn from_voxels(coord: ChunkCoord, dims: ChunkDims, voxels: Vec<Voxel>) -> Self {
        let mut v = voxels;
        if v.len() != dims.volume() {
            log::warn!(
                target: "chunks",
                "chunk {:?} got {} voxels for {:?} ({} expected); resizing",
                coord,
                v.len(),
                dims,
                dims.volume()
            );
            v.resize(dims.volume(), Voxel::AIR);
        }
        let mut data = Self::new(coord, dims);
        data.voxels = v;
        data
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        self.dims.idx(x, y, z)
    }

    #[inline]
    pub fn voxel(&self, x: usize, y: usize, z: usize) -> Voxel {
        self.voxels[self.idx(x, y, z)]
    }

    #[inline]
    pub fn set_voxel(&mut self, x: usize, y: usize, z: usize, voxel: Voxel) {
        let i = self.idx(x, y, z);
        self.voxels[i] = voxel;
    }

    pub fn fill_voxels(&mut self, voxel: Voxel) {
        self.voxels.fill(voxel);
    }

    #[inline]
    pub fn storage(&self, channel: LightChannel) -> &LightStorage {
        match channel {
            LightChannel::BlockLight => &self.block_light,
            LightChannel::Sunlight => &self.sunlight,
            LightChannel::SunlightRegen => &self.sunlight_regen,
        }
    }

    #[inline]
    fn storage_mut(&mut self, channel: LightChannel) -> &mut LightStorage {
        match channel {
            LightChannel::BlockLight => &mut self.block_light,
            LightChannel::Sunlight => &mut self.sunlight,
            LightChannel::SunlightRegen => &mut self.sunlight_regen,
        }
    }

    #[inline]
    pub fn light(&self, channel: LightChannel, x: usize, y: usize, z: usize) -> u8 {
        self.storage(channel).get(self.idx(x, y, z))
    }

    #[inline]
    pub fn set_light(&mut self, channel: LightChannel, x: usize, y: usize, z: usize, value: u8) {
        let i = self.idx(x, y, z);
        self.storage_mut(channel).set(i, value);
    }

    /// Reset a whole channel to one value.
    pub fn fill_light(&mut self, channel: LightChannel, value: u8) {
        let n = self.dims.volume();
        *self.storage_mut(channel) = LightStorage::uniform(n, value);
    }

    /// Compact the sunlight and regen channels. Returns true if both end up uniform.
    pub fn deflate_sunlight(&mut self) -> bool {
        let sun = self.sunlight.deflate();
        let regen = self.sunlight_regen.deflate();
        sun && regen
    }

    pub fn is_sunlight_deflated(&self) -> bool {
        self.sunlight.is_uniform() && self.sunlight_regen.is_uniform()
    }

    pub fn deflate_all(&mut self) -> bool {
        let block = self.block_light.deflate();
        self.deflate_sunlight() && block
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("chunk {coord:?} lock is poisoned")]
pub struct ChunkLockError {
    pub coord: ChunkCoord,
}

pub type ChunkGuard<'a> = MutexGuard<'a, ChunkData>;

/// A chunk shared between the world and lighting workers. Holding the guard
/// returned by [`Chunk::lock`] is the only way to read or write its data; dropping
/// the guard unlocks it.
#[derive(Debug)]
pub struct Chunk {
    coord: ChunkCoord,
    data: Mutex<ChunkData>,
}

impl Chunk {
    pub fn new(data: ChunkData) -> Self {
        Self {
            coord: data.coord,
            data: Mutex::new(data),
        }
    }

    #[inline]
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    pub fn lock(&self) -> Result<ChunkGuard<'_>, ChunkLockError> {
        self.data
            .lock()
            .map_err(|_| ChunkLockError { coord: self.coord })
    }
}

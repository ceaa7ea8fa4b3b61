#![allow(dead_code)]

use std::sync::Arc;

use lumen_chunk::{Chunk, ChunkData, ChunkProvider, ChunkStatus, ChunkStore, LightChannel, Voxel};
use lumen_lighting::{SkyExposure, light_chunk_interior};
use lumen_world::{ChunkCoord, ChunkDims, VoxelPos};

pub struct TestWorld {
    pub store: Arc<ChunkStore>,
    pub dims: ChunkDims,
}

impl TestWorld {
    pub fn new(dims: ChunkDims) -> Self {
        Self {
            store: Arc::new(ChunkStore::new(dims)),
            dims,
        }
    }

    /// Build a chunk, light its interior, and insert it with `status`.
    pub fn add_with(
        &self,
        coord: (i32, i32, i32),
        sky: SkyExposure,
        status: ChunkStatus,
        f: impl FnOnce(&mut ChunkData),
    ) -> Arc<Chunk> {
        let mut data = ChunkData::new(coord.into(), self.dims);
        f(&mut data);
        light_chunk_interior(&mut data, sky);
        self.store.insert(data, status)
    }

    pub fn add(&self, coord: (i32, i32, i32), f: impl FnOnce(&mut ChunkData)) -> Arc<Chunk> {
        self.add_with(coord, SkyExposure::Covered, ChunkStatus::Ready, f)
    }

    pub fn chunk(&self, coord: (i32, i32, i32)) -> Arc<Chunk> {
        self.store
            .chunk_unready(coord.into())
            .expect("chunk is loaded")
    }

    pub fn light(&self, channel: LightChannel, p: VoxelPos) -> Option<u8> {
        let c = self.store.chunk_unready(p.chunk(self.dims))?;
        let (x, y, z) = p.local(self.dims);
        let g = c.lock().ok()?;
        Some(g.light(channel, x, y, z))
    }

    pub fn voxel(&self, p: VoxelPos) -> Option<Voxel> {
        let c = self.store.chunk_unready(p.chunk(self.dims))?;
        let (x, y, z) = p.local(self.dims);
        let g = c.lock().ok()?;
        Some(g.voxel(x, y, z))
    }

    pub fn set_voxel(&self, p: VoxelPos, v: Voxel) {
        let c = self.chunk(p.chunk(self.dims).into());
        let (x, y, z) = p.local(self.dims);
        c.lock().unwrap().set_voxel(x, y, z, v);
    }

    /// Every light value of every loaded chunk, in coordinate order.
    pub fn snapshot(&self) -> Vec<(ChunkCoord, LightChannel, Vec<u8>)> {
        let mut out = Vec::new();
        for coord in self.store.coords() {
            let c = self.store.chunk_unready(coord).unwrap();
            let g = c.lock().unwrap();
            for ch in LightChannel::ALL {
                out.push((coord, ch, g.storage(ch).iter().collect()));
            }
        }
        out
    }

    /// Global voxel positions covered by chunks `lo..=hi` on every axis.
    pub fn positions(&self, lo: i32, hi: i32) -> Vec<VoxelPos> {
        let (sx, sy, sz) = self.dims.as_i32();
        let mut out = Vec::new();
        for y in lo * sy..(hi + 1) * sy {
            for z in lo * sz..(hi + 1) * sz {
                for x in lo * sx..(hi + 1) * sx {
                    out.push(VoxelPos::new(x, y, z));
                }
            }
        }
        out
    }
}

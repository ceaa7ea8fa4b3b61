use serde::{Deserialize, Serialize};

/// Size of a chunk in voxels along each axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkDims {
    pub sx: usize,
    pub sy: usize,
    pub sz: usize,
}

impl ChunkDims {
    #[inline]
    pub const fn new(sx: usize, sy: usize, sz: usize) -> Self {
        Self { sx, sy, sz }
    }

    #[inline]
    pub const fn cube(size: usize) -> Self {
        Self::new(size, size, size)
    }

    #[inline]
    pub const fn volume(self) -> usize {
        self.sx * self.sy * self.sz
    }

    /// Linear index of a local voxel, y-major then z then x.
    #[inline]
    pub const fn idx(self, x: usize, y: usize, z: usize) -> usize {
        (y * self.sz + z) * self.sx + x
    }

    #[inline]
    pub const fn contains_local(self, x: usize, y: usize, z: usize) -> bool {
        x < self.sx && y < self.sy && z < self.sz
    }

    #[inline]
    pub fn as_i32(self) -> (i32, i32, i32) {
        (self.sx as i32, self.sy as i32, self.sz as i32)
    }
}

impl Default for ChunkDims {
    fn default() -> Self {
        Self::cube(16)
    }
}

use crate::{ChunkCoord, ChunkDims, Side};

/// Global (world-space) voxel position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VoxelPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl VoxelPos {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    #[inline]
    pub fn step(self, side: Side) -> Self {
        let (dx, dy, dz) = side.offset();
        self.offset(dx, dy, dz)
    }

    /// Chunk containing this voxel (floor division, so -1 lands in chunk -1).
    #[inline]
    pub fn chunk(self, dims: ChunkDims) -> ChunkCoord {
        let (sx, sy, sz) = dims.as_i32();
        ChunkCoord::new(
            self.x.div_euclid(sx),
            self.y.div_euclid(sy),
            self.z.div_euclid(sz),
        )
    }

    /// Position inside the containing chunk.
    #[inline]
    pub fn local(self, dims: ChunkDims) -> (usize, usize, usize) {
        let (sx, sy, sz) = dims.as_i32();
        (
            self.x.rem_euclid(sx) as usize,
            self.y.rem_euclid(sy) as usize,
            self.z.rem_euclid(sz) as usize,
        )
    }

    #[inline]
    pub fn from_chunk_local(coord: ChunkCoord, dims: ChunkDims, x: usize, y: usize, z: usize) -> Self {
        let (sx, sy, sz) = dims.as_i32();
        Self::new(
            coord.cx * sx + x as i32,
            coord.cy * sy + y as i32,
            coord.cz * sz + z as i32,
        )
    }
}

impl From<(i32, i32, i32)> for VoxelPos {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

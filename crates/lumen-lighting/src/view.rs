use lumen_chunk::{LightChannel, Voxel};
use lumen_world::VoxelPos;

use crate::Neighborhood;

/// One light channel of a [`Neighborhood`], addressed by global voxel position.
///
/// `None` from [`LocalChunkView::value_at`] means the position is outside the
/// window or in a chunk the view cannot see. Propagation treats it as a wall.
#[derive(Clone, Copy)]
pub struct LocalChunkView<'n> {
    hood: &'n Neighborhood<'n>,
    channel: LightChannel,
}

impl<'n> LocalChunkView<'n> {
    pub fn new(hood: &'n Neighborhood<'n>, channel: LightChannel) -> Self {
        Self { hood, channel }
    }

    #[inline]
    pub fn channel(&self) -> LightChannel {
        self.channel
    }

    #[inline]
    pub fn neighborhood(&self) -> &'n Neighborhood<'n> {
        self.hood
    }

    #[inline]
    pub fn value_at(&self, pos: VoxelPos) -> Option<u8> {
        self.hood.light(pos, self.channel)
    }

    /// No-op outside the visible part of the window.
    #[inline]
    pub fn set_value_at(&self, pos: VoxelPos, value: u8) {
        self.hood.set_light(pos, self.channel, value);
    }

    #[inline]
    pub fn voxel_at(&self, pos: VoxelPos) -> Option<Voxel> {
        self.hood.voxel(pos)
    }

    #[inline]
    pub fn is_opaque(&self, pos: VoxelPos) -> bool {
        self.voxel_at(pos).is_none_or(|v| v.is_opaque())
    }
}

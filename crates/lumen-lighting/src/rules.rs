//! Per-channel light policy: ceiling, decay, blocking, and source values.

use lumen_chunk::{LightChannel, MAX_SUNLIGHT, Voxel};
use lumen_world::{Side, VoxelPos};

use crate::LocalChunkView;

pub trait PropagationRules {
    fn channel(&self) -> LightChannel;

    #[inline]
    fn max_value(&self) -> u8 {
        self.channel().max_value()
    }

    /// Whether light travelling along `side` may enter `voxel`.
    fn is_blocking(&self, voxel: Voxel, side: Side) -> bool;

    /// Value after entering `voxel` travelling along `side`.
    fn decay(&self, value: u8, side: Side, voxel: Voxel) -> u8;

    /// Value the voxel holds on its own, before any flood reaches it.
    fn fixed_value(&self, pos: VoxelPos, voxel: Voxel) -> u8;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct BlockLightRules;

impl PropagationRules for BlockLightRules {
    fn channel(&self) -> LightChannel {
        LightChannel::BlockLight
    }

    fn is_blocking(&self, voxel: Voxel, _side: Side) -> bool {
        voxel.is_opaque()
    }

    fn decay(&self, value: u8, _side: Side, _voxel: Voxel) -> u8 {
        value.saturating_sub(1)
    }

    fn fixed_value(&self, _pos: VoxelPos, voxel: Voxel) -> u8 {
        voxel.luminance.min(self.max_value())
    }
}

/// Depth below open sky. Only flows straight down, one step per voxel, and
/// stops at the first voxel that casts a shadow.
#[derive(Clone, Copy, Debug, Default)]
pub struct SunlightRegenRules;

impl PropagationRules for SunlightRegenRules {
    fn channel(&self) -> LightChannel {
        LightChannel::SunlightRegen
    }

    fn is_blocking(&self, voxel: Voxel, _side: Side) -> bool {
        voxel.casts_shadow()
    }

    fn decay(&self, value: u8, side: Side, _voxel: Voxel) -> u8 {
        match side {
            Side::Down => value.saturating_sub(1),
            _ => 0,
        }
    }

    fn fixed_value(&self, _pos: VoxelPos, _voxel: Voxel) -> u8 {
        0
    }
}

/// Sunlight floods like block light, but any voxel still inside a sky column
/// (regen above zero) is a full-strength source.
#[derive(Clone, Copy)]
pub struct SunlightRules<'n> {
    regen: LocalChunkView<'n>,
}

impl<'n> SunlightRules<'n> {
    pub fn new(regen: LocalChunkView<'n>) -> Self {
        debug_assert_eq!(regen.channel(), LightChannel::SunlightRegen);
        Self { regen }
    }
}

impl PropagationRules for SunlightRules<'_> {
    fn channel(&self) -> LightChannel {
        LightChannel::Sunlight
    }

    fn is_blocking(&self, voxel: Voxel, _side: Side) -> bool {
        voxel.is_opaque()
    }

    fn decay(&self, value: u8, _side: Side, _voxel: Voxel) -> u8 {
        value.saturating_sub(1)
    }

    fn fixed_value(&self, pos: VoxelPos, voxel: Voxel) -> u8 {
        if !voxel.is_opaque() && self.regen.value_at(pos).unwrap_or(0) > 0 {
            MAX_SUNLIGHT
        } else {
            0
        }
    }
}

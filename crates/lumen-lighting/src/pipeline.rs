//! The three propagation stages of a merge and the order they finish in.
//!
//! Sunlight reads regen to decide which voxels are sky sources, so regen has to
//! settle before sunlight floods. [`MergePropagators::finalize`] is the only way
//! to finish the stages and always runs them in [`Stage::ORDER`].

use std::fmt;

use lumen_chunk::LightChannel;

use crate::propagator::{
    BatchPropagator, PropagationStats, StandardBatchPropagator, SunlightRegenPropagator,
};
use crate::rules::{BlockLightRules, SunlightRules};
use crate::{LocalChunkView, Neighborhood};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    BlockLight,
    SunlightRegen,
    Sunlight,
}

impl Stage {
    pub const ORDER: [Stage; 3] = [Stage::BlockLight, Stage::SunlightRegen, Stage::Sunlight];

    #[inline]
    pub fn channel(self) -> LightChannel {
        match self {
            Stage::BlockLight => LightChannel::BlockLight,
            Stage::SunlightRegen => LightChannel::SunlightRegen,
            Stage::Sunlight => LightChannel::Sunlight,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub block: PropagationStats,
    pub regen: PropagationStats,
    pub sunlight: PropagationStats,
}

impl PipelineStats {
    pub fn total(&self) -> usize {
        self.block.total() + self.regen.total() + self.sunlight.total()
    }
}

impl fmt::Display for PipelineStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = |p: &PropagationStats| (p.pulled + p.pushed + p.seeded + p.relaxed, p.updated);
        let (b0, b1) = s(&self.block);
        let (r0, r1) = s(&self.regen);
        let (s0, s1) = s(&self.sunlight);
        write!(
            f,
            "block {}+{} regen {}+{} sun {}+{}",
            b0, b1, r0, r1, s0, s1
        )
    }
}

pub struct MergePropagators<'n> {
    block: StandardBatchPropagator<'n, BlockLightRules>,
    regen: SunlightRegenPropagator<'n>,
    sunlight: StandardBatchPropagator<'n, SunlightRules<'n>>,
}

impl<'n> MergePropagators<'n> {
    pub fn new(hood: &'n Neighborhood<'n>) -> Self {
        let block = StandardBatchPropagator::new(BlockLightRules, hood);
        let regen = SunlightRegenPropagator::new(hood);
        let regen_view = LocalChunkView::new(hood, LightChannel::SunlightRegen);
        let sunlight = StandardBatchPropagator::new(SunlightRules::new(regen_view), hood);
        Self {
            block,
            regen,
            sunlight,
        }
    }

    pub fn stage_mut(&mut self, stage: Stage) -> &mut dyn BatchPropagator {
        match stage {
            Stage::BlockLight => &mut self.block,
            Stage::SunlightRegen => &mut self.regen,
            Stage::Sunlight => &mut self.sunlight,
        }
    }

    pub fn pending(&self) -> usize {
        self.block.pending() + self.regen.pending() + self.sunlight.pending()
    }

    pub fn finalize(self) -> PipelineStats {
        let Self {
            block,
            regen,
            mut sunlight,
        } = self;
        let block = block.process();
        let regen = regen.process(&mut sunlight);
        let sunlight = sunlight.process();
        PipelineStats {
            block,
            regen,
            sunlight,
        }
    }
}

//! Batch flood fill over a neighborhood.
//!
//! A propagator is fed boundary seeds through [`BatchPropagator::propagate_between`]
//! and [`BatchPropagator::seed`], then consumed by `process`, which drains the
//! pending voxels brightest first until nothing improves.

use std::mem;

use hashbrown::HashSet;
use lumen_chunk::LightChannel;
use lumen_world::{Side, VoxelPos};

use crate::neighborhood::face_cells;
use crate::rules::{PropagationRules, SunlightRegenRules, SunlightRules};
use crate::{CENTER_INDEX, LocalChunkView, Neighborhood};

/// Two adjacent slots and the direction of travel from `from` into `to`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkFace {
    pub from: usize,
    pub to: usize,
    pub side: Side,
}

impl ChunkFace {
    /// From the neighbor on `side` into the center.
    pub fn inward(side: Side) -> Self {
        Self {
            from: Neighborhood::index_of_side(side),
            to: CENTER_INDEX,
            side: side.reverse(),
        }
    }

    /// From the center into the neighbor on `side`.
    pub fn outward(side: Side) -> Self {
        Self {
            from: CENTER_INDEX,
            to: Neighborhood::index_of_side(side),
            side,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PropagationStats {
    /// Boundary voxels raised by inward pulls.
    pub pulled: usize,
    /// Boundary voxels raised by outward pushes.
    pub pushed: usize,
    pub seeded: usize,
    /// Voxels raised when a whole chunk was re-checked against its neighbors.
    pub relaxed: usize,
    /// Voxels raised by the flood itself.
    pub updated: usize,
}

impl PropagationStats {
    pub fn total(&self) -> usize {
        self.pulled + self.pushed + self.seeded + self.relaxed + self.updated
    }
}

pub trait BatchPropagator {
    fn channel(&self) -> LightChannel;

    /// Carry light across the shared face of two slots. Only voxels that end up
    /// brighter are written and queued. Nothing happens if `to` is not visible.
    fn propagate_between(&mut self, face: ChunkFace, outward: bool);

    /// Raise a single voxel to `value` if that improves it.
    fn seed(&mut self, pos: VoxelPos, value: u8);

    /// Raise every voxel of a visible slot to what its own source value and
    /// its six neighbors allow. Picks up edits made inside the chunk since it
    /// was last lit, such as a removed block.
    fn relax_chunk(&mut self, slot: usize);

    fn pending(&self) -> usize;
}

/// Pending voxels bucketed by light value. A voxel sits in at most one bucket.
struct BucketQueue {
    buckets: Vec<HashSet<VoxelPos>>,
    len: usize,
    top: usize,
}

impl BucketQueue {
    fn new(max: u8) -> Self {
        Self {
            buckets: (0..=max as usize).map(|_| HashSet::new()).collect(),
            len: 0,
            top: 0,
        }
    }

    fn push(&mut self, pos: VoxelPos, value: u8, prev: u8) {
        let was_pending = self
            .buckets
            .get_mut(prev as usize)
            .is_some_and(|old| old.remove(&pos));
        if was_pending {
            self.len -= 1;
        }
        let v = value as usize;
        if self.buckets[v].insert(pos) {
            self.len += 1;
        }
        self.top = self.top.max(v);
    }

    fn take_top(&mut self) -> Option<(u8, HashSet<VoxelPos>)> {
        while self.top > 0 && self.buckets[self.top].is_empty() {
            self.top -= 1;
        }
        if self.buckets[self.top].is_empty() {
            return None;
        }
        let batch = mem::take(&mut self.buckets[self.top]);
        self.len -= batch.len();
        Some((self.top as u8, batch))
    }
}

/// Single-channel flood fill driven by a rule set.
pub struct StandardBatchPropagator<'n, R> {
    rules: R,
    view: LocalChunkView<'n>,
    queue: BucketQueue,
    stats: PropagationStats,
}

impl<'n, R: PropagationRules> StandardBatchPropagator<'n, R> {
    pub fn new(rules: R, hood: &'n Neighborhood<'n>) -> Self {
        let view = LocalChunkView::new(hood, rules.channel());
        let queue = BucketQueue::new(rules.max_value());
        Self {
            rules,
            view,
            queue,
            stats: PropagationStats::default(),
        }
    }

    #[inline]
    pub fn rules(&self) -> &R {
        &self.rules
    }

    #[inline]
    pub fn view(&self) -> LocalChunkView<'n> {
        self.view
    }

    pub fn stats(&self) -> PropagationStats {
        self.stats
    }

    /// The rule's source value for a visible voxel, 0 elsewhere.
    pub fn fixed_value_at(&self, pos: VoxelPos) -> u8 {
        self.view
            .voxel_at(pos)
            .map_or(0, |v| self.rules.fixed_value(pos, v))
    }

    fn raise(&mut self, pos: VoxelPos, value: u8) -> bool {
        let value = value.min(self.rules.max_value());
        let Some(cur) = self.view.value_at(pos) else {
            return false;
        };
        if value <= cur {
            return false;
        }
        self.view.set_value_at(pos, value);
        self.queue.push(pos, value, cur);
        true
    }

    /// Flood until the queue is empty. `settle` sees every voxel expanded, at
    /// the value it was expanded with.
    fn drain(&mut self, settle: &mut dyn FnMut(VoxelPos, u8)) {
        while let Some((level, batch)) = self.queue.take_top() {
            for pos in batch {
                if self.view.value_at(pos) != Some(level) {
                    continue;
                }
                settle(pos, level);
                for side in Side::ALL {
                    let next = pos.step(side);
                    let Some(voxel) = self.view.voxel_at(next) else {
                        continue;
                    };
                    if self.rules.is_blocking(voxel, side) {
                        continue;
                    }
                    let nv = self.rules.decay(level, side, voxel);
                    if self.raise(next, nv) {
                        self.stats.updated += 1;
                    }
                }
            }
        }
    }

    pub fn process(mut self) -> PropagationStats {
        self.drain(&mut |_, _| {});
        log::trace!(target: "lighting", "{} flood done: {:?}", self.rules.channel().label(), self.stats);
        self.stats
    }
}

impl<R: PropagationRules> BatchPropagator for StandardBatchPropagator<'_, R> {
    fn channel(&self) -> LightChannel {
        self.rules.channel()
    }

    fn propagate_between(&mut self, face: ChunkFace, outward: bool) {
        let hood = self.view.neighborhood();
        if !hood.is_present(face.from) || !hood.is_visible(face.to) {
            return;
        }
        let dims = hood.dims();
        let from_coord = hood.coord_of(face.from);
        let channel = self.rules.channel();
        for local in face_cells(dims, face.side) {
            let Some(v) = hood.slot_light(face.from, channel, local) else {
                continue;
            };
            if v == 0 {
                continue;
            }
            let (x, y, z) = local;
            let q = VoxelPos::from_chunk_local(from_coord, dims, x, y, z).step(face.side);
            debug_assert_eq!(hood.locate(q).map(|(i, _)| i), Some(face.to));
            let Some(voxel) = self.view.voxel_at(q) else {
                continue;
            };
            if self.rules.is_blocking(voxel, face.side) {
                continue;
            }
            let nv = self.rules.decay(v, face.side, voxel);
            if self.raise(q, nv) {
                if outward {
                    self.stats.pushed += 1;
                } else {
                    self.stats.pulled += 1;
                }
            }
        }
    }

    fn seed(&mut self, pos: VoxelPos, value: u8) {
        if self.raise(pos, value) {
            self.stats.seeded += 1;
        }
    }

    fn relax_chunk(&mut self, slot: usize) {
        let hood = self.view.neighborhood();
        if !hood.is_visible(slot) {
            return;
        }
        let dims = hood.dims();
        let coord = hood.coord_of(slot);
        for y in 0..dims.sy {
            for z in 0..dims.sz {
                for x in 0..dims.sx {
                    let pos = VoxelPos::from_chunk_local(coord, dims, x, y, z);
                    let Some(voxel) = self.view.voxel_at(pos) else {
                        continue;
                    };
                    let mut best = self.rules.fixed_value(pos, voxel);
                    for side in Side::ALL {
                        // light arriving at `pos` while travelling along `side`
                        if self.rules.is_blocking(voxel, side) {
                            continue;
                        }
                        if let Some(v) = self.view.value_at(pos.step(side.reverse())) {
                            best = best.max(self.rules.decay(v, side, voxel));
                        }
                    }
                    if self.raise(pos, best) {
                        self.stats.relaxed += 1;
                    }
                }
            }
        }
    }

    fn pending(&self) -> usize {
        self.queue.len
    }
}

/// Regen flood paired with the sunlight propagator it feeds.
///
/// Every voxel the regen flood settles above zero is a sky-exposed voxel, so it
/// seeds sunlight at its fixed value before sunlight itself is processed.
pub struct SunlightRegenPropagator<'n> {
    inner: StandardBatchPropagator<'n, SunlightRegenRules>,
}

impl<'n> SunlightRegenPropagator<'n> {
    pub fn new(hood: &'n Neighborhood<'n>) -> Self {
        Self {
            inner: StandardBatchPropagator::new(SunlightRegenRules, hood),
        }
    }

    pub fn process(
        self,
        sunlight: &mut StandardBatchPropagator<'n, SunlightRules<'n>>,
    ) -> PropagationStats {
        let mut inner = self.inner;
        let mut exposed = 0usize;
        inner.drain(&mut |pos, level| {
            if level == 0 {
                return;
            }
            let fixed = sunlight.fixed_value_at(pos);
            if fixed > 0 {
                sunlight.seed(pos, fixed);
                exposed += 1;
            }
        });
        log::trace!(
            target: "lighting",
            "regen flood done: {:?}, {} sky-exposed voxels",
            inner.stats,
            exposed
        );
        inner.stats
    }
}

impl BatchPropagator for SunlightRegenPropagator<'_> {
    fn channel(&self) -> LightChannel {
        LightChannel::SunlightRegen
    }

    fn propagate_between(&mut self, face: ChunkFace, outward: bool) {
        self.inner.propagate_between(face, outward);
    }

    fn seed(&mut self, pos: VoxelPos, value: u8) {
        self.inner.seed(pos, value);
    }

    fn relax_chunk(&mut self, slot: usize) {
        self.inner.relax_chunk(slot);
    }

    fn pending(&self) -> usize {
        self.inner.pending()
    }
}

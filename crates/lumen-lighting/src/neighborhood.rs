use std::cell::RefCell;

use lumen_chunk::{ChunkData, LightChannel, Voxel};
use lumen_world::{ChunkCoord, ChunkDims, Side, VoxelPos};

/// Slot of the chunk being merged.
pub const CENTER_INDEX: usize = 13;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotKind {
    /// Ready neighbor or the center. Readable and writable through a view.
    Visible,
    /// Face neighbor that is still generating. Only read as the source of an inward pull.
    PullOnly,
}

struct Slot<'n> {
    kind: SlotKind,
    data: RefCell<&'n mut ChunkData>,
}

/// The 3x3x3 block of locked chunks around a merge center.
///
/// Slots are addressed `x+1 + 3*(y+1) + 9*(z+1)` for offsets in `-1..=1`.
/// Every slot borrows chunk data that the caller has already locked, so the
/// neighborhood cannot outlive the locks.
pub struct Neighborhood<'n> {
    center: ChunkCoord,
    dims: ChunkDims,
    slots: [Option<Slot<'n>>; 27],
}

impl<'n> Neighborhood<'n> {
    pub fn new(center: &'n mut ChunkData) -> Self {
        let coord = center.coord;
        let dims = center.dims;
        let mut slots: [Option<Slot<'n>>; 27] = std::array::from_fn(|_| None);
        slots[CENTER_INDEX] = Some(Slot {
            kind: SlotKind::Visible,
            data: RefCell::new(center),
        });
        Self {
            center: coord,
            dims,
            slots,
        }
    }

    /// Add a neighbor. Returns false (and drops the borrow) if it lies outside
    /// the window, would replace the center, or has different dimensions.
    pub fn insert(&mut self, data: &'n mut ChunkData, kind: SlotKind) -> bool {
        if data.dims != self.dims {
            log::warn!(
                target: "lighting",
                "chunk {:?} has dims {:?}, expected {:?}; treating as absent",
                data.coord,
                data.dims,
                self.dims
            );
            return false;
        }
        let Some(idx) = self.slot_for_chunk(data.coord) else {
            return false;
        };
        if idx == CENTER_INDEX {
            return false;
        }
        self.slots[idx] = Some(Slot {
            kind,
            data: RefCell::new(data),
        });
        true
    }

    #[inline]
    pub const fn index(dx: i32, dy: i32, dz: i32) -> usize {
        ((dx + 1) + 3 * (dy + 1) + 9 * (dz + 1)) as usize
    }

    #[inline]
    pub const fn offset_of(idx: usize) -> (i32, i32, i32) {
        let i = idx as i32;
        (i % 3 - 1, (i / 3) % 3 - 1, i / 9 - 1)
    }

    #[inline]
    pub fn index_of_side(side: Side) -> usize {
        let (dx, dy, dz) = side.offset();
        Self::index(dx, dy, dz)
    }

    #[inline]
    pub fn center(&self) -> ChunkCoord {
        self.center
    }

    #[inline]
    pub fn dims(&self) -> ChunkDims {
        self.dims
    }

    pub fn coord_of(&self, idx: usize) -> ChunkCoord {
        let (dx, dy, dz) = Self::offset_of(idx);
        self.center.offset(dx, dy, dz)
    }

    pub fn slot_for_chunk(&self, coord: ChunkCoord) -> Option<usize> {
        let (dx, dy, dz) = (
            coord.cx - self.center.cx,
            coord.cy - self.center.cy,
            coord.cz - self.center.cz,
        );
        if dx.abs() > 1 || dy.abs() > 1 || dz.abs() > 1 {
            return None;
        }
        Some(Self::index(dx, dy, dz))
    }

    #[inline]
    pub fn kind(&self, idx: usize) -> Option<SlotKind> {
        self.slots.get(idx)?.as_ref().map(|s| s.kind)
    }

    #[inline]
    pub fn is_present(&self, idx: usize) -> bool {
        self.kind(idx).is_some()
    }

    #[inline]
    pub fn is_visible(&self, idx: usize) -> bool {
        self.kind(idx) == Some(SlotKind::Visible)
    }

    pub fn present(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn pull_only(&self) -> usize {
        self.slots
            .iter()
            .flatten()
            .filter(|s| s.kind == SlotKind::PullOnly)
            .count()
    }

    /// Slot index and local coordinate of a global voxel, if it lies in the window.
    pub fn locate(&self, pos: VoxelPos) -> Option<(usize, (usize, usize, usize))> {
        let idx = self.slot_for_chunk(pos.chunk(self.dims))?;
        Some((idx, pos.local(self.dims)))
    }

    /// Light read straight from a slot, regardless of its kind.
    pub(crate) fn slot_light(
        &self,
        idx: usize,
        channel: LightChannel,
        (x, y, z): (usize, usize, usize),
    ) -> Option<u8> {
        let slot = self.slots[idx].as_ref()?;
        Some(slot.data.borrow().light(channel, x, y, z))
    }

    fn visible(&self, idx: usize) -> Option<&Slot<'n>> {
        self.slots[idx]
            .as_ref()
            .filter(|s| s.kind == SlotKind::Visible)
    }

    pub(crate) fn light(&self, pos: VoxelPos, channel: LightChannel) -> Option<u8> {
        let (idx, (x, y, z)) = self.locate(pos)?;
        let slot = self.visible(idx)?;
        Some(slot.data.borrow().light(channel, x, y, z))
    }

    pub(crate) fn set_light(&self, pos: VoxelPos, channel: LightChannel, value: u8) -> bool {
        let Some((idx, (x, y, z))) = self.locate(pos) else {
            return false;
        };
        let Some(slot) = self.visible(idx) else {
            return false;
        };
        slot.data.borrow_mut().set_light(channel, x, y, z, value);
        true
    }

    pub(crate) fn voxel(&self, pos: VoxelPos) -> Option<Voxel> {
        let (idx, (x, y, z)) = self.locate(pos)?;
        let slot = self.visible(idx)?;
        Some(slot.data.borrow().voxel(x, y, z))
    }
}

/// Local coordinates of every voxel on the `side` face of a chunk.
pub(crate) fn face_cells(dims: ChunkDims, side: Side) -> impl Iterator<Item = (usize, usize, usize)> {
    let ChunkDims { sx, sy, sz } = dims;
    let (a_len, b_len) = match side {
        Side::West | Side::East => (sy, sz),
        Side::Down | Side::Up => (sx, sz),
        Side::North | Side::South => (sx, sy),
    };
    (0..b_len).flat_map(move |b| {
        (0..a_len).map(move |a| match side {
            Side::West => (0, a, b),
            Side::East => (sx - 1, a, b),
            Side::Down => (a, 0, b),
            Side::Up => (a, sy - 1, b),
            Side::North => (a, b, 0),
            Side::South => (a, b, sz - 1),
        })
    })
}

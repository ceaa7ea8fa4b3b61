use std::sync::{Arc, PoisonError, RwLock};

use hashbrown::HashMap;
use lumen_world::{ChunkCoord, ChunkDims};

use crate::{Chunk, ChunkData};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChunkStatus {
    /// Voxels or interior lighting are still being produced.
    Generating,
    Ready,
}

/// Source of chunks for lighting merges.
pub trait ChunkProvider: Send + Sync {
    /// A chunk that is ready for use, or None if it is absent or still generating.
    fn chunk(&self, coord: ChunkCoord) -> Option<Arc<Chunk>>;

    /// Any loaded chunk, whatever its status.
    fn chunk_unready(&self, coord: ChunkCoord) -> Option<Arc<Chunk>>;
}

struct Entry {
    chunk: Arc<Chunk>,
    status: ChunkStatus,
}

/// In-memory chunk map keyed by coordinate.
pub struct ChunkStore {
    dims: ChunkDims,
    entries: RwLock<HashMap<ChunkCoord, Entry>>,
}

impl ChunkStore {
    pub fn new(dims: ChunkDims) -> Self {
        Self {
            dims,
            entries: RwLock::new(HashMap::new()),
        }
    }

    #[inline]
    pub fn dims(&self) -> ChunkDims {
        self.dims
    }

    /// Insert an empty, dark chunk that is still generating.
    pub fn create(&self, coord: ChunkCoord) -> Arc<Chunk> {
        self.insert(ChunkData::new(coord, self.dims), ChunkStatus::Generating)
    }

    /// Insert (or replace) a chunk and return the shared handle.
    pub fn insert(&self, data: ChunkData, status: ChunkStatus) -> Arc<Chunk> {
        let coord = data.coord;
        let chunk = Arc::new(Chunk::new(data));
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries
            .insert(
                coord,
                Entry {
                    chunk: chunk.clone(),
                    status,
                },
            )
            .is_some()
        {
            log::debug!(target: "chunks", "replaced chunk {:?}", coord);
        }
        chunk
    }

    /// Returns false if the chunk is not loaded.
    pub fn mark_ready(&self, coord: ChunkCoord) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        match entries.get_mut(&coord) {
            Some(e) => {
                e.status = ChunkStatus::Ready;
                true
            }
            None => false,
        }
    }

    pub fn status(&self, coord: ChunkCoord) -> Option<ChunkStatus> {
        self.entries
            .read()
            .ok()
            .and_then(|m| m.get(&coord).map(|e| e.status))
    }

    pub fn remove(&self, coord: ChunkCoord) -> Option<Arc<Chunk>> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&coord)
            .map(|e| e.chunk)
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Loaded coordinates in ascending order.
    pub fn coords(&self) -> Vec<ChunkCoord> {
        let mut out: Vec<ChunkCoord> = self
            .entries
            .read()
            .map(|m| m.keys().copied().collect())
            .unwrap_or_default();
        out.sort_unstable();
        out
    }

    fn lookup(&self, coord: ChunkCoord, ready_only: bool) -> Option<Arc<Chunk>> {
        let entries = self.entries.read().ok()?;
        let e = entries.get(&coord)?;
        if ready_only && e.status != ChunkStatus::Ready {
            return None;
        }
        Some(e.chunk.clone())
    }
}

impl ChunkProvider for ChunkStore {
    fn chunk(&self, coord: ChunkCoord) -> Option<Arc<Chunk>> {
        self.lookup(coord, true)
    }

    fn chunk_unready(&self, coord: ChunkCoord) -> Option<Arc<Chunk>> {
        self.lookup(coord, false)
    }
}

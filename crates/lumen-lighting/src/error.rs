use lumen_chunk::ChunkLockError;
use lumen_world::ChunkCoord;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    #[error("light merger is stopped")]
    Stopped,
    #[error("chunk {coord:?} lock is poisoned")]
    LockPoisoned { coord: ChunkCoord },
    #[error("light merge was cancelled")]
    Cancelled,
    #[error("light merge was superseded by a newer one")]
    Superseded,
    #[error("light merge panicked: {0}")]
    Panicked(String),
    #[error("light merge task was dropped without reporting")]
    Lost,
}

impl MergeError {
    /// Cancellation and supersession are expected outcomes, not failures.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, MergeError::Cancelled | MergeError::Superseded)
    }
}

impl From<ChunkLockError> for MergeError {
    fn from(e: ChunkLockError) -> Self {
        MergeError::LockPoisoned { coord: e.coord }
    }
}

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use lumen_chunk::{Chunk, ChunkProvider};
use lumen_runtime::{TaskHandle, TaskOutcome, TaskPool};

use crate::merge::merge_with_cancel;
use crate::{MergeError, MergerConfig};

/// Serializes merges of one merger and tells a queued task whether it is stale.
#[derive(Default)]
struct MergeGate {
    lock: Mutex<()>,
    generation: AtomicU64,
}

/// Runs chunk merges on a background pool, at most one tracked at a time.
///
/// Starting a new merge cancels the tracked one. A superseded task that has not
/// started yet never touches chunks; one that is already running finishes
/// before its successor begins.
pub struct LightMerger<T: Send + 'static> {
    provider: Arc<dyn ChunkProvider>,
    pool: Arc<TaskPool>,
    config: MergerConfig,
    gate: Arc<MergeGate>,
    in_flight: Option<TaskHandle<Result<T, MergeError>>>,
    running: bool,
}

impl<T: Send + 'static> LightMerger<T> {
    pub fn new(provider: Arc<dyn ChunkProvider>, pool: Arc<TaskPool>, config: MergerConfig) -> Self {
        Self {
            provider,
            pool,
            config,
            gate: Arc::new(MergeGate::default()),
            in_flight: None,
            running: true,
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn has_pending_merge(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn begin_merge(&mut self, chunk: Arc<Chunk>, token: T) -> Result<(), MergeError> {
        if !self.running {
            return Err(MergeError::Stopped);
        }
        if let Some(prev) = self.in_flight.take() {
            prev.cancel();
            log::debug!(target: "lighting", "superseding light merge before {:?}", chunk.coord());
        }
        let generation = self.gate.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let gate = self.gate.clone();
        let provider = self.provider.clone();
        let handle = self.pool.submit(move |cancel| {
            if cancel.is_cancelled() {
                return Err(MergeError::Cancelled);
            }
            let _turn = gate.lock.lock().unwrap_or_else(PoisonError::into_inner);
            if gate.generation.load(Ordering::SeqCst) != generation {
                return Err(MergeError::Superseded);
            }
            if cancel.is_cancelled() {
                return Err(MergeError::Cancelled);
            }
            merge_with_cancel(provider.as_ref(), &chunk, Some(cancel))?;
            Ok(token)
        });
        self.in_flight = Some(handle);
        Ok(())
    }

    /// Block until the tracked merge finishes. `Ok(None)` if nothing was in
    /// flight or the merge was cancelled.
    pub fn complete_merge(&mut self) -> Result<Option<T>, MergeError> {
        let Some(handle) = self.in_flight.take() else {
            return Ok(None);
        };
        match handle.wait() {
            TaskOutcome::Completed(Ok(token)) => Ok(Some(token)),
            TaskOutcome::Completed(Err(e)) if e.is_cancellation() => {
                log::debug!(target: "lighting", "tracked light merge ended early: {}", e);
                Ok(None)
            }
            TaskOutcome::Cancelled => Ok(None),
            TaskOutcome::Completed(Err(e)) => {
                log::error!(target: "lighting", "Error in lighting merge: {}", e);
                Err(e)
            }
            TaskOutcome::Panicked(msg) => {
                log::error!(target: "lighting", "Error in lighting merge: panicked: {}", msg);
                Err(MergeError::Panicked(msg))
            }
            TaskOutcome::Lost => {
                log::error!(target: "lighting", "Error in lighting merge: {}", MergeError::Lost);
                Err(MergeError::Lost)
            }
        }
    }

    /// Cancel the tracked merge, wait for it up to the configured bound, and
    /// stop accepting merges. Failures are logged, never returned.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.cancel();
            match handle.wait_timeout(self.config.shutdown_timeout()) {
                Ok(TaskOutcome::Completed(Ok(_))) | Ok(TaskOutcome::Cancelled) => {}
                Ok(TaskOutcome::Completed(Err(e))) if e.is_cancellation() => {}
                Ok(TaskOutcome::Completed(Err(e))) => {
                    log::error!(target: "lighting", "Error in lighting merge during task shutdown: {}", e);
                }
                Ok(TaskOutcome::Panicked(msg)) => {
                    log::error!(
                        target: "lighting",
                        "Error in lighting merge during task shutdown: panicked: {}",
                        msg
                    );
                }
                Ok(TaskOutcome::Lost) => {
                    log::error!(
                        target: "lighting",
                        "Error in lighting merge during task shutdown: {}",
                        MergeError::Lost
                    );
                }
                Err(timeout) => {
                    log::error!(
                        target: "lighting",
                        "Failed to shutdown light merge task in a timely manner ({})",
                        timeout
                    );
                }
            }
        }
        self.running = false;
    }

    pub fn restart(&mut self) {
        self.running = true;
    }
}

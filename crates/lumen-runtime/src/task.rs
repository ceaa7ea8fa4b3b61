use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use thiserror::Error;

/// Shared flag a task polls to notice it was cancelled.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

#[derive(Debug)]
pub enum TaskOutcome<R> {
    Completed(R),
    /// Cancelled before the body started.
    Cancelled,
    Panicked(String),
    /// The worker went away without reporting.
    Lost,
}

impl<R> TaskOutcome<R> {
    pub fn is_completed(&self) -> bool {
        matches!(self, TaskOutcome::Completed(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("task did not finish within {0:?}")]
pub struct WaitTimeout(pub Duration);

/// Handle to a task submitted to a [`crate::TaskPool`].
///
/// The outcome is delivered once. After a successful `wait_timeout`, a later
/// wait reports `Lost`.
pub struct TaskHandle<R> {
    pub(crate) token: CancelToken,
    pub(crate) finished: Arc<AtomicBool>,
    pub(crate) rx: Receiver<TaskOutcome<R>>,
}

impl<R> TaskHandle<R> {
    /// Request cancellation. Never blocks; a running body only stops if it polls the token.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    pub fn wait(self) -> TaskOutcome<R> {
        self.rx.recv().unwrap_or(TaskOutcome::Lost)
    }

    pub fn wait_timeout(&self, timeout: Duration) -> Result<TaskOutcome<R>, WaitTimeout> {
        match self.rx.recv_timeout(timeout) {
            Ok(outcome) => Ok(outcome),
            Err(RecvTimeoutError::Timeout) => Err(WaitTimeout(timeout)),
            Err(RecvTimeoutError::Disconnected) => Ok(TaskOutcome::Lost),
        }
    }
}

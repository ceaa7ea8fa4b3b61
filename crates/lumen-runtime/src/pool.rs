use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crossbeam_channel::bounded;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

use crate::{CancelToken, RuntimeConfig, TaskHandle, TaskOutcome};

/// Named rayon pool that runs lighting tasks.
pub struct TaskPool {
    pool: ThreadPool,
    workers: usize,
    queued: Arc<AtomicUsize>,
    inflight: Arc<AtomicUsize>,
}

impl TaskPool {
    pub fn new(workers: usize) -> Result<Self, ThreadPoolBuildError> {
        let workers = workers.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("lumen-light-{i}"))
            .build()?;
        log::info!(target: "runtime", "light pool started with {} workers", workers);
        Ok(Self {
            pool,
            workers,
            queued: Arc::new(AtomicUsize::new(0)),
            inflight: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn from_config(cfg: &RuntimeConfig) -> Result<Self, ThreadPoolBuildError> {
        Self::new(cfg.resolved_workers())
    }

    #[inline]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// (queued, inflight) task counts.
    pub fn debug_counts(&self) -> (usize, usize) {
        (
            self.queued.load(Ordering::Relaxed),
            self.inflight.load(Ordering::Relaxed),
        )
    }

    pub fn submit<R, F>(&self, f: F) -> TaskHandle<R>
    where
        R: Send + 'static,
        F: FnOnce(&CancelToken) -> R + Send + 'static,
    {
        let token = CancelToken::new();
        let finished = Arc::new(AtomicBool::new(false));
        let (tx, rx) = bounded(1);
        let queued = self.queued.clone();
        let inflight = self.inflight.clone();
        queued.fetch_add(1, Ordering::Relaxed);
        {
            let token = token.clone();
            let finished = finished.clone();
            self.pool.spawn(move || {
                queued.fetch_sub(1, Ordering::Relaxed);
                let outcome = if token.is_cancelled() {
                    log::trace!(target: "runtime", "task cancelled before start");
                    TaskOutcome::Cancelled
                } else {
                    inflight.fetch_add(1, Ordering::Relaxed);
                    let res = catch_unwind(AssertUnwindSafe(|| f(&token)));
                    inflight.fetch_sub(1, Ordering::Relaxed);
                    match res {
                        Ok(v) => TaskOutcome::Completed(v),
                        Err(payload) => {
                            let msg = panic_message(payload.as_ref());
                            log::error!(target: "runtime", "task panicked: {}", msg);
                            TaskOutcome::Panicked(msg)
                        }
                    }
                };
                finished.store(true, Ordering::Release);
                let _ = tx.send(outcome);
            });
        }
        TaskHandle {
            token,
            finished,
            rx,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use std::time::Duration;

    #[test]
    fn completes_with_value() {
        let pool = TaskPool::new(2).unwrap();
        let h = pool.submit(|_| 6 * 7);
        match h.wait() {
            TaskOutcome::Completed(v) => assert_eq!(v, 42),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn cancelled_before_start_never_runs() {
        let pool = TaskPool::new(1).unwrap();
        let (release_tx, release_rx) = unbounded::<()>();
        let blocker = pool.submit(move |_| {
            let _ = release_rx.recv();
        });
        let ran = Arc::new(AtomicBool::new(false));
        let ran2 = ran.clone();
        let queued = pool.submit(move |_| ran2.store(true, Ordering::SeqCst));
        queued.cancel();
        release_tx.send(()).unwrap();
        assert!(blocker.wait().is_completed());
        assert!(matches!(queued.wait(), TaskOutcome::Cancelled));
        assert!(!ran.load(Ordering::SeqCst));
    }

    #[test]
    fn running_task_observes_token() {
        let pool = TaskPool::new(1).unwrap();
        let (started_tx, started_rx) = unbounded::<()>();
        let h = pool.submit(move |token| {
            let _ = started_tx.send(());
            let mut spins = 0u64;
            while !token.is_cancelled() {
                spins += 1;
                std::thread::sleep(Duration::from_millis(1));
            }
            spins
        });
        started_rx.recv().unwrap();
        h.cancel();
        assert!(h.wait().is_completed());
    }

    #[test]
    fn wait_timeout_expires_then_delivers() {
        let pool = TaskPool::new(1).unwrap();
        let (release_tx, release_rx) = unbounded::<()>();
        let h = pool.submit(move |_| {
            let _ = release_rx.recv();
            "done"
        });
        let err = h.wait_timeout(Duration::from_millis(20)).unwrap_err();
        assert_eq!(err.0, Duration::from_millis(20));
        assert!(!h.is_finished());
        release_tx.send(()).unwrap();
        match h.wait_timeout(Duration::from_secs(5)) {
            Ok(TaskOutcome::Completed(s)) => assert_eq!(s, "done"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(h.is_finished());
    }

    #[test]
    fn panic_is_reported_and_worker_survives() {
        let pool = TaskPool::new(1).unwrap();
        let h = pool.submit(|_| -> u32 { panic!("boom") });
        match h.wait() {
            TaskOutcome::Panicked(msg) => assert!(msg.contains("boom")),
            other => panic!("unexpected {:?}", other),
        }
        assert!(pool.submit(|_| 1u32).wait().is_completed());
        assert_eq!(pool.debug_counts(), (0, 0));
    }
}

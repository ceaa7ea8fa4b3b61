//! Worker pool and cancellable task handles for background lighting work.
#![forbid(unsafe_code)]

mod config;
mod pool;
mod task;

pub use config::RuntimeConfig;
pub use pool::TaskPool;
pub use task::{CancelToken, TaskHandle, TaskOutcome, WaitTimeout};

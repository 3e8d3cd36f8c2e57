use futures::{executor::ThreadPool, future};
use once_cell::sync::Lazy;
use tracing::warn;

use super::{NewThreadScheduler, Scheduler, Task};
use crate::error::RxError;

/// Worker count of the shared pool. At most this many procedures scheduled
/// on it run at once; the rest wait for a free worker.
const DEFAULT_POOL_SIZE: usize = 16;

static DEFAULT_POOL: Lazy<Option<ThreadPool>> = Lazy::new(|| {
  ThreadPool::builder()
    .pool_size(DEFAULT_POOL_SIZE)
    .name_prefix("rxflux-pool-")
    .create()
    .map_err(|e| warn!(error = %e, "could not build the shared worker pool; using thread per task"))
    .ok()
});

/// Runs tasks on a `futures` thread pool.
///
/// Opt-in through `Publisher::hot_with`. Suited to many short procedures;
/// long-running sources beyond the pool size wait until a worker frees up.
///
/// `ThreadPoolScheduler::default()` shares one lazily built pool across the
/// process.
#[derive(Clone)]
pub struct ThreadPoolScheduler {
  pool: Option<ThreadPool>,
}

impl ThreadPoolScheduler {
  /// Schedule onto a caller-owned pool.
  pub fn new(pool: ThreadPool) -> Self { Self { pool: Some(pool) } }
}

impl Default for ThreadPoolScheduler {
  fn default() -> Self { Self { pool: DEFAULT_POOL.clone() } }
}

impl Scheduler for ThreadPoolScheduler {
  fn schedule(&self, task: Task) -> Result<(), RxError> {
    match &self.pool {
      Some(pool) => {
        pool.spawn_ok(future::lazy(move |_| task()));
        Ok(())
      }
      None => NewThreadScheduler.schedule(task),
    }
  }
}

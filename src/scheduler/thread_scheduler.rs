use std::{
  sync::atomic::{AtomicUsize, Ordering},
  thread,
};

use tracing::trace;

use super::{Scheduler, Task};
use crate::error::RxError;

static THREAD_ID: AtomicUsize = AtomicUsize::new(0);

/// Runs every task on a freshly spawned, named thread.
#[derive(Clone, Debug, Default)]
pub struct NewThreadScheduler;

impl Scheduler for NewThreadScheduler {
  fn schedule(&self, task: Task) -> Result<(), RxError> {
    let name = format!("rxflux-thread-{}", THREAD_ID.fetch_add(1, Ordering::Relaxed));
    trace!(thread = %name, "spawning emission thread");
    thread::Builder::new()
      .name(name)
      .spawn(task)
      .map(|_| ())
      .map_err(|e| RxError::emission(format!("failed to spawn emission thread: {e}")))
  }
}

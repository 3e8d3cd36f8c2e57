use tokio::runtime::Handle;

use super::{Scheduler, Task};
use crate::error::RxError;

/// Runs tasks on a tokio runtime's blocking pool.
///
/// Emission procedures are plain blocking closures, hence `spawn_blocking`.
#[derive(Clone, Debug)]
pub struct TokioScheduler {
  handle: Handle,
}

impl TokioScheduler {
  pub fn new(handle: Handle) -> Self { Self { handle } }

  /// Scheduler bound to the runtime of the calling context, if any.
  pub fn current() -> Option<Self> { Handle::try_current().ok().map(Self::new) }
}

impl Scheduler for TokioScheduler {
  fn schedule(&self, task: Task) -> Result<(), RxError> {
    drop(self.handle.spawn_blocking(task));
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::prelude::*;

  #[rxflux_macro::test(shared)]
  async fn hot_publisher_on_tokio() {
    let scheduler = TokioScheduler::current().unwrap();
    let hot = Publisher::hot_with(std::sync::Arc::new(scheduler), |emitter| {
      for v in 0..3 {
        emitter.next(v);
      }
      Ok(())
    });
    assert_eq!(hot.collect_future().await, Ok(vec![0, 1, 2]));
  }
}

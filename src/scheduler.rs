//! Schedulers run hot emission procedures off the subscribing thread.
//!
//! All background emission goes through [`Scheduler::schedule`]; nothing in
//! the crate spawns threads on its own.

use std::sync::Arc;

use crate::error::RxError;

mod thread_scheduler;
pub use thread_scheduler::NewThreadScheduler;

#[cfg(feature = "futures-scheduler")]
mod thread_pool_scheduler;
#[cfg(feature = "futures-scheduler")]
pub use thread_pool_scheduler::ThreadPoolScheduler;

#[cfg(feature = "tokio-scheduler")]
mod tokio_scheduler;
#[cfg(feature = "tokio-scheduler")]
pub use tokio_scheduler::TokioScheduler;

/// A unit of background work.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// A Scheduler is an object to order tasks and schedule their execution.
pub trait Scheduler: Send + Sync {
  /// Queue `task` to run on an execution context other than the caller's.
  ///
  /// Fails only when no execution context could be obtained.
  fn schedule(&self, task: Task) -> Result<(), RxError>;
}

impl<S: Scheduler + ?Sized> Scheduler for Arc<S> {
  #[inline]
  fn schedule(&self, task: Task) -> Result<(), RxError> { (**self).schedule(task) }
}

/// Scheduler handle stored inside hot publishers.
pub type SharedScheduler = Arc<dyn Scheduler>;

/// The scheduler hot publishers use unless told otherwise: one thread per
/// emission procedure, so any number of long-running sources make progress
/// side by side.
///
/// A bounded `ThreadPoolScheduler` can be passed to `Publisher::hot_with`
/// instead; with it, at most as many procedures run at once as the pool has
/// workers.
pub fn default_scheduler() -> SharedScheduler { Arc::new(NewThreadScheduler) }

//! Blocking collector.
//!
//! The only place in the crate that blocks the calling thread: the caller
//! waits on a condition variable with a deadline until the publisher
//! completes or fails.

use std::{
  sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError},
  time::Duration,
};

use tracing::{debug, warn};

use crate::{
  error::RxError,
  observer::Observer,
  subscription::{Subscription, SubscriptionHandle},
};

struct CollectState<Item> {
  values: Vec<Item>,
  outcome: Option<Result<(), RxError>>,
}

/// State shared between the collecting observer and the waiting caller.
pub(crate) struct Pending<Item> {
  state: Mutex<CollectState<Item>>,
  done: Condvar,
}

impl<Item> Pending<Item> {
  fn lock(&self) -> MutexGuard<'_, CollectState<Item>> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }

  fn finish(&self, outcome: Result<(), RxError>) {
    let mut state = self.lock();
    if state.outcome.is_none() {
      state.outcome = Some(outcome);
    }
    self.done.notify_all();
  }
}

/// Accumulates every value in arrival order.
pub(crate) struct CollectObserver<Item> {
  pending: Arc<Pending<Item>>,
}

impl<Item> CollectObserver<Item> {
  pub(crate) fn new() -> (Self, Arc<Pending<Item>>) {
    let pending = Arc::new(Pending {
      state: Mutex::new(CollectState { values: Vec::new(), outcome: None }),
      done: Condvar::new(),
    });
    (Self { pending: pending.clone() }, pending)
  }
}

impl<Item> Observer<Item> for CollectObserver<Item> {
  fn next(&mut self, value: Item) { self.pending.lock().values.push(value); }

  fn error(self, err: RxError) { self.pending.finish(Err(err)); }

  fn complete(self) { self.pending.finish(Ok(())); }

  fn is_closed(&self) -> bool { self.pending.lock().outcome.is_some() }
}

/// Wait for `pending` to finish. On timeout `handle` is unsubscribed, so
/// values arriving afterwards are dropped.
pub(crate) fn wait<Item>(
  pending: Arc<Pending<Item>>,
  handle: SubscriptionHandle,
  timeout: Duration,
) -> Result<Vec<Item>, RxError> {
  let guard = pending.lock();
  let (mut state, _) = pending
    .done
    .wait_timeout_while(guard, timeout, |state| state.outcome.is_none())
    .unwrap_or_else(PoisonError::into_inner);

  match state.outcome.take() {
    Some(Ok(())) => Ok(std::mem::take(&mut state.values)),
    Some(Err(err)) => {
      debug!(error = %err, "collect failed");
      Err(err)
    }
    None => {
      drop(state);
      handle.unsubscribe();
      warn!(?timeout, "collect timed out");
      Err(RxError::Timeout { timeout })
    }
  }
}

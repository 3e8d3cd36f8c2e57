//! Merge operator implementation.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
  error::RxError,
  observer::{BoxedObserver, Observer},
  publisher::{Mode, Publisher},
};

/// Combines several publishers into one, forwarding each value as soon as it
/// arrives.
///
/// Inputs are subscribed in list order, so synchronous cold inputs drain
/// completely before the next one is subscribed. Completion is forwarded
/// once every input completed; the first error is forwarded at once and
/// ends the merged subscription. Inputs still running are not cancelled.
///
/// # Example
///
/// ```
/// use rxflux::prelude::*;
/// use std::time::Duration;
///
/// let merged = merge([Publisher::cold([1, 3]), Publisher::cold([2, 4])]);
/// assert_eq!(collect(&merged, Duration::from_secs(1)), Ok(vec![1, 3, 2, 4]));
/// ```
pub struct Merge<Item> {
  sources: Vec<Publisher<Item>>,
}

impl<Item> Clone for Merge<Item> {
  fn clone(&self) -> Self { Self { sources: self.sources.clone() } }
}

impl<Item: Clone + Send + 'static> Merge<Item> {
  pub(crate) fn new(sources: Vec<Publisher<Item>>) -> Self { Self { sources } }

  pub(crate) fn with(mut self, other: Publisher<Item>) -> Self {
    self.sources.push(other);
    self
  }

  pub fn sources(&self) -> &[Publisher<Item>] { &self.sources }

  pub(crate) fn mode(&self) -> Mode {
    if self.sources.iter().any(|s| s.mode() == Mode::Hot) {
      Mode::Hot
    } else {
      Mode::Cold
    }
  }

  pub(crate) fn subscribe(&self, observer: BoxedObserver<Item>) {
    if self.sources.is_empty() {
      observer.complete();
      return;
    }
    let state = Arc::new(Mutex::new(MergeState {
      observer: Some(observer),
      remaining: self.sources.len(),
    }));
    for source in &self.sources {
      let input = MergeObserver { state: state.clone() };
      if input.is_closed() {
        break;
      }
      source.subscribe_boxed(Box::new(input));
    }
  }
}

struct MergeState<Item> {
  observer: Option<BoxedObserver<Item>>,
  remaining: usize,
}

/// Observer given to each merge input; all of them share one state, whose
/// mutex serializes calls into the downstream observer.
struct MergeObserver<Item> {
  state: Arc<Mutex<MergeState<Item>>>,
}

impl<Item> MergeObserver<Item> {
  fn lock(&self) -> MutexGuard<'_, MergeState<Item>> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl<Item> Observer<Item> for MergeObserver<Item> {
  fn next(&mut self, value: Item) {
    if let Some(observer) = self.lock().observer.as_mut() {
      observer.next(value);
    }
  }

  fn error(self, err: RxError) {
    let observer = self.lock().observer.take();
    if let Some(observer) = observer {
      observer.error(err);
    }
  }

  fn complete(self) {
    let observer = {
      let mut state = self.lock();
      state.remaining = state.remaining.saturating_sub(1);
      if state.remaining == 0 {
        state.observer.take()
      } else {
        None
      }
    };
    if let Some(observer) = observer {
      observer.complete();
    }
  }

  fn is_closed(&self) -> bool { self.lock().observer.as_ref().map_or(true, |o| o.is_closed()) }
}

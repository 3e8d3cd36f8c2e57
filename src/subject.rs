//! Multicast hub shared by hot and connectable publishers.
//!
//! A `Subject` fans every event out to the observers attached to it. All
//! calls into those observers happen under one mutex, so producers on
//! different threads never reach an observer concurrently. Observers must not
//! attach to the same subject from inside a `next` callback.
//!
//! Terminal events are remembered: an observer attaching after completion is
//! completed at once (an empty sequence), one attaching after an error gets
//! that error.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use smallvec::SmallVec;

use crate::{
  error::RxError,
  observer::{BoxedObserver, Observer},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Terminal {
  Completed,
  Errored(RxError),
}

struct SubjectState<Item> {
  observers: SmallVec<[BoxedObserver<Item>; 2]>,
  terminal: Option<Terminal>,
}

pub(crate) struct Subject<Item> {
  state: Arc<Mutex<SubjectState<Item>>>,
}

impl<Item> Clone for Subject<Item> {
  fn clone(&self) -> Self { Self { state: self.state.clone() } }
}

impl<Item> Default for Subject<Item> {
  fn default() -> Self {
    Self {
      state: Arc::new(Mutex::new(SubjectState { observers: SmallVec::new(), terminal: None })),
    }
  }
}

impl<Item> Subject<Item> {
  pub(crate) fn new() -> Self { Self::default() }

  fn lock(&self) -> MutexGuard<'_, SubjectState<Item>> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Attach an observer; replays the terminal event if there was one.
  pub(crate) fn attach(&self, observer: BoxedObserver<Item>) {
    let terminal = {
      let mut state = self.lock();
      match &state.terminal {
        None => {
          state.observers.push(observer);
          return;
        }
        Some(terminal) => terminal.clone(),
      }
    };
    match terminal {
      Terminal::Completed => observer.complete(),
      Terminal::Errored(err) => observer.error(err),
    }
  }

  /// Number of attached observers that still accept values.
  pub(crate) fn live_observers(&self) -> usize {
    let mut state = self.lock();
    state.observers.retain(|o| !o.is_closed());
    state.observers.len()
  }

  pub(crate) fn terminal(&self) -> Option<Terminal> { self.lock().terminal.clone() }

  fn terminate(&self, terminal: Terminal) {
    let observers = {
      let mut state = self.lock();
      if state.terminal.is_some() {
        return;
      }
      state.terminal = Some(terminal.clone());
      std::mem::take(&mut state.observers)
    };
    // The terminal flag is set, so nothing else reaches these observers.
    match terminal {
      Terminal::Completed => observers.into_iter().for_each(Observer::complete),
      Terminal::Errored(err) => observers.into_iter().for_each(|o| o.error(err.clone())),
    }
  }
}

impl<Item: Clone> Observer<Item> for Subject<Item> {
  fn next(&mut self, value: Item) {
    let mut state = self.lock();
    if state.terminal.is_some() {
      return;
    }
    state.observers.retain(|o| !o.is_closed());
    // n-1 clones, the last observer receives the moved value.
    let mut iter = state.observers.iter_mut().peekable();
    while let Some(observer) = iter.next() {
      if iter.peek().is_some() {
        observer.next(value.clone());
      } else {
        observer.next(value);
        break;
      }
    }
  }

  fn error(self, err: RxError) { self.terminate(Terminal::Errored(err)); }

  fn complete(self) { self.terminate(Terminal::Completed); }

  fn is_closed(&self) -> bool { self.terminal().is_some() || self.live_observers() == 0 }
}

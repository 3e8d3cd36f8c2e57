//! Observer trait and implementations
//!
//! The Observer trait defines the consumer of data in the reactive pattern.
//! It provides three methods: next (for values), error (for errors), and
//! complete (for stream completion).

use crate::error::RxError;

// ============================================================================
// Observer Trait
// ============================================================================

/// Observer trait: The consumer of data in reactive programming
///
/// An Observer receives values, errors, and completion notifications from
/// a publisher. Calls into one observer never overlap: the engine serializes
/// them even when several producer threads feed it.
pub trait Observer<Item> {
  /// Receive the next value from the publisher
  fn next(&mut self, value: Item);

  /// Handle an error from the publisher
  ///
  /// This consumes the observer, as no more values can be emitted after an
  /// error
  fn error(self, err: RxError);

  /// Handle completion of the publisher
  ///
  /// This consumes the observer, as no more values can be emitted after
  /// completion
  fn complete(self);

  /// Returns `true` if the observer will not accept more values.
  ///
  /// Sources check this between values to stop early.
  fn is_closed(&self) -> bool;
}

// ============================================================================
// DynObserver Trait - Object-safe Observer
// ============================================================================

/// Object-safe mirror of [`Observer`], so observers can be stored as
/// `Box<dyn DynObserver>` in subjects and merge state.
pub trait DynObserver<Item> {
  fn box_next(&mut self, value: Item);
  fn box_error(self: Box<Self>, err: RxError);
  fn box_complete(self: Box<Self>);
  fn box_is_closed(&self) -> bool;
}

impl<T, Item> DynObserver<Item> for T
where
  T: Observer<Item>,
{
  fn box_next(&mut self, value: Item) { self.next(value); }
  fn box_error(self: Box<Self>, err: RxError) { self.error(err); }
  fn box_complete(self: Box<Self>) { self.complete(); }
  fn box_is_closed(&self) -> bool { self.is_closed() }
}

/// Boxed observer that can cross threads.
pub type BoxedObserver<Item> = Box<dyn DynObserver<Item> + Send>;

impl<Item> Observer<Item> for BoxedObserver<Item> {
  #[inline]
  fn next(&mut self, value: Item) { (**self).box_next(value) }

  #[inline]
  fn error(self, err: RxError) { self.box_error(err) }

  #[inline]
  fn complete(self) { self.box_complete() }

  #[inline]
  fn is_closed(&self) -> bool { (**self).box_is_closed() }
}

// ============================================================================
// Closure adapters
// ============================================================================

/// Observer built from a single `next` closure.
///
/// Errors and completion are ignored.
#[derive(Clone)]
pub struct FnMutObserver<F>(pub F);

impl<F, Item> Observer<Item> for FnMutObserver<F>
where
  F: FnMut(Item),
{
  #[inline]
  fn next(&mut self, v: Item) { (self.0)(v); }

  #[inline]
  fn error(self, _err: RxError) {}

  #[inline]
  fn complete(self) {}

  #[inline]
  fn is_closed(&self) -> bool { false }
}

/// Observer built from `next`, `error` and `complete` closures.
pub struct AllObserver<N, E, C> {
  pub next: N,
  pub error: E,
  pub complete: C,
}

impl<Item, N, E, C> Observer<Item> for AllObserver<N, E, C>
where
  N: FnMut(Item),
  E: FnOnce(RxError),
  C: FnOnce(),
{
  #[inline]
  fn next(&mut self, value: Item) { (self.next)(value); }

  fn error(self, err: RxError) { (self.error)(err); }

  fn complete(self) { (self.complete)(); }

  #[inline]
  fn is_closed(&self) -> bool { false }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
  use super::*;

  use std::sync::{Arc, Mutex};

  #[derive(Default)]
  struct Recorder {
    values: Arc<Mutex<Vec<i32>>>,
  }

  impl Observer<i32> for Recorder {
    fn next(&mut self, value: i32) { self.values.lock().unwrap().push(value); }

    fn error(self, _: RxError) {}

    fn complete(self) { self.values.lock().unwrap().push(-1); }

    fn is_closed(&self) -> bool { false }
  }

  #[rxflux_macro::test]
  fn closure_as_observer() {
    let mut count = 0;
    let mut obs = FnMutObserver(|v: i32| count += v);
    obs.next(10);
    obs.next(20);
    assert_eq!(count, 30);
  }

  #[rxflux_macro::test]
  fn boxed_observer_delegates() {
    let recorder = Recorder::default();
    let values = recorder.values.clone();
    let mut boxed: BoxedObserver<i32> = Box::new(recorder);
    boxed.next(1);
    assert!(!boxed.is_closed());
    boxed.complete();
    assert_eq!(*values.lock().unwrap(), vec![1, -1]);
  }

  #[rxflux_macro::test]
  fn all_observer_routes_terminal_events() {
    let mut seen = Vec::new();
    let mut failed = None;
    {
      let mut obs =
        AllObserver { next: |v: i32| seen.push(v), error: |e: RxError| failed = Some(e), complete: || {} };
      obs.next(7);
      obs.error(RxError::emission("boom"));
    }
    assert_eq!(seen, vec![7]);
    assert_eq!(failed, Some(RxError::emission("boom")));
  }
}

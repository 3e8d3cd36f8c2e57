//! Subscription handles.
//!
//! Every `subscribe` call returns a [`SubscriptionHandle`]. Closing it is
//! cooperative: the observer behind it stops receiving events at once, and
//! sources learn about it through [`Observer::is_closed`] the next time they
//! are about to emit.

use std::{
  fmt::{Debug, Formatter},
  sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
  },
};

use crate::{error::RxError, observer::Observer};

/// Subscription returned from `Publisher::subscribe` to allow unsubscribing.
pub trait Subscription {
  /// Stop delivering events to the subscribed observer.
  fn unsubscribe(self);

  /// `true` once the subscription was unsubscribed or its publisher
  /// terminated.
  fn is_closed(&self) -> bool;
}

/// Shared closed flag for one subscription.
#[derive(Clone, Default)]
pub struct SubscriptionHandle(Arc<AtomicBool>);

impl SubscriptionHandle {
  pub fn new() -> Self { Self::default() }

  /// Marks the subscription closed; returns `true` if this call closed it.
  pub(crate) fn close(&self) -> bool { !self.0.swap(true, Ordering::AcqRel) }
}

impl Subscription for SubscriptionHandle {
  #[inline]
  fn unsubscribe(self) { self.close(); }

  #[inline]
  fn is_closed(&self) -> bool { self.0.load(Ordering::Acquire) }
}

impl Debug for SubscriptionHandle {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SubscriptionHandle")
      .field("is_closed", &self.is_closed())
      .finish()
  }
}

/// Observer wrapper that honours its [`SubscriptionHandle`].
///
/// Events arriving after the handle closed are dropped, and terminal events
/// close the handle.
pub(crate) struct SubscribedObserver<O> {
  observer: O,
  handle: SubscriptionHandle,
}

impl<O> SubscribedObserver<O> {
  pub(crate) fn new(observer: O, handle: SubscriptionHandle) -> Self { Self { observer, handle } }
}

impl<O, Item> Observer<Item> for SubscribedObserver<O>
where
  O: Observer<Item>,
{
  fn next(&mut self, value: Item) {
    if !self.handle.is_closed() {
      self.observer.next(value);
    }
  }

  fn error(self, err: RxError) {
    if self.handle.close() {
      self.observer.error(err);
    }
  }

  fn complete(self) {
    if self.handle.close() {
      self.observer.complete();
    }
  }

  fn is_closed(&self) -> bool { self.handle.is_closed() || self.observer.is_closed() }
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use super::*;
  use crate::observer::AllObserver;

  #[rxflux_macro::test]
  fn unsubscribe_drops_later_events() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let completed = Arc::new(AtomicBool::new(false));
    let handle = SubscriptionHandle::new();

    let c_seen = seen.clone();
    let c_completed = completed.clone();
    let mut observer = SubscribedObserver::new(
      AllObserver {
        next: move |v: i32| c_seen.lock().unwrap().push(v),
        error: |_: RxError| {},
        complete: move || c_completed.store(true, Ordering::SeqCst),
      },
      handle.clone(),
    );

    observer.next(1);
    handle.clone().unsubscribe();
    observer.next(2);
    assert!(observer.is_closed());
    Observer::<i32>::complete(observer);

    assert_eq!(*seen.lock().unwrap(), vec![1]);
    assert!(!completed.load(Ordering::SeqCst));
  }

  #[rxflux_macro::test]
  fn completion_closes_handle() {
    let handle = SubscriptionHandle::new();
    let observer = SubscribedObserver::new(
      AllObserver { next: |_: i32| {}, error: |_: RxError| {}, complete: || {} },
      handle.clone(),
    );
    assert!(!handle.is_closed());
    Observer::<i32>::complete(observer);
    assert!(handle.is_closed());
  }
}

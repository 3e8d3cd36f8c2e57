//! The `Publisher` type and its subscribe entry points.
//!
//! A publisher is one of a closed set of variants:
//!
//! | Variant | Emission |
//! |---------|----------|
//! | `Cold` | replays a pre-built sequence synchronously on the subscriber's thread |
//! | `Hot` | runs an emission procedure once, on a scheduler task |
//! | `Merged` | interleaves several publishers, first arrival first forwarded |
//! | `Buffered` | re-emits a source in transformed fixed-size windows |
//! | `Published` | the subscriber side of a [`ConnectablePublisher`] |
//!
//! ```rust
//! use rxflux::prelude::*;
//! use std::time::Duration;
//!
//! let numbers = Publisher::just(0)
//!   .merge_with(Publisher::cold([1, 3, 5, 7]))
//!   .merge_with(Publisher::cold([2, 4, 6, 8]));
//!
//! assert_eq!(numbers.collect(Duration::from_secs(1)), Ok(vec![0, 1, 3, 5, 7, 2, 4, 6, 8]));
//! assert_eq!(numbers.sorted(9).collect(Duration::from_secs(1)), Ok((0..=8).collect()));
//! ```

use std::{future::Future, time::Duration};

use tracing::trace;

use crate::{
  error::RxError,
  observer::{AllObserver, BoxedObserver, FnMutObserver, Observer},
  ops::{
    buffer_transform::BufferTransform,
    collect::{self, CollectObserver},
    into_future,
    merge::Merge,
  },
  scheduler::{default_scheduler, SharedScheduler},
  subscription::{SubscribedObserver, SubscriptionHandle},
};

mod cold;
mod connectable;
mod hot;

pub use cold::ColdSource;
pub use connectable::{ConnectablePublisher, Connection, PublishedSource};
pub use hot::{EmissionProcedure, HotEmitter, HotSource};

/// Whether a publisher's values pre-exist or arrive asynchronously.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
  Cold,
  Hot,
}

/// A lazy producer of a sequence of `Item`s.
pub enum Publisher<Item> {
  Cold(ColdSource<Item>),
  Hot(HotSource<Item>),
  Merged(Merge<Item>),
  Buffered(BufferTransform<Item>),
  Published(PublishedSource<Item>),
}

impl<Item> Clone for Publisher<Item> {
  fn clone(&self) -> Self {
    match self {
      Publisher::Cold(s) => Publisher::Cold(s.clone()),
      Publisher::Hot(s) => Publisher::Hot(s.clone()),
      Publisher::Merged(s) => Publisher::Merged(s.clone()),
      Publisher::Buffered(s) => Publisher::Buffered(s.clone()),
      Publisher::Published(s) => Publisher::Published(s.clone()),
    }
  }
}

impl<Item: Clone + Send + 'static> FromIterator<Item> for Publisher<Item> {
  fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self { Self::cold(iter) }
}

// ==================== Constructors ====================

impl<Item: Clone + Send + 'static> Publisher<Item> {
  /// A cold publisher replaying `values` on every subscription.
  pub fn cold(values: impl IntoIterator<Item = Item>) -> Self { Publisher::Cold(ColdSource::new(values)) }

  /// A cold publisher of exactly one value.
  pub fn just(value: Item) -> Self { Self::cold([value]) }

  /// A cold publisher that completes without emitting.
  pub fn empty() -> Self { Self::cold([]) }

  /// A cold publisher that fails immediately with `error`.
  pub fn throw_err(error: RxError) -> Self { Publisher::Cold(ColdSource::failing(error)) }

  /// A hot publisher running `procedure` on the default scheduler when first
  /// subscribed.
  pub fn hot<F>(procedure: F) -> Self
  where
    F: FnOnce(&mut HotEmitter<Item>) -> Result<(), RxError> + Send + 'static,
  {
    Self::hot_with(default_scheduler(), procedure)
  }

  /// Like [`Publisher::hot`], on a caller supplied scheduler.
  pub fn hot_with<F>(scheduler: SharedScheduler, procedure: F) -> Self
  where
    F: FnOnce(&mut HotEmitter<Item>) -> Result<(), RxError> + Send + 'static,
  {
    Publisher::Hot(HotSource::new(scheduler, Box::new(procedure)))
  }

  /// `self` followed by `other` in one merge. Chained calls flatten into a
  /// single merge whose inputs keep their call order.
  pub fn merge_with(self, other: Publisher<Item>) -> Self {
    match self {
      Publisher::Merged(merge) => Publisher::Merged(merge.with(other)),
      first => Publisher::Merged(Merge::new(vec![first, other])),
    }
  }

  /// Windows of `window_size` values, each passed through `transform` and
  /// re-emitted value by value.
  ///
  /// # Panics
  ///
  /// If `window_size` is zero.
  pub fn buffer_transform<F>(self, window_size: usize, transform: F) -> Self
  where
    F: Fn(Vec<Item>) -> Vec<Item> + Send + Sync + 'static,
  {
    Publisher::Buffered(BufferTransform::new(self, window_size, transform))
  }

  /// Wrap into a [`ConnectablePublisher`]; nothing is emitted until
  /// `connect()`.
  pub fn publish(self) -> ConnectablePublisher<Item> { ConnectablePublisher::new(self) }

  pub fn mode(&self) -> Mode {
    match self {
      Publisher::Cold(_) => Mode::Cold,
      Publisher::Hot(_) | Publisher::Published(_) => Mode::Hot,
      Publisher::Merged(merge) => merge.mode(),
      Publisher::Buffered(buffer) => buffer.source().mode(),
    }
  }

  fn kind(&self) -> &'static str {
    match self {
      Publisher::Cold(_) => "cold",
      Publisher::Hot(_) => "hot",
      Publisher::Merged(_) => "merged",
      Publisher::Buffered(_) => "buffered",
      Publisher::Published(_) => "published",
    }
  }
}

impl<Item: Clone + Ord + Send + 'static> Publisher<Item> {
  /// Stable ascending sort of every `window_size` window.
  pub fn sorted(self, window_size: usize) -> Self {
    self.buffer_transform(window_size, |mut window| {
      window.sort();
      window
    })
  }
}

// ==================== Subscribing ====================

impl<Item: Clone + Send + 'static> Publisher<Item> {
  /// Subscribe a `next` callback; errors and completion are ignored.
  ///
  /// Hot and published sources call observers while holding their internal
  /// lock. Subscribing to the same hot or published source from inside one
  /// of its callbacks deadlocks.
  pub fn subscribe<N>(&self, next: N) -> SubscriptionHandle
  where
    N: FnMut(Item) + Send + 'static,
  {
    self.subscribe_with(FnMutObserver(next))
  }

  /// Subscribe `next`, `error` and `complete` callbacks.
  pub fn subscribe_all<N, E, C>(&self, next: N, error: E, complete: C) -> SubscriptionHandle
  where
    N: FnMut(Item) + Send + 'static,
    E: FnOnce(RxError) + Send + 'static,
    C: FnOnce() + Send + 'static,
  {
    self.subscribe_with(AllObserver { next, error, complete })
  }

  /// Subscribe an observer.
  ///
  /// Cold sources have emitted everything by the time this returns; hot
  /// sources emit later, from their scheduler task.
  pub fn subscribe_with<O>(&self, observer: O) -> SubscriptionHandle
  where
    O: Observer<Item> + Send + 'static,
  {
    let handle = SubscriptionHandle::new();
    self.subscribe_boxed(Box::new(SubscribedObserver::new(observer, handle.clone())));
    handle
  }

  pub(crate) fn subscribe_boxed(&self, observer: BoxedObserver<Item>) {
    trace!(kind = self.kind(), "subscribe");
    match self {
      Publisher::Cold(source) => source.subscribe(observer),
      Publisher::Hot(source) => source.subscribe(observer),
      Publisher::Merged(merge) => merge.subscribe(observer),
      Publisher::Buffered(buffer) => buffer.subscribe(observer),
      Publisher::Published(source) => source.subscribe(observer),
    }
  }

  // ==================== Collecting ====================

  /// Block until the publisher completes and return everything it emitted,
  /// in arrival order.
  ///
  /// Fails with [`RxError::Timeout`] if `timeout` passes first, or with the
  /// publisher's own error.
  pub fn collect(&self, timeout: Duration) -> Result<Vec<Item>, RxError> {
    let (observer, pending) = CollectObserver::new();
    let handle = self.subscribe_with(observer);
    collect::wait(pending, handle, timeout)
  }

  /// Resolve with everything the publisher emitted once it completes.
  pub fn collect_future(&self) -> impl Future<Output = Result<Vec<Item>, RxError>> + Send + 'static {
    into_future::collect_future(self)
  }
}

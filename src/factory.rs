//! Free-function entry points.
//!
//! These mirror the methods on [`Publisher`] and [`ConnectablePublisher`] for
//! callers that prefer a function-style pipeline:
//!
//! ```rust
//! use rxflux::prelude::*;
//! use std::time::Duration;
//!
//! let sorted = buffer_transform(
//!   merge([cold([5, 1]), cold([4, 2, 3])]),
//!   5,
//!   |mut window| {
//!     window.sort();
//!     window
//!   },
//! );
//! assert_eq!(collect(&sorted, Duration::from_secs(1)), Ok(vec![1, 2, 3, 4, 5]));
//! ```

use std::time::Duration;

use crate::{
  error::RxError,
  ops::merge::Merge,
  publisher::{ConnectablePublisher, Connection, HotEmitter, Publisher},
  subscription::SubscriptionHandle,
};

/// A cold publisher over `values`.
pub fn cold<Item, I>(values: I) -> Publisher<Item>
where
  Item: Clone + Send + 'static,
  I: IntoIterator<Item = Item>,
{
  Publisher::cold(values)
}

/// A hot publisher driven by `procedure` on the default scheduler.
pub fn hot<Item, F>(procedure: F) -> Publisher<Item>
where
  Item: Clone + Send + 'static,
  F: FnOnce(&mut HotEmitter<Item>) -> Result<(), RxError> + Send + 'static,
{
  Publisher::hot(procedure)
}

/// Merge `publishers`, subscribing them in iteration order.
pub fn merge<Item, I>(publishers: I) -> Publisher<Item>
where
  Item: Clone + Send + 'static,
  I: IntoIterator<Item = Publisher<Item>>,
{
  Publisher::Merged(Merge::new(publishers.into_iter().collect()))
}

/// See [`Publisher::buffer_transform`].
pub fn buffer_transform<Item, F>(publisher: Publisher<Item>, window_size: usize, transform: F) -> Publisher<Item>
where
  Item: Clone + Send + 'static,
  F: Fn(Vec<Item>) -> Vec<Item> + Send + Sync + 'static,
{
  publisher.buffer_transform(window_size, transform)
}

/// Subscribe a `next` callback to `publisher`.
pub fn subscribe<Item, N>(publisher: &Publisher<Item>, next: N) -> SubscriptionHandle
where
  Item: Clone + Send + 'static,
  N: FnMut(Item) + Send + 'static,
{
  publisher.subscribe(next)
}

/// Start a connectable publisher; see [`ConnectablePublisher::connect`].
pub fn connect<Item>(connectable: &ConnectablePublisher<Item>) -> Connection
where
  Item: Clone + Send + 'static,
{
  connectable.connect()
}

/// Block until `publisher` completes; see [`Publisher::collect`].
pub fn collect<Item>(publisher: &Publisher<Item>, timeout: Duration) -> Result<Vec<Item>, RxError>
where
  Item: Clone + Send + 'static,
{
  publisher.collect(timeout)
}

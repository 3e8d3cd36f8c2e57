//! Connectable publisher for multicasting.
//!
//! `ConnectablePublisher` bridges a source [`Publisher`] and an internal
//! subject. Observers attach to the subject without starting anything;
//! `connect()` subscribes the subject to the source, exactly once.
//!
//! # Example
//!
//! ```rust
//! use rxflux::prelude::*;
//! use std::sync::{Arc, Mutex};
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sorted = Arc::new(Mutex::new(Vec::new()));
//!
//! let connectable = Publisher::cold([3, 1, 2]).publish();
//! let (s, t) = (seen.clone(), sorted.clone());
//! connectable.subscribe(move |v| s.lock().unwrap().push(v));
//! connectable.fork().sorted(3).subscribe(move |v| t.lock().unwrap().push(v));
//!
//! assert!(seen.lock().unwrap().is_empty());
//! connectable.connect();
//! connectable.connect();
//!
//! assert_eq!(*seen.lock().unwrap(), vec![3, 1, 2]);
//! assert_eq!(*sorted.lock().unwrap(), vec![1, 2, 3]);
//! ```

use std::sync::{
  atomic::{AtomicBool, Ordering},
  Arc,
};

use tracing::debug;

use super::Publisher;
use crate::{
  error::RxError,
  observer::{BoxedObserver, Observer},
  subject::Subject,
  subscription::{Subscription, SubscriptionHandle},
};

/// Subscribable view onto a connectable publisher's subject.
pub struct PublishedSource<Item> {
  subject: Subject<Item>,
}

impl<Item> Clone for PublishedSource<Item> {
  fn clone(&self) -> Self { Self { subject: self.subject.clone() } }
}

impl<Item> PublishedSource<Item> {
  pub(crate) fn subscribe(&self, observer: BoxedObserver<Item>) { self.subject.attach(observer); }
}

/// The link between a connectable publisher and its source.
#[derive(Clone, Debug)]
pub struct Connection {
  handle: SubscriptionHandle,
}

impl Connection {
  /// Detach the subject from its source.
  ///
  /// Observers of the connectable publisher stop receiving values but are not
  /// completed. A hot source sees `is_closed()` once nothing else listens.
  pub fn disconnect(self) {
    debug!("disconnecting connectable publisher");
    self.handle.unsubscribe();
  }
}

impl Subscription for Connection {
  fn unsubscribe(self) { self.disconnect(); }

  fn is_closed(&self) -> bool { self.handle.is_closed() }
}

/// Feeds the source into the subject until the connection closes.
///
/// It stays open while no observer is attached, so observers arriving after
/// `connect()` still get the later values and the terminal event.
struct ConnectionObserver<Item> {
  subject: Subject<Item>,
  handle: SubscriptionHandle,
}

impl<Item: Clone> Observer<Item> for ConnectionObserver<Item> {
  fn next(&mut self, value: Item) {
    if !self.handle.is_closed() {
      self.subject.next(value);
    }
  }

  fn error(self, err: RxError) {
    if self.handle.close() {
      self.subject.error(err);
    }
  }

  fn complete(self) {
    if self.handle.close() {
      self.subject.complete();
    }
  }

  fn is_closed(&self) -> bool { self.handle.is_closed() || self.subject.terminal().is_some() }
}

/// A publisher that only starts emitting when [`connect`](Self::connect) is
/// called.
pub struct ConnectablePublisher<Item> {
  source: Publisher<Item>,
  subject: Subject<Item>,
  connected: Arc<AtomicBool>,
  connection: Connection,
}

impl<Item> Clone for ConnectablePublisher<Item> {
  fn clone(&self) -> Self {
    Self {
      source: self.source.clone(),
      subject: self.subject.clone(),
      connected: self.connected.clone(),
      connection: self.connection.clone(),
    }
  }
}

impl<Item: Clone + Send + 'static> ConnectablePublisher<Item> {
  pub(crate) fn new(source: Publisher<Item>) -> Self {
    Self {
      source,
      subject: Subject::new(),
      connected: Arc::new(AtomicBool::new(false)),
      connection: Connection { handle: SubscriptionHandle::new() },
    }
  }

  /// A publisher sharing this connection; subscribing to it never starts the
  /// source.
  pub fn fork(&self) -> Publisher<Item> {
    Publisher::Published(PublishedSource { subject: self.subject.clone() })
  }

  /// Attach a `next` callback without starting emission.
  ///
  /// Callbacks run while the publisher's internal lock is held: subscribing
  /// to this publisher, or to a hot source feeding it, from inside a callback
  /// deadlocks.
  pub fn subscribe<N>(&self, next: N) -> SubscriptionHandle
  where
    N: FnMut(Item) + Send + 'static,
  {
    self.fork().subscribe(next)
  }

  /// Attach an observer without starting emission.
  pub fn subscribe_with<O>(&self, observer: O) -> SubscriptionHandle
  where
    O: Observer<Item> + Send + 'static,
  {
    self.fork().subscribe_with(observer)
  }

  /// Start the source. Only the first call does anything; every call
  /// returns the same [`Connection`].
  pub fn connect(&self) -> Connection {
    if !self.connected.swap(true, Ordering::AcqRel) {
      debug!(mode = ?self.source.mode(), "connecting publisher");
      let observer = ConnectionObserver {
        subject: self.subject.clone(),
        handle: self.connection.handle.clone(),
      };
      self.source.subscribe_boxed(Box::new(observer));
    }
    self.connection.clone()
  }

  pub fn is_connected(&self) -> bool { self.connected.load(Ordering::Acquire) }
}

#[cfg(test)]
mod tests {
  use std::{
    sync::{atomic::AtomicUsize, mpsc::channel, Mutex},
    time::Duration,
  };

  use super::*;
  use crate::{error::RxError, observer::AllObserver};

  #[rxflux_macro::test]
  fn nothing_flows_before_connect() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let c_seen = seen.clone();
    let connectable = Publisher::cold([1, 2, 3]).publish();
    connectable.subscribe(move |v| c_seen.lock().unwrap().push(v));

    assert!(seen.lock().unwrap().is_empty());
    assert!(!connectable.is_connected());

    connectable.connect();
    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
  }

  #[rxflux_macro::test]
  fn connect_twice_starts_hot_emission_once() {
    let starts = Arc::new(AtomicUsize::new(0));
    let c_starts = starts.clone();
    let hot = Publisher::hot(move |emitter| {
      c_starts.fetch_add(1, Ordering::SeqCst);
      for v in 1..=4 {
        emitter.next(v);
      }
      Ok(())
    });
    let connectable = hot.publish();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let c_seen = seen.clone();
    let (done_tx, done_rx) = channel();
    connectable.subscribe_with(AllObserver {
      next: move |v: i32| c_seen.lock().unwrap().push(v),
      error: |_: RxError| {},
      complete: move || {
        let _ = done_tx.send(());
      },
    });

    connectable.connect();
    connectable.connect();
    assert!(connectable.is_connected());

    done_rx.recv_timeout(Duration::from_secs(1)).unwrap();
    assert_eq!(starts.load(Ordering::SeqCst), 1);
    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3, 4]);
  }

  #[rxflux_macro::test]
  fn every_early_observer_sees_full_sequence() {
    let hot = Publisher::hot(|emitter| {
      for v in [5, 3, 9, 1] {
        emitter.next(v);
      }
      Ok(())
    });
    let connectable = hot.publish();

    let raw = Arc::new(Mutex::new(Vec::new()));
    let sorted = Arc::new(Mutex::new(Vec::new()));
    let (done_tx, done_rx) = channel();
    let views = [(raw.clone(), connectable.fork()), (sorted.clone(), connectable.fork().sorted(4))];
    for (store, publisher) in views {
      let done_tx = done_tx.clone();
      publisher.subscribe_all(
        move |v| store.lock().unwrap().push(v),
        |_| {},
        move || {
          let _ = done_tx.send(());
        },
      );
    }

    connectable.connect();
    for _ in 0..2 {
      done_rx.recv_timeout(Duration::from_secs(1)).unwrap();
    }

    assert_eq!(*raw.lock().unwrap(), vec![5, 3, 9, 1]);
    assert_eq!(*sorted.lock().unwrap(), vec![1, 3, 5, 9]);
  }

  #[rxflux_macro::test]
  fn disconnect_stops_delivery() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let c_seen = seen.clone();
    let (value_tx, value_rx) = channel();
    let (step_tx, step_rx) = channel::<()>();
    let (done_tx, done_rx) = channel();

    let hot = Publisher::hot(move |emitter| {
      emitter.next(1);
      let _ = step_rx.recv_timeout(Duration::from_secs(1));
      let closed = emitter.is_closed();
      emitter.next(2);
      let _ = done_tx.send(closed);
      Ok(())
    });
    let connectable = hot.publish();
    connectable.subscribe(move |v| {
      c_seen.lock().unwrap().push(v);
      let _ = value_tx.send(());
    });
    let connection = connectable.connect();

    value_rx.recv_timeout(Duration::from_secs(1)).unwrap();
    connection.clone().disconnect();
    assert!(connection.is_closed());
    let _ = step_tx.send(());

    assert_eq!(done_rx.recv_timeout(Duration::from_secs(1)), Ok(true));
    assert_eq!(*seen.lock().unwrap(), vec![1]);
  }

  #[rxflux_macro::test]
  fn subscriber_after_connect_gets_later_values() {
    let (emitted_tx, emitted_rx) = channel();
    let (go_tx, go_rx) = channel::<()>();
    let hot = Publisher::hot(move |emitter| {
      emitter.next(1);
      let _ = emitted_tx.send(());
      let _ = go_rx.recv_timeout(Duration::from_secs(1));
      emitter.next(2);
      emitter.next(3);
      Ok(())
    });
    let connectable = hot.publish();
    connectable.connect();
    emitted_rx.recv_timeout(Duration::from_secs(1)).unwrap();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let c_seen = seen.clone();
    let (done_tx, done_rx) = channel();
    connectable.fork().subscribe_all(
      move |v| c_seen.lock().unwrap().push(v),
      |_| {},
      move || {
        let _ = done_tx.send(());
      },
    );
    go_tx.send(()).unwrap();

    done_rx.recv_timeout(Duration::from_secs(1)).unwrap();
    assert_eq!(*seen.lock().unwrap(), vec![2, 3]);
  }

  #[rxflux_macro::test]
  fn cold_connected_before_subscribe_completes_empty() {
    let connectable = Publisher::cold([1, 2, 3]).publish();
    let connection = connectable.connect();
    assert!(connection.is_closed());
    assert_eq!(connectable.fork().collect(Duration::from_millis(300)), Ok(vec![]));
  }
}

//! Non-blocking counterpart of the blocking collector.
//!
//! The returned future resolves once the publisher completes (`Ok` with every
//! value in arrival order) or fails (`Err`). A hot publisher that never
//! completes leaves the future pending; wrap it in a runtime timeout if that
//! matters.

use std::future::Future;

use futures::{channel::oneshot, FutureExt};

use crate::{error::RxError, observer::Observer, publisher::Publisher};

struct FutureObserver<Item> {
  values: Vec<Item>,
  sender: Option<oneshot::Sender<Result<Vec<Item>, RxError>>>,
}

impl<Item> Observer<Item> for FutureObserver<Item> {
  fn next(&mut self, value: Item) { self.values.push(value); }

  fn error(mut self, err: RxError) {
    if let Some(sender) = self.sender.take() {
      let _ = sender.send(Err(err));
    }
  }

  fn complete(mut self) {
    if let Some(sender) = self.sender.take() {
      let _ = sender.send(Ok(self.values));
    }
  }

  fn is_closed(&self) -> bool { self.sender.as_ref().map_or(true, oneshot::Sender::is_canceled) }
}

pub(crate) fn collect_future<Item>(
  publisher: &Publisher<Item>,
) -> impl Future<Output = Result<Vec<Item>, RxError>> + Send + 'static
where
  Item: Clone + Send + 'static,
{
  let (sender, receiver) = oneshot::channel();
  publisher.subscribe_with(FutureObserver { values: Vec::new(), sender: Some(sender) });
  receiver.map(|received| {
    received.unwrap_or_else(|_| Err(RxError::emission("publisher dropped its subscriber before terminating")))
  })
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use crate::prelude::*;

  #[rxflux_macro::test(local)]
  async fn resolves_cold_sequence() {
    let numbers = Publisher::cold([3, 1, 2]).sorted(3);
    assert_eq!(numbers.collect_future().await, Ok(vec![1, 2, 3]));
  }

  #[rxflux_macro::test(shared)]
  async fn resolves_hot_sequence() {
    let hot = Publisher::hot(|emitter| {
      for v in 0..5 {
        emitter.next(v);
        std::thread::sleep(Duration::from_millis(1));
      }
      Ok(())
    });
    assert_eq!(hot.collect_future().await, Ok(vec![0, 1, 2, 3, 4]));
  }

  #[rxflux_macro::test(local)]
  async fn resolves_error() {
    let failing = Publisher::<i32>::throw_err(RxError::emission("nope"));
    assert_eq!(failing.collect_future().await, Err(RxError::emission("nope")));
  }

  #[rxflux_macro::test(shared)]
  async fn pending_until_runtime_timeout() {
    let (tx, rx) = std::sync::mpsc::channel::<()>();
    let stalled = Publisher::<i32>::hot(move |_| {
      let _ = rx.recv_timeout(Duration::from_secs(2));
      Ok(())
    });
    let waited = tokio::time::timeout(Duration::from_millis(30), stalled.collect_future()).await;
    assert!(waited.is_err());
    let _ = tx.send(());
  }
}

//! BufferTransform operator implementation.

use std::sync::Arc;

use crate::{
  error::RxError,
  observer::{BoxedObserver, Observer},
  publisher::Publisher,
};

/// Function applied to every window.
pub type WindowTransform<Item> = Arc<dyn Fn(Vec<Item>) -> Vec<Item> + Send + Sync>;

/// BufferTransform operator.
///
/// Collects items into a `Vec` until `window_size` is reached, passes the
/// window through the transform and emits the result one value at a time.
/// When the source completes, a non-empty partial window is transformed and
/// emitted before completion. An error drops the pending window.
pub struct BufferTransform<Item> {
  source: Box<Publisher<Item>>,
  window_size: usize,
  transform: WindowTransform<Item>,
}

impl<Item> Clone for BufferTransform<Item> {
  fn clone(&self) -> Self {
    Self {
      source: self.source.clone(),
      window_size: self.window_size,
      transform: self.transform.clone(),
    }
  }
}

impl<Item: Clone + Send + 'static> BufferTransform<Item> {
  pub(crate) fn new<F>(source: Publisher<Item>, window_size: usize, transform: F) -> Self
  where
    F: Fn(Vec<Item>) -> Vec<Item> + Send + Sync + 'static,
  {
    assert!(window_size > 0, "buffer_transform window size must be non-zero");
    Self { source: Box::new(source), window_size, transform: Arc::new(transform) }
  }

  pub fn source(&self) -> &Publisher<Item> { &self.source }

  pub(crate) fn subscribe(&self, observer: BoxedObserver<Item>) {
    let wrapped = BufferTransformObserver {
      observer,
      buffer: Vec::with_capacity(self.window_size),
      window_size: self.window_size,
      transform: self.transform.clone(),
    };
    self.source.subscribe_boxed(Box::new(wrapped));
  }
}

/// Observer for BufferTransform.
struct BufferTransformObserver<Item> {
  observer: BoxedObserver<Item>,
  buffer: Vec<Item>,
  window_size: usize,
  transform: WindowTransform<Item>,
}

impl<Item> BufferTransformObserver<Item> {
  fn flush(&mut self) {
    let window = std::mem::replace(&mut self.buffer, Vec::with_capacity(self.window_size));
    for v in (self.transform)(window) {
      if self.observer.is_closed() {
        break;
      }
      self.observer.next(v);
    }
  }
}

impl<Item> Observer<Item> for BufferTransformObserver<Item> {
  fn next(&mut self, v: Item) {
    self.buffer.push(v);
    if self.buffer.len() >= self.window_size {
      self.flush();
    }
  }

  fn error(self, e: RxError) { self.observer.error(e); }

  fn complete(mut self) {
    if !self.buffer.is_empty() {
      self.flush();
    }
    self.observer.complete();
  }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

#[cfg(test)]
mod tests {
  use std::{
    sync::{Arc, Mutex},
    time::Duration,
  };

  use crate::prelude::*;

  const TIMEOUT: Duration = Duration::from_secs(1);

  fn pull_numbers() -> Publisher<i32> {
    merge([Publisher::just(0), Publisher::cold([1, 3, 5, 7]), Publisher::cold([2, 4, 6, 8])])
  }

  #[rxflux_macro::test]
  fn one_window_sorts_everything() {
    assert_eq!(pull_numbers().sorted(9).collect(TIMEOUT), Ok((0..=8).collect()));
  }

  #[rxflux_macro::test]
  fn windows_are_transformed_independently() {
    let sorted = Publisher::cold([3, 1, 2, 9, 8, 7, 5]).sorted(3);
    assert_eq!(sorted.collect(TIMEOUT), Ok(vec![1, 2, 3, 7, 8, 9, 5]));
  }

  #[rxflux_macro::test]
  fn partial_window_is_flushed_on_complete() {
    let reversed = Publisher::cold([1, 2, 3, 4, 5]).buffer_transform(4, |mut w| {
      w.reverse();
      w
    });
    assert_eq!(reversed.collect(TIMEOUT), Ok(vec![4, 3, 2, 1, 5]));
  }

  #[rxflux_macro::test]
  fn transform_may_change_window_length() {
    let deduped = Publisher::cold([1, 1, 2, 2, 2, 3]).buffer_transform(3, |mut w| {
      w.dedup();
      w
    });
    assert_eq!(deduped.collect(TIMEOUT), Ok(vec![1, 2, 2, 3]));
  }

  #[rxflux_macro::test]
  fn empty_source_emits_no_window() {
    let calls = Arc::new(Mutex::new(0));
    let c_calls = calls.clone();
    let counted = Publisher::<i32>::empty().buffer_transform(2, move |w| {
      *c_calls.lock().unwrap() += 1;
      w
    });
    assert_eq!(counted.collect(TIMEOUT), Ok(vec![]));
    assert_eq!(*calls.lock().unwrap(), 0);
  }

  #[rxflux_macro::test]
  fn error_drops_pending_window() {
    let failing = merge([Publisher::cold([2, 1]), Publisher::throw_err(RxError::emission("late"))]);
    assert_eq!(failing.sorted(4).collect(TIMEOUT), Err(RxError::emission("late")));
  }

  #[rxflux_macro::test]
  #[should_panic(expected = "window size must be non-zero")]
  fn zero_window_panics() { let _ = Publisher::cold([1]).buffer_transform(0, |w| w); }
}

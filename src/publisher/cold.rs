use std::sync::Arc;

use crate::{
  error::RxError,
  observer::{BoxedObserver, Observer},
};

/// A pre-materialized sequence replayed on every subscription.
///
/// Emission is synchronous on the subscribing thread: every value, then
/// `complete` (or the configured error).
pub struct ColdSource<Item> {
  items: Arc<[Item]>,
  error: Option<RxError>,
}

impl<Item> Clone for ColdSource<Item> {
  fn clone(&self) -> Self { Self { items: self.items.clone(), error: self.error.clone() } }
}

impl<Item> ColdSource<Item> {
  pub(crate) fn new(items: impl IntoIterator<Item = Item>) -> Self {
    Self { items: items.into_iter().collect(), error: None }
  }

  pub(crate) fn failing(error: RxError) -> Self { Self { items: Arc::from(Vec::new()), error: Some(error) } }
}

impl<Item: Clone> ColdSource<Item> {
  pub(crate) fn subscribe(&self, mut observer: BoxedObserver<Item>) {
    for v in self.items.iter() {
      if observer.is_closed() {
        return;
      }
      observer.next(v.clone());
    }
    match &self.error {
      Some(err) => observer.error(err.clone()),
      None => observer.complete(),
    }
  }
}

use std::{
  any::Any,
  panic::{self, AssertUnwindSafe},
  sync::{Arc, Mutex, PoisonError},
};

use tracing::{debug, trace};

use crate::{
  error::RxError,
  observer::{BoxedObserver, Observer},
  scheduler::SharedScheduler,
  subject::{Subject, Terminal},
};

/// The body of a hot publisher.
///
/// It runs once, on a scheduler task. Returning `Ok(())` completes the
/// publisher unless the procedure already terminated it through the emitter;
/// returning `Err` delivers the error to every subscriber.
pub type EmissionProcedure<Item> =
  Box<dyn FnOnce(&mut HotEmitter<Item>) -> Result<(), RxError> + Send + 'static>;

/// Handle given to an emission procedure for pushing values.
///
/// Calls after a terminal event are ignored.
pub struct HotEmitter<Item> {
  subject: Subject<Item>,
}

impl<Item: Clone> HotEmitter<Item> {
  pub fn next(&mut self, value: Item) { self.subject.next(value); }

  pub fn error(&mut self, err: RxError) { self.subject.clone().error(err); }

  pub fn complete(&mut self) { self.subject.clone().complete(); }

  /// `true` once the publisher terminated or every subscriber left.
  ///
  /// Long-running procedures check this between values and return early.
  pub fn is_closed(&self) -> bool { self.subject.is_closed() }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
  let reason = payload
    .downcast_ref::<&str>()
    .map(|s| s.to_string())
    .or_else(|| payload.downcast_ref::<String>().cloned())
    .unwrap_or_else(|| "unknown cause".to_string());
  format!("emission procedure panicked: {reason}")
}

struct HotCore<Item> {
  subject: Subject<Item>,
  procedure: Mutex<Option<EmissionProcedure<Item>>>,
  scheduler: SharedScheduler,
}

/// A publisher whose values are produced asynchronously by an emission
/// procedure. The procedure starts with the first subscription and is never
/// replayed.
pub struct HotSource<Item> {
  core: Arc<HotCore<Item>>,
}

impl<Item> Clone for HotSource<Item> {
  fn clone(&self) -> Self { Self { core: self.core.clone() } }
}

impl<Item: Clone + Send + 'static> HotSource<Item> {
  pub(crate) fn new(scheduler: SharedScheduler, procedure: EmissionProcedure<Item>) -> Self {
    Self {
      core: Arc::new(HotCore {
        subject: Subject::new(),
        procedure: Mutex::new(Some(procedure)),
        scheduler,
      }),
    }
  }

  pub(crate) fn subscribe(&self, observer: BoxedObserver<Item>) {
    self.core.subject.attach(observer);
    self.start();
  }

  fn start(&self) {
    let procedure = self
      .core
      .procedure
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .take();
    let Some(procedure) = procedure else { return };

    let subject = self.core.subject.clone();
    let task = move || {
      trace!("hot emission started");
      let mut emitter = HotEmitter { subject };
      let outcome = panic::catch_unwind(AssertUnwindSafe(|| procedure(&mut emitter)))
        .unwrap_or_else(|payload| Err(RxError::emission(panic_message(payload.as_ref()))));
      match outcome {
        Ok(()) => emitter.complete(),
        Err(err) => {
          debug!(error = %err, label = err.as_label(), "hot emission failed");
          emitter.error(err);
        }
      }
      trace!(
        completed = matches!(emitter.subject.terminal(), Some(Terminal::Completed)),
        "hot emission finished"
      );
    };
    if let Err(err) = self.core.scheduler.schedule(Box::new(task)) {
      debug!(error = %err, "could not schedule hot emission");
      self.core.subject.clone().error(err);
    }
  }
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use crate::prelude::*;

  #[rxflux_macro::test]
  fn panicking_procedure_errors_subscribers() {
    let faulty = Publisher::hot(|emitter| {
      emitter.next(1);
      panic!("procedure bug")
    });
    assert_eq!(
      faulty.collect(Duration::from_secs(1)),
      Err(RxError::emission("emission procedure panicked: procedure bug"))
    );
  }

  #[rxflux_macro::test]
  fn panic_with_formatted_message_is_reported() {
    let faulty = Publisher::<i32>::hot(|_| panic!("sensor {} offline", 3));
    assert_eq!(
      faulty.collect(Duration::from_secs(1)),
      Err(RxError::emission("emission procedure panicked: sensor 3 offline"))
    );
  }
}

//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

pub use std::time::Duration;

pub use crate::{
  error::RxError,
  factory::{buffer_transform, cold, collect, connect, hot, merge, subscribe},
  observer::{AllObserver, FnMutObserver, Observer},
  publisher::{ConnectablePublisher, Connection, HotEmitter, Mode, Publisher},
  scheduler::{default_scheduler, NewThreadScheduler, Scheduler, SharedScheduler},
  subscription::{Subscription, SubscriptionHandle},
};
#[cfg(feature = "futures-scheduler")]
pub use crate::scheduler::ThreadPoolScheduler;
#[cfg(feature = "tokio-scheduler")]
pub use crate::scheduler::TokioScheduler;

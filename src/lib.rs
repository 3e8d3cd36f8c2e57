//! # rxflux: push and pull streams on one small engine
//!
//! Cold publishers replay pre-existing data; hot publishers push values from
//! a background task as they arrive. Both compose through the same
//! operators and are consumed either by subscribing callbacks or by blocking
//! until completion.
//!
//! ## Quick Start
//!
//! ```rust
//! use rxflux::prelude::*;
//!
//! // Pull: the data exists up front and is emitted synchronously.
//! let pulled = Publisher::just(0)
//!   .merge_with(Publisher::cold([1, 3, 5, 7]))
//!   .merge_with(Publisher::cold([2, 4, 6, 8]));
//! let values = pulled.collect(Duration::from_secs(1)).unwrap_or_default();
//! assert_eq!(values, vec![0, 1, 3, 5, 7, 2, 4, 6, 8]);
//!
//! // Push: values arrive from a background task.
//! let pushed = Publisher::hot(|emitter| {
//!   for v in [3, 1, 2] {
//!     emitter.next(v);
//!   }
//!   Ok(())
//! });
//! assert_eq!(pushed.sorted(3).collect(Duration::from_secs(1)), Ok(vec![1, 2, 3]));
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Publisher`] | Cold, hot, merged, buffered or published source |
//! | [`ConnectablePublisher`] | Multicast source started by `connect()` |
//! | [`Observer`] | Consumes `next`, `error`, and `complete` events |
//! | [`SubscriptionHandle`] | Handle to cancel an active subscription |
//! | [`Scheduler`] | Where hot emission procedures run |
//!
//! ## Feature Flags
//!
//! - **`futures-scheduler`** (default): adds `ThreadPoolScheduler`, a
//!   bounded `futures` thread pool for `Publisher::hot_with`. Without an
//!   explicit scheduler every hot procedure gets its own thread
//! - **`tokio-scheduler`**: adds `TokioScheduler`
//!
//! [`Publisher`]: publisher::Publisher
//! [`ConnectablePublisher`]: publisher::ConnectablePublisher
//! [`Observer`]: observer::Observer
//! [`SubscriptionHandle`]: subscription::SubscriptionHandle
//! [`Scheduler`]: scheduler::Scheduler

pub mod error;
pub mod factory;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod publisher;
pub mod scheduler;
mod subject;
pub mod subscription;

pub use error::RxError;
pub use prelude::*;

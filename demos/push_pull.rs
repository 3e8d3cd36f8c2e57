//! Pull and push streams side by side.
//!
//! Run with `RUST_LOG=rxflux=trace cargo run --example push_pull` to see the
//! engine's own events.

use std::{thread, time::Duration};

use rand::Rng;
use rxflux::prelude::*;
use tracing_subscriber::EnvFilter;

const PUBLISH_SLEEP_BOUND_MS: u64 = 501;
const PUBLISH_MAX_VALUE: u32 = 8;
const WAIT: Duration = Duration::from_secs(10);

fn hot_numbers(parity: u32) -> Publisher<u32> {
  Publisher::hot(move |emitter| {
    for v in (1..=PUBLISH_MAX_VALUE).filter(|v| v % 2 == parity) {
      if emitter.is_closed() {
        break;
      }
      thread::sleep(Duration::from_millis(rand::thread_rng().gen_range(0..PUBLISH_SLEEP_BOUND_MS)));
      emitter.next(v);
    }
    Ok(())
  })
}

fn pull_numbers() -> Publisher<u32> {
  Publisher::just(0)
    .merge_with(Publisher::cold([1, 3, 5, 7]))
    .merge_with(Publisher::cold([2, 4, 6, 8]))
}

fn push_numbers() -> ConnectablePublisher<u32> {
  Publisher::just(0)
    .merge_with(hot_numbers(1))
    .merge_with(hot_numbers(0))
    .publish()
}

fn pull_blocking() {
  println!("pull, blocking read");
  let values = pull_numbers().collect(WAIT).unwrap_or_default();
  println!("  {values:?}");
}

fn pull_subscribe() {
  println!("pull, subscription");
  pull_numbers().subscribe(|v| println!("  next {v}"));
}

fn push_subscribe(sorted: bool) {
  println!("push, subscription{}", if sorted { ", sorted windows of 9" } else { "" });
  let connectable = push_numbers();
  let view = if sorted { connectable.fork().sorted(9) } else { connectable.fork() };
  let (done_tx, done_rx) = std::sync::mpsc::channel();
  view.subscribe_all(
    |v| println!("  next {v}"),
    |err| println!("  error {err}"),
    move || {
      let _ = done_tx.send(());
    },
  );
  connectable.connect();
  if done_rx.recv_timeout(WAIT).is_err() {
    println!("  gave up after {WAIT:?}");
  }
}

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  pull_blocking();
  pull_subscribe();
  push_subscribe(false);
  push_subscribe(true);
}

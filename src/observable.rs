//! Observables
//!
//! An [`Observable`] is a reusable producer: every subscribe call runs the
//! producer again, independently of every other subscription. All factories
//! in this module are built on [`create`], which wraps the observer in a
//! [`Subscriber`] and hands back a subscription the caller may release at any
//! time, even before production has started.
//!
//! The free functions take the scheduler they produce on. The same factories
//! with the default schedulers of a [`Context`](crate::context::Context) live
//! on [`ObservableFactory`](crate::factory::ObservableFactory).
//!
//! ```rust
//! use rxcore::prelude::*;
//!
//! let numbers: Observable<i64, ()> = observable::range(0, 3, ImmediateScheduler).unwrap();
//! numbers.subscribe(|v| println!("{v}"));
//! ```

use std::sync::Arc;

use crate::{
  observer::{FnMutObserver, ObserverAll},
  subscription::{BoxedSubscription, SingleAssignmentSubscription},
};

mod create;
mod defer;
mod of;
mod range;
mod repeat;
mod start;
mod trivial;

pub use create::*;
pub use defer::*;
pub use of::*;
pub use range::*;
pub use repeat::*;
pub use start::*;
pub use trivial::*;

#[cfg(test)]
pub(crate) use create::tests::Recorder;

type Producer<Item, Err> = dyn Fn(Subscriber<Item, Err>) -> BoxedSubscription + Send + Sync;

/// A push-based stream of `Item`s that may fail with `Err`.
///
/// Cloning is cheap and clones share the producer, not any subscription state.
pub struct Observable<Item, Err> {
  producer: Arc<Producer<Item, Err>>,
}

impl<Item, Err> Clone for Observable<Item, Err> {
  fn clone(&self) -> Self { Observable { producer: self.producer.clone() } }
}

impl<Item: Send + 'static, Err: Send + 'static> Observable<Item, Err> {
  /// Subscribe with a `next` handler. Errors and completion are dropped.
  pub fn subscribe<N>(&self, next: N) -> SingleAssignmentSubscription
  where
    N: FnMut(Item) + Send + 'static,
  {
    self.subscribe_with(FnMutObserver(next))
  }

  /// Subscribe with one handler per channel.
  pub fn subscribe_all<N, E, C>(&self, next: N, error: E, complete: C) -> SingleAssignmentSubscription
  where
    N: FnMut(Item) + Send + 'static,
    E: FnOnce(Err) + Send + 'static,
    C: FnOnce() + Send + 'static,
  {
    self.subscribe_with(ObserverAll::new(next, error, complete))
  }

  pub fn subscribe_err<N, E>(&self, next: N, error: E) -> SingleAssignmentSubscription
  where
    N: FnMut(Item) + Send + 'static,
    E: FnOnce(Err) + Send + 'static,
  {
    self.subscribe_with(ObserverAll::new(next, error, || {}))
  }

  pub fn subscribe_complete<N, C>(&self, next: N, complete: C) -> SingleAssignmentSubscription
  where
    N: FnMut(Item) + Send + 'static,
    C: FnOnce() + Send + 'static,
  {
    self.subscribe_with(ObserverAll::new(next, |_: Err| {}, complete))
  }
}

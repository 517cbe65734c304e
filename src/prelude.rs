//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

pub use crate::{
  context::Context,
  error::RxError,
  factory::ObservableFactory,
  observable::{self, Observable, Subscriber},
  observer::{BoxedObserver, FnMutObserver, Observer, ObserverAll},
  scheduler::{
    CurrentThreadScheduler, ImmediateScheduler, Recurse, Scheduler, Task, TaskHandle, TaskState,
    TestScheduler, ThreadPoolScheduler,
  },
  subject::AsyncSubject,
  subscription::*,
  type_hint::TypeHint,
};
#[cfg(feature = "tokio-scheduler")]
pub use crate::scheduler::TokioScheduler;

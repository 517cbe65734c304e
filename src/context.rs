//! The default schedulers of an application.
//!
//! Factories that do not take a scheduler argument get one from a
//! [`Context`]: the immediate scheduler for `empty`/`of`/`throw_err`, the
//! current-thread trampoline for `range`/`repeat`, the thread pool for
//! `start`/`to_async`. The set is an ordinary value built at the composition
//! root, so tests can swap any member for a [`TestScheduler`].
//!
//! ```rust
//! use rxcore::prelude::*;
//!
//! let test = TestScheduler::new();
//! let ctx = Context::new().with_thread_pool(test.clone());
//! let answer = ctx.start(|| Ok::<_, ()>(42));
//! test.flush();
//! answer.subscribe(|v| assert_eq!(v, 42));
//! ```
//!
//! [`TestScheduler`]: crate::scheduler::TestScheduler

use crate::scheduler::{CurrentThreadScheduler, ImmediateScheduler, Scheduler, ThreadPoolScheduler};

/// A set of default schedulers.
#[derive(Clone, Default)]
pub struct Context<I = ImmediateScheduler, T = CurrentThreadScheduler, P = ThreadPoolScheduler> {
  immediate: I,
  current_thread: T,
  thread_pool: P,
}

impl Context {
  /// The standard set: [`ImmediateScheduler`], [`CurrentThreadScheduler`]
  /// and the shared [`ThreadPoolScheduler`].
  pub fn new() -> Self { Self::default() }
}

impl<I, T, P> Context<I, T, P>
where
  I: Scheduler,
  T: Scheduler,
  P: Scheduler,
{
  pub fn immediate(&self) -> &I { &self.immediate }

  pub fn current_thread(&self) -> &T { &self.current_thread }

  pub fn thread_pool(&self) -> &P { &self.thread_pool }

  pub fn with_immediate<S: Scheduler>(self, immediate: S) -> Context<S, T, P> {
    Context { immediate, current_thread: self.current_thread, thread_pool: self.thread_pool }
  }

  pub fn with_current_thread<S: Scheduler>(self, current_thread: S) -> Context<I, S, P> {
    Context { immediate: self.immediate, current_thread, thread_pool: self.thread_pool }
  }

  pub fn with_thread_pool<S: Scheduler>(self, thread_pool: S) -> Context<I, T, S> {
    Context { immediate: self.immediate, current_thread: self.current_thread, thread_pool }
  }
}

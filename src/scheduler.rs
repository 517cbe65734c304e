//! Scheduling
//!
//! A [`Scheduler`] decides when and where a unit of work runs. Work is a
//! [`Task`]: a step function the scheduler drives until it reports
//! [`TaskState::Finished`]. A self-recursive unit of work does not call itself;
//! it asks for another step through [`Recurse::again`] and the scheduler loops.
//! That keeps unbounded generation (an infinite `repeat`) and finite generation
//! (a `range`) at constant stack depth on every scheduler.
//!
//! | Scheduler | Where work runs |
//! |-----------|-----------------|
//! | [`ImmediateScheduler`] | Synchronously, inside `schedule` |
//! | [`CurrentThreadScheduler`] | On this thread's trampoline: nested requests queue up behind the running unit |
//! | [`ThreadPoolScheduler`] | On a `futures` thread pool |
//! | [`TestScheduler`] | Only when the test drives it |
//! | `TokioScheduler` | On a tokio runtime (feature `tokio-scheduler`) |
//!
//! Every `schedule*` call returns a [`TaskHandle`]. Releasing the handle stops
//! the task before its next step.

use std::{
  future::Future,
  pin::Pin,
  sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, PoisonError,
  },
  task::{Context, Poll, Waker},
};

use crate::subscription::Subscription;

mod current_thread;
mod immediate;
pub mod test_scheduler;
mod thread_pool_scheduler;
#[cfg(feature = "tokio-scheduler")]
mod tokio_scheduler;

pub use current_thread::CurrentThreadScheduler;
pub use immediate::ImmediateScheduler;
pub use test_scheduler::TestScheduler;
pub use thread_pool_scheduler::ThreadPoolScheduler;
#[cfg(feature = "tokio-scheduler")]
pub use tokio_scheduler::TokioScheduler;

// ==================== Task ====================

/// Result of running one step of a [`Task`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TaskState {
  /// The task is done and must not be stepped again.
  Finished,
  /// The task wants another step.
  Yield,
}

/// Continuation handed to a self-recursive action.
///
/// Calling [`again`](Recurse::again) asks the scheduler to invoke the action
/// once more with the given state. Not calling it ends the recursion.
pub struct Recurse<St>(Option<St>);

impl<St> Recurse<St> {
  #[inline]
  pub fn again(&mut self, state: St) { self.0 = Some(state); }
}

/// A unit of work for a [`Scheduler`].
pub struct Task(Box<dyn FnMut() -> TaskState + Send>);

impl Task {
  /// A one-shot action.
  pub fn once<F>(f: F) -> Self
  where
    F: FnOnce() + Send + 'static,
  {
    let mut f = Some(f);
    Task(Box::new(move || {
      if let Some(f) = f.take() {
        f();
      }
      TaskState::Finished
    }))
  }

  /// A self-recursive action, first invoked with `state`.
  pub fn recursive<St, F>(state: St, mut action: F) -> Self
  where
    St: Send + 'static,
    F: FnMut(St, &mut Recurse<St>) + Send + 'static,
  {
    let mut state = Some(state);
    Task(Box::new(move || {
      let Some(current) = state.take() else {
        return TaskState::Finished;
      };
      let mut recurse = Recurse(None);
      action(current, &mut recurse);
      match recurse.0 {
        Some(next) => {
          state = Some(next);
          TaskState::Yield
        }
        None => TaskState::Finished,
      }
    }))
  }

  /// Run one step.
  #[inline]
  pub fn step(&mut self) -> TaskState { (self.0)() }
}

// ==================== TaskHandle ====================

struct HandleState {
  cancelled: AtomicBool,
  finished: AtomicBool,
  waker: Mutex<Option<Waker>>,
}

/// Cancellation handle of a scheduled [`Task`].
///
/// It is also a `Future` that resolves once the task has finished or has been
/// cancelled, so async code can wait for scheduled work.
#[derive(Clone)]
pub struct TaskHandle(Arc<HandleState>);

impl TaskHandle {
  pub fn new() -> Self {
    TaskHandle(Arc::new(HandleState {
      cancelled: AtomicBool::new(false),
      finished: AtomicBool::new(false),
      waker: Mutex::new(None),
    }))
  }

  /// A handle for work that has already run.
  pub fn finished() -> Self {
    let handle = Self::new();
    handle.mark_finished();
    handle
  }

  pub fn is_cancelled(&self) -> bool { self.0.cancelled.load(Ordering::Acquire) }

  pub fn is_finished(&self) -> bool { self.0.finished.load(Ordering::Acquire) }

  pub(crate) fn mark_finished(&self) {
    self.0.finished.store(true, Ordering::Release);
    self.wake();
  }

  fn wake(&self) {
    let waker = self
      .0
      .waker
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .take();
    if let Some(waker) = waker {
      waker.wake();
    }
  }
}

impl Default for TaskHandle {
  fn default() -> Self { Self::new() }
}

impl Subscription for TaskHandle {
  fn unsubscribe(self) {
    self.0.cancelled.store(true, Ordering::Release);
    self.wake();
  }

  fn is_closed(&self) -> bool { self.is_finished() || self.is_cancelled() }
}

impl Future for TaskHandle {
  type Output = ();

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    if self.is_closed() {
      return Poll::Ready(());
    }
    *self
      .0
      .waker
      .lock()
      .unwrap_or_else(PoisonError::into_inner) = Some(cx.waker().clone());
    // Re-check: the task may have finished between the first check and the
    // waker being stored.
    if self.is_closed() { Poll::Ready(()) } else { Poll::Pending }
  }
}

/// Step `task` until it finishes or `handle` is released.
pub(crate) fn run_to_end(task: &mut Task, handle: &TaskHandle) {
  while !handle.is_closed() {
    if task.step() == TaskState::Finished {
      handle.mark_finished();
      break;
    }
  }
}

/// Drives a [`Task`] as a future, one step per poll, so executors can
/// interleave other work between steps of a long-running task.
pub(crate) struct TaskFuture {
  task: Task,
  handle: TaskHandle,
}

impl TaskFuture {
  pub(crate) fn new(task: Task, handle: TaskHandle) -> Self { TaskFuture { task, handle } }
}

impl Future for TaskFuture {
  type Output = ();

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
    let this = self.get_mut();
    if this.handle.is_closed() {
      return Poll::Ready(());
    }
    match this.task.step() {
      TaskState::Finished => {
        this.handle.mark_finished();
        Poll::Ready(())
      }
      TaskState::Yield => {
        tracing::trace!("recursive task yielded to executor");
        cx.waker().wake_by_ref();
        Poll::Pending
      }
    }
  }
}

// ==================== Scheduler ====================

/// Accepts units of work and runs them somewhere.
pub trait Scheduler: Clone + Send + Sync + 'static {
  /// Hand `task` over for execution.
  fn schedule_task(&self, task: Task) -> TaskHandle;

  /// Whether running more work inline, on the current call stack, risks
  /// unbounded recursion. Only a trampoline that is already draining its
  /// queue answers `true`.
  fn is_schedule_required(&self) -> bool { false }

  /// Schedule a one-shot action.
  fn schedule<F>(&self, f: F) -> TaskHandle
  where
    F: FnOnce() + Send + 'static,
  {
    self.schedule_task(Task::once(f))
  }

  /// Schedule a self-recursive action, starting from `state`.
  fn schedule_recursive<St, F>(&self, state: St, action: F) -> TaskHandle
  where
    St: Send + 'static,
    F: FnMut(St, &mut Recurse<St>) + Send + 'static,
  {
    self.schedule_task(Task::recursive(state, action))
  }
}

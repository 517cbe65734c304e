use std::{cell::RefCell, collections::VecDeque};

use super::{Scheduler, Task, TaskHandle, TaskState};
use crate::subscription::Subscription;

type Queue = VecDeque<(Task, TaskHandle)>;

thread_local! {
  /// `Some` while this thread is draining its trampoline.
  static TRAMPOLINE: RefCell<Option<Queue>> = const { RefCell::new(None) };
}

/// A trampoline on the current thread.
///
/// The first `schedule` call on a thread starts draining a queue right away
/// and does not return until the queue is empty. Work scheduled while the
/// queue drains, from inside a running unit, is appended to the queue instead
/// of running on top of the caller's stack. Recursive steps are re-queued
/// behind anything already waiting.
#[derive(Clone, Copy, Default, Debug)]
pub struct CurrentThreadScheduler;

impl CurrentThreadScheduler {
  /// Whether this thread is currently draining its trampoline.
  pub fn is_trampoline_active() -> bool { TRAMPOLINE.with(|cell| cell.borrow().is_some()) }

  fn enqueue(entry: (Task, TaskHandle)) {
    TRAMPOLINE.with(|cell| {
      if let Some(queue) = cell.borrow_mut().as_mut() {
        queue.push_back(entry);
      }
    });
  }

  fn pop() -> Option<(Task, TaskHandle)> {
    TRAMPOLINE.with(|cell| cell.borrow_mut().as_mut().and_then(VecDeque::pop_front))
  }

  fn drain(first: (Task, TaskHandle)) {
    struct Reset;
    impl Drop for Reset {
      fn drop(&mut self) { TRAMPOLINE.with(|cell| cell.borrow_mut().take()); }
    }

    TRAMPOLINE.with(|cell| *cell.borrow_mut() = Some(VecDeque::new()));
    let _reset = Reset;
    tracing::trace!("trampoline started");

    let mut next = Some(first);
    while let Some((mut task, handle)) = next {
      if !handle.is_closed() {
        match task.step() {
          TaskState::Finished => handle.mark_finished(),
          TaskState::Yield => Self::enqueue((task, handle)),
        }
      }
      next = Self::pop();
    }
    tracing::trace!("trampoline drained");
  }
}

impl Scheduler for CurrentThreadScheduler {
  fn schedule_task(&self, task: Task) -> TaskHandle {
    let handle = TaskHandle::new();
    let entry = (task, handle.clone());
    if Self::is_trampoline_active() {
      Self::enqueue(entry);
    } else {
      Self::drain(entry);
    }
    handle
  }

  fn is_schedule_required(&self) -> bool { Self::is_trampoline_active() }
}

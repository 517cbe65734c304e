//! Manually driven scheduler for deterministic tests.
//!
//! Scheduled work only runs when the test asks for it, one step at a time or
//! all at once. Recursive tasks go to the back of the queue after each step,
//! so an infinite generator can be observed for exactly as long as wanted.
//!
//! ```rust
//! use rxcore::prelude::*;
//!
//! let scheduler = TestScheduler::new();
//! let ran = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
//! let c_ran = ran.clone();
//! scheduler.schedule(move || c_ran.store(true, std::sync::atomic::Ordering::SeqCst));
//! assert_eq!(scheduler.pending_count(), 1);
//! scheduler.flush();
//! assert!(ran.load(std::sync::atomic::Ordering::SeqCst));
//! ```

use std::collections::VecDeque;

use super::{Scheduler, Task, TaskHandle, TaskState};
use crate::{
  rc::{MutArc, RcDerefMut},
  subscription::Subscription,
};

/// A queue of tasks that only advances when the test drives it.
///
/// Clones share the same queue.
#[derive(Clone, Default)]
pub struct TestScheduler {
  queue: MutArc<VecDeque<(Task, TaskHandle)>>,
}

impl TestScheduler {
  pub fn new() -> Self { Self::default() }

  /// Number of queued tasks that have not been released.
  pub fn pending_count(&self) -> usize {
    self
      .queue
      .rc_deref_mut()
      .iter()
      .filter(|(_, handle)| !handle.is_closed())
      .count()
  }

  /// Run one step of the next live task. Returns `false` if nothing was left.
  pub fn run_one(&self) -> bool {
    loop {
      // The lock is not held while the task runs: it may schedule more work.
      let popped = self.queue.rc_deref_mut().pop_front();
      let Some((mut task, handle)) = popped else {
        return false;
      };
      if handle.is_closed() {
        continue;
      }
      match task.step() {
        TaskState::Finished => handle.mark_finished(),
        TaskState::Yield if !handle.is_closed() => {
          self.queue.rc_deref_mut().push_back((task, handle));
        }
        TaskState::Yield => {}
      }
      return true;
    }
  }

  /// Run up to `steps` steps. Returns how many ran.
  pub fn run_steps(&self, steps: usize) -> usize {
    let mut ran = 0;
    while ran < steps && self.run_one() {
      ran += 1;
    }
    ran
  }

  /// Run until the queue is empty. Never returns while an infinite task is
  /// still live.
  pub fn flush(&self) { while self.run_one() {} }
}

impl Scheduler for TestScheduler {
  fn schedule_task(&self, task: Task) -> TaskHandle {
    let handle = TaskHandle::new();
    self.queue.rc_deref_mut().push_back((task, handle.clone()));
    handle
  }
}

use tokio::runtime::Handle;

use super::{Scheduler, Task, TaskFuture, TaskHandle};

/// Runs work as tasks on a tokio runtime.
#[derive(Clone)]
pub struct TokioScheduler {
  runtime: Handle,
}

impl TokioScheduler {
  /// Scheduler on the runtime the caller is running in, if any.
  pub fn current() -> Option<Self> { Handle::try_current().ok().map(Self::from_handle) }

  pub fn from_handle(runtime: Handle) -> Self { TokioScheduler { runtime } }
}

impl Scheduler for TokioScheduler {
  fn schedule_task(&self, task: Task) -> TaskHandle {
    let handle = TaskHandle::new();
    // The join handle is dropped: cancellation goes through `TaskHandle`.
    drop(self.runtime.spawn(TaskFuture::new(task, handle.clone())));
    handle
  }
}

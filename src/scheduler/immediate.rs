use super::{run_to_end, Scheduler, Task, TaskHandle};

/// Runs work synchronously, inside the `schedule` call.
///
/// Recursive work is looped in place, so it never grows the stack, but an
/// infinite recursive task never returns control to the caller. Use a
/// deferring scheduler for unbounded generators.
#[derive(Clone, Copy, Default, Debug)]
pub struct ImmediateScheduler;

impl Scheduler for ImmediateScheduler {
  fn schedule_task(&self, mut task: Task) -> TaskHandle {
    let handle = TaskHandle::new();
    run_to_end(&mut task, &handle);
    handle
  }
}

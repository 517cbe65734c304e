use std::io;

use futures::executor::{block_on, ThreadPool};
use once_cell::sync::Lazy;

use super::{Scheduler, Task, TaskFuture, TaskHandle};
use crate::subscription::Subscription;

static DEFAULT_POOL: Lazy<Option<ThreadPool>> = Lazy::new(|| {
  ThreadPool::builder()
    .name_prefix("rxcore-pool-")
    .create()
    .map_err(|err| tracing::warn!(%err, "cannot create the default thread pool"))
    .ok()
});

/// Runs work on a `futures` thread pool.
///
/// `ThreadPoolScheduler::default()` shares one process-wide pool, created the
/// first time work is scheduled on it. Recursive tasks give the worker back
/// to the pool between steps.
#[derive(Clone, Default)]
pub struct ThreadPoolScheduler {
  // `None` is the shared default pool.
  pool: Option<ThreadPool>,
}

impl ThreadPoolScheduler {
  /// Scheduler on the shared default pool.
  pub fn new() -> Self { Self::default() }

  /// Scheduler on a dedicated pool of `size` workers.
  pub fn with_pool_size(size: usize) -> io::Result<Self> {
    let pool = ThreadPool::builder()
      .pool_size(size)
      .name_prefix("rxcore-pool-")
      .create()?;
    Ok(ThreadPoolScheduler { pool: Some(pool) })
  }
}

impl Scheduler for ThreadPoolScheduler {
  fn schedule_task(&self, task: Task) -> TaskHandle {
    let handle = TaskHandle::new();
    let future = TaskFuture::new(task, handle.clone());
    match self.pool.as_ref().or(DEFAULT_POOL.as_ref()) {
      Some(pool) => {
        tracing::debug!("spawning task on thread pool");
        pool.spawn_ok(future);
      }
      // No pool could be created: give the task a thread of its own.
      None => {
        let spawned = std::thread::Builder::new()
          .name("rxcore-task".to_owned())
          .spawn(move || block_on(future));
        if let Err(err) = spawned {
          tracing::warn!(%err, "cannot spawn a thread for scheduled work, task dropped");
          handle.clone().unsubscribe();
        }
      }
    }
    handle
  }
}

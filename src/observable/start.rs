use std::sync::Arc;

use super::Observable;
use crate::{observer::Observer, scheduler::Scheduler, subject::AsyncSubject};

/// Runs `func` on `scheduler` right away and returns an observable of its
/// result.
///
/// `Ok` is delivered as one value followed by completion, `Err` as an error.
/// The result is kept, so subscribing after `func` has finished still
/// delivers it.
///
/// ```rust
/// use rxcore::prelude::*;
///
/// let answer = observable::start(|| Ok::<_, ()>(6 * 7), ImmediateScheduler);
/// answer.subscribe(|v| assert_eq!(v, 42));
/// ```
pub fn start<Item, Err, F, S>(func: F, scheduler: S) -> Observable<Item, Err>
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
  F: FnOnce() -> Result<Item, Err> + Send + 'static,
  S: Scheduler,
{
  let subject = AsyncSubject::new();
  let c_subject = subject.clone();
  scheduler.schedule(move || publish(c_subject, func()));
  subject.as_observable()
}

/// Turns `func` into a function that starts a fresh run on `scheduler` every
/// time it is called, as [`start`] does.
pub fn to_async<Item, Err, F, S>(func: F, scheduler: S) -> impl Fn() -> Observable<Item, Err> + Send + Sync
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
  F: Fn() -> Result<Item, Err> + Send + Sync + 'static,
  S: Scheduler,
{
  let func = Arc::new(func);
  move || {
    let func = func.clone();
    start(move || func(), scheduler.clone())
  }
}

/// [`start`] for an action with nothing to return. The observable emits `()`
/// once the action has run.
pub fn start_action<Err, F, S>(action: F, scheduler: S) -> Observable<(), Err>
where
  Err: Clone + Send + 'static,
  F: FnOnce() + Send + 'static,
  S: Scheduler,
{
  start(
    move || {
      action();
      Ok(())
    },
    scheduler,
  )
}

/// [`to_async`] for an action with nothing to return.
pub fn to_async_action<Err, F, S>(action: F, scheduler: S) -> impl Fn() -> Observable<(), Err> + Send + Sync
where
  Err: Clone + Send + 'static,
  F: Fn() + Send + Sync + 'static,
  S: Scheduler,
{
  to_async(
    move || {
      action();
      Ok(())
    },
    scheduler,
  )
}

fn publish<Item: Clone, Err: Clone>(mut subject: AsyncSubject<Item, Err>, result: Result<Item, Err>) {
  match result {
    Ok(value) => {
      subject.next(value);
      subject.complete();
    }
    Err(err) => subject.error(err),
  }
}

use super::{create, Observable, Subscriber};
use crate::{scheduler::Scheduler, type_hint::TypeHint};

/// Creates an observable that completes on `scheduler` without emitting.
pub fn empty<Item, Err, S>(scheduler: S) -> Observable<Item, Err>
where
  Item: Send + 'static,
  Err: Send + 'static,
  S: Scheduler,
{
  create(move |subscriber: Subscriber<Item, Err>| scheduler.schedule(move || subscriber.complete()))
}

/// [`empty`] with the item type pinned by a witness that is never inspected.
pub fn empty_hinted<Item, Err, S>(_: TypeHint<Item>, scheduler: S) -> Observable<Item, Err>
where
  Item: Send + 'static,
  Err: Send + 'static,
  S: Scheduler,
{
  empty(scheduler)
}

/// Creates an observable that never emits and never ends.
///
/// Nothing is scheduled, so there is nothing to release either.
pub fn never<Item: 'static, Err: 'static>() -> Observable<Item, Err> {
  create(|_: Subscriber<Item, Err>| ())
}

pub fn never_hinted<Item: 'static, Err: 'static>(_: TypeHint<Item>) -> Observable<Item, Err> {
  never()
}

/// Creates an observable that fails with `err` on `scheduler`.
///
/// ```rust
/// use rxcore::prelude::*;
///
/// observable::throw_err::<i32, _, _>("boom", ImmediateScheduler).subscribe_err(
///   |_| unreachable!(),
///   |e| assert_eq!(e, "boom"),
/// );
/// ```
pub fn throw_err<Item, Err, S>(err: Err, scheduler: S) -> Observable<Item, Err>
where
  Item: Send + 'static,
  Err: Clone + Send + Sync + 'static,
  S: Scheduler,
{
  create(move |subscriber: Subscriber<Item, Err>| {
    let err = err.clone();
    scheduler.schedule(move || subscriber.error(err))
  })
}

pub fn throw_err_hinted<Item, Err, S>(_: TypeHint<Item>, err: Err, scheduler: S) -> Observable<Item, Err>
where
  Item: Send + 'static,
  Err: Clone + Send + Sync + 'static,
  S: Scheduler,
{
  throw_err(err, scheduler)
}

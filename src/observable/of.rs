use super::{create, Observable, Subscriber};
use crate::scheduler::Scheduler;

/// Creates an observable that emits `value` and completes.
///
/// Both events happen in the same scheduled unit of work.
///
/// ```rust
/// use rxcore::prelude::*;
///
/// observable::of::<_, (), _>(123, ImmediateScheduler).subscribe(|v| assert_eq!(v, 123));
/// ```
pub fn of<Item, Err, S>(value: Item, scheduler: S) -> Observable<Item, Err>
where
  Item: Clone + Send + Sync + 'static,
  Err: Send + 'static,
  S: Scheduler,
{
  create(move |subscriber: Subscriber<Item, Err>| {
    let value = value.clone();
    scheduler.schedule(move || {
      subscriber.next(value);
      subscriber.complete();
    })
  })
}

/// Creates an observable that emits the `Ok` value and completes, or fails
/// with the `Err` value.
pub fn of_result<Item, Err, S>(result: Result<Item, Err>, scheduler: S) -> Observable<Item, Err>
where
  Item: Clone + Send + Sync + 'static,
  Err: Clone + Send + Sync + 'static,
  S: Scheduler,
{
  create(move |subscriber: Subscriber<Item, Err>| {
    let result = result.clone();
    scheduler.schedule(move || match result {
      Ok(value) => {
        subscriber.next(value);
        subscriber.complete();
      }
      Err(err) => subscriber.error(err),
    })
  })
}

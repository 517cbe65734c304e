use super::{create, Observable, Subscriber};
use crate::{error::RxError, scheduler::Scheduler};

/// Creates an observable that emits `count` consecutive integers starting at
/// `start`, then completes.
///
/// Each number is one step of a self-recursive task, so the stack stays flat
/// however long the range is. A negative `count` is rejected, and so is a
/// range whose last element does not fit in an `i64`; both are reported
/// before anything is scheduled.
///
/// ```rust
/// use rxcore::prelude::*;
///
/// observable::range::<(), _>(1, 4, ImmediateScheduler)
///   .unwrap()
///   .subscribe(|v| println!("{v}"));
/// ```
pub fn range<Err, S>(start: i64, count: i64, scheduler: S) -> Result<Observable<i64, Err>, RxError>
where
  Err: Send + 'static,
  S: Scheduler,
{
  if count < 0 {
    return Err(RxError::NegativeRangeCount(count));
  }
  if count > 0 && start.checked_add(count - 1).is_none() {
    return Err(RxError::RangeOverflow { start, count });
  }
  Ok(create(move |subscriber: Subscriber<i64, Err>| {
    scheduler.schedule_recursive(0, move |index, recurse| {
      if index < count {
        subscriber.next(start + index);
        if !subscriber.is_closed() {
          recurse.again(index + 1);
        }
      } else {
        subscriber.complete();
      }
    })
  }))
}

use super::{create, Observable, Subscriber};
use crate::{
  error::RxError,
  observer::Observer,
  scheduler::{CurrentThreadScheduler, Scheduler},
  subscription::{SerialSubscription, SingleAssignmentSubscription, Subscription},
};

/// Creates an observable that emits `value` forever.
///
/// It never completes: releasing the subscription is the only way to stop
/// it. On the [`ImmediateScheduler`](crate::scheduler::ImmediateScheduler)
/// the emission loop runs inside `subscribe`, so only an observer that
/// reports itself closed can end it there.
pub fn repeat<Item, Err, S>(value: Item, scheduler: S) -> Observable<Item, Err>
where
  Item: Clone + Send + Sync + 'static,
  Err: Send + 'static,
  S: Scheduler,
{
  create(move |subscriber: Subscriber<Item, Err>| {
    let value = value.clone();
    scheduler.schedule_recursive((), move |(), recurse| {
      subscriber.next(value.clone());
      if !subscriber.is_closed() {
        recurse.again(());
      }
    })
  })
}

/// Creates an observable that emits `value` `count` times, then completes.
///
/// Every step emits while copies remain and completes as soon as none are
/// left, so a single copy is emitted and completed in the same step. A
/// negative `count` is rejected before anything is scheduled.
pub fn repeat_count<Item, Err, S>(
  value: Item, count: i64, scheduler: S,
) -> Result<Observable<Item, Err>, RxError>
where
  Item: Clone + Send + Sync + 'static,
  Err: Send + 'static,
  S: Scheduler,
{
  if count < 0 {
    return Err(RxError::NegativeRepeatCount(count));
  }
  Ok(create(move |subscriber: Subscriber<Item, Err>| {
    let value = value.clone();
    scheduler.schedule_recursive(count, move |mut remaining, recurse| {
      if remaining > 0 {
        subscriber.next(value.clone());
        remaining -= 1;
      }
      if remaining == 0 {
        subscriber.complete();
      } else if !subscriber.is_closed() {
        recurse.again(remaining);
      }
    })
  }))
}

impl<Item: Send + 'static, Err: Send + 'static> Observable<Item, Err> {
  /// Resubscribes to this observable every time it completes, forever.
  ///
  /// Errors end the repetition. Each round starts on this thread's
  /// trampoline, so a source that completes synchronously is repeated in a
  /// loop instead of a growing chain of nested subscribe calls.
  pub fn repeat(&self) -> Observable<Item, Err> { self.resubscribe(None) }

  /// Subscribes to this observable `times` times in a row, then completes.
  /// Zero times completes immediately.
  pub fn repeat_times(&self, times: usize) -> Observable<Item, Err> { self.resubscribe(Some(times)) }

  fn resubscribe(&self, times: Option<usize>) -> Observable<Item, Err> {
    let source = self.clone();
    create(move |subscriber: Subscriber<Item, Err>| {
      let rounds = SerialSubscription::new();
      next_round(RepeatObserver {
        source: source.clone(),
        subscriber,
        rounds: rounds.clone(),
        remaining: times,
      });
      rounds
    })
  }
}

/// Watches one round of a repeated source and starts the next one when it
/// completes.
struct RepeatObserver<Item, Err> {
  source: Observable<Item, Err>,
  subscriber: Subscriber<Item, Err>,
  rounds: SerialSubscription,
  remaining: Option<usize>,
}

fn next_round<Item: Send + 'static, Err: Send + 'static>(mut repeat: RepeatObserver<Item, Err>) {
  match repeat.remaining {
    Some(0) => return repeat.subscriber.complete(),
    Some(n) => repeat.remaining = Some(n - 1),
    None => {}
  }
  if repeat.subscriber.is_closed() {
    return;
  }
  let rounds = repeat.rounds.clone();
  let handle = CurrentThreadScheduler.schedule(move || {
    // Installed before subscribing: a round that completes synchronously
    // replaces it with the next round's handle, which must not be undone
    // when this round's subscription arrives.
    let round = SingleAssignmentSubscription::new();
    repeat.rounds.set(round.clone());
    let source = repeat.source.clone();
    if let Err(err) = round.assign(source.subscribe_with(repeat)) {
      tracing::warn!(%err, "repeat round subscription dropped");
    }
  });
  if !handle.is_closed() {
    rounds.set(handle);
  }
}

impl<Item: Send + 'static, Err: Send + 'static> Observer<Item, Err> for RepeatObserver<Item, Err> {
  fn next(&mut self, value: Item) { self.subscriber.next(value) }

  fn error(self, err: Err) { self.subscriber.error(err) }

  fn complete(self) { next_round(self) }

  fn is_closed(&self) -> bool { self.subscriber.is_closed() }
}

#[cfg(test)]
mod tests {
  use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
  };

  use super::*;
  use crate::{
    observable::{create::tests::Recorder, of, throw_err},
    scheduler::{ImmediateScheduler, TestScheduler},
  };

  #[rxcore_macro::test]
  fn counted_repeat_emits_then_completes() {
    let recorder = Recorder::default();
    repeat_count::<_, (), _>("x", 2, ImmediateScheduler)
      .unwrap()
      .subscribe_with(recorder.clone());
    assert_eq!(recorder.events(), vec!["next(\"x\")", "next(\"x\")", "complete"]);
  }

  #[rxcore_macro::test]
  fn zero_repeats_only_complete() {
    let recorder = Recorder::default();
    repeat_count::<_, (), _>(1, 0, ImmediateScheduler)
      .unwrap()
      .subscribe_with(recorder.clone());
    assert_eq!(recorder.events(), vec!["complete"]);
  }

  #[rxcore_macro::test]
  fn single_repeat_completes_in_the_same_step() {
    let scheduler = TestScheduler::new();
    let recorder = Recorder::default();
    repeat_count::<_, (), _>(1, 1, scheduler.clone())
      .unwrap()
      .subscribe_with(recorder.clone());
    assert_eq!(scheduler.run_steps(10), 1);
    assert_eq!(recorder.events(), vec!["next(1)", "complete"]);
  }

  #[rxcore_macro::test]
  fn negative_count_is_rejected_before_scheduling() {
    let scheduler = TestScheduler::new();
    let result = repeat_count::<_, (), _>(1, -3, scheduler.clone());
    assert_eq!(result.err(), Some(RxError::NegativeRepeatCount(-3)));
    assert_eq!(scheduler.pending_count(), 0);
  }

  #[rxcore_macro::test]
  fn infinite_repeat_runs_until_released() {
    let scheduler = TestScheduler::new();
    let recorder = Recorder::default();
    let subscription = repeat::<_, (), _>(7, scheduler.clone()).subscribe_with(recorder.clone());
    assert_eq!(scheduler.run_steps(100), 100);
    assert_eq!(recorder.events().len(), 100);
    assert!(recorder.events().iter().all(|e| e == "next(7)"));

    subscription.unsubscribe();
    scheduler.flush();
    assert_eq!(recorder.events().len(), 100);
  }

  #[rxcore_macro::test]
  fn repeated_source_is_resubscribed() {
    let subscriptions = Arc::new(AtomicUsize::new(0));
    let c_subscriptions = subscriptions.clone();
    let source = create(move |subscriber: Subscriber<usize, ()>| {
      let n = c_subscriptions.fetch_add(1, Ordering::SeqCst);
      subscriber.next(n);
      subscriber.complete();
    });
    let recorder = Recorder::default();
    source.repeat_times(3).subscribe_with(recorder.clone());
    assert_eq!(recorder.events(), vec!["next(0)", "next(1)", "next(2)", "complete"]);
    assert_eq!(subscriptions.load(Ordering::SeqCst), 3);
  }

  #[rxcore_macro::test]
  fn zero_rounds_complete_without_subscribing() {
    let recorder = Recorder::default();
    of::<_, (), _>(1, ImmediateScheduler)
      .repeat_times(0)
      .subscribe_with(recorder.clone());
    assert_eq!(recorder.events(), vec!["complete"]);
  }

  #[rxcore_macro::test]
  fn error_ends_the_repetition() {
    let recorder = Recorder::default();
    throw_err::<i32, _, _>("bad", ImmediateScheduler)
      .repeat()
      .subscribe_with(recorder.clone());
    assert_eq!(recorder.events(), vec!["error(\"bad\")"]);
  }

  struct Until {
    seen: Arc<Mutex<usize>>,
    limit: usize,
  }

  impl Observer<i32, ()> for Until {
    fn next(&mut self, _: i32) { *self.seen.lock().unwrap() += 1; }

    fn error(self, _: ()) {}

    fn complete(self) {}

    fn is_closed(&self) -> bool { *self.seen.lock().unwrap() >= self.limit }
  }

  #[rxcore_macro::test]
  fn many_synchronous_rounds_keep_the_stack_flat() {
    let seen = Arc::new(Mutex::new(0));
    of(1, ImmediateScheduler)
      .repeat()
      .subscribe_with(Until { seen: seen.clone(), limit: 100_000 });
    assert_eq!(*seen.lock().unwrap(), 100_000);
  }

  #[rxcore_macro::test]
  fn releasing_stops_an_asynchronous_repeat() {
    let scheduler = TestScheduler::new();
    let recorder = Recorder::default();
    let subscription = of::<_, (), _>(1, scheduler.clone())
      .repeat()
      .subscribe_with(recorder.clone());
    scheduler.run_steps(3);
    assert_eq!(recorder.events(), vec!["next(1)", "next(1)", "next(1)"]);

    subscription.unsubscribe();
    scheduler.flush();
    assert_eq!(recorder.events().len(), 3);
  }
}

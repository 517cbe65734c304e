use std::{collections::VecDeque, sync::Arc};

use super::Observable;
use crate::{
  observer::{BoxedObserver, Observer},
  rc::{MutArc, RcDerefMut},
  scheduler::{CurrentThreadScheduler, Scheduler},
  subscription::{BoxedSubscription, CompositeSubscription, SingleAssignmentSubscription, Subscription},
};

/// Creates an observable from a producer function.
///
/// The producer runs once per subscription. It receives a [`Subscriber`] to
/// emit through and returns the resource that tears its production down.
///
/// ```rust
/// use rxcore::prelude::*;
///
/// let hello = observable::create(|subscriber: Subscriber<&str, ()>| {
///   subscriber.next("hello");
///   subscriber.complete();
/// });
/// hello.subscribe(|v| println!("{v}"));
/// ```
pub fn create<Item, Err, F, U>(producer: F) -> Observable<Item, Err>
where
  F: Fn(Subscriber<Item, Err>) -> U + Send + Sync + 'static,
  U: Subscription + Send + 'static,
{
  Observable {
    producer: Arc::new(move |subscriber| BoxedSubscription::new(producer(subscriber))),
  }
}

impl<Item: Send + 'static, Err: Send + 'static> Observable<Item, Err> {
  /// Subscribe `observer`, returning the handle of this subscription.
  ///
  /// The handle exists before the producer runs. When a trampoline is
  /// already draining on this thread the producer is queued behind the
  /// running work instead of being called on the current stack; releasing the
  /// handle before then means it never runs.
  pub fn subscribe_with<O>(&self, observer: O) -> SingleAssignmentSubscription
  where
    O: Observer<Item, Err> + Send + 'static,
  {
    let subscription = SingleAssignmentSubscription::new();
    let subscriber = Subscriber::new(Box::new(observer), subscription.clone());
    let trampoline = CurrentThreadScheduler;
    if trampoline.is_schedule_required() {
      tracing::trace!("trampoline busy, queueing producer");
      let producer = self.producer.clone();
      let started = SingleAssignmentSubscription::new();
      let c_started = started.clone();
      let task = trampoline.schedule(move || assign_resource(&c_started, producer(subscriber)));
      let pending = CompositeSubscription::new();
      pending.add(task);
      pending.add(started);
      assign_resource(&subscription, pending);
    } else {
      tracing::trace!("running producer inline");
      assign_resource(&subscription, (self.producer)(subscriber));
    }
    subscription
  }
}

fn assign_resource(slot: &SingleAssignmentSubscription, resource: impl Subscription + Send + 'static) {
  if let Err(err) = slot.assign(resource) {
    tracing::warn!(%err, "subscription resource dropped");
  }
}

/// The producer's handle on one subscription.
///
/// Forwards `next` until the subscription ends. The first `error` or
/// `complete` is forwarded and then releases the subscription, so a producer
/// that keeps emitting afterwards reaches nobody. Clones share the same
/// subscription and may be moved into scheduled work.
///
/// The observer is never called with a lock held. An emission made while the
/// observer is busy, from inside its own handler or from another thread, is
/// queued and delivered in order by the call that is already running.
pub struct Subscriber<Item, Err> {
  delivery: MutArc<Delivery<Item, Err>>,
  subscription: SingleAssignmentSubscription,
}

enum Signal<Item, Err> {
  Next(Item),
  Error(Err),
  Complete,
}

struct Delivery<Item, Err> {
  /// `None` while checked out by a running call, or after the terminal event.
  observer: Option<BoxedObserver<Item, Err>>,
  busy: bool,
  pending: VecDeque<Signal<Item, Err>>,
}

impl<Item, Err> Clone for Subscriber<Item, Err> {
  fn clone(&self) -> Self {
    Subscriber { delivery: self.delivery.clone(), subscription: self.subscription.clone() }
  }
}

impl<Item, Err> Subscriber<Item, Err> {
  pub(crate) fn new(observer: BoxedObserver<Item, Err>, subscription: SingleAssignmentSubscription) -> Self {
    let delivery = Delivery { observer: Some(observer), busy: false, pending: VecDeque::new() };
    Subscriber { delivery: MutArc::own(delivery), subscription }
  }

  pub fn next(&self, value: Item) { self.emit(Signal::Next(value)) }

  pub fn error(&self, err: Err) { self.emit(Signal::Error(err)) }

  pub fn complete(&self) { self.emit(Signal::Complete) }

  /// Whether the subscription has ended, by a terminal event or by release,
  /// or the observer accepts no more values. Long-running producers poll
  /// this to stop early.
  pub fn is_closed(&self) -> bool {
    if self.subscription.is_closed() {
      return true;
    }
    let observer = {
      let mut delivery = self.delivery.rc_deref_mut();
      if delivery.busy {
        return false;
      }
      match delivery.observer.take() {
        Some(observer) => {
          delivery.busy = true;
          observer
        }
        None => return true,
      }
    };
    let closed = observer.is_closed();
    self.deliver(observer, None);
    closed
  }

  fn emit(&self, signal: Signal<Item, Err>) {
    if self.subscription.is_closed() {
      return;
    }
    let observer = {
      let mut delivery = self.delivery.rc_deref_mut();
      if delivery.busy {
        delivery.pending.push_back(signal);
        return;
      }
      match delivery.observer.take() {
        Some(observer) => {
          delivery.busy = true;
          observer
        }
        None => return,
      }
    };
    self.deliver(observer, Some(signal));
  }

  /// Runs `signal` and then everything queued meanwhile, handing the
  /// observer back once the queue is empty.
  fn deliver(&self, mut observer: BoxedObserver<Item, Err>, mut signal: Option<Signal<Item, Err>>) {
    loop {
      match signal.take() {
        Some(Signal::Next(value)) => observer.next(value),
        Some(Signal::Error(err)) => {
          self.finish();
          observer.error(err);
          self.subscription.clone().unsubscribe();
          return;
        }
        Some(Signal::Complete) => {
          self.finish();
          observer.complete();
          self.subscription.clone().unsubscribe();
          return;
        }
        None => {}
      }

      let mut delivery = self.delivery.rc_deref_mut();
      if self.subscription.is_closed() {
        let dropped = std::mem::take(&mut delivery.pending);
        delivery.busy = false;
        drop(delivery);
        drop(dropped);
        return;
      }
      match delivery.pending.pop_front() {
        Some(queued) => signal = Some(queued),
        None => {
          delivery.observer = Some(observer);
          delivery.busy = false;
          return;
        }
      }
    }
  }

  /// Marks the terminal event: later emissions find no observer.
  fn finish(&self) {
    let dropped = {
      let mut delivery = self.delivery.rc_deref_mut();
      delivery.busy = false;
      std::mem::take(&mut delivery.pending)
    };
    drop(dropped);
  }
}

/// Feeds another stream into a [`Subscriber`].
pub(crate) struct ForwardObserver<Item, Err>(pub(crate) Subscriber<Item, Err>);

impl<Item, Err> Observer<Item, Err> for ForwardObserver<Item, Err> {
  #[inline]
  fn next(&mut self, value: Item) { self.0.next(value) }

  #[inline]
  fn error(self, err: Err) { self.0.error(err) }

  #[inline]
  fn complete(self) { self.0.complete() }

  #[inline]
  fn is_closed(&self) -> bool { self.0.is_closed() }
}

#[cfg(test)]
pub(crate) mod tests {
  use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex,
  };

  use super::*;
  use crate::subscription::ClosureSubscription;

  /// Records every event as text, shared with the test body.
  #[derive(Clone, Default)]
  pub(crate) struct Recorder(pub(crate) Arc<Mutex<Vec<String>>>);

  impl Recorder {
    pub(crate) fn events(&self) -> Vec<String> { self.0.lock().unwrap().clone() }
  }

  impl<Item: std::fmt::Debug, Err: std::fmt::Debug> Observer<Item, Err> for Recorder {
    fn next(&mut self, value: Item) { self.0.lock().unwrap().push(format!("next({value:?})")); }

    fn error(self, err: Err) { self.0.lock().unwrap().push(format!("error({err:?})")); }

    fn complete(self) { self.0.lock().unwrap().push("complete".to_owned()); }

    fn is_closed(&self) -> bool { false }
  }

  fn stash<T: Send + 'static>() -> (Arc<Mutex<Option<T>>>, Arc<Mutex<Option<T>>>) {
    let slot = Arc::new(Mutex::new(None));
    (slot.clone(), slot)
  }

  #[rxcore_macro::test]
  fn producer_runs_once_per_subscription() {
    let calls = Arc::new(AtomicUsize::new(0));
    let c_calls = calls.clone();
    let source = create(move |subscriber: Subscriber<i32, ()>| {
      c_calls.fetch_add(1, Ordering::SeqCst);
      subscriber.next(1);
      subscriber.complete();
    });
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let (first, second) = (Recorder::default(), Recorder::default());
    source.subscribe_with(first.clone());
    source.clone().subscribe_with(second.clone());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(first.events(), vec!["next(1)", "complete"]);
    assert_eq!(second.events(), vec!["next(1)", "complete"]);
  }

  #[rxcore_macro::test]
  fn terminal_event_releases_subscription() {
    let released = Arc::new(AtomicBool::new(false));
    let c_released = released.clone();
    let (slot, c_slot) = stash::<Subscriber<i32, String>>();
    let source = create(move |subscriber: Subscriber<i32, String>| {
      *c_slot.lock().unwrap() = Some(subscriber.clone());
      subscriber.next(1);
      subscriber.complete();
      let c_released = c_released.clone();
      ClosureSubscription(move || c_released.store(true, Ordering::SeqCst))
    });
    let recorder = Recorder::default();
    let subscription = source.subscribe_with(recorder.clone());
    assert!(subscription.is_closed());
    assert!(released.load(Ordering::SeqCst));

    // A producer that ignores the terminal event reaches nobody.
    let subscriber = slot.lock().unwrap().take().unwrap();
    assert!(subscriber.is_closed());
    subscriber.next(2);
    subscriber.error("late".to_owned());
    subscriber.complete();
    assert_eq!(recorder.events(), vec!["next(1)", "complete"]);
  }

  #[rxcore_macro::test]
  fn only_the_first_terminal_event_is_forwarded() {
    let source = create(|subscriber: Subscriber<i32, &str>| {
      subscriber.error("first");
      subscriber.error("second");
      subscriber.complete();
    });
    let recorder = Recorder::default();
    source.subscribe_with(recorder.clone());
    assert_eq!(recorder.events(), vec!["error(\"first\")"]);
  }

  #[rxcore_macro::test]
  fn release_stops_delivery() {
    let (slot, c_slot) = stash::<Subscriber<i32, ()>>();
    let source = create(move |subscriber: Subscriber<i32, ()>| {
      *c_slot.lock().unwrap() = Some(subscriber);
    });
    let recorder = Recorder::default();
    let subscription = source.subscribe_with(recorder.clone());
    let subscriber = slot.lock().unwrap().take().unwrap();
    subscriber.next(1);
    subscription.unsubscribe();
    assert!(subscriber.is_closed());
    subscriber.next(2);
    subscriber.complete();
    assert_eq!(recorder.events(), vec!["next(1)"]);
  }

  #[rxcore_macro::test]
  fn emissions_from_inside_next_are_delivered_in_order() {
    let (slot, c_slot) = stash::<Subscriber<i32, ()>>();
    let source = create(move |subscriber: Subscriber<i32, ()>| {
      *c_slot.lock().unwrap() = Some(subscriber.clone());
      subscriber.next(0);
    });
    let log = Arc::new(Mutex::new(vec![]));
    let c_log = log.clone();
    source.subscribe(move |v| {
      c_log.lock().unwrap().push(format!("next({v})"));
      if v < 2 {
        let stashed = slot.lock().unwrap().clone();
        if let Some(subscriber) = stashed {
          subscriber.next(v + 1);
        }
        c_log.lock().unwrap().push(format!("returned({v})"));
      }
    });
    assert_eq!(
      *log.lock().unwrap(),
      vec!["next(0)", "returned(0)", "next(1)", "returned(1)", "next(2)"]
    );
  }

  #[rxcore_macro::test]
  fn terminal_event_from_inside_next_drops_later_emissions() {
    let (slot, c_slot) = stash::<Subscriber<i32, ()>>();
    let source = create(move |subscriber: Subscriber<i32, ()>| {
      *c_slot.lock().unwrap() = Some(subscriber.clone());
      subscriber.next(0);
    });
    let log = Arc::new(Mutex::new(vec![]));
    let (c_log, complete_log) = (log.clone(), log.clone());
    let subscription = source.subscribe_complete(
      move |v| {
        c_log.lock().unwrap().push(format!("next({v})"));
        let stashed = slot.lock().unwrap().clone();
        if let Some(subscriber) = stashed {
          subscriber.complete();
          subscriber.next(9);
        }
      },
      move || complete_log.lock().unwrap().push("complete".to_owned()),
    );
    assert_eq!(*log.lock().unwrap(), vec!["next(0)", "complete"]);
    assert!(subscription.is_closed());
  }

  #[rxcore_macro::test]
  fn release_from_inside_next_drops_queued_emissions() {
    let (slot, c_slot) = stash::<Subscriber<i32, ()>>();
    let source = create(move |subscriber: Subscriber<i32, ()>| {
      *c_slot.lock().unwrap() = Some(subscriber);
    });
    let (handle, c_handle) = stash::<SingleAssignmentSubscription>();
    let (log, re_emit) = (Arc::new(Mutex::new(vec![])), slot.clone());
    let seen = log.clone();
    let subscription = source.subscribe(move |v: i32| {
      seen.lock().unwrap().push(v);
      let stashed = re_emit.lock().unwrap().clone();
      if let Some(subscriber) = stashed {
        subscriber.next(v + 1);
      }
      if let Some(subscription) = c_handle.lock().unwrap().take() {
        subscription.unsubscribe();
      }
    });
    *handle.lock().unwrap() = Some(subscription.clone());

    let subscriber = slot.lock().unwrap().clone().unwrap();
    subscriber.next(0);
    assert_eq!(*log.lock().unwrap(), vec![0]);
    assert!(subscription.is_closed());
    assert!(subscriber.is_closed());
  }

  #[rxcore_macro::test]
  fn producer_is_queued_while_trampoline_runs() {
    let log = Arc::new(Mutex::new(vec![]));
    let c_log = log.clone();
    let source = create(move |subscriber: Subscriber<i32, ()>| {
      c_log.lock().unwrap().push("produce".to_owned());
      subscriber.complete();
    });
    let c_log = log.clone();
    CurrentThreadScheduler.schedule(move || {
      let subscription = source.subscribe(|_| {});
      assert!(!subscription.is_closed());
      c_log.lock().unwrap().push("subscribed".to_owned());
    });
    assert_eq!(*log.lock().unwrap(), vec!["subscribed", "produce"]);
  }

  #[rxcore_macro::test]
  fn release_before_deferred_production_skips_producer() {
    let produced = Arc::new(AtomicBool::new(false));
    let c_produced = produced.clone();
    let source = create(move |_: Subscriber<i32, ()>| c_produced.store(true, Ordering::SeqCst));
    CurrentThreadScheduler.schedule(move || {
      source.subscribe(|_| {}).unsubscribe();
    });
    assert!(!produced.load(Ordering::SeqCst));
  }

  #[rxcore_macro::test]
  fn subscriber_moves_across_threads() {
    let source = create(|subscriber: Subscriber<i32, ()>| {
      std::thread::spawn(move || {
        subscriber.next(7);
        subscriber.complete();
      })
      .join()
      .unwrap();
    });
    let recorder = Recorder::default();
    source.subscribe_with(recorder.clone());
    assert_eq!(recorder.events(), vec!["next(7)", "complete"]);
  }
}

use super::subscribers::Subscribers;
use crate::{
  observable::{create, ForwardObserver, Observable, Subscriber},
  observer::{BoxedObserver, Observer},
  rc::{MutArc, RcDeref, RcDerefMut},
  subscription::Subscription,
};

#[derive(Clone)]
enum Outcome<Err> {
  Completed,
  Failed(Err),
}

struct State<Item, Err> {
  observers: Subscribers<BoxedObserver<Item, Err>>,
  last: Option<Item>,
  outcome: Option<Outcome<Err>>,
}

/// A subject that only ever emits its final outcome.
///
/// Values passed to `next` are not forwarded; only the most recent one is
/// kept. On `complete` every observer receives that value (if there was one)
/// followed by completion; on `error` every observer receives the error. The
/// outcome is stored, and observers that subscribe afterwards get it replayed
/// at once. Clones share the same state.
///
/// ```rust
/// use rxcore::prelude::*;
///
/// let subject = AsyncSubject::<i32, ()>::new();
/// let mut input = subject.clone();
/// input.next(1);
/// input.next(2);
/// input.complete();
///
/// // Subscribing late still sees the final value.
/// subject.as_observable().subscribe(|v| assert_eq!(v, 2));
/// ```
pub struct AsyncSubject<Item, Err> {
  state: MutArc<State<Item, Err>>,
}

impl<Item, Err> Clone for AsyncSubject<Item, Err> {
  fn clone(&self) -> Self { AsyncSubject { state: self.state.clone() } }
}

impl<Item, Err> Default for AsyncSubject<Item, Err> {
  fn default() -> Self {
    AsyncSubject {
      state: MutArc::own(State { observers: Subscribers::default(), last: None, outcome: None }),
    }
  }
}

impl<Item, Err> AsyncSubject<Item, Err> {
  pub fn new() -> Self { Self::default() }

  /// Number of observers waiting for the outcome.
  pub fn observer_count(&self) -> usize { self.state.rc_deref().observers.len() }
}

impl<Item, Err> AsyncSubject<Item, Err>
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
{
  /// The observable side of this subject.
  pub fn as_observable(&self) -> Observable<Item, Err> {
    let state = self.state.clone();
    create(move |subscriber: Subscriber<Item, Err>| {
      let mut guard = state.rc_deref_mut();
      let outcome = guard.outcome.clone();
      match outcome {
        None => {
          let id = guard.observers.add(Box::new(ForwardObserver(subscriber)));
          Some(SubjectSubscription { state: state.clone(), id })
        }
        Some(Outcome::Completed) => {
          let last = guard.last.clone();
          drop(guard);
          if let Some(value) = last {
            subscriber.next(value);
          }
          subscriber.complete();
          None
        }
        Some(Outcome::Failed(err)) => {
          drop(guard);
          subscriber.error(err);
          None
        }
      }
    })
  }
}

impl<Item, Err> Observer<Item, Err> for AsyncSubject<Item, Err>
where
  Item: Clone,
  Err: Clone,
{
  fn next(&mut self, value: Item) {
    let mut state = self.state.rc_deref_mut();
    if state.outcome.is_none() {
      state.last = Some(value);
    }
  }

  fn error(self, err: Err) {
    let observers = {
      let mut state = self.state.rc_deref_mut();
      if state.outcome.is_some() {
        return;
      }
      state.outcome = Some(Outcome::Failed(err.clone()));
      state.last = None;
      state.observers.take()
    };
    tracing::debug!(observers = observers.len(), "async subject failed");
    observers.error_all(err);
  }

  fn complete(self) {
    let (observers, last) = {
      let mut state = self.state.rc_deref_mut();
      if state.outcome.is_some() {
        return;
      }
      state.outcome = Some(Outcome::Completed);
      (state.observers.take(), state.last.clone())
    };
    tracing::debug!(observers = observers.len(), has_value = last.is_some(), "async subject completed");
    observers.complete_all(last);
  }

  fn is_closed(&self) -> bool { self.state.rc_deref().outcome.is_some() }
}

/// Removes one observer from the subject when released.
struct SubjectSubscription<Item, Err> {
  state: MutArc<State<Item, Err>>,
  id: usize,
}

impl<Item, Err> Subscription for SubjectSubscription<Item, Err> {
  fn unsubscribe(self) {
    let removed = self.state.rc_deref_mut().observers.remove(self.id);
    drop(removed);
  }

  fn is_closed(&self) -> bool { !self.state.rc_deref().observers.contains(self.id) }
}

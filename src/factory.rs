//! Observable factory pattern
//!
//! [`ObservableFactory`] offers every factory of [`crate::observable`] with
//! its scheduler argument filled in from a [`Context`]. It is implemented for
//! every `Context`, whatever schedulers it holds.
//!
//! | Method | Default scheduler |
//! |--------|-------------------|
//! | `empty`, `of`, `of_result`, `throw_err` | immediate |
//! | `range`, `repeat`, `repeat_count` | current thread |
//! | `start`, `to_async` and their action forms | thread pool |
//! | `never`, `create`, `defer`, `try_defer` | none |
//!
//! ```rust
//! use rxcore::prelude::*;
//!
//! let ctx = Context::new();
//! ctx.range::<()>(0, 3).unwrap().subscribe(|v| println!("{v}"));
//! ctx.repeat_count::<_, ()>("x", 2).unwrap().subscribe(|v| println!("{v}"));
//! ```

use crate::{
  context::Context,
  error::RxError,
  observable::{self, Observable, Subscriber},
  scheduler::Scheduler,
  subscription::Subscription,
  type_hint::TypeHint,
};

/// Factories with default schedulers.
pub trait ObservableFactory {
  type Immediate: Scheduler;
  type CurrentThread: Scheduler;
  type ThreadPool: Scheduler;

  fn immediate_scheduler(&self) -> Self::Immediate;
  fn current_thread_scheduler(&self) -> Self::CurrentThread;
  fn thread_pool_scheduler(&self) -> Self::ThreadPool;

  /// See [`observable::create`].
  fn create<Item, Err, F, U>(&self, producer: F) -> Observable<Item, Err>
  where
    F: Fn(Subscriber<Item, Err>) -> U + Send + Sync + 'static,
    U: Subscription + Send + 'static,
  {
    observable::create(producer)
  }

  fn empty<Item: Send + 'static, Err: Send + 'static>(&self) -> Observable<Item, Err> {
    observable::empty(self.immediate_scheduler())
  }

  fn empty_hinted<Item: Send + 'static, Err: Send + 'static>(&self, hint: TypeHint<Item>) -> Observable<Item, Err> {
    observable::empty_hinted(hint, self.immediate_scheduler())
  }

  fn never<Item: 'static, Err: 'static>(&self) -> Observable<Item, Err> { observable::never() }

  fn never_hinted<Item: 'static, Err: 'static>(&self, hint: TypeHint<Item>) -> Observable<Item, Err> {
    observable::never_hinted(hint)
  }

  fn of<Item, Err>(&self, value: Item) -> Observable<Item, Err>
  where
    Item: Clone + Send + Sync + 'static,
    Err: Send + 'static,
  {
    observable::of(value, self.immediate_scheduler())
  }

  fn of_result<Item, Err>(&self, result: Result<Item, Err>) -> Observable<Item, Err>
  where
    Item: Clone + Send + Sync + 'static,
    Err: Clone + Send + Sync + 'static,
  {
    observable::of_result(result, self.immediate_scheduler())
  }

  fn throw_err<Item, Err>(&self, err: Err) -> Observable<Item, Err>
  where
    Item: Send + 'static,
    Err: Clone + Send + Sync + 'static,
  {
    observable::throw_err(err, self.immediate_scheduler())
  }

  fn throw_err_hinted<Item, Err>(&self, hint: TypeHint<Item>, err: Err) -> Observable<Item, Err>
  where
    Item: Send + 'static,
    Err: Clone + Send + Sync + 'static,
  {
    observable::throw_err_hinted(hint, err, self.immediate_scheduler())
  }

  fn range<Err: Send + 'static>(&self, start: i64, count: i64) -> Result<Observable<i64, Err>, RxError> {
    observable::range(start, count, self.current_thread_scheduler())
  }

  fn repeat<Item, Err>(&self, value: Item) -> Observable<Item, Err>
  where
    Item: Clone + Send + Sync + 'static,
    Err: Send + 'static,
  {
    observable::repeat(value, self.current_thread_scheduler())
  }

  fn repeat_count<Item, Err>(&self, value: Item, count: i64) -> Result<Observable<Item, Err>, RxError>
  where
    Item: Clone + Send + Sync + 'static,
    Err: Send + 'static,
  {
    observable::repeat_count(value, count, self.current_thread_scheduler())
  }

  fn defer<Item, Err, F>(&self, factory: F) -> Observable<Item, Err>
  where
    Item: Send + 'static,
    Err: Send + 'static,
    F: Fn() -> Observable<Item, Err> + Send + Sync + 'static,
  {
    observable::defer(factory)
  }

  fn try_defer<Item, Err, F>(&self, factory: F) -> Observable<Item, Err>
  where
    Item: Send + 'static,
    Err: Send + 'static,
    F: Fn() -> Result<Observable<Item, Err>, Err> + Send + Sync + 'static,
  {
    observable::try_defer(factory)
  }

  fn start<Item, Err, F>(&self, func: F) -> Observable<Item, Err>
  where
    Item: Clone + Send + 'static,
    Err: Clone + Send + 'static,
    F: FnOnce() -> Result<Item, Err> + Send + 'static,
  {
    observable::start(func, self.thread_pool_scheduler())
  }

  fn to_async<Item, Err, F>(&self, func: F) -> impl Fn() -> Observable<Item, Err> + Send + Sync
  where
    Item: Clone + Send + 'static,
    Err: Clone + Send + 'static,
    F: Fn() -> Result<Item, Err> + Send + Sync + 'static,
  {
    observable::to_async(func, self.thread_pool_scheduler())
  }

  fn start_action<Err, F>(&self, action: F) -> Observable<(), Err>
  where
    Err: Clone + Send + 'static,
    F: FnOnce() + Send + 'static,
  {
    observable::start_action(action, self.thread_pool_scheduler())
  }

  fn to_async_action<Err, F>(&self, action: F) -> impl Fn() -> Observable<(), Err> + Send + Sync
  where
    Err: Clone + Send + 'static,
    F: Fn() + Send + Sync + 'static,
  {
    observable::to_async_action(action, self.thread_pool_scheduler())
  }
}

impl<I, T, P> ObservableFactory for Context<I, T, P>
where
  I: Scheduler,
  T: Scheduler,
  P: Scheduler,
{
  type Immediate = I;
  type CurrentThread = T;
  type ThreadPool = P;

  fn immediate_scheduler(&self) -> I { self.immediate().clone() }

  fn current_thread_scheduler(&self) -> T { self.current_thread().clone() }

  fn thread_pool_scheduler(&self) -> P { self.thread_pool().clone() }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use super::*;
  use crate::{observable::Recorder, scheduler::TestScheduler};

  #[rxcore_macro::test]
  fn defaults_deliver_synchronously() {
    let ctx = Context::new();
    let recorder = Recorder::default();
    ctx.of::<_, ()>(1).subscribe_with(recorder.clone());
    ctx.empty::<i32, ()>().subscribe_with(recorder.clone());
    ctx.range::<()>(2, 2).unwrap().subscribe_with(recorder.clone());
    ctx.repeat_count::<_, ()>(4, 1).unwrap().subscribe_with(recorder.clone());
    assert_eq!(
      recorder.events(),
      vec!["next(1)", "complete", "complete", "next(2)", "next(3)", "complete", "next(4)", "complete"]
    );
  }

  #[rxcore_macro::test]
  fn trampoline_member_can_be_replaced() {
    let test = TestScheduler::new();
    let ctx = Context::new().with_current_thread(test.clone());
    let recorder = Recorder::default();
    let subscription = ctx.repeat::<_, ()>('r').subscribe_with(recorder.clone());
    test.run_steps(3);
    subscription.unsubscribe();
    test.flush();
    assert_eq!(recorder.events(), vec!["next('r')", "next('r')", "next('r')"]);
  }

  #[rxcore_macro::test]
  fn to_async_uses_the_pool_member() {
    let test = TestScheduler::new();
    let ctx = Context::new().with_thread_pool(test.clone());
    let seen = Arc::new(Mutex::new(vec![]));
    let c_seen = seen.clone();
    let run = ctx.to_async(|| Ok::<_, ()>("done"));
    let result = run();
    result.subscribe(move |v| c_seen.lock().unwrap().push(v));
    assert!(seen.lock().unwrap().is_empty());
    test.flush();
    assert_eq!(*seen.lock().unwrap(), vec!["done"]);
  }

  #[rxcore_macro::test]
  fn hinted_factories_pin_the_item_type() {
    let ctx = Context::new();
    let recorder = Recorder::default();
    ctx
      .throw_err_hinted(TypeHint::<u8>::new(), "e")
      .subscribe_with(recorder.clone());
    ctx.empty_hinted::<_, ()>(TypeHint::<u8>::new()).subscribe_with(recorder.clone());
    ctx.never_hinted::<_, ()>(TypeHint::<u8>::new()).subscribe_with(recorder.clone());
    assert_eq!(recorder.events(), vec!["error(\"e\")", "complete"]);
  }
}

use super::{create, ForwardObserver, Observable, Subscriber};

/// Creates an observable that calls `factory` on every subscription and
/// subscribes to the observable it returns.
///
/// ```rust
/// use rxcore::prelude::*;
///
/// observable::defer(|| {
///   println!("Hi!");
///   observable::of::<_, (), _>("Hello!", ImmediateScheduler)
/// })
/// .subscribe(move |v| {
///   println!("{}", v);
/// });
/// // Prints: Hi!\nHello!\n
/// ```
pub fn defer<Item, Err, F>(factory: F) -> Observable<Item, Err>
where
  Item: Send + 'static,
  Err: Send + 'static,
  F: Fn() -> Observable<Item, Err> + Send + Sync + 'static,
{
  create(move |subscriber: Subscriber<Item, Err>| factory().subscribe_with(ForwardObserver(subscriber)))
}

/// [`defer`] for a factory that can fail.
///
/// A factory error does not escape the subscribe call: the subscriber
/// receives it on the error channel, as if the factory had returned
/// [`throw_err`](super::throw_err) on the immediate scheduler.
pub fn try_defer<Item, Err, F>(factory: F) -> Observable<Item, Err>
where
  Item: Send + 'static,
  Err: Send + 'static,
  F: Fn() -> Result<Observable<Item, Err>, Err> + Send + Sync + 'static,
{
  create(move |subscriber: Subscriber<Item, Err>| match factory() {
    Ok(source) => Some(source.subscribe_with(ForwardObserver(subscriber))),
    Err(err) => {
      subscriber.error(err);
      None
    }
  })
}

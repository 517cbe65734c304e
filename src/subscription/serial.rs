use std::mem;

use super::{BoxedSubscription, Subscription};
use crate::rc::{MutArc, RcDeref, RcDerefMut};

#[derive(Default)]
struct SerialState {
  closed: bool,
  current: Option<BoxedSubscription>,
}

/// A subscription whose underlying resource can be swapped.
///
/// Setting a new resource releases the previous one. Once this handle is
/// released, every resource set afterwards is released on arrival.
#[derive(Clone, Default)]
pub struct SerialSubscription(MutArc<SerialState>);

impl SerialSubscription {
  pub fn new() -> Self { Self::default() }

  pub fn set(&self, subscription: impl Subscription + Send + 'static) {
    let mut state = self.0.rc_deref_mut();
    if state.closed {
      drop(state);
      subscription.unsubscribe();
      return;
    }
    let previous = state.current.replace(BoxedSubscription::new(subscription));
    drop(state);
    previous.unsubscribe();
  }
}

impl Subscription for SerialSubscription {
  fn unsubscribe(self) {
    let current = {
      let mut state = self.0.rc_deref_mut();
      state.closed = true;
      mem::take(&mut state.current)
    };
    current.unsubscribe();
  }

  fn is_closed(&self) -> bool { self.0.rc_deref().closed }
}

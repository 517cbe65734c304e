use smallvec::SmallVec;

use super::{BoxedSubscription, Subscription};
use crate::rc::{MutArc, RcDeref, RcDerefMut};

#[derive(Default)]
struct Inner {
  closed: bool,
  teardown: SmallVec<[BoxedSubscription; 2]>,
}

/// A group of subscriptions released together.
///
/// Subscriptions added after the group was released are released on the
/// spot. Closed members are pruned whenever a new one is added.
#[derive(Clone, Default)]
pub struct CompositeSubscription(MutArc<Inner>);

impl CompositeSubscription {
  pub fn new() -> Self { Self::default() }

  pub fn add(&self, subscription: impl Subscription + Send + 'static) {
    let mut inner = self.0.rc_deref_mut();
    if inner.closed {
      drop(inner);
      subscription.unsubscribe();
    } else {
      inner.teardown.retain(|s| !s.is_closed());
      inner
        .teardown
        .push(BoxedSubscription::new(subscription));
    }
  }

  /// Number of live members.
  pub fn teardown_size(&self) -> usize { self.0.rc_deref().teardown.len() }
}

impl Subscription for CompositeSubscription {
  fn unsubscribe(self) {
    let teardown = {
      let mut inner = self.0.rc_deref_mut();
      if inner.closed {
        return;
      }
      inner.closed = true;
      std::mem::take(&mut inner.teardown)
    };
    for s in teardown {
      s.unsubscribe();
    }
  }

  fn is_closed(&self) -> bool { self.0.rc_deref().closed }
}

#[cfg(test)]
mod tests {
  use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
  };

  use super::*;
  use crate::subscription::ClosureSubscription;

  #[rxcore_macro::test]
  fn releases_every_member_once() {
    let hits = Arc::new(AtomicUsize::new(0));
    let composite = CompositeSubscription::new();
    for _ in 0..3 {
      let hits = hits.clone();
      composite.add(ClosureSubscription(move || {
        hits.fetch_add(1, Ordering::SeqCst);
      }));
    }
    assert_eq!(composite.teardown_size(), 3);

    composite.clone().unsubscribe();
    composite.clone().unsubscribe();
    assert_eq!(hits.load(Ordering::SeqCst), 3);
    assert_eq!(composite.teardown_size(), 0);
  }

  #[rxcore_macro::test]
  fn closed_members_are_pruned_and_late_members_released() {
    let composite = CompositeSubscription::new();
    composite.add(());
    composite.add(());
    // `()` is always closed, so each add prunes the previous one.
    assert_eq!(composite.teardown_size(), 1);

    composite.clone().unsubscribe();
    let hits = Arc::new(AtomicUsize::new(0));
    let c_hits = hits.clone();
    composite.add(ClosureSubscription(move || {
      c_hits.fetch_add(1, Ordering::SeqCst);
    }));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
  }
}

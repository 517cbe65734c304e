use std::mem;

use super::{BoxedSubscription, Subscription};
use crate::{
  error::RxError,
  rc::{MutArc, RcDeref, RcDerefMut},
};

#[derive(Default)]
enum Slot {
  #[default]
  Empty,
  Assigned(BoxedSubscription),
  Disposed,
}

/// A subscription whose underlying resource arrives after construction.
///
/// `subscribe` hands one of these back before the producer has run, so the
/// caller can cancel a subscription whose production is still deferred.
/// Releasing it before the resource arrives is remembered: the resource is
/// then released the moment it is assigned.
#[derive(Clone, Default)]
pub struct SingleAssignmentSubscription(MutArc<Slot>);

impl SingleAssignmentSubscription {
  pub fn new() -> Self { Self::default() }

  /// Assign the underlying resource.
  ///
  /// If this handle was already released, `subscription` is released
  /// immediately. A second assignment is rejected with
  /// [`RxError::AlreadyAssigned`] and the rejected resource is released so it
  /// cannot leak.
  pub fn assign(&self, subscription: impl Subscription + Send + 'static) -> Result<(), RxError> {
    let mut slot = self.0.rc_deref_mut();
    if matches!(*slot, Slot::Empty) {
      *slot = Slot::Assigned(BoxedSubscription::new(subscription));
      return Ok(());
    }
    let disposed = matches!(*slot, Slot::Disposed);
    drop(slot);
    subscription.unsubscribe();
    if disposed {
      tracing::debug!("subscription released before assignment, released resource on arrival");
      Ok(())
    } else {
      Err(RxError::AlreadyAssigned)
    }
  }

  /// Whether a resource has been assigned (released handles count as
  /// assigned, since any later resource is discarded).
  pub fn is_assigned(&self) -> bool { !matches!(*self.0.rc_deref(), Slot::Empty) }
}

impl Subscription for SingleAssignmentSubscription {
  fn unsubscribe(self) {
    let prev = mem::replace(&mut *self.0.rc_deref_mut(), Slot::Disposed);
    if let Slot::Assigned(inner) = prev {
      inner.unsubscribe();
    }
  }

  fn is_closed(&self) -> bool { matches!(*self.0.rc_deref(), Slot::Disposed) }
}

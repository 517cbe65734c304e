use std::mem;

use smallvec::SmallVec;

use crate::observer::Observer;

/// Observers of a subject, each kept under the id it was added with so a
/// subscription can remove exactly its own entry.
///
/// `SmallVec<[_; 2]>` avoids a heap allocation for the common case of one or
/// two observers.
pub(crate) struct Subscribers<Ob> {
  next_id: usize,
  items: SmallVec<[(usize, Ob); 2]>,
}

impl<Ob> Default for Subscribers<Ob> {
  fn default() -> Self { Self { next_id: 0, items: SmallVec::new() } }
}

impl<Ob> Subscribers<Ob> {
  /// Add an observer and return its unique id.
  pub(crate) fn add(&mut self, observer: Ob) -> usize {
    let id = self.next_id;
    self.next_id += 1;
    self.items.push((id, observer));
    id
  }

  pub(crate) fn remove(&mut self, id: usize) -> Option<Ob> {
    self
      .items
      .iter()
      .position(|(i, _)| *i == id)
      .map(|pos| self.items.remove(pos).1)
  }

  #[inline]
  pub(crate) fn contains(&self, id: usize) -> bool { self.items.iter().any(|(i, _)| *i == id) }

  #[inline]
  pub(crate) fn len(&self) -> usize { self.items.len() }

  /// Move every observer out, leaving this list empty. Ids keep counting up.
  pub(crate) fn take(&mut self) -> Self {
    Subscribers { next_id: self.next_id, items: mem::take(&mut self.items) }
  }

  /// Deliver `last` (if any) and then completion to every observer.
  pub(crate) fn complete_all<Item, Err>(self, last: Option<Item>)
  where
    Ob: Observer<Item, Err>,
    Item: Clone,
  {
    for (_, mut observer) in self.items {
      if let Some(value) = last.clone() {
        observer.next(value);
      }
      observer.complete();
    }
  }

  /// Deliver `err` to every observer, cloning for all but the last.
  pub(crate) fn error_all<Item, Err>(self, err: Err)
  where
    Ob: Observer<Item, Err>,
    Err: Clone,
  {
    let mut iter = self.items.into_iter().map(|(_, ob)| ob).peekable();
    while let Some(observer) = iter.next() {
      if iter.peek().is_some() {
        observer.error(err.clone());
      } else {
        observer.error(err);
        break;
      }
    }
  }
}

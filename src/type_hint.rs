use std::marker::PhantomData;

/// A witness that pins a generic type parameter without carrying a value.
///
/// The `_hinted` factories accept one so a caller can name the element type
/// by inference instead of a turbofish. The hint is never inspected.
pub struct TypeHint<T>(PhantomData<fn() -> T>);

impl<T> TypeHint<T> {
  #[inline]
  pub fn new() -> Self { Self::default() }
}

impl<T> Default for TypeHint<T> {
  fn default() -> Self { TypeHint(PhantomData) }
}

impl<T> Clone for TypeHint<T> {
  #[inline]
  fn clone(&self) -> Self { *self }
}

impl<T> Copy for TypeHint<T> {}

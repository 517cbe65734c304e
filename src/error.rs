//! Construction errors.
//!
//! These are raised synchronously by the call that builds an observable,
//! before anything is subscribed or scheduled. Errors produced while a stream
//! runs are never `RxError`s; they travel on the observer's `error` channel
//! with the stream's own `Err` type.

use thiserror::Error;

/// Errors returned by fallible observable factories.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RxError {
  /// `repeat_count` was asked to repeat a negative number of times.
  #[error("repeat count must not be negative, got {0}")]
  NegativeRepeatCount(i64),

  /// `range` was given a negative element count.
  #[error("range count must not be negative, got {0}")]
  NegativeRangeCount(i64),

  /// The last element of a range does not fit in an `i64`.
  #[error("range starting at {start} with {count} elements overflows i64")]
  RangeOverflow { start: i64, count: i64 },

  /// A single-assignment subscription received a second resource.
  #[error("single assignment subscription was already assigned")]
  AlreadyAssigned,
}

//! Subjects
//!
//! A subject is both an [`Observer`](crate::observer::Observer) and a source
//! of observables. The only one this crate needs is [`AsyncSubject`], which
//! bridges a single computed result into the stream model.

mod async_subject;
mod subscribers;

pub use async_subject::AsyncSubject;

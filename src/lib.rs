//! # rxcore: the subscription core of a reactive stream library
//!
//! Push-based streams, the protocol that wires a producer to a consumer, and
//! the canonical factories built on it.
//!
//! ## Quick Start
//!
//! ```rust
//! use rxcore::prelude::*;
//!
//! let ctx = Context::new();
//! let subscription = ctx.range::<()>(0, 10).unwrap().subscribe_all(
//!   |v| println!("Value: {v}"),
//!   |_| {},
//!   || println!("done"),
//! );
//! assert!(subscription.is_closed());
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observable`] | A reusable producer; every subscribe runs it again |
//! | [`Observer`] | Consumes `next`, `error`, and `complete` events |
//! | [`Subscription`] | Handle to cancel an active subscription |
//! | [`Scheduler`] | Decides when and where production runs |
//! | [`Context`] | The default schedulers used by [`ObservableFactory`] |
//!
//! Every subscription is guarded: the producer emits through a
//! [`Subscriber`](observable::Subscriber) that forwards at most one terminal
//! event and releases the subscription right after it. Producers that run
//! while this thread's trampoline is already busy are queued on it rather
//! than called on the current stack, which keeps resubscription loops such
//! as [`Observable::repeat`](observable::Observable::repeat) flat.
//!
//! ## Feature Flags
//!
//! - **`tokio-scheduler`**: a [`TokioScheduler`](scheduler) that runs work on
//!   a tokio runtime
//!
//! [`Observable`]: observable::Observable
//! [`Observer`]: observer::Observer
//! [`Subscription`]: subscription::Subscription
//! [`Scheduler`]: scheduler::Scheduler
//! [`Context`]: context::Context
//! [`ObservableFactory`]: factory::ObservableFactory

pub mod context;
pub mod error;
pub mod factory;
pub mod observable;
pub mod observer;
pub mod prelude;
pub mod rc;
pub mod scheduler;
pub mod subject;
pub mod subscription;
pub mod type_hint;

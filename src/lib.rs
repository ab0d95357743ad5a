//! `pushstream` is a minimal push-stream primitive: a cold `Observable` that runs a
//! producer function for each subscriber, and a guarded `Subscriber` that makes
//! sure no handler fires once the stream has ended.
//!
//! A producer pushes zero or more values with `next`, then optionally ends the
//! stream with `complete` or `error`. The caller may cancel at any time through
//! the returned `Subscription`. Whichever terminal event arrives first wins; every
//! later terminal call is ignored, and the teardown returned by the producer runs
//! exactly once.
//!
//! Delivery is synchronous. `Observable::from` emits its entire sequence before
//! `subscribe` returns.
//!
//! ```
//! use pushstream::subscribe::{HandlerSet, Unsubscribeable};
//! use pushstream::{Observable, Subscribeable};
//!
//! let mut observable = Observable::from(["a", "b", "c"]);
//!
//! let mut handlers = HandlerSet::on_next(|v| println!("Emitted {}", v));
//! handlers.on_error(|e| eprintln!("Failed: {}", e));
//! handlers.on_complete(|| println!("Completed"));
//!
//! let subscription = observable.subscribe(handlers);
//! subscription.unsubscribe();
//! ```
//!
//! A producer that panics while `subscribe` runs it does not unwind into the
//! caller. The panic is reported to the `error` handler as
//! [`ObservableError::ProducerPanicked`].

mod errors;
mod observable;
pub mod observer;
mod subscription;

pub use errors::*;
pub use observable::*;
pub use observer::Observer;
pub use subscription::subscribe;
pub use subscription::subscribe::{Subscribeable, Unsubscribeable};

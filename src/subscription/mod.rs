//! Provides structures and traits related to subscription management.
//!
//! This module includes `HandlerSet` for the consumer's `next`, `error` and
//! `complete` callbacks, `Subscriber` which guards those callbacks and is handed
//! to the producer, and `Subscription` for cancelling a subscription.
//!
//! Additionally, it defines the `Teardown` enum describing what runs when a
//! subscription ends.
pub mod subscribe;

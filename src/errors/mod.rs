//! Error types emitted through the `error` channel of a subscription.
mod observable_errors;

pub use observable_errors::*;

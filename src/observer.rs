use std::{error::Error, sync::Arc};

/// The receiving side of a push stream.
///
/// Producers push items with `next` and end the stream with either `error` or
/// `complete`. Implementations guarantee that nothing is delivered once the
/// observer has terminated.
pub trait Observer {
    /// The type of items pushed into this observer.
    type NextFnType;

    /// Value returned by the consumer's `next` and `error` handlers.
    type Ack;

    /// Delivers an item. Returns the handler's acknowledgement, or `None` if the
    /// item was dropped because the observer is terminated or has no `next`
    /// handler.
    fn next(&self, _: Self::NextFnType) -> Option<Self::Ack>;

    /// Delivers an error and terminates the observer. Ignored if the observer
    /// already terminated.
    fn error(&self, _: Arc<dyn Error + Send + Sync>) -> Option<Self::Ack>;

    /// Signals completion and terminates the observer. Ignored if the observer
    /// already terminated.
    fn complete(&self);

    /// Returns `true` once `error`, `complete` or `unsubscribe` has been called.
    fn is_terminated(&self) -> bool;
}

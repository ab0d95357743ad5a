use std::{
    error::Error,
    fmt,
    future::Future,
    pin::Pin,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard,
    },
};

use tokio::runtime;

use crate::observer::Observer;

/// A trait for types that can be subscribed to, allowing consumers to receive
/// values pushed by a producer.
pub trait Subscribeable {
    /// The type of items emitted by the stream.
    type ObsType;

    /// The acknowledgement type returned by the consumer's handlers.
    type Ack;

    /// Subscribes to the stream and specifies how to handle emitted values.
    ///
    /// The `HandlerSet` parameter defines the behavior for processing values,
    /// errors and completion. The implementation of this method should establish
    /// the subscription and manage the delivery of values to the handlers.
    ///
    /// The returned `Subscription` allows the caller to cancel the subscription.
    fn subscribe(&mut self, handlers: HandlerSet<Self::ObsType, Self::Ack>) -> Subscription;
}

/// A trait for types that can be unsubscribed, signalling the producer to stop
/// emitting and releasing what the subscription holds.
pub trait Unsubscribeable {
    /// Terminates the subscription and runs its teardown.
    ///
    /// Calling this more than once is allowed; the teardown runs at most once over
    /// the lifetime of the subscription, no matter how many times this method or
    /// the terminal `error`/`complete` events are invoked.
    fn unsubscribe(&self);
}

type NextFn<T, A> = Box<dyn FnMut(T) -> A + Send>;
type ErrorFn<A> = Box<dyn FnMut(Arc<dyn Error + Send + Sync>) -> A + Send>;
type CompleteFn = Box<dyn FnMut() + Send>;

/// The callbacks a consumer supplies when subscribing. Each one is optional.
///
/// `A` is the acknowledgement returned by `next` and `error`. The crate never
/// interprets it; it is handed back to whoever pushed the event.
pub struct HandlerSet<T, A = ()> {
    next_fn: Option<NextFn<T, A>>,
    error_fn: Option<ErrorFn<A>>,
    complete_fn: Option<CompleteFn>,
}

impl<T, A> HandlerSet<T, A> {
    /// Creates a new `HandlerSet` with all three handlers.
    pub fn new(
        next_fn: impl FnMut(T) -> A + 'static + Send,
        error_fn: impl FnMut(Arc<dyn Error + Send + Sync>) -> A + 'static + Send,
        complete_fn: impl FnMut() + 'static + Send,
    ) -> Self {
        HandlerSet {
            next_fn: Some(Box::new(next_fn)),
            error_fn: Some(Box::new(error_fn)),
            complete_fn: Some(Box::new(complete_fn)),
        }
    }

    /// Creates a `HandlerSet` with only the `next` handler.
    pub fn on_next(next_fn: impl FnMut(T) -> A + 'static + Send) -> Self {
        HandlerSet {
            next_fn: Some(Box::new(next_fn)),
            error_fn: None,
            complete_fn: None,
        }
    }

    /// Creates a `HandlerSet` that ignores every event.
    #[must_use]
    pub fn empty() -> Self {
        HandlerSet {
            next_fn: None,
            error_fn: None,
            complete_fn: None,
        }
    }

    /// Set the error-handling function.
    ///
    /// The provided closure will be called at most once, when the producer pushes
    /// an error. It takes an `Arc` wrapping a trait object that implements the
    /// `Error`, `Send`, and `Sync` traits as its parameter.
    pub fn on_error(
        &mut self,
        error_fn: impl FnMut(Arc<dyn Error + Send + Sync>) -> A + 'static + Send,
    ) {
        self.error_fn = Some(Box::new(error_fn));
    }

    /// Set the completion function. It will be called at most once.
    pub fn on_complete(&mut self, complete_fn: impl FnMut() + 'static + Send) {
        self.complete_fn = Some(Box::new(complete_fn));
    }
}

impl<T, A> Default for HandlerSet<T, A> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T, A> fmt::Debug for HandlerSet<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerSet")
            .field("next", &self.next_fn.is_some())
            .field("error", &self.error_fn.is_some())
            .field("complete", &self.complete_fn.is_some())
            .finish()
    }
}

/// What runs when a subscription ends, returned by the producer function.
pub enum Teardown {
    /// Nothing to release.
    Nil,

    /// If one subscription depends on another. The wrapped subscription's
    /// unsubscribe is called upon teardown.
    Wrapped(Box<Subscription>),

    /// Teardown defined by a function.
    Logic(Box<dyn FnOnce() + Send>),

    /// Asynchronous teardown represented by a future. Use if you need to spawn
    /// `Tokio` tasks or `.await` as a part of the teardown.
    Future(Pin<Box<dyn Future<Output = ()> + Send>>),
}

impl Teardown {
    fn run(self) {
        match self {
            Teardown::Nil => (),
            Teardown::Logic(fnc) => fnc(),
            Teardown::Wrapped(subscription) => subscription.unsubscribe(),
            Teardown::Future(future) => match runtime::Handle::try_current() {
                Ok(handle) => {
                    handle.spawn(future);
                }
                Err(_) => match runtime::Builder::new_current_thread().enable_all().build() {
                    Ok(rt) => rt.block_on(future),
                    Err(e) => {
                        tracing::error!(error = %e, "failed to build runtime for teardown future");
                    }
                },
            },
        }
    }
}

impl fmt::Debug for Teardown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Teardown::Nil => "Nil",
            Teardown::Wrapped(_) => "Wrapped",
            Teardown::Logic(_) => "Logic",
            Teardown::Future(_) => "Future",
        };
        f.debug_tuple("Teardown").field(&kind).finish()
    }
}

// Handlers and teardown sit behind separate locks so a handler can call
// `unsubscribe` on its own subscriber.
struct Shared<T, A> {
    terminated: AtomicBool,
    handlers: Mutex<HandlerSet<T, A>>,
    teardown: Mutex<Option<Teardown>>,
}

fn lock<X>(m: &Mutex<X>) -> MutexGuard<'_, X> {
    // A handler that panicked poisons the lock; the state it guards is still
    // consistent.
    m.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// The guarded observer handed to a producer function.
///
/// Wraps the consumer's `HandlerSet` and enforces that no handler fires after
/// termination, whether it came from `error`, `complete` or `unsubscribe`. The
/// teardown installed by the owning `Observable` runs at most once.
///
/// `Subscriber` is a cheap handle: clones share the same state, so a producer
/// can keep one around to emit after its function returned, or move it into a
/// thread or `Tokio` task.
///
/// Handlers run under a non-reentrant lock. A handler may call `unsubscribe` on
/// its own subscriber, but pushing `next`, `error` or `complete` into its own
/// live subscriber deadlocks. Once the subscriber terminated every push returns
/// without locking, so `complete` and `error` handlers may push freely.
pub struct Subscriber<T, A = ()> {
    shared: Arc<Shared<T, A>>,
}

impl<T, A> Clone for Subscriber<T, A> {
    fn clone(&self) -> Self {
        Subscriber {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T, A> Subscriber<T, A> {
    /// Creates a `Subscriber` wrapping `handlers` with a no-op teardown.
    #[must_use]
    pub fn new(handlers: HandlerSet<T, A>) -> Self {
        Subscriber {
            shared: Arc::new(Shared {
                terminated: AtomicBool::new(false),
                handlers: Mutex::new(handlers),
                teardown: Mutex::new(None),
            }),
        }
    }

    // Replaces the no-op teardown. If the subscriber already terminated, e.g. a
    // producer that completed synchronously, the teardown runs right away.
    pub(crate) fn set_teardown(&self, teardown: Teardown) {
        let mut slot = lock(&self.shared.teardown);
        if self.shared.terminated.load(Ordering::SeqCst) {
            drop(slot);
            tracing::debug!(?teardown, "subscriber already terminated, running teardown");
            teardown.run();
            return;
        }
        *slot = Some(teardown);
    }

    // Flips the subscriber into its terminal state. Returns `true` only for the
    // caller that performed the transition.
    fn terminate(&self) -> bool {
        !self.shared.terminated.swap(true, Ordering::SeqCst)
    }

    fn run_teardown(&self) {
        let teardown = lock(&self.shared.teardown).take();
        if let Some(teardown) = teardown {
            tracing::debug!(?teardown, "running teardown");
            teardown.run();
        }
    }

    /// Returns a `Subscription` handle controlling this subscriber.
    #[must_use]
    pub fn subscription(&self) -> Subscription
    where
        T: 'static,
        A: 'static,
    {
        Subscription {
            subscriber: Arc::new(self.clone()),
        }
    }
}

impl<T, A> Observer for Subscriber<T, A> {
    type NextFnType = T;
    type Ack = A;

    fn next(&self, v: Self::NextFnType) -> Option<Self::Ack> {
        if self.is_terminated() {
            tracing::trace!("next dropped, subscriber terminated");
            return None;
        }
        // Check again under the lock: a call queued behind a running handler must
        // not deliver once a concurrent terminal call has flipped the flag.
        let mut handlers = lock(&self.shared.handlers);
        if self.is_terminated() {
            tracing::trace!("next dropped, subscriber terminated");
            return None;
        }
        handlers.next_fn.as_mut().map(|nfn| nfn(v))
    }

    fn error(&self, observable_error: Arc<dyn Error + Send + Sync>) -> Option<Self::Ack> {
        if !self.terminate() {
            tracing::trace!(error = %observable_error, "error ignored, subscriber terminated");
            return None;
        }
        let ack = {
            let mut handlers = lock(&self.shared.handlers);
            handlers.error_fn.as_mut().map(|efn| efn(observable_error))
        };
        self.run_teardown();
        ack
    }

    fn complete(&self) {
        if !self.terminate() {
            tracing::trace!("complete ignored, subscriber terminated");
            return;
        }
        {
            let mut handlers = lock(&self.shared.handlers);
            if let Some(cfn) = handlers.complete_fn.as_mut() {
                cfn();
            }
        }
        self.run_teardown();
    }

    fn is_terminated(&self) -> bool {
        self.shared.terminated.load(Ordering::SeqCst)
    }
}

impl<T, A> Unsubscribeable for Subscriber<T, A> {
    fn unsubscribe(&self) {
        if self.terminate() {
            self.run_teardown();
        }
    }
}

impl<T, A> fmt::Debug for Subscriber<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber")
            .field("terminated", &self.is_terminated())
            .finish_non_exhaustive()
    }
}

// Object-safe view of a subscriber so `Subscription` does not carry the item
// and ack types.
trait Cancel: Send + Sync {
    fn cancel(&self);
    fn is_closed(&self) -> bool;
}

impl<T, A> Cancel for Subscriber<T, A> {
    fn cancel(&self) {
        Unsubscribeable::unsubscribe(self);
    }

    fn is_closed(&self) -> bool {
        self.is_terminated()
    }
}

/// Represents a subscription to an observable, allowing the caller to cancel it.
///
/// Cloning a `Subscription` yields another handle to the same subscriber.
/// Dropping it does not unsubscribe.
#[derive(Clone)]
pub struct Subscription {
    subscriber: Arc<dyn Cancel>,
}

impl Subscription {
    /// Returns `true` once the subscription has terminated, either because the
    /// producer signalled `error`/`complete` or because it was unsubscribed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.subscriber.is_closed()
    }
}

impl Unsubscribeable for Subscription {
    fn unsubscribe(&self) {
        self.subscriber.cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("closed", &self.is_closed())
            .finish()
    }
}

//! The `observable` module provides `Observable`, a cold push stream driven by a
//! producer function.

use std::{
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};

use crate::observer::Observer;
use crate::subscription::subscribe::{
    HandlerSet, Subscribeable, Subscriber, Subscription, Teardown,
};
use crate::ObservableError;

/// The `Observable` struct represents a source of values that can be observed.
///
/// It owns a single producer function. Every call to `subscribe` creates a new
/// `Subscriber` for the supplied handlers, runs the producer with it on the
/// calling thread, and stores the `Teardown` the producer returns. Subscriptions
/// share nothing with each other.
///
/// # Example: basic synchronous `Observable`
///
/// ```
/// use pushstream::subscribe::{HandlerSet, Teardown, Unsubscribeable};
/// use pushstream::{Observable, Observer, Subscribeable};
///
/// // Create a custom observable that emits values from 1 to 10.
/// let mut emit_10_observable = Observable::new(|subscriber| {
///     for i in 1..=10 {
///         // Emit the value to the subscriber.
///         subscriber.next(i);
///     }
///     // Signal completion to the subscriber.
///     subscriber.complete();
///
///     Teardown::Logic(Box::new(|| println!("Released")))
/// });
///
/// let mut handlers = HandlerSet::on_next(|v| println!("Emitted {}", v));
/// handlers.on_complete(|| println!("Completed"));
///
/// // Production is synchronous, everything is emitted before `subscribe`
/// // returns. Teardown already ran at completion so this is a no-op.
/// let subscription = emit_10_observable.subscribe(handlers);
/// assert!(subscription.is_closed());
/// subscription.unsubscribe();
/// ```
pub struct Observable<T, A = ()> {
    subscribe_fn: Box<dyn FnMut(Subscriber<T, A>) -> Teardown + Send + Sync>,
}

impl<T: 'static, A: 'static> Observable<T, A> {
    /// Create a new `Observable` from a producer function.
    ///
    /// The producer receives the `Subscriber` for each subscription, pushes values
    /// into it, and returns the `Teardown` to run when the subscription ends. It may
    /// keep clones of the `Subscriber` to emit later.
    pub fn new(sf: impl FnMut(Subscriber<T, A>) -> Teardown + Send + Sync + 'static) -> Self {
        Observable {
            subscribe_fn: Box::new(sf),
        }
    }
}

impl<T, A> Observable<T, A>
where
    T: Clone + Send + Sync + 'static,
    A: 'static,
{
    /// Creates an observable that, on each subscription, emits every item of
    /// `items` in order and then completes.
    ///
    /// The teardown it returns only logs that the subscription was released.
    #[allow(clippy::should_implement_trait)]
    pub fn from(items: impl IntoIterator<Item = T>) -> Self {
        let items: Vec<T> = items.into_iter().collect();
        Observable::new(move |o| {
            for item in &items {
                o.next(item.clone());
            }
            o.complete();

            Teardown::Logic(Box::new(|| tracing::info!("unsubscribed")))
        })
    }
}

impl<T: 'static, A: 'static> Subscribeable for Observable<T, A> {
    type ObsType = T;
    type Ack = A;

    fn subscribe(&mut self, handlers: HandlerSet<Self::ObsType, Self::Ack>) -> Subscription {
        let subscriber = Subscriber::new(handlers);
        let subscription = subscriber.subscription();
        tracing::debug!(?subscriber, "subscribing");

        let producer_subscriber = subscriber.clone();
        let produced = panic::catch_unwind(AssertUnwindSafe(|| {
            (self.subscribe_fn)(producer_subscriber)
        }));

        match produced {
            Ok(teardown) => subscriber.set_teardown(teardown),
            Err(payload) => {
                let e = ObservableError::from_panic(&*payload);
                tracing::error!(error = %e, "producer panicked, routing to error handler");
                subscriber.error(Arc::new(e));
            }
        }
        subscription
    }
}

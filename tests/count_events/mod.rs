use std::{
    fmt,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use tracing::field::{Field, Visit};
use tracing_subscriber::{layer::Context, prelude::*, Layer};

/// Counts `tracing` events whose message equals `message`.
pub struct CountEvents {
    message: &'static str,
    count: Arc<AtomicUsize>,
}

struct MessageVisitor(Option<String>);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = Some(format!("{:?}", value));
        }
    }
}

impl<S: tracing::Subscriber> Layer<S> for CountEvents {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor(None);
        event.record(&mut visitor);
        if visitor.0.as_deref() == Some(self.message) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Runs `f` with a thread-local subscriber counting events logged with
/// `message`, and returns the shared counter.
pub fn with_event_counter<R>(
    message: &'static str,
    f: impl FnOnce(&Arc<AtomicUsize>) -> R,
) -> R {
    let count = Arc::new(AtomicUsize::new(0));
    let layer = CountEvents {
        message,
        count: Arc::clone(&count),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, || f(&count))
}

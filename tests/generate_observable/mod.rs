use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use pushstream::{
    subscribe::{Subscriber, Teardown},
    Observable,
};

/// Observable whose producer emits nothing up front and instead hands every
/// subscriber to the test, so events can be pushed one at a time.
pub struct ManualObservable<A> {
    pub observable: Observable<i32, A>,
    pub subscribers: Arc<Mutex<Vec<Subscriber<i32, A>>>>,
    pub teardowns: Arc<AtomicUsize>,
}

impl<A: 'static> ManualObservable<A> {
    pub fn subscriber(&self, index: usize) -> Subscriber<i32, A> {
        self.subscribers.lock().unwrap()[index].clone()
    }

    pub fn teardown_count(&self) -> usize {
        self.teardowns.load(Ordering::SeqCst)
    }
}

pub fn generate_manual_observable<A: 'static>() -> ManualObservable<A> {
    let subscribers = Arc::new(Mutex::new(Vec::new()));
    let subscribers_c = Arc::clone(&subscribers);
    let teardowns = Arc::new(AtomicUsize::new(0));
    let teardowns_c = Arc::clone(&teardowns);

    let observable = Observable::new(move |o: Subscriber<i32, A>| {
        subscribers_c.lock().unwrap().push(o);

        let teardowns = Arc::clone(&teardowns_c);
        Teardown::Logic(Box::new(move || {
            teardowns.fetch_add(1, Ordering::SeqCst);
        }))
    });

    ManualObservable {
        observable,
        subscribers,
        teardowns,
    }
}

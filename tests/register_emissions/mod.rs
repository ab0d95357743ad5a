use std::sync::{Arc, Mutex};

use pushstream::subscribe::HandlerSet;

pub fn register_emissions_handlers() -> (
    Vec<impl FnOnce() -> HandlerSet<i32, usize>>,
    Arc<Mutex<Vec<i32>>>,
    Arc<Mutex<Vec<i32>>>,
    Arc<Mutex<Vec<String>>>,
) {
    let nexts: Vec<i32> = Vec::with_capacity(5);
    let nexts = Arc::new(Mutex::new(nexts));
    let nexts_c = Arc::clone(&nexts);

    let completes: Vec<i32> = Vec::with_capacity(5);
    let completes = Arc::new(Mutex::new(completes));
    let completes_c = Arc::clone(&completes);

    let errors: Vec<String> = Vec::with_capacity(5);
    let errors = Arc::new(Mutex::new(errors));
    let errors_c = Arc::clone(&errors);

    let make_handlers = vec![
        move || {
            HandlerSet::new(
                move |n| {
                    // Track next() calls, ack with the running count.
                    let mut nexts = nexts_c.lock().unwrap();
                    nexts.push(n);
                    nexts.len()
                },
                move |e| {
                    // Track error() calls.
                    let mut errors = errors_c.lock().unwrap();
                    errors.push(e.to_string());
                    errors.len()
                },
                move || {
                    // Track complete() calls.
                    completes_c.lock().unwrap().push(1);
                },
            )
        };
        10
    ];
    (make_handlers, nexts, completes, errors)
}

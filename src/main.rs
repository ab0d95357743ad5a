//! Replays a fixed list of mock HTTP requests through an `Observable`.
//!
//! Set `RUST_LOG` to change the log filter, e.g. `RUST_LOG=debug` to also see
//! the subscription lifecycle.

mod requests;

use pushstream::subscribe::{HandlerSet, Unsubscribeable};
use pushstream::{Observable, Subscribeable};
use tracing_subscriber::EnvFilter;

use requests::{handle_complete, handle_error, handle_request, requests_mock, Request, Response};

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut requests = Observable::from(requests_mock());

    let subscription = requests.subscribe(HandlerSet::new(
        |request: Request| -> Response { handle_request(&request) },
        handle_error,
        handle_complete,
    ));

    subscription.unsubscribe();
}

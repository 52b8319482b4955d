//! In-memory transport for tests: canned responses plus a call log.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use super::transport::{Method, RawResponse, Request, Transport, TransportError};

type Failure = Box<dyn Fn() -> TransportError + Send + Sync>;

enum Route {
    Respond(RawResponse),
    Fail(Failure),
}

/// Unrouted requests get an empty 404.
#[derive(Default)]
pub(crate) struct MockTransport {
    routes: Mutex<HashMap<(Method, String), Route>>,
    calls: Mutex<Vec<Request>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn route_get(&self, url: &str, status: u32, body: &str) {
        self.route(Method::Get, url, status, body);
    }

    pub(crate) fn route_head(&self, url: &str, status: u32) {
        self.route(Method::Head, url, status, "");
    }

    pub(crate) fn fail(&self, url: &str, error: impl Fn() -> TransportError + Send + Sync + 'static) {
        self.lock_routes()
            .insert((Method::Get, url.to_string()), Route::Fail(Box::new(error)));
    }

    fn route(&self, method: Method, url: &str, status: u32, body: &str) {
        let response = RawResponse {
            status,
            headers: Vec::new(),
            body: body.as_bytes().to_vec(),
            final_url: Some(url.to_string()),
        };
        self.lock_routes()
            .insert((method, url.to_string()), Route::Respond(response));
    }

    fn lock_routes(&self) -> std::sync::MutexGuard<'_, HashMap<(Method, String), Route>> {
        self.routes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every request seen so far, in order.
    pub(crate) fn calls(&self) -> Vec<Request> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Requests with exactly this method and URL.
    pub(crate) fn count(&self, method: Method, url: &str) -> usize {
        self.calls()
            .iter()
            .filter(|r| r.method == method && r.url == url)
            .count()
    }

    /// Requests of any method whose URL starts with `prefix`.
    pub(crate) fn count_prefix(&self, prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|r| r.url.starts_with(prefix))
            .count()
    }
}

impl Transport for MockTransport {
    fn execute(&self, request: &Request) -> Result<RawResponse, TransportError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        let routes = self.lock_routes();
        match routes.get(&(request.method, request.url.clone())) {
            Some(Route::Respond(response)) => Ok(response.clone()),
            Some(Route::Fail(make_error)) => Err(make_error()),
            None => Ok(RawResponse {
                status: 404,
                final_url: Some(request.url.clone()),
                ..RawResponse::default()
            }),
        }
    }
}

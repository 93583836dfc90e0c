use std::sync::Arc;
use std::time::Instant;

use tracing::{field, info_span};

use super::Middleware;
use crate::dispatcher::{handler_fn, Handler, SharedHandler};
use crate::server::{MatchedRoute, ResponseWriter, StatusWriter};

/// Opens a `request` span around every dispatch.
///
/// Span fields: `method`, `path`, `route` (the matched pattern, or empty for
/// synthesized responses), then `status`, `bytes` and `latency_us` recorded
/// once the inner handler returns.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingMiddleware;

impl Middleware for TracingMiddleware {
    fn wrap(&self, next: SharedHandler) -> SharedHandler {
        Arc::new(handler_fn(move |w: &mut dyn ResponseWriter, req| {
            let route = req
                .extensions()
                .get::<MatchedRoute>()
                .map(|m| Arc::clone(&m.pattern));
            let span = info_span!(
                "request",
                method = %req.method(),
                path = %req.uri().path(),
                route = route.as_deref().unwrap_or(""),
                status = field::Empty,
                bytes = field::Empty,
                latency_us = field::Empty,
            );
            let _entered = span.enter();

            let start = Instant::now();
            let mut sw = StatusWriter::new(w);
            next.serve(&mut sw, req);

            span.record("status", sw.status().as_u16());
            span.record("bytes", sw.bytes_written());
            span.record("latency_us", start.elapsed().as_micros() as u64);
        }))
    }
}

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::Middleware;
use crate::dispatcher::{handler_fn, Handler, SharedHandler};
use crate::server::{ResponseWriter, StatusWriter};

#[derive(Default)]
struct Counters {
    request_count: AtomicUsize,
    total_latency_ns: AtomicU64,
    /// Responses by status class, index 0 = 1xx .. 4 = 5xx
    by_class: [AtomicUsize; 5],
}

/// Middleware for collecting request metrics
///
/// Tracks request count, latency and responses by status class. All counters
/// use atomic operations, so one instance can be shared by every dispatch.
/// Cloning shares the counters.
///
/// ```rust
/// use segmux::{MetricsMiddleware, Mux};
///
/// let metrics = MetricsMiddleware::new();
/// let mux = Mux::new();
/// mux.use_middleware(metrics.clone());
/// assert_eq!(metrics.request_count(), 0);
/// ```
#[derive(Clone, Default)]
pub struct MetricsMiddleware {
    counters: Arc<Counters>,
}

impl MetricsMiddleware {
    /// Create a new metrics middleware with all counters initialized to zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the total number of requests processed
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.counters.request_count.load(Ordering::Relaxed)
    }

    /// Calculate the average request latency
    ///
    /// Returns zero duration if no requests have been processed yet.
    #[must_use]
    pub fn average_latency(&self) -> Duration {
        let count = self.counters.request_count.load(Ordering::Relaxed) as u64;
        if count == 0 {
            Duration::from_nanos(0)
        } else {
            Duration::from_nanos(self.counters.total_latency_ns.load(Ordering::Relaxed) / count)
        }
    }

    /// Number of responses whose status falls in `class` (1 for 1xx .. 5 for 5xx).
    #[must_use]
    pub fn status_class_count(&self, class: u16) -> usize {
        match class {
            1..=5 => self.counters.by_class[usize::from(class - 1)].load(Ordering::Relaxed),
            _ => 0,
        }
    }
}

impl std::fmt::Debug for MetricsMiddleware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsMiddleware")
            .field("request_count", &self.request_count())
            .field("average_latency", &self.average_latency())
            .finish()
    }
}

impl Middleware for MetricsMiddleware {
    fn wrap(&self, next: SharedHandler) -> SharedHandler {
        let counters = Arc::clone(&self.counters);
        Arc::new(handler_fn(move |w: &mut dyn ResponseWriter, req| {
            let start = Instant::now();
            let mut sw = StatusWriter::new(w);
            next.serve(&mut sw, req);
            let latency = start.elapsed();

            counters.request_count.fetch_add(1, Ordering::Relaxed);
            counters
                .total_latency_ns
                .fetch_add(latency.as_nanos() as u64, Ordering::Relaxed);
            let class = sw.status().as_u16() / 100;
            if (1..=5).contains(&class) {
                counters.by_class[usize::from(class - 1)].fetch_add(1, Ordering::Relaxed);
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::Recorder;
    use http::StatusCode;

    #[test]
    fn test_metrics_zero_requests() {
        let metrics = MetricsMiddleware::new();
        assert_eq!(metrics.request_count(), 0);
        assert_eq!(metrics.average_latency(), Duration::from_nanos(0));
        assert_eq!(metrics.status_class_count(2), 0);
        assert_eq!(metrics.status_class_count(9), 0);
    }

    #[test]
    fn test_metrics_counts_by_class() {
        let metrics = MetricsMiddleware::new();
        let ok: SharedHandler = Arc::new(handler_fn(|w: &mut dyn ResponseWriter, _req| {
            let _ = w.write(b"ok");
        }));
        let missing: SharedHandler = Arc::new(handler_fn(|w: &mut dyn ResponseWriter, _req| {
            w.write_status(StatusCode::NOT_FOUND);
        }));
        let ok = metrics.wrap(ok);
        let missing = metrics.wrap(missing);

        for _ in 0..3 {
            ok.serve(&mut Recorder::new(), http::Request::new(Vec::new()));
        }
        missing.serve(&mut Recorder::new(), http::Request::new(Vec::new()));

        assert_eq!(metrics.request_count(), 4);
        assert_eq!(metrics.status_class_count(2), 3);
        assert_eq!(metrics.status_class_count(4), 1);
    }

    #[test]
    fn test_clones_share_counters() {
        let metrics = MetricsMiddleware::new();
        let clone = metrics.clone();
        let h: SharedHandler = Arc::new(handler_fn(|_w: &mut dyn ResponseWriter, _req| {}));
        clone.wrap(h).serve(&mut Recorder::new(), http::Request::new(Vec::new()));
        assert_eq!(metrics.request_count(), 1);
    }
}

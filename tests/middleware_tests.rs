mod common;

use common::requests::{get, serve, tagged};
use common::tracing_util::TestTracing;
use http::StatusCode;
use parking_lot::Mutex;
use segmux::{
    handler_fn, Handler, MatchedRoute, MetricsMiddleware, Mux, ResponseWriter, SharedHandler,
    SharedMiddleware, TracingMiddleware,
};
use std::sync::Arc;

type Log = Arc<Mutex<Vec<String>>>;

fn logging(name: &'static str, log: &Log) -> impl Fn(SharedHandler) -> SharedHandler + Send + Sync {
    let log = Arc::clone(log);
    move |next: SharedHandler| -> SharedHandler {
        let log = Arc::clone(&log);
        Arc::new(handler_fn(move |w: &mut dyn ResponseWriter, req| {
            log.lock().push(name.to_string());
            next.serve(w, req);
        }))
    }
}

fn logging_handler(mux: &Mux, pattern: &str, log: &Log) {
    let log = Arc::clone(log);
    mux.handle_func(pattern, move |_w, _req| {
        log.lock().push("handler".to_string());
    });
}

#[test]
fn test_middleware_runs_in_append_order() {
    let log: Log = Arc::default();
    let mux = Mux::new();
    mux.use_middleware(logging("m1", &log));
    mux.use_middleware(logging("m2", &log));
    logging_handler(&mux, "/", &log);

    serve(&mux, get("/anything"));
    assert_eq!(*log.lock(), vec!["m1", "m2", "handler"]);
}

#[test]
fn test_use_all_keeps_order() {
    let log: Log = Arc::default();
    let mux = Mux::new();
    let layers: Vec<SharedMiddleware> = vec![
        Arc::new(logging("a", &log)),
        Arc::new(logging("b", &log)),
        Arc::new(logging("c", &log)),
    ];
    mux.use_all(layers);
    logging_handler(&mux, "/x", &log);

    serve(&mux, get("/x"));
    assert_eq!(*log.lock(), vec!["a", "b", "c", "handler"]);
    assert_eq!(mux.middleware_len(), 3);
}

#[test]
fn test_middleware_wraps_synthesized_responses() {
    let log: Log = Arc::default();
    let mux = Mux::new();
    mux.use_middleware(logging("outer", &log));
    tagged(&mux, "/dir/");

    let rec = serve(&mux, get("/missing"));
    assert_eq!(rec.status(), StatusCode::NOT_FOUND);
    let rec = serve(&mux, get("/dir"));
    assert_eq!(rec.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(*log.lock(), vec!["outer", "outer"]);
}

#[test]
fn test_middleware_sees_matched_route() {
    let seen: Arc<Mutex<Option<String>>> = Arc::default();
    let mux = Mux::new();
    let sink = Arc::clone(&seen);
    mux.use_middleware(move |next: SharedHandler| -> SharedHandler {
        let sink = Arc::clone(&sink);
        Arc::new(handler_fn(move |w: &mut dyn ResponseWriter, req| {
            *sink.lock() = req
                .extensions()
                .get::<MatchedRoute>()
                .map(|m| m.pattern.to_string());
            next.serve(w, req);
        }))
    });
    tagged(&mux, "/api/");

    serve(&mux, get("/api/v1"));
    assert_eq!(seen.lock().as_deref(), Some("/api/"));
}

#[test]
fn test_middleware_can_short_circuit() {
    let mux = Mux::new();
    mux.use_middleware(|_next: SharedHandler| -> SharedHandler {
        Arc::new(handler_fn(|w: &mut dyn ResponseWriter, _req| {
            w.write_status(StatusCode::UNAUTHORIZED);
        }))
    });
    tagged(&mux, "/");
    let rec = serve(&mux, get("/"));
    assert_eq!(rec.status(), StatusCode::UNAUTHORIZED);
    assert!(rec.body().is_empty());
}

#[test]
fn test_middleware_appended_later_applies_to_later_dispatches() {
    let log: Log = Arc::default();
    let mux = Mux::new();
    logging_handler(&mux, "/", &log);

    serve(&mux, get("/"));
    mux.use_middleware(logging("late", &log));
    serve(&mux, get("/"));
    assert_eq!(*log.lock(), vec!["handler", "late", "handler"]);
}

#[test]
fn test_metrics_middleware_counts() {
    let metrics = MetricsMiddleware::new();
    let mux = Mux::new();
    mux.use_middleware(metrics.clone());
    tagged(&mux, "/pets/");

    for i in 0..5 {
        let rec = serve(&mux, get("/pets/12345"));
        assert_eq!(rec.status(), StatusCode::OK);
        assert_eq!(metrics.request_count(), i + 1);
    }
    serve(&mux, get("/nope"));

    assert_eq!(metrics.request_count(), 6);
    assert_eq!(metrics.status_class_count(2), 5);
    assert_eq!(metrics.status_class_count(4), 1);
}

#[test]
fn test_tracing_middleware_records_request_span() {
    let tracing = TestTracing::init();
    let mux = Mux::new();
    mux.use_middleware(TracingMiddleware);
    tagged(&mux, "/pets/");

    let rec = serve(&mux, get("/pets/1"));
    assert_eq!(rec.status(), StatusCode::OK);

    let logs = tracing.logs.contents();
    assert!(logs.contains("Route registered"), "logs: {logs}");
    assert!(logs.contains("Route resolved"), "logs: {logs}");
    assert!(logs.contains("request{"), "logs: {logs}");
    assert!(logs.contains("status=200"), "logs: {logs}");
}

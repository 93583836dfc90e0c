#![allow(dead_code)]

pub mod requests {
    use http::Method;
    use segmux::{Mux, Recorder, Request};

    pub fn get(uri: &str) -> Request {
        request(Method::GET, uri)
    }

    pub fn request(method: Method, uri: &str) -> Request {
        http::Request::builder()
            .method(method)
            .uri(uri)
            .body(Vec::new())
            .unwrap()
    }

    /// Register a handler whose body is its own pattern.
    pub fn tagged(mux: &Mux, pattern: &str) {
        let tag = pattern.to_string();
        mux.handle_func(pattern, move |w, _req| {
            let _ = w.write(tag.as_bytes());
        });
    }

    pub fn serve(mux: &Mux, req: Request) -> Recorder {
        let mut rec = Recorder::new();
        mux.dispatch(&mut rec, req);
        rec
    }

    /// Body produced by dispatching `GET uri`.
    pub fn body_of(mux: &Mux, uri: &str) -> String {
        serve(mux, get(uri)).body_string()
    }
}

pub mod tracing_util {
    use parking_lot::Mutex;
    use std::io;
    use std::sync::Arc;
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::fmt::MakeWriter;

    /// Log sink shared between the subscriber and the test.
    #[derive(Clone, Default)]
    pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        pub fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// Thread-local subscriber capturing everything at DEBUG and above.
    pub struct TestTracing {
        pub logs: CapturedLogs,
        _guard: tracing::subscriber::DefaultGuard,
    }

    impl TestTracing {
        pub fn init() -> Self {
            let logs = CapturedLogs::default();
            let subscriber = tracing_subscriber::fmt()
                .with_max_level(tracing::Level::DEBUG)
                .with_span_events(FmtSpan::CLOSE)
                .with_ansi(false)
                .with_writer(logs.clone())
                .finish();
            let guard = tracing::subscriber::set_default(subscriber);
            Self {
                logs,
                _guard: guard,
            }
        }
    }
}

use http::header::{HeaderValue, ALLOW, CONNECTION, CONTENT_TYPE, LOCATION};
use http::{HeaderMap, Method, Response, StatusCode, Version};
use smallvec::SmallVec;
use std::io;
use tracing::warn;

use super::Request;
use crate::dispatcher::Handler;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const TEXT_HTML: &str = "text/html; charset=utf-8";

/// Output side of a request.
///
/// Mirrors what a server hands a handler: a mutable header map, a status write
/// and body writes. The first body write without a prior status implies `200`.
pub trait ResponseWriter {
    /// Headers to be sent with the response. Changes after the status is
    /// written have no effect on the wire.
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Write the status line. Only the first call counts.
    fn write_status(&mut self, status: StatusCode);

    /// Append bytes to the body.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;
}

/// In-memory [`ResponseWriter`].
///
/// Captures status, headers and body so a caller can route without a server,
/// and so tests can assert on what a handler produced.
#[derive(Debug, Default)]
pub struct Recorder {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Recorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Status written so far, `200` if the handler never wrote one.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    /// True once a status has been written, explicitly or by a body write.
    #[must_use]
    pub fn wrote_status(&self) -> bool {
        self.status.is_some()
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Header value as text, if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as text, lossily decoded.
    #[must_use]
    pub fn body_string(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Convert into an `http::Response`.
    #[must_use]
    pub fn into_response(self) -> Response<Vec<u8>> {
        let status = self.status();
        let mut res = Response::new(self.body);
        *res.status_mut() = status;
        *res.headers_mut() = self.headers;
        res
    }
}

impl ResponseWriter for Recorder {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_status(&mut self, status: StatusCode) {
        if let Some(prev) = self.status {
            warn!(
                previous = prev.as_u16(),
                ignored = status.as_u16(),
                "Superfluous status write"
            );
            return;
        }
        self.status = Some(status);
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.status.is_none() {
            self.status = Some(StatusCode::OK);
        }
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }
}

/// Pass-through writer that remembers the status and body size.
///
/// Used by the built-in middleware to observe what the inner handler wrote.
pub(crate) struct StatusWriter<'a> {
    inner: &'a mut dyn ResponseWriter,
    status: Option<StatusCode>,
    bytes: usize,
}

impl<'a> StatusWriter<'a> {
    pub(crate) fn new(inner: &'a mut dyn ResponseWriter) -> Self {
        Self {
            inner,
            status: None,
            bytes: 0,
        }
    }

    /// Status the handler produced; `200` when it wrote nothing at all.
    pub(crate) fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    pub(crate) fn bytes_written(&self) -> usize {
        self.bytes
    }
}

impl ResponseWriter for StatusWriter<'_> {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        self.inner.headers_mut()
    }

    fn write_status(&mut self, status: StatusCode) {
        if self.status.is_none() {
            self.status = Some(status);
        }
        self.inner.write_status(status);
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.status.is_none() {
            self.status = Some(StatusCode::OK);
        }
        let n = self.inner.write(buf)?;
        self.bytes += n;
        Ok(n)
    }
}

fn write_text(w: &mut dyn ResponseWriter, status: StatusCode, body: &str) {
    let headers = w.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN));
    headers.insert(
        "x-content-type-options",
        HeaderValue::from_static("nosniff"),
    );
    w.write_status(status);
    if let Err(err) = w.write(body.as_bytes()) {
        warn!(status = status.as_u16(), error = %err, "Failed to write response body");
    }
}

/// `400 Bad Request` for the `*` request-URI.
///
/// HTTP/1.1 and later also get `Connection: close`.
pub(crate) fn write_bad_request_asterisk(w: &mut dyn ResponseWriter, version: Version) {
    if version >= Version::HTTP_11 {
        w.headers_mut()
            .insert(CONNECTION, HeaderValue::from_static("close"));
    }
    w.write_status(StatusCode::BAD_REQUEST);
}

/// Synthesized `404 Not Found`.
pub(crate) struct NotFound;

impl Handler for NotFound {
    fn serve(&self, w: &mut dyn ResponseWriter, _req: Request) {
        write_text(w, StatusCode::NOT_FOUND, "404 page not found\n");
    }
}

/// Synthesized `301 Moved Permanently` to the slash-terminated path.
pub(crate) struct Redirect {
    location: String,
}

impl Redirect {
    pub(crate) fn new(location: String) -> Self {
        Self { location }
    }
}

impl Handler for Redirect {
    fn serve(&self, w: &mut dyn ResponseWriter, req: Request) {
        match HeaderValue::from_str(&self.location) {
            Ok(value) => {
                w.headers_mut().insert(LOCATION, value);
            }
            Err(err) => {
                warn!(location = %self.location, error = %err, "Redirect target is not a valid header value");
            }
        }
        if req.method() == Method::GET || req.method() == Method::HEAD {
            w.headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static(TEXT_HTML));
        }
        w.write_status(StatusCode::MOVED_PERMANENTLY);
        if req.method() == Method::GET {
            let body = format!(
                "<a href=\"{}\">Moved Permanently</a>.\n\n",
                html_escape(&self.location)
            );
            if let Err(err) = w.write(body.as_bytes()) {
                warn!(error = %err, "Failed to write redirect body");
            }
        }
    }
}

/// Synthesized `405 Method Not Allowed` listing the route's methods.
pub(crate) struct MethodNotAllowed {
    allow: SmallVec<[Method; 4]>,
}

impl MethodNotAllowed {
    pub(crate) fn new(allow: SmallVec<[Method; 4]>) -> Self {
        Self { allow }
    }
}

impl Handler for MethodNotAllowed {
    fn serve(&self, w: &mut dyn ResponseWriter, _req: Request) {
        let allow = self
            .allow
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        match HeaderValue::from_str(&allow) {
            Ok(value) => {
                w.headers_mut().insert(ALLOW, value);
            }
            Err(err) => {
                warn!(allow = %allow, error = %err, "Allow list is not a valid header value");
            }
        }
        write_text(w, StatusCode::METHOD_NOT_ALLOWED, "405 method not allowed\n");
    }
}

fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

//! Mux core module - registration and the per-request hot path.
//!
//! One `parking_lot::RwLock` guards the route tree and the middleware stack.
//! Registration takes it exclusively; resolution takes it shared just long
//! enough to look the path up and snapshot the stack. Handlers always run
//! with the lock released.

#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]

use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::route::Route;
use super::tree::{Lookup, RouteTree};
use crate::config::MuxConfig;
use crate::dispatcher::{handler_fn, Handler, SharedHandler};
use crate::error::RegisterError;
use crate::middleware::{compose, Middleware, MiddlewareVec, SharedMiddleware};
use crate::path::canonicalize;
use crate::server::{
    is_asterisk, write_bad_request_asterisk, MatchKind, MatchedRoute, MethodNotAllowed,
    NotFound, Redirect, Request, ResponseWriter,
};

#[derive(Default)]
struct Inner {
    tree: RouteTree,
    middleware: Vec<SharedMiddleware>,
}

/// What a single lookup decided, computed under the read lock.
enum Resolution {
    Matched { route: Route, remainder: String },
    Redirect { target: String },
    NotFound,
}

/// HTTP request multiplexer.
///
/// Selects one registered handler per request by URL path and runs it inside
/// the middleware stack. Patterns ending in `/` match every path below them;
/// other patterns match one path exactly. An exact match beats any prefix,
/// and among prefixes the longest wins.
///
/// A `Mux` is `Send + Sync`: share it behind an `Arc` and register and
/// dispatch from any thread.
///
/// ```rust
/// use segmux::{Mux, Recorder};
///
/// let mux = Mux::new();
/// mux.handle_func("/", |w, _req| { let _ = w.write(b"root"); });
/// mux.handle_func("/users/me", |w, _req| { let _ = w.write(b"me"); });
///
/// let mut rec = Recorder::new();
/// let req = http::Request::builder().uri("/users/me").body(Vec::new()).unwrap();
/// mux.dispatch(&mut rec, req);
/// assert_eq!(rec.body(), b"me");
/// ```
pub struct Mux {
    config: MuxConfig,
    inner: RwLock<Inner>,
}

impl Default for Mux {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Mux {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("Mux")
            .field("config", &self.config)
            .field("routes", &inner.tree.len())
            .field("middleware", &inner.middleware.len())
            .finish()
    }
}

impl Mux {
    /// Empty mux with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MuxConfig::default())
    }

    #[must_use]
    pub fn with_config(config: MuxConfig) -> Self {
        Self {
            config,
            inner: RwLock::new(Inner {
                tree: RouteTree::new(),
                middleware: Vec::new(),
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &MuxConfig {
        &self.config
    }

    /// Register `handler` under `pattern`.
    ///
    /// The pattern is canonicalized first, so `/a//b/` and `/a/b/` are the
    /// same route. The returned [`Route`] is published only once the tree
    /// insert has completed.
    pub fn try_handle<H>(&self, pattern: &str, handler: H) -> Result<Route, RegisterError>
    where
        H: Handler + 'static,
    {
        self.register(pattern, Arc::new(handler))
    }

    /// Register `handler` under `pattern`, panicking on misuse.
    ///
    /// # Panics
    ///
    /// On an empty pattern or a pattern whose canonical form is already
    /// registered. Both are programmer errors caught at startup.
    #[allow(clippy::panic)]
    pub fn handle<H>(&self, pattern: &str, handler: H) -> Route
    where
        H: Handler + 'static,
    {
        match self.try_handle(pattern, handler) {
            Ok(route) => route,
            Err(err) => panic!("{err}"),
        }
    }

    /// Register a closure under `pattern`, panicking on misuse.
    ///
    /// # Panics
    ///
    /// Same conditions as [`Mux::handle`].
    pub fn handle_func<F>(&self, pattern: &str, f: F) -> Route
    where
        F: Fn(&mut dyn ResponseWriter, Request) + Send + Sync + 'static,
    {
        self.handle(pattern, handler_fn(f))
    }

    /// Register an already shared handler under `pattern`.
    pub fn try_handle_shared(
        &self,
        pattern: &str,
        handler: SharedHandler,
    ) -> Result<Route, RegisterError> {
        self.register(pattern, handler)
    }

    fn register(&self, pattern: &str, handler: SharedHandler) -> Result<Route, RegisterError> {
        if pattern.is_empty() {
            warn!("Rejected registration of empty pattern");
            return Err(RegisterError::EmptyPattern);
        }
        let canonical: Arc<str> = Arc::from(canonicalize(pattern).as_ref());
        let route = Route::new(canonical, handler);

        let mut inner = self.inner.write();
        if let Err(err) = inner.tree.insert(route.clone()) {
            warn!(pattern = %pattern, error = %err, "Rejected duplicate registration");
            return Err(err);
        }
        let routes_count = inner.tree.len();
        drop(inner);

        info!(
            pattern = %pattern,
            canonical = %route.pattern(),
            kind = ?route.kind(),
            routes_count,
            "Route registered"
        );
        Ok(route)
    }

    /// Append a middleware to the tail of the stack.
    ///
    /// Middleware appended first runs outermost. The stack is snapshotted at
    /// the start of every dispatch, so an append affects only dispatches
    /// that start after it returns.
    pub fn use_middleware<M>(&self, middleware: M)
    where
        M: Middleware + 'static,
    {
        self.use_all([Arc::new(middleware) as SharedMiddleware]);
    }

    /// Append several middleware in order.
    pub fn use_all<I>(&self, middleware: I)
    where
        I: IntoIterator<Item = SharedMiddleware>,
    {
        let mut inner = self.inner.write();
        inner.middleware.extend(middleware);
        let depth = inner.middleware.len();
        drop(inner);
        info!(depth, "Middleware stack updated");
    }

    /// Pick the handler for `req` without invoking it.
    ///
    /// Returns the matched route's handler, a synthesized 301 handler when the
    /// slash-terminated path is registered, a synthesized 405 handler when the
    /// route's method set excludes the request method, or a synthesized 404
    /// handler. On a match the returned request carries a [`MatchedRoute`]
    /// extension. Middleware is not applied.
    pub fn resolve(&self, req: Request) -> (SharedHandler, Request) {
        let (handler, req, _stack) = self.resolve_with_stack(req);
        (handler, req)
    }

    /// Route and serve one request through the middleware stack.
    ///
    /// The `*` request-URI is answered inline with `400` (and
    /// `Connection: close` on HTTP/1.1 and later) without routing.
    pub fn dispatch(&self, w: &mut dyn ResponseWriter, req: Request) {
        if is_asterisk(&req) {
            debug!(method = %req.method(), "Rejected asterisk request-URI");
            write_bad_request_asterisk(w, req.version());
            return;
        }

        let (handler, req, stack) = self.resolve_with_stack(req);
        compose(&stack, handler).serve(w, req);
    }

    /// Canonical patterns of every registered route, sorted.
    #[must_use]
    pub fn routes(&self) -> Vec<String> {
        self.inner
            .read()
            .tree
            .routes()
            .iter()
            .map(|r| r.pattern().to_owned())
            .collect()
    }

    /// Route registered under the canonical form of `pattern`, if any.
    #[must_use]
    pub fn route(&self, pattern: &str) -> Option<Route> {
        let canonical = canonicalize(pattern);
        self.inner.read().tree.get(&canonical).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().tree.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn middleware_len(&self) -> usize {
        self.inner.read().middleware.len()
    }

    fn resolve_with_stack(&self, mut req: Request) -> (SharedHandler, Request, MiddlewareVec) {
        let start = Instant::now();

        let (resolution, stack) = {
            let inner = self.inner.read();
            let stack: MiddlewareVec = inner.middleware.iter().cloned().collect();
            let path = canonicalize(req.uri().path());
            let resolution = match inner.tree.lookup(&path, self.config.redirect_trailing_slash)
            {
                Lookup::Found(route) => Resolution::Matched {
                    route: route.clone(),
                    remainder: match route.kind() {
                        MatchKind::Exact => String::new(),
                        MatchKind::Prefix => path[route.pattern().len()..].to_owned(),
                    },
                },
                Lookup::Redirect => Resolution::Redirect {
                    target: format!("{path}/"),
                },
                Lookup::NotFound => Resolution::NotFound,
            };
            (resolution, stack)
        };

        let elapsed = start.elapsed();
        if elapsed > self.config.slow_match_threshold() {
            warn!(
                method = %req.method(),
                path = %req.uri().path(),
                duration_us = elapsed.as_micros(),
                "Slow route matching detected"
            );
        }

        let handler: SharedHandler = match resolution {
            Resolution::Matched { route, remainder } => {
                let attrs = route.attrs();
                if self.config.enforce_methods && !attrs.allows(req.method()) {
                    debug!(
                        method = %req.method(),
                        path = %req.uri().path(),
                        route_pattern = %route.pattern(),
                        outcome = "method_not_allowed",
                        "Route resolved"
                    );
                    Arc::new(MethodNotAllowed::new(attrs.allow_list()))
                } else {
                    debug!(
                        method = %req.method(),
                        path = %req.uri().path(),
                        route_pattern = %route.pattern(),
                        kind = ?route.kind(),
                        outcome = "matched",
                        "Route resolved"
                    );
                    req.extensions_mut().insert(MatchedRoute {
                        pattern: Arc::clone(route.pattern_arc()),
                        kind: route.kind(),
                        name: attrs.name.clone(),
                        remainder,
                    });
                    Arc::clone(route.handler())
                }
            }
            Resolution::Redirect { target } => {
                let location = match req.uri().query() {
                    Some(query) if !query.is_empty() => format!("{target}?{query}"),
                    _ => target,
                };
                debug!(
                    method = %req.method(),
                    path = %req.uri().path(),
                    location = %location,
                    outcome = "redirect",
                    "Route resolved"
                );
                Arc::new(Redirect::new(location))
            }
            Resolution::NotFound => {
                debug!(
                    method = %req.method(),
                    path = %req.uri().path(),
                    outcome = "not_found",
                    "Route resolved"
                );
                Arc::new(NotFound)
            }
        };

        (handler, req, stack)
    }
}

/// A mux is itself a handler, so muxes nest.
impl Handler for Mux {
    fn serve(&self, w: &mut dyn ResponseWriter, req: Request) {
        self.dispatch(w, req);
    }
}

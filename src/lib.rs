//! # segmux
//!
//! **segmux** is an HTTP request multiplexer: given a request, it picks exactly
//! one registered handler by URL path and runs it inside an ordered chain of
//! middleware. It plays the role of a standard-library style `ServeMux`, with
//! a segment tree for lookup and a [`Route`] handle for per-route settings.
//!
//! ## Architecture
//!
//! - **[`path`]** - canonicalization of patterns and request paths
//! - **[`router`]** - the segment tree, [`Route`] handles and the [`Mux`] facade
//! - **[`middleware`]** - handler-wrapping middleware and stock tracing/metrics layers
//! - **[`dispatcher`]** - the [`Handler`] capability and closure adapter
//! - **[`server`]** - request/response collaborator types ([`Request`],
//!   [`ResponseWriter`], [`Recorder`])
//! - **[`config`]** - [`MuxConfig`] switches
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Server as Outer server
//!     participant Mux
//!     participant Tree as Route tree
//!     participant MW as Middleware stack
//!     participant Handler
//!
//!     Server->>Mux: dispatch(w, req)
//!     alt request-URI is "*"
//!         Mux-->>Server: 400 (+ Connection: close)
//!     end
//!     Mux->>Mux: read lock
//!     Mux->>Tree: lookup(canonical path)
//!     Tree-->>Mux: route / redirect / not found
//!     Mux->>Mux: snapshot middleware, release lock
//!     Mux->>MW: compose(stack, handler)
//!     MW->>Handler: serve(w, req)
//!     Handler-->>Server: response written through w
//! ```
//!
//! ## Patterns
//!
//! | Pattern     | Kind   | Matches                                  |
//! |-------------|--------|------------------------------------------|
//! | `/`         | prefix | every path                               |
//! | `/users/`   | prefix | `/users/`, `/users/me`, `/users/me/x`    |
//! | `/users/me` | exact  | `/users/me` only                         |
//!
//! Exact beats prefix; the longest prefix beats shorter ones. A request for
//! `/users` with only `/users/` registered is redirected there with `301`.
//!
//! ## Quick Start
//!
//! ```rust
//! use segmux::{Mux, Recorder, TracingMiddleware};
//! use http::StatusCode;
//!
//! let mux = Mux::new();
//! mux.use_middleware(TracingMiddleware);
//! mux.handle_func("/users/", |w, req| {
//!     let _ = w.write(req.uri().path().as_bytes());
//! });
//!
//! let mut rec = Recorder::new();
//! mux.dispatch(&mut rec, http::Request::builder().uri("/users?page=2").body(Vec::new()).unwrap());
//! assert_eq!(rec.status(), StatusCode::MOVED_PERMANENTLY);
//! assert_eq!(rec.header("location"), Some("/users/?page=2"));
//! ```
//!
//! ## Concurrency
//!
//! Registration takes the mux lock exclusively; routing takes it shared and
//! releases it before any handler or middleware runs. A completed
//! registration is visible to every later dispatch, and each dispatch sees
//! one consistent snapshot of routes and middleware.
//!
//! ## Errors
//!
//! Registration misuse (empty pattern, duplicate canonical pattern) is a
//! programmer error: [`Mux::handle`] panics, [`Mux::try_handle`] returns
//! [`RegisterError`]. Request-time conditions always become an HTTP response
//! (`404`, `301`, `405`, `400`). Handler panics are not caught.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod middleware;
pub mod path;
pub mod router;
pub mod server;

pub use config::MuxConfig;
pub use dispatcher::{handler_fn, Handler, HandlerFn, SharedHandler};
pub use error::RegisterError;
pub use middleware::{compose, MetricsMiddleware, Middleware, SharedMiddleware, TracingMiddleware};
pub use router::{Mux, Route, RouteAttrs};
pub use server::{is_asterisk, Body, MatchKind, MatchedRoute, Recorder, Request, ResponseWriter};

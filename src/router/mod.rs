//! # Router Module
//!
//! The routing table and the [`Mux`] facade built on it.
//!
//! ## Overview
//!
//! - `tree` holds registered patterns in a segment tree and answers one
//!   question per request: which route wins for this canonical path.
//! - [`Route`] is the handle returned by registration. It owns the terminal
//!   handler and route-scoped attributes (method set, name).
//! - [`Mux`] composes the two with the middleware stack behind a
//!   reader/writer lock.
//!
//! ## Matching
//!
//! For a canonical request path `P`:
//!
//! 1. an exact pattern equal to `P` wins;
//! 2. else, if `P` has no trailing slash and `P/` is registered, the request
//!    is redirected to `P/` with `301`, ahead of any shorter prefix;
//! 3. else the longest prefix pattern that `P` starts with wins;
//! 4. else `404`.
//!
//! ```rust
//! use segmux::{Mux, Recorder};
//!
//! let mux = Mux::new();
//! mux.handle_func("/", |w, _| { let _ = w.write(b"/"); });
//! mux.handle_func("/users/", |w, _| { let _ = w.write(b"/users/"); });
//! mux.handle_func("/users/me", |w, _| { let _ = w.write(b"/users/me"); });
//!
//! for (path, want) in [("/users/me/", "/users/"), ("/other", "/"), ("/users/me", "/users/me")] {
//!     let mut rec = Recorder::new();
//!     mux.dispatch(&mut rec, http::Request::builder().uri(path).body(Vec::new()).unwrap());
//!     assert_eq!(rec.body_string(), want);
//! }
//! ```

mod core;
mod route;
mod tree;

pub use self::core::Mux;
pub use self::route::{MethodVec, Route, RouteAttrs};

//! # Dispatcher Module
//!
//! Defines what the mux dispatches to: the [`Handler`] capability, its shared
//! form [`SharedHandler`], and [`HandlerFn`] for plain closures.
//!
//! ## Handler Registration
//!
//! ```rust
//! use segmux::{handler_fn, Mux, Request, ResponseWriter};
//!
//! let mux = Mux::new();
//! mux.handle("/pets/", handler_fn(|w: &mut dyn ResponseWriter, req: Request| {
//!     let _ = w.write(req.uri().path().as_bytes());
//! }));
//! mux.handle_func("/health", |w, _req| {
//!     let _ = w.write(b"ok");
//! });
//! ```
//!
//! Handlers run without any mux lock held, so a slow handler never blocks
//! registration. Panics inside a handler are not caught; they unwind into the
//! outer server, which owns its own recovery policy.

mod core;

pub use self::core::{handler_fn, Handler, HandlerFn, SharedHandler};

//! # Middleware Module
//!
//! A middleware maps a handler to a handler. The mux keeps an ordered stack
//! of them and wraps the matched handler on every dispatch:
//!
//! ```text
//! use(m1); use(m2); use(m3)
//!
//!   m1 ─▶ m2 ─▶ m3 ─▶ handler
//!   ◀──── ◀──── ◀────
//! ```
//!
//! The first middleware appended is the outermost: it sees the request first
//! and the response last. The stack is process-wide for the mux, not per
//! route, and applies to synthesized 404/301/405 handlers as well.
//!
//! Any `Fn(SharedHandler) -> SharedHandler` is a middleware. Two stock ones
//! ship here: [`TracingMiddleware`] and [`MetricsMiddleware`].

mod core;
mod metrics;
mod tracing;

pub use self::core::{compose, Middleware, SharedMiddleware};
pub(crate) use self::core::MiddlewareVec;
pub use self::metrics::MetricsMiddleware;
pub use self::tracing::TracingMiddleware;

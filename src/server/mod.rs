//! # Server Collaborators
//!
//! The mux never parses HTTP or owns a socket. It talks to the outer server
//! through the types in this module:
//!
//! - [`Request`] is an `http::Request` with an owned byte body. Its
//!   `Extensions` are the carrier for per-request values, including any
//!   cancellation token the server attaches; the mux passes them through
//!   untouched apart from inserting a [`MatchedRoute`].
//! - [`ResponseWriter`] is the output side: a header map, a status write and
//!   body writes. [`Recorder`] is an in-memory implementation.

mod request;
mod response;

pub use request::{is_asterisk, Body, MatchKind, MatchedRoute, Request};
pub use response::{Recorder, ResponseWriter};
pub(crate) use response::{
    write_bad_request_asterisk, MethodNotAllowed, NotFound, Redirect, StatusWriter,
};

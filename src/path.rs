//! # Path Canonicalization
//!
//! Every pattern handed to [`Mux::handle`](crate::Mux::handle) and every request
//! path seen by [`Mux::resolve`](crate::Mux::resolve) goes through [`canonicalize`]
//! before it touches the route tree, so both sides agree on one lookup key.
//!
//! ## Rules
//!
//! 1. The empty string becomes `/`.
//! 2. A missing leading `/` is prepended.
//! 3. Repeated separators collapse, `.` segments are dropped and `..` pops the
//!    previous segment. `..` at the root stays at the root.
//! 4. A trailing `/` on the input survives cleaning, unless the result is `/`.
//!
//! ```rust
//! use segmux::path::canonicalize;
//!
//! assert_eq!(canonicalize("//a//b/"), "/a/b/");
//! assert_eq!(canonicalize("/a/./b/"), "/a/b/");
//! assert_eq!(canonicalize("a/../../b"), "/b");
//! assert_eq!(canonicalize(""), "/");
//! ```
//!
//! Already-canonical input is returned borrowed, which is the common case for
//! request paths on the hot path.

use smallvec::SmallVec;
use std::borrow::Cow;

/// Segments kept inline while cleaning; deeper paths spill to the heap.
const MAX_INLINE_SEGMENTS: usize = 16;

/// Map a pattern or request path to its canonical routing key.
#[must_use]
pub fn canonicalize(path: &str) -> Cow<'_, str> {
    if path.is_empty() {
        return Cow::Borrowed("/");
    }
    if is_canonical(path) {
        return Cow::Borrowed(path);
    }
    Cow::Owned(clean(path))
}

/// Returns true when [`canonicalize`] would return `path` unchanged.
#[must_use]
pub fn is_canonical(path: &str) -> bool {
    let Some(rest) = path.strip_prefix('/') else {
        return false;
    };
    if rest.is_empty() {
        return true;
    }
    // A trailing separator leaves one empty segment at the end; that is allowed.
    let rest = rest.strip_suffix('/').unwrap_or(rest);
    rest.split('/')
        .all(|seg| !seg.is_empty() && seg != "." && seg != "..")
}

/// Iterate the non-empty segments of a canonical path.
///
/// `"/"` yields nothing, `"/a/b/"` yields `a`, `b`.
pub(crate) fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|seg| !seg.is_empty())
}

fn clean(path: &str) -> String {
    let mut stack: SmallVec<[&str; MAX_INLINE_SEGMENTS]> = SmallVec::new();
    for seg in path.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            _ => stack.push(seg),
        }
    }

    let mut out = String::with_capacity(path.len() + 1);
    for seg in &stack {
        out.push('/');
        out.push_str(seg);
    }
    if out.is_empty() {
        out.push('/');
    } else if path.ends_with('/') {
        out.push('/');
    }
    out
}

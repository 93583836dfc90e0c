//! Segment tree holding registered patterns.
//!
//! Patterns are split on `/` and each literal segment becomes one node. A node
//! carries up to two routes:
//!
//! - an **exact** route for the pattern that ends at the node (`/a/b`)
//! - a **prefix** route for the same path with a trailing slash (`/a/b/`)
//!
//! The root node stands for `/`, so the catch-all pattern `/` is the root's
//! prefix route.
//!
//! ```text
//! patterns: /  /users/  /users/me  /static/css/
//!
//!   (root) prefix=/
//!     ├── users   prefix=/users/
//!     │     └── me   exact=/users/me
//!     └── static
//!           └── css  prefix=/static/css/
//! ```
//!
//! ## Lookup
//!
//! Walking a canonical path `P` segment by segment, the deepest prefix route
//! that still has path left after it is remembered. At the node where `P`
//! ends:
//!
//! 1. an exact route wins when `P` has no trailing slash;
//! 2. otherwise, if `P` has no trailing slash but the node has a prefix route,
//!    `P/` is a registered pattern and the lookup asks for a redirect;
//! 3. otherwise the remembered prefix route wins, or nothing matches.
//!
//! Both insert and lookup are O(depth). The tree does no locking of its own.

use std::collections::HashMap;

use super::route::Route;
use crate::error::RegisterError;
use crate::path::segments;
use crate::server::MatchKind;

#[derive(Default)]
struct Node {
    exact: Option<Route>,
    prefix: Option<Route>,
    children: HashMap<Box<str>, Node>,
}

impl Node {
    fn slot(&self, kind: MatchKind) -> &Option<Route> {
        match kind {
            MatchKind::Exact => &self.exact,
            MatchKind::Prefix => &self.prefix,
        }
    }

    fn slot_mut(&mut self, kind: MatchKind) -> &mut Option<Route> {
        match kind {
            MatchKind::Exact => &mut self.exact,
            MatchKind::Prefix => &mut self.prefix,
        }
    }

    fn collect(&self, out: &mut Vec<Route>) {
        out.extend(self.exact.iter().cloned());
        out.extend(self.prefix.iter().cloned());
        for child in self.children.values() {
            child.collect(out);
        }
    }
}

/// Outcome of a tree lookup.
#[derive(Debug)]
pub(crate) enum Lookup<'a> {
    /// A route matched.
    Found(&'a Route),
    /// `P` lacks a trailing slash, and `P/` is registered.
    Redirect,
    NotFound,
}

#[derive(Default)]
pub(crate) struct RouteTree {
    root: Node,
    len: usize,
}

impl RouteTree {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Route registered under exactly this canonical pattern.
    pub(crate) fn get(&self, pattern: &str) -> Option<&Route> {
        let kind = MatchKind::of_pattern(pattern);
        let mut node = &self.root;
        for seg in segments(pattern) {
            node = node.children.get(seg)?;
        }
        node.slot(kind).as_ref()
    }

    /// Insert `route` under its canonical pattern.
    ///
    /// Fails without touching the tree if the slot is taken.
    pub(crate) fn insert(&mut self, route: Route) -> Result<(), RegisterError> {
        if self.get(route.pattern()).is_some() {
            return Err(RegisterError::DuplicatePattern {
                pattern: route.pattern().to_string(),
            });
        }

        let kind = route.kind();
        let mut node = &mut self.root;
        for seg in segments(route.pattern()) {
            node = node.children.entry(Box::from(seg)).or_default();
        }
        *node.slot_mut(kind) = Some(route);
        self.len += 1;
        Ok(())
    }

    /// Find the winning route for a canonical request path.
    ///
    /// With `redirect` off, rule 2 is skipped and the lookup falls through to
    /// the remembered prefix route.
    pub(crate) fn lookup(&self, path: &str, redirect: bool) -> Lookup<'_> {
        let trailing = path.ends_with('/');
        let mut node = &self.root;
        // Every canonical path starts with `/`, so the root prefix always applies.
        let mut best = self.root.prefix.as_ref();

        let mut segs = segments(path).peekable();
        while let Some(seg) = segs.next() {
            let Some(child) = node.children.get(seg) else {
                return best.map_or(Lookup::NotFound, Lookup::Found);
            };
            node = child;
            let more = segs.peek().is_some();
            if (more || trailing) && node.prefix.is_some() {
                best = node.prefix.as_ref();
            }
        }

        if !trailing {
            if let Some(exact) = &node.exact {
                return Lookup::Found(exact);
            }
            if redirect && node.prefix.is_some() {
                return Lookup::Redirect;
            }
        }
        best.map_or(Lookup::NotFound, Lookup::Found)
    }

    /// All routes, sorted by pattern.
    pub(crate) fn routes(&self) -> Vec<Route> {
        let mut out = Vec::with_capacity(self.len);
        self.root.collect(&mut out);
        out.sort_by(|a, b| a.pattern().cmp(b.pattern()));
        out
    }
}

use arc_swap::ArcSwap;
use http::Method;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

use crate::dispatcher::SharedHandler;
use crate::server::MatchKind;

/// Method sets rarely exceed a handful of entries.
pub type MethodVec = SmallVec<[Method; 4]>;

/// Route-scoped attributes, read as one snapshot per dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteAttrs {
    /// Allowed methods in registration order; `None` allows every method.
    pub methods: Option<MethodVec>,
    /// Optional route name surfaced through [`MatchedRoute`](crate::MatchedRoute).
    pub name: Option<Arc<str>>,
}

impl RouteAttrs {
    /// `GET` also admits `HEAD`.
    #[must_use]
    pub fn allows(&self, method: &Method) -> bool {
        match &self.methods {
            None => true,
            Some(methods) => {
                methods.contains(method)
                    || (*method == Method::HEAD && methods.contains(&Method::GET))
            }
        }
    }

    /// Value for an `Allow` header, `HEAD` included when `GET` is present.
    #[must_use]
    pub fn allow_list(&self) -> MethodVec {
        let mut allow = self.methods.clone().unwrap_or_default();
        if allow.contains(&Method::GET) && !allow.contains(&Method::HEAD) {
            allow.push(Method::HEAD);
        }
        allow
    }
}

struct RouteInner {
    pattern: Arc<str>,
    kind: MatchKind,
    handler: SharedHandler,
    attrs: ArcSwap<RouteAttrs>,
}

/// Handle to one registered route.
///
/// Returned by [`Mux::handle`](crate::Mux::handle). The pattern and handler
/// are fixed at registration; the attributes can be configured in a chained
/// style afterwards:
///
/// ```rust
/// use http::Method;
/// use segmux::Mux;
///
/// let mux = Mux::new();
/// let route = mux
///     .handle_func("/users/", |_w, _req| {})
///     .methods([Method::GET, Method::POST])
///     .name("users");
/// assert_eq!(route.pattern(), "/users/");
/// ```
///
/// Attribute updates swap in a fresh snapshot atomically, so a dispatch in
/// flight sees either the old set or the new one, never a mix. Clones share
/// the same route.
#[derive(Clone)]
pub struct Route {
    inner: Arc<RouteInner>,
}

impl Route {
    pub(crate) fn new(pattern: Arc<str>, handler: SharedHandler) -> Self {
        let kind = MatchKind::of_pattern(&pattern);
        Self {
            inner: Arc::new(RouteInner {
                pattern,
                kind,
                handler,
                attrs: ArcSwap::from_pointee(RouteAttrs::default()),
            }),
        }
    }

    /// Canonical pattern this route was registered under.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.inner.pattern
    }

    pub(crate) fn pattern_arc(&self) -> &Arc<str> {
        &self.inner.pattern
    }

    #[must_use]
    pub fn kind(&self) -> MatchKind {
        self.inner.kind
    }

    #[must_use]
    pub fn handler(&self) -> &SharedHandler {
        &self.inner.handler
    }

    /// Current attribute snapshot.
    #[must_use]
    pub fn attrs(&self) -> Arc<RouteAttrs> {
        self.inner.attrs.load_full()
    }

    /// Restrict the route to `methods`. Other methods get `405`.
    pub fn methods<I>(self, methods: I) -> Self
    where
        I: IntoIterator<Item = Method>,
    {
        let mut set = MethodVec::new();
        for method in methods {
            if !set.contains(&method) {
                set.push(method);
            }
        }
        self.update(|attrs| attrs.methods = Some(set.clone()));
        self
    }

    /// Lift any method restriction.
    pub fn any_method(self) -> Self {
        self.update(|attrs| attrs.methods = None);
        self
    }

    pub fn name(self, name: &str) -> Self {
        let name: Arc<str> = Arc::from(name);
        self.update(|attrs| attrs.name = Some(Arc::clone(&name)));
        self
    }

    fn update(&self, f: impl Fn(&mut RouteAttrs)) {
        self.inner.attrs.rcu(|current| {
            let mut next = RouteAttrs::clone(current);
            f(&mut next);
            next
        });
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("pattern", &self.inner.pattern)
            .field("kind", &self.inner.kind)
            .field("attrs", &self.attrs())
            .finish_non_exhaustive()
    }
}

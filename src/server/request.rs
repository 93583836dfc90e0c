use http::Request as HttpRequest;
use std::sync::Arc;

/// Request body as handed to handlers.
pub type Body = Vec<u8>;

/// The request type every [`Handler`](crate::Handler) receives.
pub type Request = HttpRequest<Body>;

/// How a route matched the request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKind {
    /// The canonical path equals the pattern.
    Exact,
    /// The pattern ends with `/` and is a prefix of the canonical path.
    Prefix,
}

impl MatchKind {
    /// Kind implied by a canonical pattern's shape.
    #[must_use]
    pub fn of_pattern(pattern: &str) -> Self {
        if pattern.ends_with('/') {
            MatchKind::Prefix
        } else {
            MatchKind::Exact
        }
    }
}

/// Route information attached to the request extensions on a successful match.
///
/// Middleware and handlers read it with
/// `req.extensions().get::<MatchedRoute>()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedRoute {
    /// Canonical pattern of the winning route
    pub pattern: Arc<str>,
    /// Exact or prefix match
    pub kind: MatchKind,
    /// Name given with [`Route::name`](crate::Route::name), if any
    pub name: Option<Arc<str>>,
    /// Part of the canonical path after the matched prefix (empty for exact)
    pub remainder: String,
}

/// True for the server-wide `OPTIONS *` request-URI.
///
/// The asterisk form is not a path and is rejected before routing.
#[must_use]
pub fn is_asterisk(req: &Request) -> bool {
    let uri = req.uri();
    uri.scheme().is_none() && uri.authority().is_none() && uri.path() == "*"
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[test]
    fn test_is_asterisk() {
        let req = HttpRequest::builder()
            .method(Method::OPTIONS)
            .uri("*")
            .body(Vec::new())
            .unwrap();
        assert!(is_asterisk(&req));

        let req = HttpRequest::builder().uri("/x").body(Vec::new()).unwrap();
        assert!(!is_asterisk(&req));
    }

    #[test]
    fn test_match_kind_of_pattern() {
        assert_eq!(MatchKind::of_pattern("/"), MatchKind::Prefix);
        assert_eq!(MatchKind::of_pattern("/a/"), MatchKind::Prefix);
        assert_eq!(MatchKind::of_pattern("/a"), MatchKind::Exact);
    }
}

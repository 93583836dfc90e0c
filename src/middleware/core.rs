use smallvec::SmallVec;
use std::sync::Arc;

use crate::dispatcher::SharedHandler;

/// Maximum middleware layers snapshotted per dispatch before heap allocation.
pub const MAX_INLINE_MIDDLEWARE: usize = 8;

/// A handler transformer.
pub trait Middleware: Send + Sync {
    /// Wrap `next`, returning the handler to invoke in its place.
    fn wrap(&self, next: SharedHandler) -> SharedHandler;
}

impl<F> Middleware for F
where
    F: Fn(SharedHandler) -> SharedHandler + Send + Sync,
{
    fn wrap(&self, next: SharedHandler) -> SharedHandler {
        self(next)
    }
}

pub type SharedMiddleware = Arc<dyn Middleware>;

/// Per-dispatch snapshot of the stack, taken under the mux read lock.
pub(crate) type MiddlewareVec = SmallVec<[SharedMiddleware; MAX_INLINE_MIDDLEWARE]>;

/// Fold `layers` around `handler` so that `layers[0]` ends up outermost.
#[must_use]
pub fn compose(layers: &[SharedMiddleware], handler: SharedHandler) -> SharedHandler {
    layers
        .iter()
        .rev()
        .fold(handler, |inner, layer| layer.wrap(inner))
}

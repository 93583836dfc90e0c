use std::fmt;
use std::sync::Arc;

use crate::server::{Request, ResponseWriter};

/// Anything able to serve a `(response, request)` pair.
pub trait Handler: Send + Sync {
    fn serve(&self, w: &mut dyn ResponseWriter, req: Request);
}

/// Reference-counted handler as stored in the route tree and passed through
/// middleware.
pub type SharedHandler = Arc<dyn Handler>;

impl<H: Handler + ?Sized> Handler for Arc<H> {
    fn serve(&self, w: &mut dyn ResponseWriter, req: Request) {
        (**self).serve(w, req);
    }
}

impl<H: Handler + ?Sized> Handler for Box<H> {
    fn serve(&self, w: &mut dyn ResponseWriter, req: Request) {
        (**self).serve(w, req);
    }
}

/// Adapter turning a closure into a [`Handler`].
#[derive(Clone, Copy)]
pub struct HandlerFn<F>(F);

impl<F> Handler for HandlerFn<F>
where
    F: Fn(&mut dyn ResponseWriter, Request) + Send + Sync,
{
    fn serve(&self, w: &mut dyn ResponseWriter, req: Request) {
        (self.0)(w, req);
    }
}

impl<F> fmt::Debug for HandlerFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerFn").finish_non_exhaustive()
    }
}

/// Wrap a closure as a [`Handler`].
pub fn handler_fn<F>(f: F) -> HandlerFn<F>
where
    F: Fn(&mut dyn ResponseWriter, Request) + Send + Sync,
{
    HandlerFn(f)
}

//! Synchronous request handler contract.

use std::sync::Arc;

use bytes::Bytes;
use http::Request;

use crate::writer::ResponseWriter;

/// A request handler. Runs to completion on the calling thread.
pub trait Handler: Send + Sync {
    fn serve(&self, w: &mut dyn ResponseWriter, req: &Request<Bytes>);
}

impl<H: Handler + ?Sized> Handler for Arc<H> {
    fn serve(&self, w: &mut dyn ResponseWriter, req: &Request<Bytes>) {
        (**self).serve(w, req)
    }
}

impl<H: Handler + ?Sized> Handler for Box<H> {
    fn serve(&self, w: &mut dyn ResponseWriter, req: &Request<Bytes>) {
        (**self).serve(w, req)
    }
}

/// Handler backed by a closure. See [`handler_fn`].
#[derive(Clone, Copy)]
pub struct HandlerFn<F> {
    f: F,
}

/// Turn a closure into a [`Handler`].
pub fn handler_fn<F>(f: F) -> HandlerFn<F>
where
    F: Fn(&mut dyn ResponseWriter, &Request<Bytes>) + Send + Sync,
{
    HandlerFn { f }
}

impl<F> Handler for HandlerFn<F>
where
    F: Fn(&mut dyn ResponseWriter, &Request<Bytes>) + Send + Sync,
{
    fn serve(&self, w: &mut dyn ResponseWriter, req: &Request<Bytes>) {
        (self.f)(w, req)
    }
}

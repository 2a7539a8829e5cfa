//! Handler decorator recording request count and latency.

use std::time::Instant;

use bytes::Bytes;
use http::Request;

use poke_core::{Handler, ResponseWriter, StatusRecorder};

use super::metrics::Metrics;

/// Wraps `next`; produced by [`Metrics::middleware`].
pub struct Middleware<H> {
    metrics: Metrics,
    next: H,
}

impl<H: Handler> Middleware<H> {
    pub(crate) fn new(metrics: Metrics, next: H) -> Self {
        Self { metrics, next }
    }

    pub fn get_ref(&self) -> &H {
        &self.next
    }
}

impl<H: Handler> Handler for Middleware<H> {
    fn serve(&self, w: &mut dyn ResponseWriter, req: &Request<Bytes>) {
        let mut wr = StatusRecorder::new(w);
        let start = Instant::now();

        self.next.serve(&mut wr, req);

        self.metrics
            .record(req.uri().path(), req.method(), wr.status(), start.elapsed());
    }
}

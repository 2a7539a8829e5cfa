//! Serve a synchronous [`Handler`] as an axum/tower service.
//!
//! The request body is collected up front (bounded), the handler runs on the
//! blocking pool against a `BufferedResponse`, and the buffer becomes the
//! axum response.

use std::convert::Infallible;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::response::{IntoResponse, Response};
use futures_util::future::BoxFuture;
use http::{Request, StatusCode};
use tower::Service;

use poke_core::{BufferedResponse, Handler};

const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

pub struct HandlerService<H> {
    handler: Arc<H>,
    max_body_bytes: usize,
}

impl<H> Clone for HandlerService<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            max_body_bytes: self.max_body_bytes,
        }
    }
}

impl<H: Handler + 'static> HandlerService<H> {
    pub fn new(handler: H) -> Self {
        Self {
            handler: Arc::new(handler),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    pub fn max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }
}

impl<H: Handler + 'static> Service<Request<Body>> for HandlerService<H> {
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Response, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let handler = Arc::clone(&self.handler);
        let limit = self.max_body_bytes;

        Box::pin(async move {
            let (parts, body) = req.into_parts();
            let bytes = match axum::body::to_bytes(body, limit).await {
                Ok(b) => b,
                Err(e) => {
                    tracing::debug!(error = %e, "request body rejected");
                    return Ok((StatusCode::BAD_REQUEST, "invalid request body").into_response());
                }
            };
            let req = Request::from_parts(parts, bytes);

            let served = tokio::task::spawn_blocking(move || {
                let mut res = BufferedResponse::new();
                handler.serve(&mut res, &req);
                res
            })
            .await;

            match served {
                Ok(res) => Ok(res.into_http().map(Body::from)),
                Err(e) => {
                    tracing::error!(error = %e, "handler panicked");
                    Ok(StatusCode::INTERNAL_SERVER_ERROR.into_response())
                }
            }
        })
    }
}

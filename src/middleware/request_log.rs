//! Request logging middleware
//!
//! Wraps every inbound request and, once the response is determined, records
//! method, path, status code and elapsed time. The log record is emitted on
//! success and failure paths alike and never alters the response.

use axum::{body::Body, http::Request, response::Response};
use futures::future::BoxFuture;
use std::{
    task::{Context, Poll},
    time::Instant,
};
use tower::{Layer, Service};
use tracing::info;

/// Request logging layer
#[derive(Clone, Default)]
pub struct RequestLogLayer;

impl RequestLogLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for RequestLogLayer {
    type Service = RequestLogMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestLogMiddleware { inner }
    }
}

/// Request logging middleware service
#[derive(Clone)]
pub struct RequestLogMiddleware<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for RequestLogMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Send + Clone + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let method = request.method().clone();
        let path = request.uri().path().to_string();
        let start = Instant::now();

        let future = self.inner.call(request);
        Box::pin(async move {
            let result = future.await;
            let duration_ms = start.elapsed().as_millis() as u64;
            // 500 when the inner service failed before producing a response
            let status = match &result {
                Ok(response) => response.status().as_u16(),
                Err(_) => 500,
            };

            info!(%method, %path, status, duration_ms, "request completed");
            result
        })
    }
}

//! Request logging middleware.
//! Wraps every routed request in the [`RequestObserver`] and enforces the
//! request timeout inside the observed future.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::time::Duration;

use crate::http::error::ApiError;
use crate::http::observer::RequestObserver;
use crate::http::request::{buffer_body, RequestTrace};
use crate::http::response::{classify, FailedResponse};

/// State of the request logging middleware.
#[derive(Clone, Debug)]
pub struct RequestLogging {
    observer: RequestObserver,
    timeout: Duration,
}

impl RequestLogging {
    pub fn new(observer: RequestObserver, timeout: Duration) -> Self {
        Self { observer, timeout }
    }
}

pub async fn request_logging_middleware(
    State(logging): State<RequestLogging>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let (mut parts, body) = req.into_parts();
    let mut trace = RequestTrace::from_parts(&mut parts).await;

    // Buffer before logging entry so the detail line carries the body.
    let body = buffer_body(&parts.method, body).await.map(|(body, logged)| {
        trace.body = logged;
        body
    });

    let timeout = logging.timeout;
    let outcome = logging
        .observer
        .observe(trace, async move {
            let body = match body {
                Ok(body) => body,
                Err(rejection) => return Err(FailedResponse::from(ApiError::from(rejection))),
            };
            match tokio::time::timeout(timeout, next.run(Request::from_parts(parts, body))).await {
                Ok(response) => classify(response),
                Err(_) => Err(FailedResponse::from(ApiError::Timeout(timeout))),
            }
        })
        .await;

    match outcome {
        Ok(response) => response,
        Err(failed) => failed.into_response(),
    }
}

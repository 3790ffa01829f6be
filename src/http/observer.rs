//! Request/response observer.
//!
//! # Protocol
//! ```text
//! entry    INFO  [HTTP_REQUEST]         Incoming POST request to /orders
//!          DEBUG [HTTP_REQUEST_DETAILS] {method, url, body?, params, query, userAgent}
//! success  INFO  [HTTP]                 POST /orders - 201 - 3ms
//!          DEBUG [HTTP_RESPONSE]        {method, url, statusCode, duration, responseSize}
//! failure  ERROR [HTTP_ERROR]           Request failed: GET /orders/x - 404 - 1ms
//!          DEBUG [HTTP_ERROR_DETAILS]   {method, url, statusCode, duration, error: {message, name}}
//! ```
//!
//! # Design Decisions
//! - The observer only watches: the wrapped outcome is returned as-is,
//!   errors included
//! - Entry lines are written before the handler runs, so they always
//!   precede the exit or failure lines of the same request
//! - Generic over the outcome so it is not tied to axum responses

use serde_json::json;
use std::future::Future;
use std::time::Duration;

use crate::http::request::RequestTrace;
use crate::observability::{Logger, Payload};

/// A successful outcome the observer can summarise.
pub trait ObservedOutcome {
    fn status_code(&self) -> u16;

    /// Size of the response payload in bytes.
    fn payload_size(&self) -> usize;
}

/// A failed outcome the observer can summarise.
pub trait ObservedFailure {
    /// Status carried by the error, if any. Defaults to 500 when absent.
    fn status_code(&self) -> Option<u16> {
        None
    }

    fn message(&self) -> String;

    /// Kind or name of the error.
    fn kind(&self) -> String;

    fn trace(&self) -> Option<String> {
        None
    }
}

/// Logs the lifecycle of every observed request.
#[derive(Clone, Debug)]
pub struct RequestObserver {
    logger: Logger,
}

impl RequestObserver {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    /// Run `handler`, logging entry and exit around it.
    ///
    /// The handler's result is returned unchanged.
    pub async fn observe<F, T, E>(&self, trace: RequestTrace, handler: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        T: ObservedOutcome,
        E: ObservedFailure,
    {
        self.on_entry(&trace);
        match handler.await {
            Ok(outcome) => {
                self.on_success(&trace, &outcome);
                Ok(outcome)
            }
            Err(error) => {
                self.on_failure(&trace, &error);
                Err(error)
            }
        }
    }

    pub fn on_entry(&self, trace: &RequestTrace) {
        self.logger.info(
            format!("Incoming {} request to {}", trace.method, trace.url),
            "HTTP_REQUEST",
        );
        self.logger
            .debug(Payload::structured(&trace.details()), "HTTP_REQUEST_DETAILS");
    }

    pub fn on_success(&self, trace: &RequestTrace, outcome: &impl ObservedOutcome) {
        let duration = trace.elapsed();
        let status = outcome.status_code();

        self.logger
            .log_request(&trace.method, &trace.url, duration, status, None);
        self.logger.debug(
            json!({
                "method": trace.method,
                "url": trace.url,
                "statusCode": status,
                "duration": millis(duration),
                "responseSize": outcome.payload_size(),
            }),
            "HTTP_RESPONSE",
        );
    }

    pub fn on_failure(&self, trace: &RequestTrace, failure: &impl ObservedFailure) {
        let duration = trace.elapsed();
        let status = failure.status_code().unwrap_or(500);

        self.logger.error(
            format!(
                "Request failed: {} {} - {} - {}ms",
                trace.method,
                trace.url,
                status,
                duration.as_millis()
            ),
            failure.trace().as_deref(),
            "HTTP_ERROR",
        );
        self.logger.debug(
            json!({
                "method": trace.method,
                "url": trace.url,
                "statusCode": status,
                "duration": millis(duration),
                "error": {
                    "message": failure.message(),
                    "name": failure.kind(),
                },
            }),
            "HTTP_ERROR_DETAILS",
        );
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

//! Response inspection for the request observer.
//!
//! # Responsibilities
//! - Split handler responses into successes and failures (status >= 400)
//! - Recover the handler's [`FailureReport`] from failed responses
//! - Measure response payload size without consuming the body

use axum::body::HttpBody;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::http::error::{ApiError, FailureReport};
use crate::http::observer::{ObservedFailure, ObservedOutcome};

impl ObservedOutcome for Response {
    fn status_code(&self) -> u16 {
        self.status().as_u16()
    }

    fn payload_size(&self) -> usize {
        let hint = self.body().size_hint();
        hint.exact().unwrap_or(hint.lower()) as usize
    }
}

/// A response whose status marks the request as failed.
#[derive(Debug)]
pub struct FailedResponse {
    pub response: Response,
    pub report: FailureReport,
}

impl FailedResponse {
    pub fn status(&self) -> StatusCode {
        self.response.status()
    }
}

impl From<ApiError> for FailedResponse {
    fn from(error: ApiError) -> Self {
        let report = error.report();
        Self {
            response: error.into_response(),
            report,
        }
    }
}

impl ObservedFailure for FailedResponse {
    fn status_code(&self) -> Option<u16> {
        Some(self.status().as_u16())
    }

    fn message(&self) -> String {
        self.report.message.clone()
    }

    fn kind(&self) -> String {
        self.report.kind.clone()
    }

    fn trace(&self) -> Option<String> {
        self.report.trace.clone()
    }
}

impl IntoResponse for FailedResponse {
    fn into_response(self) -> Response {
        self.response
    }
}

/// Classify a finished response.
pub fn classify(response: Response) -> Result<Response, FailedResponse> {
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return Ok(response);
    }

    let report = response
        .extensions()
        .get::<FailureReport>()
        .cloned()
        .unwrap_or_else(|| FailureReport::from_status(status));
    Err(FailedResponse { response, report })
}

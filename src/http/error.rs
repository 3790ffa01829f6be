//! API error type and its HTTP mapping.
//!
//! Handlers fail by returning an [`ApiError`]. Its response carries a
//! [`FailureReport`] extension so the request observer can log the
//! original error (message, kind, cause chain) without re-parsing the body.

use axum::extract::rejection::{
    BytesRejection, FailedToBufferBody, JsonRejection, QueryRejection,
};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

use crate::observability::logger::error_trace;
use crate::orders::types::FilterError;
use crate::orders::OrderError;

/// Errors returned by HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Json(#[from] JsonRejection),

    #[error(transparent)]
    Query(#[from] QueryRejection),

    #[error(transparent)]
    Body(#[from] BytesRejection),

    #[error("Request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Order(OrderError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Filter(_) | ApiError::Query(_) => StatusCode::BAD_REQUEST,
            ApiError::Json(rejection) => rejection.status(),
            ApiError::Body(rejection) => rejection.status(),
            ApiError::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
        }
    }

    /// Short error kind, logged next to the message.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Order(OrderError::NotFound(_)) => "NotFound",
            ApiError::Filter(_) => "InvalidFilter",
            ApiError::Json(_) => "InvalidBody",
            ApiError::Query(_) => "InvalidQuery",
            ApiError::Body(BytesRejection::FailedToBufferBody(
                FailedToBufferBody::LengthLimitError(_),
            )) => "PayloadTooLarge",
            ApiError::Body(_) => "UnreadableBody",
            ApiError::Timeout(_) => "Timeout",
        }
    }

    pub fn report(&self) -> FailureReport {
        FailureReport {
            message: self.to_string(),
            kind: self.kind().to_string(),
            trace: error_trace(self),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let report = self.report();
        let body = Json(json!({
            "error": report.message,
            "status": status.as_u16(),
        }));

        let mut response = (status, body).into_response();
        response.extensions_mut().insert(report);
        response
    }
}

/// What went wrong in a failed request, attached to its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReport {
    pub message: String,
    pub kind: String,
    pub trace: Option<String>,
}

impl FailureReport {
    /// Report for a failure response that carries no handler error,
    /// such as a rejection produced by a tower layer.
    pub fn from_status(status: StatusCode) -> Self {
        Self {
            message: status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string(),
            kind: "HttpError".to_string(),
            trace: None,
        }
    }
}

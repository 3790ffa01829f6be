//! Request capture for the request observer.
//!
//! # Responsibilities
//! - Extract method, URL, path/query parameters and user agent
//! - Buffer non-GET bodies so they can be logged and still reach the handler
//! - Record the start instant used for request timing
//!
//! # Design Decisions
//! - GET bodies are never read or logged
//! - Bodies are logged as JSON when they parse, as text otherwise
//! - Parameter maps are ordered so detail lines are stable

use axum::body::{Body, Bytes};
use axum::extract::rejection::BytesRejection;
use axum::extract::{FromRequest, FromRequestParts, Query, RawPathParams};
use axum::http::{header, request::Parts, Method, Request};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Everything the observer records about an inbound request.
#[derive(Debug, Clone)]
pub struct RequestTrace {
    pub method: String,
    pub url: String,
    pub body: Option<Value>,
    pub params: BTreeMap<String, String>,
    pub query: BTreeMap<String, String>,
    pub user_agent: String,
    pub started_at: Instant,
}

/// Structured form of the entry detail line.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDetails<'a> {
    pub method: &'a str,
    pub url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<&'a Value>,
    pub params: &'a BTreeMap<String, String>,
    pub query: &'a BTreeMap<String, String>,
    pub user_agent: &'a str,
}

impl RequestTrace {
    /// Start a trace for `method url`, timed from now.
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            body: None,
            params: BTreeMap::new(),
            query: BTreeMap::new(),
            user_agent: String::new(),
            started_at: Instant::now(),
        }
    }

    /// Capture a trace from request parts. The body is attached separately.
    pub async fn from_parts(parts: &mut Parts) -> Self {
        let url = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| parts.uri.path().to_string());

        let mut trace = Self::new(parts.method.as_str(), url);

        trace.params = RawPathParams::from_request_parts(parts, &())
            .await
            .map(|params| {
                params
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect()
            })
            .unwrap_or_default();

        trace.query = Query::<BTreeMap<String, String>>::try_from_uri(&parts.uri)
            .map(|Query(query)| query)
            .unwrap_or_default();

        trace.user_agent = parts
            .headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        trace
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn details(&self) -> RequestDetails<'_> {
        RequestDetails {
            method: &self.method,
            url: &self.url,
            body: self.body.as_ref(),
            params: &self.params,
            query: &self.query,
            user_agent: &self.user_agent,
        }
    }
}

/// Read a request body for logging, handing back a replayable copy.
///
/// GET requests are passed through untouched with no logged body.
/// Bodies cut short by the request size limit fail with a 413 rejection.
pub async fn buffer_body(
    method: &Method,
    body: Body,
) -> Result<(Body, Option<Value>), BytesRejection> {
    if *method == Method::GET {
        return Ok((body, None));
    }

    let bytes = Bytes::from_request(Request::new(body), &()).await?;
    let logged = render_body(&bytes);
    Ok((Body::from(bytes), logged))
}

fn render_body(bytes: &Bytes) -> Option<Value> {
    if bytes.is_empty() {
        return None;
    }
    match serde_json::from_slice::<Value>(bytes) {
        Ok(value) => Some(value),
        Err(_) => Some(Value::String(String::from_utf8_lossy(bytes).into_owned())),
    }
}

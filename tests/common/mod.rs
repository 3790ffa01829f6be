//! Shared utilities for integration testing.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use order_service::config::{AppConfig, LoggingConfig};
use order_service::lifecycle::startup::build_with_logger;
use order_service::observability::{Logger, MemorySink};
use order_service::orders::OrderService;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;

/// An in-process app whose file sink is captured in memory.
pub struct TestApp {
    pub router: Router,
    pub orders: OrderService,
    pub logs: Arc<MemorySink>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let logs = Arc::new(MemorySink::new());
        let logger = Logger::with_sinks(Arc::new(MemorySink::new()), logs.clone());
        let app = build_with_logger(&config, logger);
        Self {
            router: app.server.router(),
            orders: app.orders,
            logs,
        }
    }

    /// Send a request through the full middleware stack.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }
}

pub fn json_request(method: &str, uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

pub fn logging_config(dir: &Path, max_file_size: u64, max_files: u32) -> LoggingConfig {
    LoggingConfig {
        directory: dir.to_path_buf(),
        max_file_size,
        max_files,
        ..LoggingConfig::default()
    }
}

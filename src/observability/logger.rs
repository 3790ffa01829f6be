//! Structured logger.
//!
//! # Responsibilities
//! - Leveled logging calls (error, warn, info, debug, verbose)
//! - Domain convenience calls (requests, queries, order lifecycle,
//!   errors, performance timings)
//! - Render payloads and fan each entry out to the console mirror and
//!   the persistent sink
//!
//! # Design Decisions
//! - One `Logger` is built at startup and cloned into every collaborator;
//!   clones share the same sinks
//! - Calls never return errors and never panic; sink failures are
//!   handled inside the sinks
//! - No level filtering: every call reaches both sinks

use serde::Serialize;
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::LoggingConfig;
use crate::observability::console::ConsoleSink;
use crate::observability::entry::{LogEntry, Payload};
use crate::observability::file_sink::FileSink;
use crate::observability::severity::Severity;
use crate::observability::sink::LogSink;

/// Durations above this are logged at WARN by [`Logger::log_performance`].
pub const SLOW_OPERATION_THRESHOLD: Duration = Duration::from_millis(1000);

/// Shared handle to the application logger.
#[derive(Clone)]
pub struct Logger {
    console: Arc<dyn LogSink>,
    file: Arc<dyn LogSink>,
}

impl Logger {
    /// Build the production logger: console mirror plus rotating files.
    ///
    /// Creates the log directory as part of construction.
    pub fn new(config: &LoggingConfig) -> Self {
        Self::with_sinks(Arc::new(ConsoleSink::new()), Arc::new(FileSink::new(config)))
    }

    /// Build a logger over arbitrary sinks.
    pub fn with_sinks(console: Arc<dyn LogSink>, file: Arc<dyn LogSink>) -> Self {
        Self { console, file }
    }

    pub fn error<'a>(
        &self,
        message: impl Into<Payload>,
        trace: Option<&str>,
        context: impl Into<Option<&'a str>>,
    ) {
        self.emit(Severity::Error, message.into(), trace, context.into());
    }

    pub fn warn<'a>(&self, message: impl Into<Payload>, context: impl Into<Option<&'a str>>) {
        self.emit(Severity::Warn, message.into(), None, context.into());
    }

    pub fn info<'a>(&self, message: impl Into<Payload>, context: impl Into<Option<&'a str>>) {
        self.emit(Severity::Info, message.into(), None, context.into());
    }

    /// Alias of [`Logger::info`].
    pub fn log<'a>(&self, message: impl Into<Payload>, context: impl Into<Option<&'a str>>) {
        self.info(message, context);
    }

    pub fn debug<'a>(&self, message: impl Into<Payload>, context: impl Into<Option<&'a str>>) {
        self.emit(Severity::Debug, message.into(), None, context.into());
    }

    pub fn verbose<'a>(&self, message: impl Into<Payload>, context: impl Into<Option<&'a str>>) {
        self.emit(Severity::Verbose, message.into(), None, context.into());
    }

    /// `GET /orders - 200 - 12ms` at INFO.
    pub fn log_request<'a>(
        &self,
        method: &str,
        url: &str,
        duration: Duration,
        status: u16,
        context: impl Into<Option<&'a str>>,
    ) {
        let message = format!("{} {} - {} - {}ms", method, url, status, duration.as_millis());
        self.info(message, context.into().unwrap_or("HTTP"));
    }

    pub fn log_database<'a>(
        &self,
        query: &str,
        duration: Duration,
        context: impl Into<Option<&'a str>>,
    ) {
        let message = format!(
            "Database query executed in {}ms: {}",
            duration.as_millis(),
            query
        );
        self.debug(message, context.into().unwrap_or("DATABASE"));
    }

    pub fn log_order_created<'a>(
        &self,
        order_id: impl fmt::Display,
        client_id: i64,
        amount: f64,
        context: impl Into<Option<&'a str>>,
    ) {
        let message = format!(
            "Order created - ID: {}, Client: {}, Amount: {}",
            order_id, client_id, amount
        );
        self.info(message, context.into().unwrap_or("ORDERS"));
    }

    pub fn log_order_updated<'a, C: Serialize + ?Sized>(
        &self,
        order_id: impl fmt::Display,
        changes: &C,
        context: impl Into<Option<&'a str>>,
    ) {
        let changes = serde_json::to_string(changes)
            .unwrap_or_else(|e| format!("<unserializable changes: {}>", e));
        let message = format!("Order updated - ID: {}, Changes: {}", order_id, changes);
        self.info(message, context.into().unwrap_or("ORDERS"));
    }

    pub fn log_order_deleted<'a>(
        &self,
        order_id: impl fmt::Display,
        context: impl Into<Option<&'a str>>,
    ) {
        let message = format!("Order deleted - ID: {}", order_id);
        self.info(message, context.into().unwrap_or("ORDERS"));
    }

    /// Log an error with its source chain as the stack trace.
    pub fn log_error<'a>(&self, error: &dyn Error, context: impl Into<Option<&'a str>>) {
        let trace = error_trace(error);
        self.error(error.to_string(), trace.as_deref(), context);
    }

    /// WARN when `duration` exceeds [`SLOW_OPERATION_THRESHOLD`], DEBUG
    /// otherwise (including exactly at the threshold).
    pub fn log_performance<'a>(
        &self,
        operation: &str,
        duration: Duration,
        context: impl Into<Option<&'a str>>,
    ) {
        let message = format!("{} completed in {}ms", operation, duration.as_millis());
        let context = context.into().unwrap_or("PERFORMANCE");
        if duration > SLOW_OPERATION_THRESHOLD {
            self.warn(message, context);
        } else {
            self.debug(message, context);
        }
    }

    fn emit(&self, severity: Severity, payload: Payload, trace: Option<&str>, context: Option<&str>) {
        let entry = LogEntry::new(severity, payload.render(), context).with_trace(trace);
        self.console.record(&entry);
        self.file.record(&entry);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}

/// Render an error's `source()` chain, one cause per line.
///
/// Returns `None` when the error has no underlying cause.
pub fn error_trace(error: &dyn Error) -> Option<String> {
    let mut causes = Vec::new();
    let mut source = error.source();
    while let Some(cause) = source {
        causes.push(format!("caused by: {}", cause));
        source = cause.source();
    }
    if causes.is_empty() {
        None
    } else {
        Some(causes.join("\n"))
    }
}

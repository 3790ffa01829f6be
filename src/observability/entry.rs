//! Log entries and message payloads.
//!
//! # Line Format
//! ```text
//! file:    [2024-01-31T12:00:00.000Z] [INFO] [ORDERS] Order deleted - ID: ...
//! console: [INFO] [ORDERS] Order deleted - ID: ...
//! ```
//! The context segment is omitted entirely when no context is given.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::observability::severity::Severity;

/// Message passed to a logging call.
///
/// Structured payloads are rendered as indented JSON, scalars as plain
/// strings.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),
    Structured(Value),
}

impl Payload {
    /// Build a structured payload from any serializable value.
    ///
    /// A serialization failure degrades to a text payload describing it.
    pub fn structured<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => Payload::Structured(value),
            Err(e) => Payload::Text(format!("<unserializable payload: {}>", e)),
        }
    }

    /// Render the payload into the text that ends up in a log line.
    pub fn render(&self) -> String {
        match self {
            Payload::Text(text) => text.clone(),
            Payload::Structured(Value::String(s)) => s.clone(),
            Payload::Structured(value @ (Value::Object(_) | Value::Array(_))) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            Payload::Structured(scalar) => scalar.to_string(),
        }
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<&String> for Payload {
    fn from(text: &String) -> Self {
        Payload::Text(text.clone())
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Structured(value)
    }
}

/// A single log record, created per logging call.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub severity: Severity,
    pub context: Option<String>,
    pub message: String,
    /// Stack trace (error calls only).
    pub trace: Option<String>,
}

impl LogEntry {
    pub fn new(severity: Severity, message: String, context: Option<&str>) -> Self {
        Self {
            timestamp: Utc::now(),
            severity,
            context: context.map(str::to_string),
            message,
            trace: None,
        }
    }

    pub fn with_trace(mut self, trace: Option<&str>) -> Self {
        self.trace = trace.map(str::to_string);
        self
    }

    /// ISO-8601 timestamp with millisecond precision in UTC.
    pub fn timestamp_iso(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Message body as persisted, with the stack trace appended.
    pub fn body(&self) -> String {
        match &self.trace {
            Some(trace) => format!("{}\nStack trace: {}", self.message, trace),
            None => self.message.clone(),
        }
    }

    /// `[SEVERITY] [context] message`, shared by file and console forms.
    pub fn prefixed(&self, message: &str) -> String {
        match &self.context {
            Some(ctx) => format!("[{}] [{}] {}", self.severity, ctx, message),
            None => format!("[{}] {}", self.severity, message),
        }
    }

    /// Full line written to a log file, newline terminated.
    pub fn file_line(&self) -> String {
        format!("[{}] {}\n", self.timestamp_iso(), self.prefixed(&self.body()))
    }

    /// Console mirror line (without timestamp and without stack trace).
    pub fn console_line(&self) -> String {
        self.prefixed(&self.message)
    }
}

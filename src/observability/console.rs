//! Console mirror of the structured logger.
//!
//! Every entry is re-emitted as a `tracing` event on the
//! `order_service::console` target, so the process-wide subscriber
//! decides where the console lines end up (stdout by default).

use crate::observability::entry::LogEntry;
use crate::observability::severity::Severity;
use crate::observability::sink::LogSink;

/// Sink that mirrors entries to the console through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }
}

impl LogSink for ConsoleSink {
    fn record(&self, entry: &LogEntry) {
        let line = entry.console_line();
        match entry.severity {
            Severity::Error => {
                tracing::error!(target: "order_service::console", "{}", line);
                if let Some(trace) = &entry.trace {
                    tracing::error!(target: "order_service::console", "[ERROR] Stack trace: {}", trace);
                }
            }
            Severity::Warn => tracing::warn!(target: "order_service::console", "{}", line),
            Severity::Info => tracing::info!(target: "order_service::console", "{}", line),
            Severity::Debug => tracing::debug!(target: "order_service::console", "{}", line),
            Severity::Verbose => tracing::trace!(target: "order_service::console", "{}", line),
        }
    }
}

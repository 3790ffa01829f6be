//! Log sink abstraction.
//!
//! # Responsibilities
//! - Define the boundary every log entry crosses on its way out
//! - Provide an in-memory sink for tests and embedding
//!
//! # Design Decisions
//! - `record` is infallible: sinks convert their own I/O errors into a
//!   fallback report at this boundary, never deeper
//! - Sinks are shared across request tasks, so they must be `Send + Sync`

use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;

use crate::observability::entry::LogEntry;
use crate::observability::severity::Severity;

/// Destination for log entries.
pub trait LogSink: Send + Sync {
    /// Record one entry. Must not panic or propagate failures.
    fn record(&self, entry: &LogEntry);
}

/// Errors raised inside a sink before they are reported and dropped.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to create log directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write to log file {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to rotate log file {path:?}: {source}")]
    Rotate {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Sink that keeps entries in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every recorded entry, in recording order.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Entries recorded at the given severity.
    pub fn at(&self, severity: Severity) -> Vec<LogEntry> {
        self.entries()
            .into_iter()
            .filter(|e| e.severity == severity)
            .collect()
    }

    /// Entries recorded under the given context label.
    pub fn in_context(&self, context: &str) -> Vec<LogEntry> {
        self.entries()
            .into_iter()
            .filter(|e| e.context.as_deref() == Some(context))
            .collect()
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }
}

impl LogSink for MemorySink {
    fn record(&self, entry: &LogEntry) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry.clone());
        }
    }
}

//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request observer / order service / business code
//!     → logger.rs (leveled + convenience calls, payload rendering)
//!         → console.rs (mirror as `tracing` events)
//!         → file_sink.rs (one file per severity per day, rotation)
//!
//! tracing.rs installs the process-wide subscriber the console mirror
//! and the sink fallback channel report through.
//! ```
//!
//! # Design Decisions
//! - Logging never fails the caller; I/O errors stop at the sink boundary
//! - Sinks sit behind a trait so tests can capture entries in memory
//! - The logger is passed explicitly, there is no global instance

pub mod console;
pub mod entry;
pub mod file_sink;
pub mod logger;
pub mod severity;
pub mod sink;
pub mod tracing;

pub use console::ConsoleSink;
pub use entry::{LogEntry, Payload};
pub use file_sink::FileSink;
pub use logger::Logger;
pub use severity::Severity;
pub use sink::{LogSink, MemorySink, SinkError};

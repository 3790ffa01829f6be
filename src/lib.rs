//! Order service library.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ───────────────▶ http::server ──▶ request observer ──▶ handlers ──▶ orders
//!                                            │                              │
//!                                            ▼                              ▼
//!                                     observability::Logger ◀───────────────┘
//!                                        │            │
//!                                        ▼            ▼
//!                                   ConsoleSink    FileSink
//!                                   (tracing)      (logs/<severity>-<day>.log)
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod orders;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use observability::Logger;

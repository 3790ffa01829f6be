//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, tower layers)
//!     → middleware/request_logging.rs
//!         → request.rs (capture method, url, params, query, body)
//!         → observer.rs (entry lines)
//!         → handlers.rs → orders service
//!         → response.rs (classify status, recover failure report)
//!         → observer.rs (exit or failure lines)
//!     → Send to client
//! ```

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod observer;
pub mod request;
pub mod response;
pub mod server;

pub use error::{ApiError, FailureReport};
pub use observer::{ObservedFailure, ObservedOutcome, RequestObserver};
pub use request::RequestTrace;
pub use server::{AppState, HttpServer};

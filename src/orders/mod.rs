//! Order management subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP handler
//!     → service.rs (id validation, lifecycle logging)
//!     → repository.rs (in-memory store)
//! ```

pub mod repository;
pub mod service;
pub mod types;

pub use repository::{InMemoryOrderRepository, OrderRepository};
pub use service::{demo_orders, OrderError, OrderResult, OrderService};
pub use types::{CreateOrder, Order, OrderFilter, OrderQuery, PaymentMethod, UpdateOrder};

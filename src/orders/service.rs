//! Order business logic.
//!
//! # Responsibilities
//! - Validate identifiers and translate misses into `OrderError::NotFound`
//! - Record store timings and order lifecycle events through the logger
//!
//! # Design Decisions
//! - The service owns no state besides its repository and logger handle
//! - Unknown and malformed ids are both "not found"

use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use uuid::Uuid;

use crate::observability::Logger;
use crate::orders::repository::OrderRepository;
use crate::orders::types::{CreateOrder, Order, OrderFilter, PaymentMethod, UpdateOrder};

/// Errors produced by order operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    #[error("Order not found")]
    NotFound(String),
}

/// Result type for order operations.
pub type OrderResult<T> = Result<T, OrderError>;

/// Order operations shared by the HTTP handlers.
#[derive(Clone)]
pub struct OrderService {
    repository: Arc<dyn OrderRepository>,
    logger: Logger,
}

impl OrderService {
    pub fn new(repository: Arc<dyn OrderRepository>, logger: Logger) -> Self {
        Self { repository, logger }
    }

    /// Insert the demo dataset.
    pub fn seed(&self, orders: Vec<CreateOrder>) {
        let count = orders.len();
        for request in orders {
            self.repository.insert(Order::create(request));
        }
        self.logger
            .verbose(format!("Seeded {} demo orders", count), "ORDERS");
    }

    pub fn list(&self, filter: &OrderFilter) -> Vec<Order> {
        let start = Instant::now();
        let orders = self.repository.find_all(filter);
        self.logger
            .log_database(&describe_filter(filter), start.elapsed(), None);
        orders
    }

    pub fn get(&self, id: &str) -> OrderResult<Order> {
        let uuid = parse_id(id)?;
        let start = Instant::now();
        let order = self.repository.find_by_id(&uuid);
        self.logger.log_database(
            &format!("find order by id {}", uuid),
            start.elapsed(),
            None,
        );
        order.ok_or_else(|| OrderError::NotFound(id.to_string()))
    }

    pub fn create(&self, request: CreateOrder) -> Order {
        let start = Instant::now();
        let order = self.repository.insert(Order::create(request));
        self.logger
            .log_performance("Create order", start.elapsed(), None);
        self.logger
            .log_order_created(order.id, order.client_id, order.amount, None);
        order
    }

    pub fn update(&self, id: &str, changes: UpdateOrder) -> OrderResult<Order> {
        let uuid = parse_id(id)?;
        let start = Instant::now();
        let updated = self
            .repository
            .update(&uuid, &changes)
            .ok_or_else(|| OrderError::NotFound(id.to_string()))?;
        self.logger
            .log_performance("Update order", start.elapsed(), None);
        self.logger.log_order_updated(updated.id, &changes, None);
        Ok(updated)
    }

    pub fn delete(&self, id: &str) -> OrderResult<()> {
        let uuid = parse_id(id)?;
        if !self.repository.delete(&uuid) {
            return Err(OrderError::NotFound(id.to_string()));
        }
        self.logger.log_order_deleted(uuid, None);
        Ok(())
    }
}

fn parse_id(id: &str) -> OrderResult<Uuid> {
    Uuid::parse_str(id.trim()).map_err(|_| OrderError::NotFound(id.to_string()))
}

fn describe_filter(filter: &OrderFilter) -> String {
    let client = filter
        .client_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "any".to_string());
    let payment = filter
        .payment_method
        .map(PaymentMethod::as_str)
        .unwrap_or("any");
    format!("find orders (clientId={}, paymentMethod={})", client, payment)
}

/// The two orders the service starts with when seeding is enabled.
pub fn demo_orders() -> Vec<CreateOrder> {
    vec![
        CreateOrder {
            amount: 1230.5,
            longitude: 23.21,
            latitude: 31.01,
            client_id: 1,
            payment_method: PaymentMethod::Cash,
        },
        CreateOrder {
            amount: 7000.0,
            longitude: 70.12,
            latitude: 7.98,
            client_id: 7,
            payment_method: PaymentMethod::Visa,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::{MemorySink, Severity};
    use crate::orders::repository::InMemoryOrderRepository;

    fn service() -> (OrderService, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let logger = Logger::with_sinks(Arc::new(MemorySink::new()), sink.clone());
        let service = OrderService::new(Arc::new(InMemoryOrderRepository::new()), logger);
        (service, sink)
    }

    #[test]
    fn test_seed_and_filter() {
        let (service, _) = service();
        service.seed(demo_orders());

        assert_eq!(service.list(&OrderFilter::default()).len(), 2);
        let visa = service.list(&OrderFilter {
            client_id: None,
            payment_method: Some(PaymentMethod::Visa),
        });
        assert_eq!(visa.len(), 1);
        assert_eq!(visa[0].client_id, 7);
    }

    #[test]
    fn test_lifecycle_is_logged() {
        let (service, sink) = service();
        let order = service.create(demo_orders().remove(0));
        service
            .update(
                &order.id.to_string(),
                UpdateOrder {
                    amount: Some(5.0),
                    ..UpdateOrder::default()
                },
            )
            .unwrap();
        service.delete(&order.id.to_string()).unwrap();

        let lifecycle: Vec<String> = sink
            .in_context("ORDERS")
            .into_iter()
            .filter(|e| e.severity == Severity::Info)
            .map(|e| e.message)
            .collect();
        assert_eq!(
            lifecycle,
            vec![
                format!("Order created - ID: {}, Client: 1, Amount: 1230.5", order.id),
                format!("Order updated - ID: {}, Changes: {{\"amount\":5.0}}", order.id),
                format!("Order deleted - ID: {}", order.id),
            ]
        );
    }

    #[test]
    fn test_not_found() {
        let (service, _) = service();
        let missing = Uuid::new_v4().to_string();

        assert_eq!(service.get(&missing), Err(OrderError::NotFound(missing.clone())));
        assert_eq!(service.get("not-a-uuid"), Err(OrderError::NotFound("not-a-uuid".into())));
        assert!(service.update(&missing, UpdateOrder::default()).is_err());
        assert!(service.delete(&missing).is_err());
    }

    #[test]
    fn test_store_timings_are_debug() {
        let (service, sink) = service();
        service.list(&OrderFilter::default());

        let queries = sink.in_context("DATABASE");
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].severity, Severity::Debug);
        assert!(queries[0]
            .message
            .ends_with("find orders (clientId=any, paymentMethod=any)"));
    }
}
